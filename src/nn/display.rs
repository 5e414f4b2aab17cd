/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 表格的显示格式化：按显示宽度对齐与千分位
 */

/// 计算字符串显示宽度（中日韩文字与全角符号占两列，制表符如`─`占一列）
pub(in crate::nn) fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
    )
}

/// 按显示宽度左对齐补空格
pub(in crate::nn) fn pad_left_aligned(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(padding))
}

/// 按显示宽度右对齐补空格
pub(in crate::nn) fn pad_right_aligned(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(s));
    format!("{}{s}", " ".repeat(padding))
}

/// 格式化数字为千分位分隔形式
pub(in crate::nn) fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
