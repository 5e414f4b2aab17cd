/*
 * Shape: 层链中流动的数据形状
 *
 * 具体形状是正整数序列：一阶表示特征向量，三阶表示 (通道, 高, 宽) 的数据体。
 * 此外还有两个哨兵值：`Start`（Input 层的输入侧）与 `NotAvailable`（无法计算）。
 *
 * # 示例
 * ```
 * use neuro_flow::nn::{parse_shape, Shape};
 *
 * let dims = parse_shape("(1, 28, 28)").unwrap();
 * assert_eq!(dims, vec![1, 28, 28]);
 *
 * let shape = Shape::Dims(dims);
 * assert_eq!(shape.to_string(), "[1, 28, 28]");
 * assert_eq!(Shape::Dims(vec![3136]).to_python_tuple().unwrap(), "(3136,)");
 * ```
 */

use crate::errors::ShapeError;
use crate::nn::layer::TensorDim;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点上的形状
///
/// 每次查询都重新计算，从不缓存在节点上。
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// 具体形状
    Dims(Vec<usize>),
    /// Input 层的输入侧
    Start,
    /// 尚不可计算（通常因为上游出错）
    NotAvailable,
}

impl Shape {
    /// 具体维度（哨兵值返回 None）
    pub fn dims(&self) -> Option<&[usize]> {
        match self {
            Self::Dims(dims) => Some(dims),
            _ => None,
        }
    }

    /// 阶数（哨兵值返回 None）
    pub fn ndim(&self) -> Option<usize> {
        self.dims().map(<[usize]>::len)
    }

    /// 元素总数（哨兵值或乘积溢出时返回 None）
    pub fn numel(&self) -> Option<usize> {
        self.dims()?
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// 维度类别：一阶为 D1，高于一阶为 D3，哨兵值或空形状为 Any
    pub fn dim_class(&self) -> TensorDim {
        match self.ndim() {
            Some(1) => TensorDim::D1,
            Some(n) if n > 1 => TensorDim::D3,
            _ => TensorDim::Any,
        }
    }

    /// 转为 Python 元组写法，一阶时带尾逗号，如 `(3136,)`
    pub fn to_python_tuple(&self) -> Option<String> {
        self.dims().map(python_tuple)
    }

    /// 转为用于显示的字符串
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Dims(dims) => {
                let parts: Vec<String> = dims.iter().map(ToString::to_string).collect();
                format!("[{}]", parts.join(", "))
            }
            Self::Start => "Start".to_string(),
            Self::NotAvailable => "N/A".to_string(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::Dims(dims.to_vec())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::Dims(dims)
    }
}

pub(crate) fn python_tuple(dims: &[usize]) -> String {
    let parts: Vec<String> = dims.iter().map(ToString::to_string).collect();
    let trailing = if dims.len() == 1 { "," } else { "" };
    format!("({}{})", parts.join(", "), trailing)
}

/// 解析形如 `(1, 28, 28)` 的形状文本
///
/// 忽略所有空白；必须以括号包裹；`()` 解析为空形状；每一项都须为正整数。
pub fn parse_shape(text: &str) -> Result<Vec<usize>, ShapeError> {
    let fail = |detail: String| ShapeError::InvalidShapeFormat {
        text: text.to_string(),
        detail,
    };

    let sanitized: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if sanitized.is_empty() {
        return Err(fail("形状文本为空".to_string()));
    }
    let content = sanitized
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| fail("形状须以括号包裹".to_string()))?;
    if content.is_empty() {
        return Ok(Vec::new());
    }

    content
        .split(',')
        .map(|item| match item.parse::<usize>() {
            Ok(0) => Err(fail("维度须为正整数，实际为0".to_string())),
            Ok(n) => Ok(n),
            Err(_) => Err(fail(format!("无效的维度值\"{item}\""))),
        })
        .collect()
}
