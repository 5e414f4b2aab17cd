/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Flatten 层 - 将任意阶数据展平为一阶特征向量
 *                 常用于卷积层与全连接层之间的转换
 */

use super::TraitLayer;
use crate::errors::ShapeError;

/// Flatten 层
///
/// - 一阶输入：原样输出
/// - 其他阶数：输出 `[所有维度之积]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flatten;

impl TraitLayer for Flatten {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        if input.len() == 1 {
            return Ok(input.to_vec());
        }
        let features = input
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or(ShapeError::DimensionOverflow("Flatten后的特征数"))?;
        Ok(vec![features])
    }

    fn torch_constructor(&self, _input: &[usize]) -> Option<String> {
        Some("nn.Flatten(start_dim=1)".to_string())
    }
}
