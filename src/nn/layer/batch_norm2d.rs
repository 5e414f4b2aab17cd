/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : BatchNorm2d 层：要求三阶输入，形状不变
 */

use super::TraitLayer;
use super::config::require_rank;
use crate::errors::ShapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchNorm2d;

impl TraitLayer for BatchNorm2d {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        require_rank(input, 3, "", "")?;
        Ok(input.to_vec())
    }

    fn torch_constructor(&self, input: &[usize]) -> Option<String> {
        Some(format!("nn.BatchNorm2d(num_features={})", input.first()?))
    }

    // 每个通道一个 weight 与一个 bias
    fn param_count(&self, input: &[usize]) -> Option<usize> {
        input.first().copied().unwrap_or(0).checked_mul(2)
    }
}
