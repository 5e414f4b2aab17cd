/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Linear (全连接) 层的形状传递规则
 */

use super::config::require_rank;
use super::{Params, TraitLayer, usize_param};
use crate::errors::ShapeError;

/// Linear (全连接) 层：`output = x @ W + b`
///
/// # 输入/输出形状
/// - 输入：[in_features]
/// - 输出：[out_features]
///
/// 输入不是一阶时报错，并提示插入 Flatten 层。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear {
    /// 输出特征维度
    pub out_features: usize,
}

impl Linear {
    pub fn from_params(params: &Params) -> Result<Self, ShapeError> {
        Ok(Self {
            out_features: usize_param(params, "out_features", 1)?,
        })
    }
}

impl TraitLayer for Linear {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        require_rank(input, 1, "（特征）", "，请添加Flatten层")?;
        Ok(vec![self.out_features])
    }

    fn torch_constructor(&self, input: &[usize]) -> Option<String> {
        Some(format!(
            "nn.Linear(in_features={}, out_features={})",
            input.first()?,
            self.out_features
        ))
    }

    fn param_count(&self, input: &[usize]) -> Option<usize> {
        let in_features = input.first().copied().unwrap_or(0);
        in_features
            .checked_mul(self.out_features)?
            .checked_add(self.out_features)
    }
}
