/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : MaxPool2d (2D 最大池化) 层的形状传递规则
 *
 * 输入：[C, H, W] → 输出：[C, H', W']
 * H' = (H - kernel_size) / stride + 1（无填充项）
 */

use super::config::{require_rank, window_output};
use super::{Params, TraitLayer, usize_param};
use crate::errors::ShapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool2d {
    /// 池化窗口边长
    pub kernel_size: usize,
    /// 步长
    pub stride: usize,
}

impl MaxPool2d {
    pub fn from_params(params: &Params) -> Result<Self, ShapeError> {
        Ok(Self {
            kernel_size: usize_param(params, "kernel_size", 1)?,
            stride: usize_param(params, "stride", 1)?,
        })
    }
}

impl TraitLayer for MaxPool2d {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        require_rank(input, 3, "", "")?;
        let h_out = window_output(input[1], self.kernel_size, self.stride, 0)?;
        let w_out = window_output(input[2], self.kernel_size, self.stride, 0)?;
        Ok(vec![input[0], h_out, w_out])
    }

    fn torch_constructor(&self, _input: &[usize]) -> Option<String> {
        Some(format!(
            "nn.MaxPool2d(kernel_size={}, stride={})",
            self.kernel_size, self.stride
        ))
    }
}
