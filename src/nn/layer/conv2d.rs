/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Conv2d (2D 卷积) 层的形状传递规则
 *
 * 输入/输出形状：
 * - 输入：[in_channels, H, W]
 * - 输出：[out_channels, H', W']
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding - kernel_size) / stride + 1
 * W' = (W + 2*padding - kernel_size) / stride + 1
 */

use super::config::{require_rank, window_output};
use super::{Params, TraitLayer, usize_param};
use crate::errors::ShapeError;

/// Conv2d (2D 卷积) 层
///
/// 高、宽共用同一组 `kernel_size`/`stride`/`padding`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conv2d {
    /// 输出通道数
    pub out_channels: usize,
    /// 卷积核边长
    pub kernel_size: usize,
    /// 步长
    pub stride: usize,
    /// 填充
    pub padding: usize,
}

impl Conv2d {
    pub fn from_params(params: &Params) -> Result<Self, ShapeError> {
        Ok(Self {
            out_channels: usize_param(params, "out_channels", 1)?,
            kernel_size: usize_param(params, "kernel_size", 1)?,
            stride: usize_param(params, "stride", 1)?,
            padding: usize_param(params, "padding", 0)?,
        })
    }
}

impl TraitLayer for Conv2d {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        require_rank(input, 3, "(C, H, W)", "")?;
        let h_out = window_output(input[1], self.kernel_size, self.stride, self.padding)?;
        let w_out = window_output(input[2], self.kernel_size, self.stride, self.padding)?;
        Ok(vec![self.out_channels, h_out, w_out])
    }

    fn torch_constructor(&self, input: &[usize]) -> Option<String> {
        Some(format!(
            "nn.Conv2d(in_channels={}, out_channels={}, kernel_size={}, stride={}, padding={})",
            input.first()?,
            self.out_channels,
            self.kernel_size,
            self.stride,
            self.padding
        ))
    }

    fn param_count(&self, input: &[usize]) -> Option<usize> {
        let in_channels = input.first().copied().unwrap_or(0);
        self.out_channels
            .checked_mul(in_channels)?
            .checked_mul(self.kernel_size)?
            .checked_mul(self.kernel_size)?
            .checked_add(self.out_channels)
    }
}
