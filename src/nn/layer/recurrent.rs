/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : LSTM / GRU 循环层（简化抽象）
 *
 * 这里不单独跟踪序列轴：输入视为一阶特征向量，
 * 输出为 hidden_size，双向时翻倍。
 */

use super::config::require_rank;
use super::{Params, TraitLayer, bool_param, usize_param};
use crate::errors::ShapeError;

/// 循环单元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrentCell {
    Lstm,
    Gru,
}

impl RecurrentCell {
    /// PyTorch 中的类名
    pub const fn torch_name(&self) -> &'static str {
        match self {
            Self::Lstm => "LSTM",
            Self::Gru => "GRU",
        }
    }

    /// 门的个数（LSTM 为 4，GRU 为 3）
    const fn gates(&self) -> usize {
        match self {
            Self::Lstm => 4,
            Self::Gru => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrent {
    pub cell: RecurrentCell,
    pub hidden_size: usize,
    pub num_layers: usize,
    pub bidirectional: bool,
}

impl Recurrent {
    pub fn from_params(cell: RecurrentCell, params: &Params) -> Result<Self, ShapeError> {
        Ok(Self {
            cell,
            hidden_size: usize_param(params, "hidden_size", 1)?,
            num_layers: usize_param(params, "num_layers", 1)?,
            bidirectional: bool_param(params, "bidirectional")?,
        })
    }

    const fn directions(&self) -> usize {
        if self.bidirectional { 2 } else { 1 }
    }
}

impl TraitLayer for Recurrent {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        require_rank(input, 1, "（当前为简化实现）", "")?;
        let features = self
            .hidden_size
            .checked_mul(self.directions())
            .ok_or(ShapeError::DimensionOverflow("hidden_size * 方向数"))?;
        Ok(vec![features])
    }

    fn torch_constructor(&self, input: &[usize]) -> Option<String> {
        let bidirectional = if self.bidirectional { "True" } else { "False" };
        Some(format!(
            "nn.{}(input_size={}, hidden_size={}, num_layers={}, batch_first=True, bidirectional={})",
            self.cell.torch_name(),
            input.first()?,
            self.hidden_size,
            self.num_layers,
            bidirectional
        ))
    }

    /// 只保留输出序列，丢弃隐藏状态
    fn torch_forward(&self, attr: &str) -> String {
        format!("x, _ = self.{attr}(x)  # We only need the output sequence")
    }

    // 每层每个方向：gates*h*(in_l + h) 个权重 + 2*gates*h 个偏置，
    // 首层之后 in_l = h*directions
    fn param_count(&self, input: &[usize]) -> Option<usize> {
        let h = self.hidden_size;
        let gate_rows = self.cell.gates().checked_mul(h)?;
        let per_layer = |in_l: usize| -> Option<usize> {
            let weights = gate_rows.checked_mul(in_l.checked_add(h)?)?;
            let biases = gate_rows.checked_mul(2)?;
            self.directions().checked_mul(weights.checked_add(biases)?)
        };
        let first = per_layer(input.first().copied().unwrap_or(0))?;
        let stacked = per_layer(h.checked_mul(self.directions())?)?;
        stacked
            .checked_mul(self.num_layers.saturating_sub(1))?
            .checked_add(first)
    }
}
