/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 类型化的层配置（每种层一个变体），及其形状传递/代码生成接口
 */

use super::{
    BatchNorm2d, Conv2d, Dropout, Elementwise, ElementwiseKind, Flatten, LayerKind, Linear,
    MaxPool2d, Params, Passthrough, Recurrent, RecurrentCell,
};
use crate::errors::ShapeError;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum LayerConfig {
    Linear(Linear),
    Flatten(Flatten),
    Conv2d(Conv2d),
    MaxPool2d(MaxPool2d),
    BatchNorm2d(BatchNorm2d),
    Recurrent(Recurrent),
    Dropout(Dropout),
    Elementwise(Elementwise),
    Passthrough(Passthrough),
}

#[enum_dispatch(LayerConfig)]
pub trait TraitLayer {
    /// 根据输入形状计算输出形状（返回新的独立序列）
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError>;

    /// 生成 PyTorch 构造表达式，如`nn.Linear(in_features=784, out_features=10)`；
    /// 无法表示的层返回 None
    fn torch_constructor(&self, input: &[usize]) -> Option<String>;

    /// 生成前向传播语句
    fn torch_forward(&self, attr: &str) -> String {
        format!("x = self.{attr}(x)")
    }

    /// 可训练参数个数（溢出时为 None）
    fn param_count(&self, _input: &[usize]) -> Option<usize> {
        Some(0)
    }
}

impl LayerConfig {
    /// 从节点的参数袋惰性解析出类型化配置
    ///
    /// Input 层不在此列：它只能位于链首，由形状推断单独处理。
    pub fn from_params(kind: LayerKind, params: &Params) -> Result<Self, ShapeError> {
        let config = match kind {
            LayerKind::Input => return Err(ShapeError::MisplacedInput),
            LayerKind::Linear => Linear::from_params(params)?.into(),
            LayerKind::Flatten => Flatten.into(),
            LayerKind::Conv2d => Conv2d::from_params(params)?.into(),
            LayerKind::MaxPool2d => MaxPool2d::from_params(params)?.into(),
            LayerKind::BatchNorm2d => BatchNorm2d.into(),
            LayerKind::Lstm => Recurrent::from_params(RecurrentCell::Lstm, params)?.into(),
            LayerKind::Gru => Recurrent::from_params(RecurrentCell::Gru, params)?.into(),
            LayerKind::Dropout => Dropout::from_params(params)?.into(),
            LayerKind::Relu => Elementwise::new(ElementwiseKind::Relu).into(),
            LayerKind::Sigmoid => Elementwise::new(ElementwiseKind::Sigmoid).into(),
            LayerKind::Tanh => Elementwise::new(ElementwiseKind::Tanh).into(),
            LayerKind::Softmax => Elementwise::new(ElementwiseKind::Softmax).into(),
            LayerKind::Identity => Elementwise::new(ElementwiseKind::Identity).into(),
            LayerKind::Unknown => Passthrough.into(),
        };
        Ok(config)
    }
}

/// 检查输入阶数
pub(super) fn require_rank(
    input: &[usize],
    expected: usize,
    layout: &'static str,
    hint: &'static str,
) -> Result<(), ShapeError> {
    if input.len() != expected {
        return Err(ShapeError::RequiresRank {
            expected,
            got: input.len(),
            layout,
            hint,
        });
    }
    Ok(())
}

/// 滑动窗口输出尺寸：`floor((dim + 2*padding - kernel_size) / stride) + 1`
pub(super) fn window_output(
    dim: usize,
    kernel_size: usize,
    stride: usize,
    padding: usize,
) -> Result<usize, ShapeError> {
    let padded = padding
        .checked_mul(2)
        .and_then(|pad| dim.checked_add(pad))
        .ok_or(ShapeError::DimensionOverflow("dim + 2*padding"))?;
    if padded < kernel_size {
        return Err(ShapeError::DegenerateOutput {
            dim,
            padding,
            kernel_size,
        });
    }
    Ok((padded - kernel_size) / stride + 1)
}
