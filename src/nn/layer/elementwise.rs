/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 逐元素层（激活函数、Dropout、输出层）及未知类型的透传
 *                 这些层对任意阶输入都不改变形状
 */

use super::{Params, TraitLayer, number_param};
use crate::errors::ShapeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementwiseKind {
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elementwise {
    pub kind: ElementwiseKind,
}

impl Elementwise {
    pub const fn new(kind: ElementwiseKind) -> Self {
        Self { kind }
    }
}

impl TraitLayer for Elementwise {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        Ok(input.to_vec())
    }

    fn torch_constructor(&self, _input: &[usize]) -> Option<String> {
        let constructor = match self.kind {
            ElementwiseKind::Relu => "nn.ReLU()",
            ElementwiseKind::Sigmoid => "nn.Sigmoid()",
            ElementwiseKind::Tanh => "nn.Tanh()",
            ElementwiseKind::Softmax => "nn.Softmax(dim=1)",
            ElementwiseKind::Identity => "nn.Identity()",
        };
        Some(constructor.to_string())
    }
}

/// Dropout 层：训练时以概率 p 随机置零
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dropout {
    pub p: f64,
}

impl Dropout {
    pub fn from_params(params: &Params) -> Result<Self, ShapeError> {
        let p = number_param(params, "p")?;
        if !(0.0..=1.0).contains(&p) {
            return Err(ShapeError::InvalidParameter {
                name: "p".to_string(),
                reason: format!("须在[0, 1]范围内，实际为{p}"),
            });
        }
        Ok(Self { p })
    }
}

impl TraitLayer for Dropout {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        Ok(input.to_vec())
    }

    fn torch_constructor(&self, _input: &[usize]) -> Option<String> {
        Some(format!("nn.Dropout(p={})", self.p))
    }
}

/// 未知层类型：原样透传形状，不生成代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Passthrough;

impl TraitLayer for Passthrough {
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
        Ok(input.to_vec())
    }

    fn torch_constructor(&self, _input: &[usize]) -> Option<String> {
        None
    }
}
