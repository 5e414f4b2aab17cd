/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 训练配置：优化器、学习率、损失函数、轮数、批大小
 *
 * 与图无关，由外部应用持有，按值传给代码生成器。
 */

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 优化器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Optimizer {
    #[default]
    Adam,
    #[serde(rename = "SGD")]
    Sgd,
}

impl Optimizer {
    /// `torch.optim` 中的类名
    pub const fn torch_name(&self) -> &'static str {
        match self {
            Self::Adam => "Adam",
            Self::Sgd => "SGD",
        }
    }
}

impl fmt::Display for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.torch_name())
    }
}

/// 损失函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LossFunction {
    /// 多分类交叉熵（内部已包含 LogSoftmax）
    #[default]
    CrossEntropyLoss,
    /// 均方误差，用于回归
    #[serde(rename = "MSELoss")]
    MseLoss,
}

impl LossFunction {
    /// `torch.nn` 中的类名
    pub const fn torch_name(&self) -> &'static str {
        match self {
            Self::CrossEntropyLoss => "CrossEntropyLoss",
            Self::MseLoss => "MSELoss",
        }
    }

    /// 是否为分类损失（目标为类别下标）
    pub const fn is_classification(&self) -> bool {
        matches!(self, Self::CrossEntropyLoss)
    }

    /// 是否已包含 Softmax（此时末端的 Softmax 层是多余的）
    pub const fn combines_softmax(&self) -> bool {
        matches!(self, Self::CrossEntropyLoss)
    }
}

impl fmt::Display for LossFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.torch_name())
    }
}

/// 训练配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingConfig {
    pub optimizer: Optimizer,
    pub learning_rate: f64,
    pub loss_function: LossFunction,
    pub epochs: usize,
    pub batch_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            optimizer: Optimizer::Adam,
            learning_rate: 0.001,
            loss_function: LossFunction::CrossEntropyLoss,
            epochs: 10,
            batch_size: 64,
        }
    }
}

impl TrainingConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 检查各项取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "learningRate",
                requirement: "为正的有限数",
                value: self.learning_rate.to_string(),
            });
        }
        if self.epochs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "epochs",
                requirement: "≥1",
                value: self.epochs.to_string(),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batchSize",
                requirement: "≥1",
                value: self.batch_size.to_string(),
            });
        }
        Ok(())
    }

    pub const fn is_classification(&self) -> bool {
        self.loss_function.is_classification()
    }

    pub const fn combines_softmax(&self) -> bool {
        self.loss_function.combines_softmax()
    }
}
