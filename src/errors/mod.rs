/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 错误类型：形状推断错误、代码生成错误、训练配置错误
 */

use thiserror::Error;
mod reason;
pub use self::reason::*;

/// 单个节点上的形状推断错误
///
/// 形状推断从不向外抛出错误，而是把它记录到对应节点的 `ShapeInfo::error` 中。
/// 其中 `UpstreamInvalid` 只作为级联标记出现在首个出错节点之后的节点上，
/// 可用 [`ShapeError::is_cascade`] 区分“根因”与“级联”。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("形状格式无效：\"{text}\"（{detail}），期望形如 (C, H, W) 或 (features) 的格式")]
    InvalidShapeFormat { text: String, detail: String },

    #[error("需要{expected}D输入{layout}，但实际为{got}D{hint}")]
    RequiresRank {
        expected: usize,
        got: usize,
        layout: &'static str,
        hint: &'static str,
    },

    #[error("缺少参数`{0}`")]
    MissingParameter(String),

    #[error("参数`{name}`无效：{reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("输出尺寸非正：输入尺寸{dim}（含填充{padding}）小于窗口大小{kernel_size}")]
    DegenerateOutput {
        dim: usize,
        padding: usize,
        kernel_size: usize,
    },

    #[error("维度计算溢出：{0}超出可表示的范围")]
    DimensionOverflow(&'static str),

    #[error("Input层只能位于链首")]
    MisplacedInput,

    #[error("由于上游的错误，输入形状无效")]
    UpstreamInvalid,
}

impl ShapeError {
    /// 是否为级联标记（即错误并非由本节点引起）
    pub const fn is_cascade(&self) -> bool {
        matches!(self, Self::UpstreamInvalid)
    }
}

/// 代码生成错误：生成要么整体成功，要么整体失败
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    #[error("模型必须以Input层开始")]
    MissingInput,

    #[error("由于层'{node}'存在形状错误，无法生成代码：{source}")]
    InvalidShape {
        node: String,
        #[source]
        source: ShapeError,
    },

    #[error("无法确定层'{node}'的输入形状")]
    MissingInputShape { node: String },

    #[error("无法确定有效且非空的模型最终输出形状")]
    EmptyOutputShape,

    #[error("训练配置无效：{0}")]
    InvalidConfig(#[from] ConfigError),
}

/// 训练配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field}须{requirement}，实际为{value}")]
    InvalidValue {
        field: &'static str,
        requirement: &'static str,
        value: String,
    },

    #[error("配置（反）序列化失败：{0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
