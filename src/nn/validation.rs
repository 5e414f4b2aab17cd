/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 连接校验：判断一条边两端的维度类别是否相容
 *
 * 校验只回答“能否连接”，不改动图；图的 connect 操作会在提交前调用它。
 */

use super::graph::{Node, NodeId};
use super::inference::infer_shapes;
use super::layer::TensorDim;
use crate::errors::ConnectionReason;

/// 连接校验结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub valid: bool,
    /// 拒绝原因（合法时为 None）
    pub reason: Option<ConnectionReason>,
}

impl ConnectionCheck {
    const fn accept() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    const fn reject(reason: ConnectionReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    /// 供外部本地化使用的原因键
    pub fn reason_key(&self) -> Option<&'static str> {
        self.reason.map(|r| r.key())
    }
}

/// 校验边 `from -> to`
///
/// `ordered` 应为“假设该边已存在”时的拓扑顺序。上游形状无法确定（已出错）时乐观放行，
/// 由形状面板展示既有的错误。
pub fn check_connection(ordered: &[Node], from: NodeId, to: NodeId) -> ConnectionCheck {
    let from_known = ordered.iter().any(|n| n.id == from);
    let Some(to_node) = ordered.iter().find(|n| n.id == to) else {
        return ConnectionCheck::reject(ConnectionReason::Generic);
    };
    if !from_known {
        return ConnectionCheck::reject(ConnectionReason::Generic);
    }

    // Input 与未知类型没有声明维度类别
    let Some(io) = to_node.kind.io_spec() else {
        return ConnectionCheck::accept();
    };

    let infos = infer_shapes(ordered);
    let from_output = match infos.iter().find(|info| info.node_id == from) {
        Some(info) if info.is_ok() => info.output_shape.dim_class(),
        _ => return ConnectionCheck::accept(),
    };

    match (from_output, io.input) {
        (TensorDim::Any, _) | (_, TensorDim::Any) => ConnectionCheck::accept(),
        (out, input) if out == input => ConnectionCheck::accept(),
        (TensorDim::D3, TensorDim::D1) => ConnectionCheck::reject(ConnectionReason::FlattenRequired),
        (TensorDim::D1, TensorDim::D3) => ConnectionCheck::reject(ConnectionReason::ConvAfterDense),
        _ => ConnectionCheck::reject(ConnectionReason::Generic),
    }
}
