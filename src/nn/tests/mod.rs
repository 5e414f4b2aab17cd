mod graph_order;
mod inference;
mod validation;

use crate::nn::{LayerKind, Node, NodeId, ParamValue, Params, Position};

/// 构造参数袋
pub(super) fn params<const N: usize>(pairs: [(&str, ParamValue); N]) -> Params {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// 以默认参数为基础、覆盖给定参数的层
pub(super) fn layer<const N: usize>(
    kind: LayerKind,
    overrides: [(&str, ParamValue); N],
) -> (LayerKind, Params) {
    let mut merged = kind.default_params();
    merged.extend(params(overrides));
    (kind, merged)
}

/// 指定形状的 Input 层
pub(super) fn input(shape: &str) -> (LayerKind, Params) {
    layer(LayerKind::Input, [("shape", shape.into())])
}

/// 按给定顺序构造一条已连接的链，节点 ID 依次为 node_0, node_1, ...
pub(super) fn chain(layers: Vec<(LayerKind, Params)>) -> Vec<Node> {
    let count = layers.len();
    layers
        .into_iter()
        .enumerate()
        .map(|(i, (kind, params))| {
            let mut node = Node::new(NodeId(i as u64), kind, Position::new(i as f64, 0.0));
            node.params = params;
            if i + 1 < count {
                node.next_id = Some(NodeId(i as u64 + 1));
            }
            node
        })
        .collect()
}
