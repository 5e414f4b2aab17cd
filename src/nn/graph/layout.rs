/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 自动布局：按拓扑顺序把节点排成一行
 */

use super::node::{Node, NodeId, Position};
use super::order::sort_nodes;
use super::state::{ORIGIN, SPACING_X};

/// 计算自动布局
///
/// 第 i 个（按拓扑顺序）节点放在`(50 + 250 * i, 150)`。
/// 结果可直接交给 `GraphAction::RepositionMany`，只改位置，不改连接。
pub fn auto_layout(nodes: &[Node]) -> Vec<(NodeId, Position)> {
    sort_nodes(nodes)
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let x = ORIGIN.x + SPACING_X * i as f64;
            (node.id, Position::new(x, ORIGIN.y))
        })
        .collect()
}
