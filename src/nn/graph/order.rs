/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 拓扑排序：沿后继链求出执行顺序
 */

use super::node::{Node, NodeId};
use std::collections::{HashMap, HashSet};

/// 排序结果：总是全部节点的一个排列
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOrder {
    /// 主链在前，未被遍历到的节点（孤立节点）按原顺序追加在后
    pub nodes: Vec<Node>,
    /// 遍历中是否遇到了环（此时主链在环处截断）
    pub cycle_detected: bool,
}

impl ChainOrder {
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }
}

/// 求节点的拓扑顺序
///
/// 从唯一的 Input 节点出发（没有时取入度为 0 的节点），沿 `next_id` 前进，
/// 遇到缺失的后继或已访问过的节点即停止，随后追加所有未访问的节点。
pub fn sort_nodes(nodes: &[Node]) -> ChainOrder {
    if nodes.is_empty() {
        return ChainOrder {
            nodes: Vec::new(),
            cycle_detected: false,
        };
    }

    let start = nodes.iter().find(|n| n.is_input()).or_else(|| {
        let targets: HashSet<NodeId> = nodes.iter().filter_map(|n| n.next_id).collect();
        nodes.iter().find(|n| !targets.contains(&n.id))
    });
    let Some(start) = start else {
        // 每个节点都有前驱，必然存在环
        log::warn!("图中不存在起始节点（所有节点都有前驱），按原顺序返回");
        return ChainOrder {
            nodes: nodes.to_vec(),
            cycle_detected: true,
        };
    };

    let by_id: HashMap<NodeId, &Node> = nodes.iter().map(|n| (n.id, n)).collect();
    let mut visited = HashSet::with_capacity(nodes.len());
    let mut sorted = Vec::with_capacity(nodes.len());
    let mut cycle_detected = false;

    let mut current = Some(start);
    while let Some(node) = current {
        if !visited.insert(node.id) {
            log::warn!("检测到环：{node}已被访问");
            cycle_detected = true;
            break;
        }
        sorted.push(node.clone());
        current = node.next_id.and_then(|next| by_id.get(&next).copied());
    }

    sorted.extend(nodes.iter().filter(|n| !visited.contains(&n.id)).cloned());

    ChainOrder {
        nodes: sorted,
        cycle_detected,
    }
}

/// 从 `start` 沿后继链前进能否到达 `target`（含环保护）
pub(crate) fn reaches(nodes: &[Node], start: NodeId, target: NodeId) -> bool {
    let by_id: HashMap<NodeId, &Node> = nodes.iter().map(|n| (n.id, n)).collect();
    let mut visited = HashSet::new();
    let mut current = Some(start);
    while let Some(id) = current {
        if id == target {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        current = by_id.get(&id).and_then(|n| n.next_id);
    }
    false
}

/// 链的末端：从起始节点沿后继链走到的最后一个节点
pub(crate) fn chain_end(nodes: &[Node]) -> Option<NodeId> {
    let order = sort_nodes(nodes);
    let chain_len = chain_length(&order.nodes);
    order.nodes.get(chain_len.checked_sub(1)?).map(|n| n.id)
}

/// 排序结果中主链的长度（前缀中通过后继相连的节点数）
fn chain_length(sorted: &[Node]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted
        .windows(2)
        .take_while(|pair| pair[0].next_id == Some(pair[1].id))
        .count()
}
