/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 拓扑排序单元测试
 */

use super::{chain, input, layer};
use crate::nn::{LayerKind, Node, NodeId, sort_nodes};
use std::collections::HashSet;

fn ids(raw: &[u64]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId).collect()
}

fn assert_permutation(sorted: &[Node], original: &[Node]) {
    assert_eq!(sorted.len(), original.len());
    let sorted_ids: HashSet<NodeId> = sorted.iter().map(|n| n.id).collect();
    let original_ids: HashSet<NodeId> = original.iter().map(|n| n.id).collect();
    assert_eq!(sorted_ids.len(), sorted.len(), "存在重复节点");
    assert_eq!(sorted_ids, original_ids);
}

fn relu_chain(len: usize) -> Vec<Node> {
    let mut layers = vec![input("(4)")];
    layers.extend((1..len).map(|_| layer(LayerKind::Relu, [])));
    chain(layers)
}

#[test]
fn test_follows_links_regardless_of_storage_order() {
    let mut nodes = relu_chain(4);
    nodes.reverse();
    nodes.swap(0, 2);

    let order = sort_nodes(&nodes);
    assert_eq!(order.ids(), ids(&[0, 1, 2, 3]));
    assert!(!order.cycle_detected);
}

#[test]
fn test_orphans_are_appended() {
    let mut nodes = relu_chain(3);
    // 断开 node_1 -> node_2，node_2 成为孤立节点
    nodes[1].next_id = None;
    let mut orphan = Node::new(NodeId(9), LayerKind::Dropout, Default::default());
    orphan.next_id = None;
    nodes.insert(0, orphan);

    let order = sort_nodes(&nodes);
    assert_eq!(&order.ids()[..2], &ids(&[0, 1])[..]);
    assert_permutation(&order.nodes, &nodes);
    assert!(!order.cycle_detected);
}

#[test]
fn test_cycle_behind_input_terminates() {
    // Input -> A -> B -> A
    let mut nodes = relu_chain(3);
    nodes[2].next_id = Some(NodeId(1));

    let order = sort_nodes(&nodes);
    assert!(order.cycle_detected);
    assert_eq!(order.ids(), ids(&[0, 1, 2]));
    assert_permutation(&order.nodes, &nodes);
}

#[test]
fn test_pure_cycle_without_start_node() {
    // A -> B -> A，没有 Input，也没有入度为 0 的节点
    let mut a = Node::new(NodeId(1), LayerKind::Relu, Default::default());
    let mut b = Node::new(NodeId(2), LayerKind::Tanh, Default::default());
    a.next_id = Some(b.id);
    b.next_id = Some(a.id);
    let nodes = vec![a, b];

    let order = sort_nodes(&nodes);
    assert!(order.cycle_detected);
    assert_permutation(&order.nodes, &nodes);
}

#[test]
fn test_falls_back_to_in_degree_zero() {
    // 没有 Input：从无前驱的节点出发
    let mut nodes = relu_chain(3);
    nodes.remove(0);
    nodes.reverse();

    let order = sort_nodes(&nodes);
    assert_eq!(order.ids(), ids(&[1, 2]));
}

#[test]
fn test_dangling_successor_stops_walk() {
    let mut nodes = relu_chain(2);
    nodes[1].next_id = Some(NodeId(77));

    let order = sort_nodes(&nodes);
    assert_eq!(order.ids(), ids(&[0, 1]));
    assert!(!order.cycle_detected);
}

#[test]
fn test_empty_graph() {
    let order = sort_nodes(&[]);
    assert!(order.nodes.is_empty());
    assert!(!order.cycle_detected);
    assert!(order.into_nodes().is_empty());
}
