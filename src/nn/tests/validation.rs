/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 连接校验单元测试
 */

use super::{chain, input, layer};
use crate::errors::ConnectionReason;
use crate::nn::{LayerKind, NodeId, check_connection};
use rstest::rstest;

fn conv() -> (LayerKind, crate::nn::Params) {
    layer(LayerKind::Conv2d, [])
}

#[test]
fn test_volume_into_linear_requires_flatten() {
    // Input -> Conv2d -> Linear（假设该边已存在）
    let nodes = chain(vec![input("(1, 28, 28)"), conv(), layer(LayerKind::Linear, [])]);
    let check = check_connection(&nodes, NodeId(1), NodeId(2));
    assert!(!check.valid);
    assert_eq!(check.reason, Some(ConnectionReason::FlattenRequired));
    assert_eq!(check.reason_key(), Some("validation.flattenRequired"));
}

#[test]
fn test_flatten_interposed_is_accepted() {
    let nodes = chain(vec![
        input("(1, 28, 28)"),
        conv(),
        layer(LayerKind::Flatten, []),
        layer(LayerKind::Linear, []),
    ]);
    let check = check_connection(&nodes, NodeId(2), NodeId(3));
    assert!(check.valid);
    assert_eq!(check.reason, None);
    assert_eq!(check.reason_key(), None);
}

#[test]
fn test_conv_after_dense_is_rejected() {
    let nodes = chain(vec![input("(784)"), layer(LayerKind::Linear, []), conv()]);
    let check = check_connection(&nodes, NodeId(1), NodeId(2));
    assert!(!check.valid);
    assert_eq!(check.reason, Some(ConnectionReason::ConvAfterDense));
    assert_eq!(check.reason_key(), Some("validation.convAfterDense"));
}

#[rstest]
#[case(LayerKind::Softmax, false)]
#[case(LayerKind::Lstm, false)]
#[case(LayerKind::Relu, true)]
#[case(LayerKind::Dropout, true)]
#[case(LayerKind::Identity, true)]
#[case(LayerKind::Flatten, true)]
#[case(LayerKind::MaxPool2d, true)]
#[case(LayerKind::BatchNorm2d, true)]
fn test_targets_after_volume(#[case] target: LayerKind, #[case] valid: bool) {
    let nodes = chain(vec![input("(3, 32, 32)"), conv(), layer(target, [])]);
    let check = check_connection(&nodes, NodeId(1), NodeId(2));
    assert_eq!(check.valid, valid, "{target} 接在卷积层之后");
    if !valid {
        assert_eq!(check.reason, Some(ConnectionReason::FlattenRequired));
    }
}

#[test]
fn test_input_node_output_class_is_used() {
    // Input 直接连 Linear：三维输入同样需要 Flatten
    let nodes = chain(vec![input("(1, 28, 28)"), layer(LayerKind::Linear, [])]);
    let check = check_connection(&nodes, NodeId(0), NodeId(1));
    assert_eq!(check.reason, Some(ConnectionReason::FlattenRequired));

    let nodes = chain(vec![input("(784)"), layer(LayerKind::Linear, [])]);
    assert!(check_connection(&nodes, NodeId(0), NodeId(1)).valid);
}

#[test]
fn test_broken_upstream_is_accepted_optimistically() {
    let nodes = chain(vec![input("(1, 28"), conv(), layer(LayerKind::Linear, [])]);
    assert!(check_connection(&nodes, NodeId(1), NodeId(2)).valid);
}

#[test]
fn test_target_without_io_class_is_accepted() {
    let nodes = chain(vec![input("(1, 28, 28)"), conv(), layer(LayerKind::Unknown, [])]);
    assert!(check_connection(&nodes, NodeId(1), NodeId(2)).valid);
}

#[test]
fn test_unknown_endpoints_are_generic_errors() {
    let nodes = chain(vec![input("(1, 28, 28)"), conv()]);

    let missing_from = check_connection(&nodes, NodeId(42), NodeId(1));
    assert!(!missing_from.valid);
    assert_eq!(missing_from.reason, Some(ConnectionReason::Generic));

    let missing_to = check_connection(&nodes, NodeId(0), NodeId(42));
    assert!(!missing_to.valid);
    assert_eq!(missing_to.reason_key(), Some("validation.genericError"));
}

#[test]
fn test_check_does_not_touch_nodes() {
    let nodes = chain(vec![input("(1, 28, 28)"), conv(), layer(LayerKind::Linear, [])]);
    let snapshot = nodes.clone();
    let _ = check_connection(&nodes, NodeId(1), NodeId(2));
    assert_eq!(nodes, snapshot);
}
