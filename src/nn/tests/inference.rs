/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 形状推断单元测试
 */

use super::{chain, input, layer};
use crate::errors::ShapeError;
use crate::nn::{LayerKind, NodeId, Shape, infer_shapes};
use rstest::rstest;

fn mnist_cnn() -> Vec<crate::nn::Node> {
    chain(vec![
        input("(1, 28, 28)"),
        layer(
            LayerKind::Conv2d,
            [
                ("out_channels", 16.0.into()),
                ("kernel_size", 3.0.into()),
                ("stride", 1.0.into()),
                ("padding", 1.0.into()),
            ],
        ),
        layer(LayerKind::MaxPool2d, [("kernel_size", 2.0.into()), ("stride", 2.0.into())]),
        layer(LayerKind::Flatten, []),
        layer(LayerKind::Linear, [("out_features", 10.0.into())]),
    ])
}

// ==================== 基础功能测试 ====================

#[test]
fn test_cnn_shape_progression() {
    let infos = infer_shapes(&mnist_cnn());
    assert_eq!(infos.len(), 5);

    assert_eq!(infos[0].input_shape, Shape::Start);
    assert_eq!(infos[0].output_shape, Shape::Dims(vec![1, 28, 28]));
    assert_eq!(infos[1].output_shape, Shape::Dims(vec![16, 28, 28]));
    assert_eq!(infos[2].input_shape, Shape::Dims(vec![16, 28, 28]));
    assert_eq!(infos[2].output_shape, Shape::Dims(vec![16, 14, 14]));
    assert_eq!(infos[3].output_shape, Shape::Dims(vec![3136]));
    assert_eq!(infos[4].output_shape, Shape::Dims(vec![10]));
    assert!(infos.iter().all(|info| info.is_ok()));
}

#[test]
fn test_results_follow_input_order() {
    let nodes = mnist_cnn();
    let infos = infer_shapes(&nodes);
    let ids: Vec<NodeId> = infos.iter().map(|info| info.node_id).collect();
    let expected: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_flatten_on_vector_is_noop() {
    let infos = infer_shapes(&chain(vec![input("(784)"), layer(LayerKind::Flatten, [])]));
    assert_eq!(infos[1].output_shape, Shape::Dims(vec![784]));
}

#[test]
fn test_inference_is_idempotent() {
    let nodes = mnist_cnn();
    let snapshot = nodes.clone();
    assert_eq!(infer_shapes(&nodes), infer_shapes(&nodes));
    assert_eq!(nodes, snapshot);
}

// ==================== 不适用的情况 ====================

#[test]
fn test_empty_sequence_yields_nothing() {
    assert!(infer_shapes(&[]).is_empty());
}

#[test]
fn test_sequence_not_starting_with_input_yields_nothing() {
    let nodes = chain(vec![layer(LayerKind::Relu, []), input("(3)")]);
    assert!(infer_shapes(&nodes).is_empty());
}

// ==================== 错误与级联 ====================

#[test]
fn test_linear_without_flatten_cascades() {
    let nodes = chain(vec![
        input("(1, 28, 28)"),
        layer(LayerKind::Linear, [("out_features", 10.0.into())]),
        layer(LayerKind::Relu, []),
        layer(LayerKind::Softmax, []),
    ]);
    let infos = infer_shapes(&nodes);

    assert_eq!(
        infos[1].error,
        Some(ShapeError::RequiresRank {
            expected: 1,
            got: 3,
            layout: "（特征）",
            hint: "，请添加Flatten层",
        })
    );
    assert!(infos[1].is_root_cause());
    assert_eq!(infos[1].input_shape, Shape::Dims(vec![1, 28, 28]));
    assert_eq!(infos[1].output_shape, Shape::NotAvailable);
    assert!(infos[1].error.as_ref().is_some_and(|e| e.to_string().contains("Flatten")));

    for info in &infos[2..] {
        assert_eq!(info.error, Some(ShapeError::UpstreamInvalid));
        assert!(!info.is_root_cause());
        assert_eq!(info.output_shape, Shape::NotAvailable);
    }
}

#[rstest]
#[case("(1, 28")]
#[case("1, 28, 28")]
#[case("(a, b)")]
#[case("")]
fn test_malformed_input_shape(#[case] text: &str) {
    let nodes = chain(vec![input(text), layer(LayerKind::Relu, [])]);
    let infos = infer_shapes(&nodes);

    assert!(matches!(
        infos[0].error,
        Some(ShapeError::InvalidShapeFormat { .. })
    ));
    assert_eq!(infos[0].input_shape, Shape::Start);
    assert_eq!(infos[1].error, Some(ShapeError::UpstreamInvalid));
}

#[test]
fn test_missing_shape_parameter() {
    let mut nodes = chain(vec![input("(3)")]);
    nodes[0].params.clear();
    let infos = infer_shapes(&nodes);
    assert_eq!(
        infos[0].error,
        Some(ShapeError::MissingParameter("shape".to_string()))
    );
}

#[test]
fn test_conv_window_larger_than_input() {
    let nodes = chain(vec![
        input("(1, 3, 3)"),
        layer(
            LayerKind::Conv2d,
            [("kernel_size", 5.0.into()), ("padding", 0.0.into())],
        ),
    ]);
    let infos = infer_shapes(&nodes);
    assert_eq!(
        infos[1].error,
        Some(ShapeError::DegenerateOutput {
            dim: 3,
            padding: 0,
            kernel_size: 5,
        })
    );
}

#[test]
fn test_input_in_middle_is_misplaced() {
    let nodes = chain(vec![input("(4)"), input("(4)")]);
    let infos = infer_shapes(&nodes);
    assert_eq!(infos[1].error, Some(ShapeError::MisplacedInput));
}

#[rstest]
#[case(LayerKind::Linear, "out_features", "abc".into())]
#[case(LayerKind::Linear, "out_features", 0.0.into())]
#[case(LayerKind::Linear, "out_features", 2.5.into())]
#[case(LayerKind::Dropout, "p", 1.5.into())]
#[case(LayerKind::Lstm, "bidirectional", 1.0.into())]
fn test_invalid_parameter_is_node_error(
    #[case] kind: LayerKind,
    #[case] name: &str,
    #[case] value: crate::nn::ParamValue,
) {
    let nodes = chain(vec![input("(8)"), layer(kind, [(name, value)])]);
    let infos = infer_shapes(&nodes);
    assert!(
        matches!(&infos[1].error, Some(ShapeError::InvalidParameter { name: n, .. }) if n == name),
        "实际为：{:?}",
        infos[1].error
    );
}

#[rstest]
#[case(
    input("(4294967296, 4294967296, 4294967296)"),
    layer(LayerKind::Flatten, []),
    "Flatten后的特征数"
)]
#[case(
    input("(1, 28, 28)"),
    layer(LayerKind::Conv2d, [("padding", 1e19.into())]),
    "dim + 2*padding"
)]
#[case(
    input("(8)"),
    layer(LayerKind::Gru, [("hidden_size", 1e19.into()), ("bidirectional", true.into())]),
    "hidden_size * 方向数"
)]
fn test_dimension_overflow_is_node_error(
    #[case] head: (LayerKind, crate::nn::Params),
    #[case] next: (LayerKind, crate::nn::Params),
    #[case] expected: &'static str,
) {
    let nodes = chain(vec![head, next, layer(LayerKind::Relu, [])]);
    let infos = infer_shapes(&nodes);
    assert!(infos[0].is_ok());
    assert_eq!(infos[1].error, Some(ShapeError::DimensionOverflow(expected)));
    assert_eq!(infos[1].output_shape, Shape::NotAvailable);
    assert_eq!(infos[2].error, Some(ShapeError::UpstreamInvalid));
}

// ==================== 各层的形状传递 ====================

#[rstest]
#[case(
    layer(LayerKind::Conv2d, [("out_channels", 8.0.into()), ("kernel_size", 3.0.into()), ("stride", 2.0.into()), ("padding", 0.0.into())]),
    "(3, 32, 32)",
    vec![8, 15, 15]
)]
#[case(layer(LayerKind::MaxPool2d, []), "(1, 5, 5)", vec![1, 2, 2])]
#[case(layer(LayerKind::BatchNorm2d, []), "(8, 4, 4)", vec![8, 4, 4])]
#[case(layer(LayerKind::Lstm, [("hidden_size", 64.0.into()), ("bidirectional", true.into())]), "(100)", vec![128])]
#[case(layer(LayerKind::Gru, [("hidden_size", 32.0.into())]), "(10)", vec![32])]
#[case(layer(LayerKind::Relu, []), "(3, 4, 5)", vec![3, 4, 5])]
#[case(layer(LayerKind::Dropout, []), "(3, 4, 5)", vec![3, 4, 5])]
#[case(layer(LayerKind::Softmax, []), "(10)", vec![10])]
#[case(layer(LayerKind::Identity, []), "(2, 2)", vec![2, 2])]
#[case(layer(LayerKind::Unknown, []), "(2, 3)", vec![2, 3])]
fn test_layer_transfer(
    #[case] under_test: (LayerKind, crate::nn::Params),
    #[case] input_shape: &str,
    #[case] expected: Vec<usize>,
) {
    let infos = infer_shapes(&chain(vec![input(input_shape), under_test]));
    assert_eq!(infos[1].error, None);
    assert_eq!(infos[1].output_shape, Shape::Dims(expected));
}

#[rstest]
#[case(LayerKind::Conv2d, "(784)")]
#[case(LayerKind::MaxPool2d, "(16, 16)")]
#[case(LayerKind::BatchNorm2d, "(10)")]
#[case(LayerKind::Lstm, "(1, 28, 28)")]
fn test_rank_mismatch(#[case] kind: LayerKind, #[case] input_shape: &str) {
    let infos = infer_shapes(&chain(vec![input(input_shape), layer(kind, [])]));
    assert!(matches!(
        infos[1].error,
        Some(ShapeError::RequiresRank { .. })
    ));
}

#[test]
fn test_text_number_parameter_is_accepted() {
    let nodes = chain(vec![
        input("(20)"),
        layer(LayerKind::Linear, [("out_features", "32".into())]),
    ]);
    assert_eq!(infer_shapes(&nodes)[1].output_shape, Shape::Dims(vec![32]));
}
