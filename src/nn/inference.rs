/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 形状推断：沿拓扑顺序逐层计算输入/输出形状
 *
 * 推断从不向外抛出错误：每个节点的错误都记录在自己的 `ShapeInfo::error` 中。
 * 首个出错节点之后的所有节点只带级联标记 `ShapeError::UpstreamInvalid`，不再计算形状。
 */

use super::graph::{Node, NodeId};
use super::layer::{LayerConfig, TraitLayer, text_param};
use super::shape::{Shape, parse_shape};
use crate::errors::ShapeError;
use serde::Serialize;

/// 单个节点的推断结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeInfo {
    pub node_id: NodeId,
    pub input_shape: Shape,
    pub output_shape: Shape,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ShapeError>,
}

impl ShapeInfo {
    fn cascade(node_id: NodeId) -> Self {
        Self {
            node_id,
            input_shape: Shape::NotAvailable,
            output_shape: Shape::NotAvailable,
            error: Some(ShapeError::UpstreamInvalid),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// 错误是否由本节点引起（而非上游级联）
    pub fn is_root_cause(&self) -> bool {
        self.error.as_ref().is_some_and(|e| !e.is_cascade())
    }
}

fn serialize_error<S>(error: &Option<ShapeError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// 对已按拓扑顺序排列的节点做形状推断，结果与输入一一对应
///
/// 序列为空或首节点不是 Input 时返回空结果（表示推断不适用）。
pub fn infer_shapes(ordered: &[Node]) -> Vec<ShapeInfo> {
    match ordered.first() {
        Some(first) if first.is_input() => {}
        _ => return Vec::new(),
    }

    let mut infos = Vec::with_capacity(ordered.len());
    let mut current: Vec<usize> = Vec::new();
    let mut failed = false;

    for (index, node) in ordered.iter().enumerate() {
        if failed {
            infos.push(ShapeInfo::cascade(node.id));
            continue;
        }

        let (input_shape, result) = if index == 0 {
            (Shape::Start, input_layer_shape(node))
        } else {
            (Shape::Dims(current.clone()), transfer(node, &current))
        };

        let info = match result {
            Ok(output) => {
                current = output;
                ShapeInfo {
                    node_id: node.id,
                    input_shape,
                    output_shape: Shape::Dims(current.clone()),
                    error: None,
                }
            }
            Err(error) => {
                failed = true;
                ShapeInfo {
                    node_id: node.id,
                    input_shape,
                    output_shape: Shape::NotAvailable,
                    error: Some(error),
                }
            }
        };
        infos.push(info);
    }

    infos
}

/// Input 层：解析声明的形状文本
fn input_layer_shape(node: &Node) -> Result<Vec<usize>, ShapeError> {
    parse_shape(text_param(&node.params, "shape")?)
}

fn transfer(node: &Node, input: &[usize]) -> Result<Vec<usize>, ShapeError> {
    LayerConfig::from_params(node.kind, &node.params)?.output_shape(input)
}
