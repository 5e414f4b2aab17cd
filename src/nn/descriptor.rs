/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 层链描述符（Chain Descriptor）
 *                 形状推断结果的可序列化快照，用于导出、调试输出和模型摘要
 */

use super::display::{display_width, format_number, pad_left_aligned, pad_right_aligned};
use super::graph::{Node, NodeId};
use super::inference::infer_shapes;
use super::layer::{LayerConfig, LayerKind, TraitLayer};
use super::shape::Shape;
use serde::{Deserialize, Serialize};

/// 层链的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 模型名称
    pub name: String,
    /// 按拓扑顺序排列的节点描述
    pub nodes: Vec<NodeDescriptor>,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: NodeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub input_shape: Shape,
    pub output_shape: Shape,
    /// 形状错误信息（无错误时省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 后继节点
    pub next: Option<NodeId>,
    /// 可训练参数个数（无参数或无法计算时省略）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_count: Option<usize>,
}

/// 对按拓扑顺序排列的节点做一次形状推断，并生成描述符
///
/// 首节点不是 Input 时推断不适用，各节点的形状均为 `NotAvailable`。
pub fn describe(name: &str, ordered: &[Node]) -> ChainDescriptor {
    let infos = infer_shapes(ordered);
    let nodes = ordered
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let info = infos.get(index);
            let input_shape = info.map_or(Shape::NotAvailable, |i| i.input_shape.clone());
            let param_count = input_shape.dims().and_then(|input| {
                LayerConfig::from_params(node.kind, &node.params)
                    .ok()
                    .and_then(|layer| layer.param_count(input))
                    .filter(|&count| count > 0)
            });
            NodeDescriptor {
                id: node.id,
                name: node.name.clone(),
                kind: node.kind,
                output_shape: info.map_or(Shape::NotAvailable, |i| i.output_shape.clone()),
                input_shape,
                error: info.and_then(|i| i.error.as_ref()).map(ToString::to_string),
                next: node.next_id,
                param_count,
            }
        })
        .collect();

    ChainDescriptor {
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: name.to_string(),
        nodes,
    }
}

impl ChainDescriptor {
    /// 获取总参数量（超出 usize 时饱和）
    pub fn total_params(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|n| n.param_count)
            .fold(0, usize::saturating_add)
    }

    /// 是否所有节点都没有形状错误
    pub fn is_valid(&self) -> bool {
        self.nodes.iter().all(|n| n.error.is_none())
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn next_name(&self, next: Option<NodeId>) -> String {
        next.and_then(|id| self.nodes.iter().find(|n| n.id == id))
            .map_or_else(|| "-".to_string(), |n| n.name.clone())
    }

    fn param_string(node: &NodeDescriptor) -> String {
        node.param_count
            .map_or_else(|| "-".to_string(), format_number)
    }

    /// 返回模型摘要的 Markdown 格式字符串
    pub fn summary_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# 模型摘要: {}\n\n", self.name));

        output.push_str("| 节点名称 | 类型 | 输入形状 | 输出形状 | 参数量 | 后继 |\n");
        output.push_str("|----------|------|----------|----------|--------|------|\n");

        for node in &self.nodes {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                node.name,
                node.kind,
                node.input_shape,
                node.output_shape,
                Self::param_string(node),
                self.next_name(node.next)
            ));
        }

        output.push_str(&format!(
            "\n**总参数量**: {}\n",
            format_number(self.total_params())
        ));
        for node in self.nodes.iter().filter(|n| n.error.is_some()) {
            if let Some(error) = &node.error {
                output.push_str(&format!("\n- **{}**: {}", node.name, error));
            }
        }

        output
    }

    /// 返回模型摘要字符串（Unicode 文本表格，用于控制台输出）
    ///
    /// ```text
    /// ┌──────────┬──────────┬─────────────┬─────────────┬────────────┬──────────┐
    /// │ 节点名称 │ 类型     │ 输入形状    │ 输出形状    │ 参数量     │ 后继     │
    /// ├──────────┼──────────┼─────────────┼─────────────┼────────────┼──────────┤
    /// │ Input    │ Input    │ Start       │ [1, 28, 28] │          - │ Conv2D   │
    /// ...
    /// ```
    pub fn summary_string(&self) -> String {
        let headers = ["节点名称", "类型", "输入形状", "输出形状", "参数量", "后继"];
        let rows: Vec<[String; 6]> = self
            .nodes
            .iter()
            .map(|node| {
                [
                    node.name.clone(),
                    node.kind.to_string(),
                    node.input_shape.to_string(),
                    node.output_shape.to_string(),
                    Self::param_string(node),
                    self.next_name(node.next),
                ]
            })
            .collect();

        // 计算各列宽度
        let mut widths = [8usize; 6];
        for (column, width) in widths.iter_mut().enumerate() {
            *width = rows
                .iter()
                .map(|row| display_width(&row[column]))
                .chain(std::iter::once(display_width(headers[column])))
                .max()
                .unwrap_or(8)
                .max(8);
        }
        let total_width: usize = widths.iter().map(|w| w + 3).sum::<usize>() + 1;

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", segments.join(mid))
        };

        let mut output = String::new();

        // 表头
        output.push_str(&rule("┌", "┬", "┐"));
        let header_cells: Vec<String> = headers
            .iter()
            .zip(widths)
            .map(|(h, w)| pad_left_aligned(h, w))
            .collect();
        output.push_str(&format!("│ {} │\n", header_cells.join(" │ ")));
        output.push_str(&rule("├", "┼", "┤"));

        // 节点行（参数量右对齐）
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .enumerate()
                .map(|(column, (cell, w))| {
                    if column == 4 {
                        pad_right_aligned(cell, w)
                    } else {
                        pad_left_aligned(cell, w)
                    }
                })
                .collect();
            output.push_str(&format!("│ {} │\n", cells.join(" │ ")));
        }

        // 统计信息
        output.push_str(&rule("├", "┴", "┤"));
        let mut footer = vec![format!("总参数量: {}", format_number(self.total_params()))];
        footer.extend(
            self.nodes
                .iter()
                .filter_map(|n| n.error.as_ref().map(|e| format!("{}: {}", n.name, e))),
        );
        for line in &footer {
            output.push_str(&format!(
                "│ {} │\n",
                pad_left_aligned(line, total_width - 4)
            ));
        }

        // 底边
        output.push_str(&format!("└{}┘\n", "─".repeat(total_width - 2)));

        output
    }
}
