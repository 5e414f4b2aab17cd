/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 图中的节点：一个已放置的层实例
 */

use crate::nn::layer::{LayerKind, Params};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 节点 ID，显示为`node_<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("node_")
            .and_then(|n| n.parse::<u64>().ok())
            .map(NodeId)
            .ok_or_else(|| format!("无效的节点ID：\"{s}\""))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// 画布上的位置（仅用于展示，与推断无关）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 一个已放置的层实例
///
/// `next_id` 是唯一后继（至多一条出边）；“至多一条入边”由图的编辑操作与快照的反序列化校验保证。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub name: String,
    pub params: Params,
    pub position: Position,
    #[serde(rename = "next_node_id")]
    pub next_id: Option<NodeId>,
}

impl Node {
    /// 以目录默认参数创建一个未连接的节点
    pub fn new(id: NodeId, kind: LayerKind, position: Position) -> Self {
        Self {
            id,
            kind,
            name: kind.display_name().to_string(),
            params: kind.default_params(),
            position,
            next_id: None,
        }
    }

    pub fn is_input(&self) -> bool {
        self.kind == LayerKind::Input
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>({})", self.name, self.kind.display_name(), self.id)
    }
}
