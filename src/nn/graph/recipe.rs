/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 配方（Recipe）：预先编写的“添加/连接”指令序列，用于一键重建整条链
 *
 * 指令格式与界面侧一致：
 * `{"type": "ADD_NODE", "payload": {"type": "CONV2D", "params": {...}}}`
 * `{"type": "CONNECT_NODES", "payload": {"fromId": "LAST_NODE", "toId": "NEW_NODE_2"}}`
 * `{"type": "AUTO_LAYOUT", "payload": {}}`
 */

use super::node::NodeId;
use super::order::chain_end;
use super::state::{GraphState, Outcome, Transition};
use crate::errors::{ConfigError, RejectReason};
use crate::nn::layer::{LayerKind, Params};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// 配方中的节点引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum NodeRef {
    /// `INPUT_NODE`：新图的 Input 节点
    Input,
    /// `LAST_NODE`：当前正在构建的链的末端
    Last,
    /// `NEW_NODE_<i>`：第 i 条指令（须为 ADD_NODE）新建的节点
    New(usize),
    /// 字面节点 ID，如`node_3`
    Id(NodeId),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "INPUT_NODE"),
            Self::Last => write!(f, "LAST_NODE"),
            Self::New(index) => write!(f, "NEW_NODE_{index}"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for NodeRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INPUT_NODE" => Ok(Self::Input),
            "LAST_NODE" => Ok(Self::Last),
            _ => match s.strip_prefix("NEW_NODE_") {
                Some(index) => index
                    .parse()
                    .map(Self::New)
                    .map_err(|_| format!("无效的节点引用：\"{s}\"")),
                None => s.parse().map(Self::Id),
            },
        }
    }
}

impl From<NodeRef> for String {
    fn from(node_ref: NodeRef) -> Self {
        node_ref.to_string()
    }
}

impl TryFrom<String> for NodeRef {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// 一条配方指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeAction {
    AddNode {
        #[serde(rename = "type")]
        kind: LayerKind,
        #[serde(default)]
        params: Params,
    },
    ConnectNodes {
        #[serde(rename = "fromId")]
        from: NodeRef,
        #[serde(rename = "toId")]
        to: NodeRef,
    },
    /// 提示调用方重新计算布局，对拓扑没有影响
    AutoLayout {},
}

/// 一个命名配方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title_key: String,
    pub description_key: String,
    pub actions: Vec<RecipeAction>,
}

/// 重放时被跳过的指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedDirective {
    /// 指令在配方中的下标
    pub index: usize,
    pub reason: RejectReason,
}

/// 配方重放报告
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeReport {
    /// 配方是否要求调用方重新布局
    pub layout_requested: bool,
    pub skipped: Vec<SkippedDirective>,
}

/// 内置配方库
pub fn builtin_recipes() -> Result<Vec<Recipe>, ConfigError> {
    Ok(serde_json::from_str(include_str!("recipes.json"))?)
}

/// 按 ID 查找内置配方
pub fn builtin_recipe(id: &str) -> Result<Option<Recipe>, ConfigError> {
    Ok(builtin_recipes()?.into_iter().find(|r| r.id == id))
}

impl GraphState {
    /// 在只含 Input 节点的新图上依次重放指令
    ///
    /// 无法解析的引用或会被拒绝的编辑都会被跳过并记入报告。
    pub(super) fn apply_recipe(&self, actions: &[RecipeAction]) -> Transition {
        let mut state = self.reinitialized();
        let mut created: HashMap<usize, NodeId> = HashMap::new();
        let mut report = RecipeReport::default();

        for (index, action) in actions.iter().enumerate() {
            let result = match action {
                RecipeAction::AddNode { kind, params } => {
                    state.check_add(*kind).map(|()| {
                        let id = state.push_node(*kind, params.clone());
                        created.insert(index, id);
                    })
                }
                RecipeAction::ConnectNodes { from, to } => {
                    let endpoints = resolve(&state, &created, *from)
                        .zip(resolve(&state, &created, *to))
                        .ok_or(RejectReason::NodeNotFound);
                    endpoints.and_then(|(from, to)| {
                        let transition = state.connect(from, to);
                        match transition.rejection() {
                            Some(reason) => Err(reason),
                            None => {
                                state = transition.state;
                                Ok(())
                            }
                        }
                    })
                }
                RecipeAction::AutoLayout {} => {
                    report.layout_requested = true;
                    Ok(())
                }
            };

            if let Err(reason) = result {
                log::warn!("配方第{index}条指令被跳过：{reason}");
                report.skipped.push(SkippedDirective { index, reason });
            }
        }

        let selected = state
            .sorted()
            .nodes
            .last()
            .map(|n| n.id)
            .or_else(|| state.input_node().map(|n| n.id));
        state.set_selected(selected);

        Transition {
            state,
            outcome: Outcome::RecipeApplied(report),
        }
    }
}

fn resolve(state: &GraphState, created: &HashMap<usize, NodeId>, node_ref: NodeRef) -> Option<NodeId> {
    match node_ref {
        NodeRef::Input => state.input_node().map(|n| n.id),
        NodeRef::Last => chain_end(state.nodes()),
        NodeRef::New(index) => created.get(&index).copied(),
        NodeRef::Id(id) => state.node(id).map(|n| n.id),
    }
}
