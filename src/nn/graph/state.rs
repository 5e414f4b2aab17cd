/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 图的状态机：节点列表 + 选中节点，所有编辑都是纯状态转换
 *
 * 每个编辑动作（`GraphAction`）都从当前快照产生一个新快照，原快照不变；
 * 非法编辑不改变状态，并在 `Outcome::Rejected` 中给出原因。
 */

use super::node::{Node, NodeId, Position};
use super::order::{ChainOrder, chain_end, reaches, sort_nodes};
use super::recipe::{RecipeAction, RecipeReport};
use crate::errors::RejectReason;
use crate::nn::inference::{ShapeInfo, infer_shapes};
use crate::nn::layer::{LayerKind, Params};
use crate::nn::validation::check_connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 新链首节点的位置
pub(crate) const ORIGIN: Position = Position::new(50.0, 150.0);
/// 追加节点时相对链尾的水平间距
pub(crate) const SPACING_X: f64 = 250.0;

/// 图的结构编辑动作
#[derive(Debug, Clone, PartialEq)]
pub enum GraphAction {
    /// 添加节点；给定位置时只放置不连接，否则追加到链尾
    AddNode {
        kind: LayerKind,
        position: Option<Position>,
    },
    DeleteNode {
        id: NodeId,
    },
    SelectNode {
        id: Option<NodeId>,
    },
    /// 合并参数到节点的参数袋
    UpdateParams {
        id: NodeId,
        params: Params,
    },
    Connect {
        from: NodeId,
        to: NodeId,
    },
    Disconnect {
        from: NodeId,
    },
    Reposition {
        id: NodeId,
        position: Position,
    },
    RepositionMany {
        positions: Vec<(NodeId, Position)>,
    },
    /// 重置为只含一个 Input 节点的图
    Reset,
    /// 在全新的图上重放配方指令
    ApplyRecipe {
        actions: Vec<RecipeAction>,
    },
}

/// 编辑的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    Rejected(RejectReason),
    RecipeApplied(RecipeReport),
}

/// 一次状态转换：新快照 + 结果
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GraphState,
    pub outcome: Outcome,
}

impl Transition {
    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, Outcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<RejectReason> {
        match self.outcome {
            Outcome::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

/// 图的快照
///
/// 反序列化时会经过 [`RawGraphState`] 校验：节点 ID 唯一、每个节点至多一条入边、
/// 边与选中节点都指向已存在的节点；编号计数器会被抬到所有已有 ID 之上。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGraphState")]
pub struct GraphState {
    nodes: Vec<Node>,
    selected: Option<NodeId>,
    /// 下一个可分配的节点编号（单调递增，重置后也不复用）
    next_id: u64,
}

/// 未经校验的快照，仅用于反序列化
#[derive(Deserialize)]
struct RawGraphState {
    nodes: Vec<Node>,
    selected: Option<NodeId>,
    next_id: u64,
}

impl TryFrom<RawGraphState> for GraphState {
    type Error = String;

    fn try_from(raw: RawGraphState) -> Result<Self, Self::Error> {
        let mut ids = HashSet::with_capacity(raw.nodes.len());
        for node in &raw.nodes {
            if !ids.insert(node.id) {
                return Err(format!("节点ID重复：{}", node.id));
            }
        }

        let mut targets = HashSet::with_capacity(raw.nodes.len());
        for node in &raw.nodes {
            let Some(target) = node.next_id else {
                continue;
            };
            if !ids.contains(&target) {
                return Err(format!("{}指向不存在的节点{target}", node.id));
            }
            if !targets.insert(target) {
                return Err(format!("节点{target}有多条入边"));
            }
        }

        if let Some(selected) = raw.selected.filter(|id| !ids.contains(id)) {
            return Err(format!("选中的节点{selected}不存在"));
        }

        let floor = match ids.iter().map(|id| id.0).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| format!("节点编号{max}已达上限"))?,
            None => 0,
        };
        let next_id = raw.next_id.max(floor);
        if next_id == u64::MAX {
            return Err("节点编号计数器已达上限".to_string());
        }
        Ok(Self {
            nodes: raw.nodes,
            selected: raw.selected,
            next_id,
        })
    }
}

impl Default for GraphState {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphState {
    // ========== 创建 ==========

    /// 创建只含一个 Input 节点的图
    pub fn new() -> Self {
        Self::fresh(0)
    }

    fn fresh(next_id: u64) -> Self {
        let mut state = Self {
            nodes: Vec::new(),
            selected: None,
            next_id,
        };
        let id = state.mint_id();
        state.nodes.push(Node::new(id, LayerKind::Input, ORIGIN));
        state.selected = Some(id);
        state
    }

    fn mint_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    // ========== 访问器 ==========

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn input_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_input())
    }

    /// 指向 `id` 的前驱节点
    pub fn predecessor(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.next_id == Some(id))
    }

    /// 拓扑顺序
    pub fn sorted(&self) -> ChainOrder {
        sort_nodes(&self.nodes)
    }

    /// 按拓扑顺序做形状推断
    pub fn shape_infos(&self) -> Vec<ShapeInfo> {
        infer_shapes(&self.sorted().nodes)
    }

    // ========== 预检查 ==========

    /// 检查能否添加该类型的节点
    pub fn check_add(&self, kind: LayerKind) -> Result<(), RejectReason> {
        if kind == LayerKind::Input && self.input_node().is_some() {
            return Err(RejectReason::InputLayerExists);
        }
        if kind.is_output() && self.nodes.iter().any(|n| n.kind.is_output()) {
            return Err(RejectReason::OutputLayerExists);
        }
        Ok(())
    }

    /// 检查能否添加边 `from -> to`（含维度校验）
    pub fn check_connect(&self, from: NodeId, to: NodeId) -> Result<(), RejectReason> {
        let from_node = self.node(from).ok_or(RejectReason::NodeNotFound)?;
        let to_node = self.node(to).ok_or(RejectReason::NodeNotFound)?;
        if from_node.next_id.is_some() {
            return Err(RejectReason::OutputOccupied);
        }
        if self.predecessor(to).is_some() {
            return Err(RejectReason::InputOccupied);
        }
        if to_node.is_input() {
            return Err(RejectReason::CannotConnectToInput);
        }
        if from == to {
            return Err(RejectReason::SelfLoop);
        }
        if reaches(&self.nodes, to, from) {
            return Err(RejectReason::WouldCreateCycle);
        }

        // 在假设已连接的图上做维度校验，不改动当前快照
        let hypothetical = self.with_link(from, Some(to));
        let check = check_connection(&sort_nodes(&hypothetical).nodes, from, to);
        match check.reason {
            Some(reason) if !check.valid => Err(RejectReason::Connection(reason)),
            _ => Ok(()),
        }
    }

    // ========== 状态转换 ==========

    /// 应用一个编辑动作，返回新快照及结果
    pub fn apply(&self, action: GraphAction) -> Transition {
        match action {
            GraphAction::AddNode { kind, position } => self.add_node(kind, position),
            GraphAction::DeleteNode { id } => self.delete_node(id),
            GraphAction::SelectNode { id } => self.select_node(id),
            GraphAction::UpdateParams { id, params } => self.update_params(id, params),
            GraphAction::Connect { from, to } => self.connect(from, to),
            GraphAction::Disconnect { from } => self.disconnect(from),
            GraphAction::Reposition { id, position } => self.reposition(&[(id, position)], true),
            GraphAction::RepositionMany { positions } => self.reposition(&positions, false),
            GraphAction::Reset => self.applied(Self::fresh(self.next_id)),
            GraphAction::ApplyRecipe { actions } => self.apply_recipe(&actions),
        }
    }

    fn applied(&self, state: GraphState) -> Transition {
        Transition {
            state,
            outcome: Outcome::Applied,
        }
    }

    pub(super) fn reject(&self, reason: RejectReason) -> Transition {
        log::debug!("编辑被拒绝：{}（{}）", reason, reason.key());
        Transition {
            state: self.clone(),
            outcome: Outcome::Rejected(reason),
        }
    }

    /// 复制节点列表，并把 `from` 的后继设为 `to`
    fn with_link(&self, from: NodeId, to: Option<NodeId>) -> Vec<Node> {
        self.nodes
            .iter()
            .map(|n| {
                let mut node = n.clone();
                if node.id == from {
                    node.next_id = to;
                }
                node
            })
            .collect()
    }

    pub(super) fn add_node(&self, kind: LayerKind, position: Option<Position>) -> Transition {
        if let Err(reason) = self.check_add(kind) {
            return self.reject(reason);
        }

        let mut next = self.clone();
        let id = next.mint_id();

        let node = match position {
            Some(position) => Node::new(id, kind, position),
            None => {
                // 追加到主链末端（孤立节点不参与）
                let last = chain_end(&self.nodes).and_then(|end| self.node(end));
                let position = last.map_or(ORIGIN, |n| {
                    Position::new(n.position.x + SPACING_X, n.position.y)
                });
                // 输出类层之后不再延伸链
                if let Some(last) = last {
                    if !last.kind.is_output() && last.next_id.is_none() {
                        next.nodes = next.with_link(last.id, Some(id));
                    }
                }
                Node::new(id, kind, position)
            }
        };

        next.nodes.push(node);
        next.selected = Some(id);
        self.applied(next)
    }

    fn delete_node(&self, id: NodeId) -> Transition {
        let Some(node) = self.node(id) else {
            return self.reject(RejectReason::NodeNotFound);
        };
        if node.is_input() {
            return self.reject(RejectReason::CannotDeleteInput);
        }
        log::debug!("删除{node}");

        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .filter(|n| n.id != id)
            .map(|n| {
                let mut node = n.clone();
                if node.next_id == Some(id) {
                    node.next_id = None;
                }
                node
            })
            .collect();

        let selected = if self.selected == Some(id) {
            self.predecessor(id)
                .map(|p| p.id)
                .or_else(|| nodes.first().map(|n| n.id))
        } else {
            self.selected
        };

        self.applied(GraphState {
            nodes,
            selected,
            next_id: self.next_id,
        })
    }

    fn select_node(&self, id: Option<NodeId>) -> Transition {
        if let Some(id) = id {
            if self.node(id).is_none() {
                return self.reject(RejectReason::NodeNotFound);
            }
        }
        let mut next = self.clone();
        next.selected = id;
        self.applied(next)
    }

    fn update_params(&self, id: NodeId, params: Params) -> Transition {
        if self.node(id).is_none() {
            return self.reject(RejectReason::NodeNotFound);
        }
        let mut next = self.clone();
        if let Some(node) = next.nodes.iter_mut().find(|n| n.id == id) {
            node.params.extend(params);
        }
        self.applied(next)
    }

    pub(super) fn connect(&self, from: NodeId, to: NodeId) -> Transition {
        if let Err(reason) = self.check_connect(from, to) {
            return self.reject(reason);
        }
        self.applied(GraphState {
            nodes: self.with_link(from, Some(to)),
            selected: self.selected,
            next_id: self.next_id,
        })
    }

    fn disconnect(&self, from: NodeId) -> Transition {
        if self.node(from).is_none() {
            return self.reject(RejectReason::NodeNotFound);
        }
        self.applied(GraphState {
            nodes: self.with_link(from, None),
            selected: self.selected,
            next_id: self.next_id,
        })
    }

    /// 只更新位置，不触碰连接；`strict` 时未知节点会被拒绝，批量时忽略未知节点
    fn reposition(&self, positions: &[(NodeId, Position)], strict: bool) -> Transition {
        if strict && positions.iter().any(|(id, _)| self.node(*id).is_none()) {
            return self.reject(RejectReason::NodeNotFound);
        }
        let mut next = self.clone();
        for node in &mut next.nodes {
            if let Some((_, position)) = positions.iter().rev().find(|(id, _)| *id == node.id) {
                node.position = *position;
            }
        }
        self.applied(next)
    }

    // ========== 配方重放用 ==========

    /// 以新的计数器起点重新初始化（配方在全新的图上重放）
    pub(super) fn reinitialized(&self) -> GraphState {
        Self::fresh(self.next_id)
    }

    pub(super) fn set_selected(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    pub(super) fn push_node(&mut self, kind: LayerKind, params: Params) -> NodeId {
        let id = self.mint_id();
        let mut node = Node::new(id, kind, Position::default());
        node.params.extend(params);
        self.nodes.push(node);
        id
    }
}
