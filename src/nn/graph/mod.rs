/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Graph 模块：层节点组成的单链图
 *
 * 公开 API：
 * - `GraphState`: 图的快照，所有编辑都是纯状态转换（`apply`）
 * - `sort_nodes`: 拓扑排序
 * - `auto_layout`: 按拓扑顺序自动排版
 * - `Recipe`/`RecipeAction`: 预设网络的指令序列
 */

mod layout;
mod node;
mod order;
mod recipe;
mod state;

pub use layout::auto_layout;
pub use node::{Node, NodeId, Position};
pub use order::{ChainOrder, sort_nodes};
pub use recipe::{
    NodeRef, Recipe, RecipeAction, RecipeReport, SkippedDirective, builtin_recipe,
    builtin_recipes,
};
pub use state::{GraphAction, GraphState, Outcome, Transition};
