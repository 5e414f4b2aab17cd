/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 负责神经网络层链的搭建、形状推断与代码生成
 */

mod codegen;
mod config;
mod descriptor;
mod display;
pub mod graph;
mod inference;
pub mod layer;
mod shape;
mod validation;

pub use codegen::{MODEL_CLASS_NAME, generate_pytorch_code};
pub use config::{LossFunction, Optimizer, TrainingConfig};
pub use descriptor::{ChainDescriptor, NodeDescriptor, describe};
pub use graph::{
    ChainOrder, GraphAction, GraphState, Node, NodeId, NodeRef, Outcome, Position, Recipe,
    RecipeAction, RecipeReport, SkippedDirective, Transition, auto_layout, builtin_recipe,
    builtin_recipes, sort_nodes,
};
pub use inference::{ShapeInfo, infer_shapes};
pub use layer::{Category, LayerConfig, LayerKind, ParamValue, Params, TensorDim, TraitLayer};
pub use shape::{Shape, parse_shape};
pub use validation::{ConnectionCheck, check_connection};

#[cfg(test)]
mod tests;
