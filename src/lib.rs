//! # Neuro Flow
//!
//! `neuro_flow`是可视化神经网络搭建工具的核心：把若干“层”节点串成一条单链，
//! 在每个节点上推断流经的张量形状、定位维度错误、拦截会导致不一致的连接，
//! 并最终生成等价的[PyTorch](https://pytorch.org)训练脚本。
//!
//! 界面渲染、拖放、主题、多语言文本等都不在本库范围内：
//! 界面只需传入节点列表与训练配置，并渲染本库返回的结果。
//!

pub mod errors;
pub mod nn;
