/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Layer 模块 - 层目录（Catalog）与各层的类型化参数
 *
 * 目录是纯数据：层类型 → 类别、默认参数、输入/输出维度类别。
 * 各层的形状传递规则与代码生成规则见 `config.rs` 及各层文件。
 */

mod batch_norm2d;
mod config;
mod conv2d;
mod elementwise;
mod flatten;
mod linear;
mod max_pool2d;
mod params;
mod recurrent;

pub use batch_norm2d::BatchNorm2d;
pub use config::{LayerConfig, TraitLayer};
pub use conv2d::Conv2d;
pub use elementwise::{Dropout, Elementwise, ElementwiseKind, Passthrough};
pub use flatten::Flatten;
pub use linear::Linear;
pub use max_pool2d::MaxPool2d;
pub use params::{ParamValue, Params};
pub(crate) use params::{bool_param, number_param, text_param, usize_param};
pub use recurrent::{Recurrent, RecurrentCell};

use serde::{Deserialize, Serialize};
use std::fmt;

/// 层类型（封闭枚举，外部名称与界面/配方中的写法一致）
///
/// `Unknown` 用于承接反序列化时遇到的未知类型名：推断时原样透传形状，不视为错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayerKind {
    Input,
    Linear,
    Flatten,
    Conv2d,
    MaxPool2d,
    BatchNorm2d,
    Lstm,
    Gru,
    Relu,
    Sigmoid,
    Tanh,
    Dropout,
    Softmax,
    Identity,
    #[serde(other)]
    Unknown,
}

impl LayerKind {
    /// 目录中该类型的定义（`Unknown`没有定义）
    pub fn definition(&self) -> Option<&'static LayerDefinition> {
        LAYER_DEFINITIONS.iter().find(|def| def.kind == *self)
    }

    pub fn category(&self) -> Option<Category> {
        self.definition().map(|def| def.category)
    }

    /// 是否为输出类层（Softmax、Identity）
    pub fn is_output(&self) -> bool {
        self.category() == Some(Category::Output)
    }

    /// 输入/输出维度类别（Input与未知类型没有声明）
    pub fn io_spec(&self) -> Option<IoSpec> {
        self.definition().and_then(|def| def.io)
    }

    /// 按目录默认值生成参数袋
    pub fn default_params(&self) -> Params {
        self.definition()
            .map(|def| {
                def.params
                    .iter()
                    .map(|spec| (spec.name.to_string(), spec.default.to_value()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 展示名称（如"Conv2D"）
    pub fn display_name(&self) -> &'static str {
        self.definition().map_or("Unknown", |def| def.name)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// 层类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Core,
    #[serde(rename = "CNN")]
    Cnn,
    #[serde(rename = "RNN")]
    Rnn,
    Activation,
    Regularization,
    Output,
}

/// 张量维度类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TensorDim {
    /// 特征向量，如 (features)
    D1,
    /// 类图像数据，如 (channels, height, width)
    D3,
    /// 任意维度
    Any,
}

/// 层的输入/输出维度类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoSpec {
    pub input: TensorDim,
    pub output: TensorDim,
}

impl IoSpec {
    const fn new(input: TensorDim, output: TensorDim) -> Self {
        Self { input, output }
    }
}

/// 参数值类型（驱动界面编辑控件）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Text,
    Number,
    Boolean,
}

/// 参数默认值（静态目录中使用）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Number(f64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(&self) -> ParamValue {
        match *self {
            Self::Text(s) => ParamValue::Text(s.to_string()),
            Self::Number(n) => ParamValue::Number(n),
            Self::Bool(b) => ParamValue::Bool(b),
        }
    }
}

/// 参数说明
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub param_type: ParamType,
    pub default: DefaultValue,
    pub description: &'static str,
}

/// 目录中的一条层定义
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDefinition {
    pub kind: LayerKind,
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub params: &'static [ParameterSpec],
    pub io: Option<IoSpec>,
}

const fn number(
    name: &'static str,
    label: &'static str,
    default: f64,
    description: &'static str,
) -> ParameterSpec {
    ParameterSpec {
        name,
        label,
        param_type: ParamType::Number,
        default: DefaultValue::Number(default),
        description,
    }
}

const RECURRENT_PARAMS: [ParameterSpec; 3] = [
    number("hidden_size", "Hidden Size", 128.0, "隐藏状态的特征数"),
    number("num_layers", "Num Layers", 1.0, "堆叠的循环层数"),
    ParameterSpec {
        name: "bidirectional",
        label: "Bidirectional",
        param_type: ParamType::Boolean,
        default: DefaultValue::Bool(false),
        description: "为真时双向处理序列，输出特征数翻倍",
    },
];

/// 全部层定义
pub static LAYER_DEFINITIONS: [LayerDefinition; 14] = [
    // 核心层
    LayerDefinition {
        kind: LayerKind::Input,
        name: "Input",
        category: Category::Core,
        description: "定义输入数据的形状",
        params: &[ParameterSpec {
            name: "shape",
            label: "Shape",
            param_type: ParamType::Text,
            default: DefaultValue::Text("(1, 28, 28)"),
            description: "初始数据形状，如 (3, 224, 224) 表示3通道224x224的彩色图像",
        }],
        io: None,
    },
    LayerDefinition {
        kind: LayerKind::Linear,
        name: "Linear",
        category: Category::Core,
        description: "全连接层",
        params: &[number(
            "out_features",
            "Output Features",
            10.0,
            "神经元个数，网络末端通常等于分类数",
        )],
        io: Some(IoSpec::new(TensorDim::D1, TensorDim::D1)),
    },
    LayerDefinition {
        kind: LayerKind::Flatten,
        name: "Flatten",
        category: Category::Core,
        description: "将多维数据展平为一维向量",
        params: &[],
        io: Some(IoSpec::new(TensorDim::Any, TensorDim::D1)),
    },
    // 卷积层
    LayerDefinition {
        kind: LayerKind::Conv2d,
        name: "Conv2D",
        category: Category::Cnn,
        description: "二维卷积层，用于从图像中提取特征",
        params: &[
            number("out_channels", "Output Channels", 16.0, "卷积核（滤波器）个数"),
            number("kernel_size", "Kernel Size", 3.0, "卷积核边长，如3表示3x3"),
            number("stride", "Stride", 1.0, "卷积核移动步长"),
            number("padding", "Padding", 1.0, "四周补零的圈数"),
        ],
        io: Some(IoSpec::new(TensorDim::D3, TensorDim::D3)),
    },
    LayerDefinition {
        kind: LayerKind::MaxPool2d,
        name: "MaxPool2D",
        category: Category::Cnn,
        description: "取窗口内最大值对特征图下采样",
        params: &[
            number("kernel_size", "Kernel Size", 2.0, "池化窗口边长"),
            number("stride", "Stride", 2.0, "窗口移动步长，通常与窗口边长相同"),
        ],
        io: Some(IoSpec::new(TensorDim::D3, TensorDim::D3)),
    },
    LayerDefinition {
        kind: LayerKind::BatchNorm2d,
        name: "BatchNorm2D",
        category: Category::Cnn,
        description: "对激活值做批归一化，稳定并加速训练",
        params: &[],
        io: Some(IoSpec::new(TensorDim::D3, TensorDim::D3)),
    },
    // 循环层
    LayerDefinition {
        kind: LayerKind::Lstm,
        name: "LSTM",
        category: Category::Rnn,
        description: "长短期记忆层，用于序列数据",
        params: &RECURRENT_PARAMS,
        io: Some(IoSpec::new(TensorDim::D1, TensorDim::D1)),
    },
    LayerDefinition {
        kind: LayerKind::Gru,
        name: "GRU",
        category: Category::Rnn,
        description: "门控循环单元，LSTM的简化版本",
        params: &RECURRENT_PARAMS,
        io: Some(IoSpec::new(TensorDim::D1, TensorDim::D1)),
    },
    // 激活函数
    LayerDefinition {
        kind: LayerKind::Relu,
        name: "ReLU",
        category: Category::Activation,
        description: "线性整流激活函数",
        params: &[],
        io: Some(IoSpec::new(TensorDim::Any, TensorDim::Any)),
    },
    LayerDefinition {
        kind: LayerKind::Sigmoid,
        name: "Sigmoid",
        category: Category::Activation,
        description: "Sigmoid激活函数，将数值压缩到0到1之间",
        params: &[],
        io: Some(IoSpec::new(TensorDim::Any, TensorDim::Any)),
    },
    LayerDefinition {
        kind: LayerKind::Tanh,
        name: "Tanh",
        category: Category::Activation,
        description: "Tanh激活函数，将数值压缩到-1到1之间",
        params: &[],
        io: Some(IoSpec::new(TensorDim::Any, TensorDim::Any)),
    },
    // 正则化
    LayerDefinition {
        kind: LayerKind::Dropout,
        name: "Dropout",
        category: Category::Regularization,
        description: "训练时随机置零部分元素以防止过拟合",
        params: &[number("p", "Probability (p)", 0.5, "元素被置零的概率，范围0到1")],
        io: Some(IoSpec::new(TensorDim::Any, TensorDim::Any)),
    },
    // 输出层
    LayerDefinition {
        kind: LayerKind::Softmax,
        name: "Softmax",
        category: Category::Output,
        description: "将logits转换为概率，常作为多分类网络的最后一层",
        params: &[],
        io: Some(IoSpec::new(TensorDim::D1, TensorDim::D1)),
    },
    LayerDefinition {
        kind: LayerKind::Identity,
        name: "Identity",
        category: Category::Output,
        description: "原样返回输入的占位层，用于回归任务或获取原始logits",
        params: &[],
        io: Some(IoSpec::new(TensorDim::Any, TensorDim::Any)),
    },
];
