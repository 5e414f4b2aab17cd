use std::fmt::{self, Display};

/// 连接校验不通过的原因（符号码，本地化由外部负责）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionReason {
    /// 三维数据不能直接送入只接受一维数据的层，需要先插入Flatten
    FlattenRequired,
    /// 卷积类层不能接在一维数据之后
    ConvAfterDense,
    /// 其他无法连接的情况
    Generic,
}

impl ConnectionReason {
    /// 供外部本地化使用的稳定键
    pub const fn key(&self) -> &'static str {
        match self {
            Self::FlattenRequired => "validation.flattenRequired",
            Self::ConvAfterDense => "validation.convAfterDense",
            Self::Generic => "validation.genericError",
        }
    }
}

impl Display for ConnectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::FlattenRequired => "维度错误：全连接类层需要一维数据，请先插入Flatten层",
            Self::ConvAfterDense => "维度错误：卷积类层不能接在一维数据之后",
            Self::Generic => "连接错误：这两个层无法连接",
        };
        write!(f, "{}", message)
    }
}

/// 图的结构编辑被拒绝的原因
///
/// 被拒绝的编辑不会改变图的状态，调用方据此向用户提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// 图中已存在输出类层
    OutputLayerExists,
    /// 图中已存在Input层
    InputLayerExists,
    /// Input层不可删除
    CannotDeleteInput,
    /// 节点不存在
    NodeNotFound,
    /// 起点已有后继
    OutputOccupied,
    /// 终点已有前驱
    InputOccupied,
    /// 任何节点都不能连向Input层
    CannotConnectToInput,
    /// 节点不能连向自身
    SelfLoop,
    /// 新边会使链成环
    WouldCreateCycle,
    /// 维度校验未通过
    Connection(ConnectionReason),
}

impl RejectReason {
    /// 供外部本地化使用的稳定键
    pub const fn key(&self) -> &'static str {
        match self {
            Self::OutputLayerExists => "validation.outputLayerExists",
            Self::InputLayerExists => "validation.inputLayerExists",
            Self::CannotDeleteInput => "validation.cannotDeleteInput",
            Self::NodeNotFound => "validation.nodeNotFound",
            Self::OutputOccupied => "validation.outputOccupied",
            Self::InputOccupied => "validation.inputOccupied",
            Self::CannotConnectToInput => "validation.cannotConnectToInput",
            Self::SelfLoop => "validation.selfLoop",
            Self::WouldCreateCycle => "validation.wouldCreateCycle",
            Self::Connection(reason) => reason.key(),
        }
    }
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::OutputLayerExists => "网络中只能放置一个输出层",
            Self::InputLayerExists => "网络中只能放置一个Input层",
            Self::CannotDeleteInput => "Input层不可删除",
            Self::NodeNotFound => "节点不存在",
            Self::OutputOccupied => "连接错误：该输出已被占用",
            Self::InputOccupied => "连接错误：该输入已被占用",
            Self::CannotConnectToInput => "连接错误：不能向Input层输入数据",
            Self::SelfLoop => "连接错误：节点不能连向自身",
            Self::WouldCreateCycle => "连接错误：该连接会使网络成环",
            Self::Connection(reason) => return write!(f, "{}", reason),
        };
        write!(f, "{}", message)
    }
}
