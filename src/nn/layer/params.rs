/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 层参数：节点上存储的“参数袋”及其惰性取值
 *
 * 参数在存储时不做校验，只有在形状推断（或代码生成）读取时才按层类型解析，
 * 解析失败会成为该节点上的 `ShapeError`。
 */

use crate::errors::ShapeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 单个参数的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// 参数袋：参数名 → 参数值
pub type Params = BTreeMap<String, ParamValue>;

fn lookup<'a>(params: &'a Params, name: &str) -> Result<&'a ParamValue, ShapeError> {
    params
        .get(name)
        .ok_or_else(|| ShapeError::MissingParameter(name.to_string()))
}

fn invalid(name: &str, reason: impl Into<String>) -> ShapeError {
    ShapeError::InvalidParameter {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// 读取数值参数（允许可解析为数字的文本，界面输入框常以文本回传）
pub(crate) fn number_param(params: &Params, name: &str) -> Result<f64, ShapeError> {
    let value = match lookup(params, name)? {
        ParamValue::Number(n) => *n,
        ParamValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(name, format!("\"{s}\"不是数字")))?,
        ParamValue::Bool(b) => return Err(invalid(name, format!("期望数字，实际为布尔值{b}"))),
    };
    if !value.is_finite() {
        return Err(invalid(name, format!("{value}不是有限数")));
    }
    Ok(value)
}

/// 读取整数参数，且须不小于`min`
pub(crate) fn usize_param(params: &Params, name: &str, min: usize) -> Result<usize, ShapeError> {
    let value = number_param(params, name)?;
    if value.fract() != 0.0 {
        return Err(invalid(name, format!("须为整数，实际为{value}")));
    }
    if value < min as f64 {
        return Err(invalid(name, format!("须≥{min}，实际为{value}")));
    }
    // usize::MAX 转为 f64 后恰为 2^64，不可表示
    if value >= usize::MAX as f64 {
        return Err(invalid(name, format!("{value}超出整数可表示的范围")));
    }
    Ok(value as usize)
}

/// 读取布尔参数（兼容文本"true"/"false"）
pub(crate) fn bool_param(params: &Params, name: &str) -> Result<bool, ShapeError> {
    match lookup(params, name)? {
        ParamValue::Bool(b) => Ok(*b),
        ParamValue::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(invalid(name, format!("\"{s}\"不是布尔值"))),
        },
        ParamValue::Number(n) => Err(invalid(name, format!("期望布尔值，实际为数字{n}"))),
    }
}

/// 读取文本参数
pub(crate) fn text_param<'a>(params: &'a Params, name: &str) -> Result<&'a str, ShapeError> {
    match lookup(params, name)? {
        ParamValue::Text(s) => Ok(s),
        other => Err(invalid(name, format!("期望文本，实际为{other}"))),
    }
}
