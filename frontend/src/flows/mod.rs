//! 业务流程层
//!
//! 每个流程是一小段 saga：本地表单校验 -> 按顺序调用一个或多个
//! 端点 -> 更新本地/会话状态。流程函数对 `Transport` 泛型，
//! UI 组件只负责取表单值、调用流程、呈现结果；单元测试注入
//! `MockTransport` 在原生环境验证流程语义。
//!
//! 错误处理约定：校验失败在发出任何网络请求之前返回
//! `FlowError::Validation`；远端失败原样透传为 `FlowError::Api`。
//! 任何流程都不自动重试。

use crate::error::ApiError;
use std::fmt;

pub mod auth;
pub mod booking;
pub mod chat;
pub mod jobs;
pub mod profile;
pub mod reviews;
pub mod training;

/// 流程级失败
#[derive(Debug)]
pub enum FlowError {
    /// 本地校验失败：还没有发出任何网络请求
    Validation(String),
    /// 远端调用失败
    Api(ApiError),
}

impl FlowError {
    /// 面向用户的提示文案
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Validation(msg) => msg.clone(),
            FlowError::Api(err) => err.to_string(),
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Validation(msg) => write!(f, "validation: {}", msg),
            FlowError::Api(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FlowError {}

impl From<ApiError> for FlowError {
    fn from(err: ApiError) -> Self {
        FlowError::Api(err)
    }
}

pub type FlowResult<T> = std::result::Result<T, FlowError>;
