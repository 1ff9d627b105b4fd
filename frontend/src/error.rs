//! API 错误类型
//!
//! 三种失败语义，对应调用远端 API 的三个层次：
//! - `Network`: 传输层失败（DNS、超时、连接拒绝）
//! - `Protocol`: 响应不是 JSON 或无法按预期结构解析（例如后端配置错误
//!   时返回的 HTML 错误页），携带原始响应文本便于排查
//! - `Api`: 结构良好的错误响应（鉴权失败、校验失败、未找到等）
//!
//! 封装层从不自行恢复，错误始终向上传递，由各业务流程在自己的边界
//! 决定呈现方式。不做自动重试。

use std::fmt;

/// 远端调用的统一失败通道
#[derive(Debug)]
pub enum ApiError {
    /// 传输层失败
    Network(String),
    /// 非 JSON 或结构不符的响应，携带原始文本
    Protocol {
        content_type: Option<String>,
        body: String,
    },
    /// 服务端返回的业务错误
    Api { status: u16, message: String },
}

impl ApiError {
    /// 获取 HTTP 状态码（仅 `Api` 变体有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Protocol { content_type, body } => {
                let preview: String = body.chars().take(200).collect();
                write!(
                    f,
                    "expected JSON but got {}: {}",
                    content_type.as_deref().unwrap_or("no content-type"),
                    preview
                )
            }
            ApiError::Api { status, message } => write!(f, "[{}] {}", status, message),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
