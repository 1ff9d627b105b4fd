//! API 客户端
//!
//! 薄封装：拼接绝对 URL、附加 JSON 头、序列化请求体、发送请求，
//! 然后校验响应的 `content-type` 并解析为 `ApiRequest::Response`。
//! 具体的 HTTP 实现抽象在 `Transport` trait 之后，测试时注入
//! `MockTransport` 即可在原生环境跑业务流程的单元测试。

use crate::error::{ApiError, ApiResult};
use careloop_shared::protocol::{ApiRequest, HttpMethod};
use serde::Deserialize;

/// 后端服务地址
pub const API_BASE_URL: &str =
    "https://careloop-h9grczadetc7bxcw.malaysiawest-01.azurewebsites.net";

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: String, method: HttpMethod) -> Self {
        Self {
            url,
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下的 JsValue 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

/// 基于 `gloo_net::http` 的浏览器传输实现
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        use gloo_net::http::{Method, RequestBuilder};

        let method = match req.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&req.url).method(method);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match req.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| ApiError::Network(e.to_string()))?,
            None => builder
                .build()
                .map_err(|e| ApiError::Network(e.to_string()))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let content_type = response.headers().get("content-type");
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

// =========================================================
// API 客户端
// =========================================================

/// 服务端错误响应的固定形态：`{ "error": "..." }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CareLoopApi<C: Transport> {
    base_url: String,
    client: C,
}

/// 应用默认使用的客户端类型
pub type AppApi = CareLoopApi<FetchTransport>;

impl CareLoopApi<FetchTransport> {
    /// 指向生产后端的客户端
    pub fn production() -> Self {
        Self::new(API_BASE_URL, FetchTransport)
    }
}

impl<C: Transport> CareLoopApi<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发起一次类型化的 API 调用
    ///
    /// 失败语义见 [`ApiError`]；这里从不重试，也不吞错误。
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let mut http_req = HttpRequest::new(self.url(&req.path()), R::METHOD)
            .with_header("Content-Type", "application/json");

        if R::METHOD.carries_body() {
            let body = serde_json::to_string(req)
                .map_err(|e| ApiError::Network(format!("request body encoding failed: {}", e)))?;
            http_req = http_req.with_body(body);
        }

        let resp = self.client.send(http_req).await?;

        // 后端配置错误时会吐出 HTML 错误页；先验明正身再解析
        let is_json = resp
            .content_type
            .as_deref()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            return Err(ApiError::Protocol {
                content_type: resp.content_type,
                body: resp.body,
            });
        }

        if !(200..300).contains(&resp.status) {
            let message = serde_json::from_str::<ErrorBody>(&resp.body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("API request failed with status {}", resp.status));
            return Err(ApiError::Api {
                status: resp.status,
                message,
            });
        }

        serde_json::from_str(&resp.body).map_err(|_| ApiError::Protocol {
            content_type: resp.content_type,
            body: resp.body,
        })
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// 按 URL 提供罐头响应，并记录所有发出的请求
    #[derive(Clone, Default)]
    pub struct MockTransport {
        responses: Rc<RefCell<HashMap<String, (u16, Option<String>, String)>>>,
        pub requests: Rc<RefCell<Vec<HttpRequest>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// 注册一条 JSON 响应
        pub fn mock_json(&self, path: &str, status: u16, body: serde_json::Value) {
            self.responses.borrow_mut().insert(
                path.to_string(),
                (
                    status,
                    Some("application/json; charset=utf-8".to_string()),
                    body.to_string(),
                ),
            );
        }

        /// 注册一条任意 content-type 的原始响应
        pub fn mock_raw(&self, path: &str, status: u16, content_type: Option<&str>, body: &str) {
            self.responses.borrow_mut().insert(
                path.to_string(),
                (
                    status,
                    content_type.map(|c| c.to_string()),
                    body.to_string(),
                ),
            );
        }

        /// 已发出请求的数量
        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }

        /// 是否发出过命中给定子串的请求
        pub fn has_request_to(&self, needle: &str) -> bool {
            self.requests.borrow().iter().any(|r| r.url.contains(needle))
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Transport for MockTransport {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            self.requests.borrow_mut().push(req.clone());

            // 去掉 base_url 前缀，按相对路径匹配
            let path = req
                .url
                .split_once("/api/")
                .map(|(_, rest)| format!("/api/{}", rest))
                .unwrap_or(req.url.clone());

            let responses = self.responses.borrow();
            match responses.get(&path) {
                Some((status, content_type, body)) => Ok(HttpResponse {
                    status: *status,
                    content_type: content_type.clone(),
                    body: body.clone(),
                }),
                None => Ok(HttpResponse {
                    status: 404,
                    content_type: Some("application/json".to_string()),
                    body: r#"{"error":"Not Found"}"#.to_string(),
                }),
            }
        }
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;
    use careloop_shared::protocol::{GetCaregiver, UserLogin};
    use serde_json::json;

    fn test_api(client: MockTransport) -> CareLoopApi<MockTransport> {
        CareLoopApi::new("https://backend.test", client)
    }

    #[tokio::test]
    async fn test_call_parses_typed_response() {
        let client = MockTransport::new();
        client.mock_json(
            "/api/caregivers/2",
            200,
            json!({"CaregiverID": 2, "Name": "Siti", "HourlyRate": 20.0}),
        );
        let api = test_api(client);

        let profile = api.call(&GetCaregiver { caregiver_id: 2 }).await.unwrap();
        assert_eq!(profile.name, "Siti");
        assert_eq!(profile.hourly_rate, 20.0);
    }

    #[tokio::test]
    async fn test_json_header_and_body_attached() {
        let client = MockTransport::new();
        client.mock_json("/api/users/login", 200, json!({"user": {"UserID": 1, "Name": "A", "Email": "a@b.c"}}));
        let api = test_api(client.clone());

        api.call(&UserLogin {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

        let requests = client.requests.borrow();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.url, "https://backend.test/api/users/login");
        assert!(req
            .headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/json"));
        assert!(req.body.as_deref().unwrap().contains("\"email\":\"a@b.c\""));
    }

    #[tokio::test]
    async fn test_html_error_page_is_protocol_error() {
        let client = MockTransport::new();
        client.mock_raw(
            "/api/caregivers/2",
            200,
            Some("text/html"),
            "<html>502 Bad Gateway</html>",
        );
        let api = test_api(client);

        let err = api
            .call(&GetCaregiver { caregiver_id: 2 })
            .await
            .unwrap_err();
        match err {
            ApiError::Protocol { body, .. } => {
                // 原始文本必须原样携带，且从未尝试 JSON 解析
                assert!(body.contains("502 Bad Gateway"));
            }
            other => panic!("expected Protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_content_type_is_protocol_error() {
        let client = MockTransport::new();
        client.mock_raw("/api/caregivers/2", 200, None, "ok");
        let api = test_api(client);

        let err = api
            .call(&GetCaregiver { caregiver_id: 2 })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_error_status_uses_server_message() {
        let client = MockTransport::new();
        client.mock_json(
            "/api/users/login",
            401,
            json!({"error": "Invalid credentials"}),
        );
        let api = test_api(client);

        let err = api
            .call(&UserLogin {
                email: "a@b.c".to_string(),
                password: "bad".to_string(),
            })
            .await
            .unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_message_is_generic() {
        let client = MockTransport::new();
        client.mock_json("/api/caregivers/2", 500, json!({}));
        let api = test_api(client);

        let err = api
            .call(&GetCaregiver { caregiver_id: 2 })
            .await
            .unwrap_err();
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
