use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
pub use fahsna_shared::protocol::HttpMethod;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 待上传的文件内容
///
/// 字节使用 `Arc` 共享，条目快照被频繁克隆时不复制数据。
#[derive(Debug, Clone, PartialEq)]
pub struct FileBlob {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<[u8]>,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: FileBlob },
}

/// multipart/form-data 请求体
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(FormPart::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn file(mut self, name: &str, file: FileBlob) -> Self {
        self.parts.push(FormPart::File {
            name: name.to_string(),
            file,
        });
        self
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn file_part(&self, name: &str) -> Option<&FileBlob> {
        self.parts.iter().find_map(|p| match p {
            FormPart::File { name: n, file } if n == name => Some(file),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    Json(String),
    Multipart(MultipartForm),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 设置 Bearer 凭据
    pub fn with_bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.with_header(
                fahsna_shared::HEADER_AUTHORIZATION,
                &format!("Bearer {}", token),
            ),
            None => self,
        }
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(HttpBody::Json(body));
        self
    }

    /// Content-Type（含 boundary）由传输层生成
    pub fn with_multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(HttpBody::Multipart(form));
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 空响应体按 `null` 解析，`()` 与 `Option` 类型可直接接收
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| AppError::decode(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
///
/// (?Send) 是因为浏览器环境下 fetch 相关的类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// 仅在传输失败时返回错误；非 2xx 状态照常返回响应
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for Rc<T> {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;

    /// 动态响应
    pub struct Reply {
        pub status: u16,
        pub body: serde_json::Value,
        pub delay: Option<Duration>,
    }

    impl Reply {
        pub fn json(status: u16, body: serde_json::Value) -> Self {
            Self {
                status,
                body,
                delay: None,
            }
        }

        pub fn after(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    type Responder = Rc<dyn Fn(&HttpRequest) -> Reply>;

    #[derive(Clone)]
    enum Canned {
        Respond { status: u16, body: String },
        Fail(String),
        Dynamic(Responder),
    }

    /// 按 "METHOD URL" 返回预设响应，并记录所有发出的请求
    pub struct MockHttpClient {
        responses: RefCell<HashMap<String, Canned>>,
        delays: RefCell<HashMap<String, Duration>>,
        pub requests: RefCell<Vec<HttpRequest>>,
    }

    fn route_key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self {
                responses: RefCell::new(HashMap::new()),
                delays: RefCell::new(HashMap::new()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub fn mock_response(
            &self,
            method: HttpMethod,
            url: &str,
            status: u16,
            body: serde_json::Value,
        ) {
            self.responses.borrow_mut().insert(
                route_key(method, url),
                Canned::Respond {
                    status,
                    body: body.to_string(),
                },
            );
        }

        /// 按请求内容决定响应，同一地址的多个请求可以得到不同结果
        pub fn mock_with(
            &self,
            method: HttpMethod,
            url: &str,
            responder: impl Fn(&HttpRequest) -> Reply + 'static,
        ) {
            self.responses
                .borrow_mut()
                .insert(route_key(method, url), Canned::Dynamic(Rc::new(responder)));
        }

        pub fn mock_network_error(&self, method: HttpMethod, url: &str) {
            self.responses
                .borrow_mut()
                .insert(route_key(method, url), Canned::Fail("connection refused".into()));
        }

        /// 让某个地址的响应延后返回，用于验证完成顺序
        pub fn mock_delay(&self, method: HttpMethod, url: &str, delay: Duration) {
            self.delays
                .borrow_mut()
                .insert(route_key(method, url), delay);
        }

        pub fn requests_to(&self, method: HttpMethod, url: &str) -> Vec<HttpRequest> {
            self.requests
                .borrow()
                .iter()
                .filter(|r| r.method == method && r.url == url)
                .cloned()
                .collect()
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
            let key = route_key(req.method, &req.url);
            let canned = self.responses.borrow().get(&key).cloned();
            let dynamic = match &canned {
                Some(Canned::Dynamic(responder)) => Some(responder(&req)),
                _ => None,
            };
            self.requests.borrow_mut().push(req);

            let delay = dynamic
                .as_ref()
                .and_then(|r| r.delay)
                .or_else(|| self.delays.borrow().get(&key).copied());
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(reply) = dynamic {
                return Ok(HttpResponse {
                    status: reply.status,
                    body: reply.body.to_string(),
                });
            }
            match canned {
                Some(Canned::Respond { status, body }) => Ok(HttpResponse { status, body }),
                Some(Canned::Fail(msg)) => Err(AppError::transport(msg)),
                Some(Canned::Dynamic(_)) => unreachable!(),
                None => Ok(HttpResponse {
                    status: 404,
                    body: "Not Found".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_decodes_as_null() {
        let resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        let v: Option<u32> = resp.json().unwrap();
        assert!(v.is_none());
        resp.json::<()>().unwrap();
    }

    #[test]
    fn test_bearer_header_only_when_token_present() {
        let with = HttpRequest::new("http://x", HttpMethod::Get).with_bearer(Some("abc"));
        assert_eq!(with.headers.get("Authorization").unwrap(), "Bearer abc");

        let without = HttpRequest::new("http://x", HttpMethod::Get).with_bearer(None);
        assert!(without.headers.is_empty());
    }

    #[test]
    fn test_multipart_lookup() {
        let form = MultipartForm::new()
            .file("image", FileBlob::new("a.jpg", "image/jpeg", vec![1, 2, 3]))
            .text("category", "exterior");
        assert_eq!(form.text_value("category"), Some("exterior"));
        assert_eq!(form.file_part("image").unwrap().size(), 3);
        assert!(form.file_part("file").is_none());
    }
}
