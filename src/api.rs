use fahsna_shared::protocol::{
    AI_ANALYZE_PATH, AI_HEALTH_PATH, ApiRequest, CreateInspectionRequest, CreatedInspection,
    ListInspectionRequestsRequest, ListInspectionTypesRequest, LoginRequest, LoginResponse,
    LogoutRequest, ProfileRequest, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, UploadImageResponse, upload_image_path,
};
use fahsna_shared::{AnalysisPayload, InspectionRecord, InspectionType, ListResponse, RecordId, User};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::request::{FileBlob, HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm};

fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base_url, path)
    } else {
        format!("{}/{}", base_url, path)
    }
}

/// 将非 2xx 响应转换为错误
fn ensure_success(resp: HttpResponse) -> AppResult<HttpResponse> {
    if resp.ok() {
        Ok(resp)
    } else {
        Err(AppError::status(resp.status, resp.body))
    }
}

// =========================================================
// 核心后端 (Inspection Backend)
// =========================================================

/// 核心后端客户端
///
/// 通过泛型 `C: HttpClient` 与具体的 HTTP 实现解耦。
#[derive(Clone)]
pub struct BackendApi<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> BackendApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// 发送一个 JSON 端点请求
    ///
    /// GET 请求不携带请求体。
    pub async fn call<R: ApiRequest>(&self, req: &R, token: Option<&str>) -> AppResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD).with_bearer(token);
        if R::METHOD != HttpMethod::Get {
            http = http.with_json(serde_json::to_string(req)?);
        }

        debug!(method = R::METHOD.as_str(), %path, "backend request");
        let resp = self
            .client
            .send(http)
            .await
            .and_then(ensure_success)
            .map_err(|e| e.in_op_with("backend.call", path.clone()))?;
        resp.json().map_err(|e| e.in_op_with("backend.decode", path))
    }

    pub async fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse> {
        self.call(req, None).await
    }

    /// 以 Bearer 方式获取当前用户资料
    pub async fn profile(&self, access_token: &str) -> AppResult<User> {
        self.call(&ProfileRequest, Some(access_token)).await
    }

    pub async fn register(&self, req: &RegisterRequest) -> AppResult<RegisterResponse> {
        self.call(req, None).await
    }

    pub async fn refresh_token(&self, refresh: &str) -> AppResult<RefreshResponse> {
        let req = RefreshRequest {
            refresh: refresh.to_string(),
        };
        self.call(&req, None).await
    }

    pub async fn logout(&self, refresh: &str, access_token: Option<&str>) -> AppResult<()> {
        let req = LogoutRequest {
            refresh: refresh.to_string(),
        };
        self.call(&req, access_token).await.map(|_| ())
    }

    pub async fn inspection_types(&self) -> AppResult<Vec<InspectionType>> {
        self.call(&ListInspectionTypesRequest, None)
            .await
            .map(ListResponse::into_items)
    }

    pub async fn create_inspection(
        &self,
        req: &CreateInspectionRequest,
        token: Option<&str>,
    ) -> AppResult<CreatedInspection> {
        self.call(req, token).await
    }

    pub async fn inspection_requests(
        &self,
        limit: Option<u32>,
        token: Option<&str>,
    ) -> AppResult<ListResponse<InspectionRecord>> {
        self.call(&ListInspectionRequestsRequest { limit }, token)
            .await
    }

    /// 上传一张图片并关联到已创建的检测记录
    pub async fn upload_image(
        &self,
        record_id: &RecordId,
        file: FileBlob,
        category: &str,
        description: &str,
        token: Option<&str>,
    ) -> AppResult<UploadImageResponse> {
        let path = upload_image_path(record_id);
        let form = MultipartForm::new()
            .file("image", file)
            .text("category", category)
            .text("description", description);
        let http = HttpRequest::new(&self.url(&path), HttpMethod::Post)
            .with_bearer(token)
            .with_multipart(form);

        let resp = self
            .client
            .send(http)
            .await
            .and_then(ensure_success)
            .map_err(|e| e.in_op_with("backend.upload_image", record_id.to_string()))?;
        resp.json()
    }
}

// =========================================================
// AI 分析服务 (AI Analysis Service)
// =========================================================

#[derive(Clone)]
pub struct AiApi<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> AiApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// 可用性探测
    pub async fn health(&self) -> AppResult<()> {
        let http = HttpRequest::new(&join_url(&self.base_url, AI_HEALTH_PATH), HttpMethod::Get);
        self.client
            .send(http)
            .await
            .and_then(ensure_success)
            .map(|_| ())
            .map_err(|e| e.in_op("ai.health"))
    }

    /// 分析单张图片（字段名为 `file`）
    pub async fn analyze(&self, file: FileBlob) -> AppResult<AnalysisPayload> {
        let form = MultipartForm::new().file("file", file);
        let http = HttpRequest::new(&join_url(&self.base_url, AI_ANALYZE_PATH), HttpMethod::Post)
            .with_multipart(form);

        let resp = self
            .client
            .send(http)
            .await
            .and_then(ensure_success)
            .map_err(|e| e.in_op("ai.analyze"))?;
        // 分析服务对空结果可能返回 null
        let payload: Option<AnalysisPayload> = resp.json()?;
        Ok(payload.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::request::mock::MockHttpClient;
    use serde_json::json;
    use std::rc::Rc;

    const BASE: &str = "http://api.test";

    fn backend() -> (Rc<MockHttpClient>, BackendApi<Rc<MockHttpClient>>) {
        let client = Rc::new(MockHttpClient::new());
        let api = BackendApi::new(client.clone(), "http://api.test/");
        (client, api)
    }

    #[tokio::test]
    async fn test_get_requests_send_no_body() {
        let (client, api) = backend();
        client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/api/v1/inspections/types/"),
            200,
            json!({ "results": [{ "id": 1, "name": "فحص السلامة", "price": 350 }] }),
        );

        let types = api.inspection_types().await.unwrap();
        assert_eq!(types.len(), 1);
        let reqs = client.requests.borrow();
        assert!(reqs[0].body.is_none());
        assert!(!reqs[0].headers.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn test_non_success_maps_to_status_error() {
        let (client, api) = backend();
        client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/api/v1/users/login/"),
            401,
            json!({ "detail": "bad credentials" }),
        );

        let err = api
            .login(&LoginRequest {
                email: "a@b.sa".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(401));
        assert_eq!(err.spans()[0].operation, "backend.call");
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_decode_error() {
        let (client, api) = backend();
        client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/api/v1/users/profile/"),
            200,
            json!({ "unexpected": true }),
        );

        let err = api.profile("tok").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Decode(_)));
        let reqs = client.requests.borrow();
        assert_eq!(reqs[0].headers.get("Authorization").unwrap(), "Bearer tok");
    }

    #[tokio::test]
    async fn test_analyze_posts_file_field() {
        let client = Rc::new(MockHttpClient::new());
        let ai = AiApi::new(client.clone(), "http://ai.test");
        client.mock_response(
            HttpMethod::Post,
            "http://ai.test/analyze/",
            200,
            json!({ "confidence_score": 0.5 }),
        );

        let payload = ai
            .analyze(FileBlob::new("wall.png", "image/png", vec![0u8; 4]))
            .await
            .unwrap();
        assert_eq!(payload.confidence_score, Some(0.5));

        let reqs = client.requests.borrow();
        match &reqs[0].body {
            Some(crate::request::HttpBody::Multipart(form)) => {
                assert_eq!(form.file_part("file").unwrap().name, "wall.png");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }
}
