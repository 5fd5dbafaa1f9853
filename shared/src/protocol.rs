use crate::{InspectionRecord, InspectionType, ListResponse, RecordId, Role, Tokens, User};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for a JSON endpoint.
///
/// Multipart uploads are not expressed through this trait, see `UPLOAD_IMAGE_PATH`.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The URL path (or suffix).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// Full path including query; override when the path depends on the request.
    fn path(&self) -> String {
        Self::PATH.to_string()
    }
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub tokens: Tokens,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/api/v1/users/login/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Fetch the profile of the bearer of the access token
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = User;
    const PATH: &'static str = "/api/v1/users/profile/";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub tokens: Tokens,
    pub user: User,
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const PATH: &'static str = "/api/v1/users/register/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    /// Present when the backend rotates refresh tokens
    #[serde(default)]
    pub refresh: Option<String>,
}

impl ApiRequest for RefreshRequest {
    type Response = RefreshResponse;
    const PATH: &'static str = "/api/v1/users/token/refresh/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// Server-side invalidation of a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh: String,
}

impl ApiRequest for LogoutRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/api/v1/users/logout/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

// =========================================================
// Inspections
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListInspectionTypesRequest;

impl ApiRequest for ListInspectionTypesRequest {
    type Response = ListResponse<InspectionType>;
    const PATH: &'static str = "/api/v1/inspections/types/";
    const METHOD: HttpMethod = HttpMethod::Get;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInspectionRequest {
    pub inspection_type: u64,
    pub property_address: String,
    pub property_type: String,
    pub description: String,
    pub scheduled_date: String,
    pub priority: String,
    pub client_notes: String,
}

/// The created record; only the id is relied upon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedInspection {
    pub id: RecordId,
}

impl ApiRequest for CreateInspectionRequest {
    type Response = CreatedInspection;
    const PATH: &'static str = "/api/v1/inspections/requests/create/";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListInspectionRequestsRequest {
    #[serde(skip)]
    pub limit: Option<u32>,
}

impl ApiRequest for ListInspectionRequestsRequest {
    type Response = ListResponse<InspectionRecord>;
    const PATH: &'static str = "/api/v1/inspections/requests/";
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.limit {
            Some(limit) => format!("{}?limit={}", Self::PATH, limit),
            None => Self::PATH.to_string(),
        }
    }
}

/// Multipart image upload tied to an existing inspection record
pub const UPLOAD_IMAGE_PATH: &str = "/api/v1/inspections/requests/{id}/upload/";

pub fn upload_image_path(id: &RecordId) -> String {
    UPLOAD_IMAGE_PATH.replace("{id}", id.as_str())
}

/// Response of the per-record upload; other fields are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadImageResponse {
    #[serde(default)]
    pub ai_analysis_result: Option<crate::AnalysisPayload>,
}

// =========================================================
// AI analysis service
// =========================================================

pub const AI_HEALTH_PATH: &str = "/health";
pub const AI_ANALYZE_PATH: &str = "/analyze/";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_requests_path_carries_limit() {
        let req = ListInspectionRequestsRequest { limit: Some(5) };
        assert_eq!(req.path(), "/api/v1/inspections/requests/?limit=5");
        assert_eq!(
            ListInspectionRequestsRequest::default().path(),
            "/api/v1/inspections/requests/"
        );
    }

    #[test]
    fn test_upload_path_substitutes_id() {
        assert_eq!(
            upload_image_path(&RecordId::new("17")),
            "/api/v1/inspections/requests/17/upload/"
        );
    }

    #[test]
    fn test_register_omits_missing_phone() {
        let req = RegisterRequest {
            email: "a@b.sa".into(),
            password: "x".into(),
            first_name: "سارة".into(),
            last_name: "العتيبي".into(),
            user_type: Role::Engineer,
            phone: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["user_type"], "engineer");
        assert!(v.get("phone").is_none());
    }

    #[test]
    fn test_upload_response_tolerates_null_analysis_fields() {
        let resp: UploadImageResponse = serde_json::from_value(serde_json::json!({
            "id": 3,
            "ai_analysis_result": { "confidence_score": 0.5, "detected_issues": null, "suggested_fixes": null }
        }))
        .unwrap();
        let analysis = resp.ai_analysis_result.unwrap();
        assert_eq!(analysis.confidence_percent(), Some(50.0));
        assert!(analysis.detected_issues.is_empty());

        let bare: UploadImageResponse =
            serde_json::from_value(serde_json::json!({ "ai_analysis_result": null })).unwrap();
        assert!(bare.ai_analysis_result.is_none());
    }
}
