//! Fahsna 共享协议层
//!
//! 前端与核心客户端共用的领域模型与传输对象：
//! - `protocol`: 端点定义 (`ApiRequest`)
//! - `analysis`: AI 服务返回的分析结果
//! - `catalog`: 固定选项（房产类型、图片分类、优先级）
//! - `date`: 时间格式化工具

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub mod analysis;
pub mod catalog;
pub mod date;
pub mod protocol;

pub use analysis::{AnalysisPayload, CodeCompliance, DetectedIssue, SuggestedFix};
pub use catalog::{ImageCategory, Priority, PropertyType};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const ACCESS_TOKEN_KEY: &str = "authToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

// =========================================================
// 用户与认证 (Users & Auth)
// =========================================================

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Client,
    Engineer,
    Partner,
    Admin,
    /// 后端返回了未知角色
    #[serde(other)]
    Unknown,
}

impl Role {
    pub const SELECTABLE: [Role; 3] = [Role::Client, Role::Engineer, Role::Partner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Engineer => "engineer",
            Role::Partner => "partner",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "عميل",
            Role::Engineer => "مهندس فاحص",
            Role::Partner => "شريك",
            Role::Admin => "مدير",
            Role::Unknown => "غير معروف",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "client" => Role::Client,
            "engineer" => Role::Engineer,
            "partner" => Role::Partner,
            "admin" => Role::Admin,
            _ => Role::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(rename = "user_type")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// 登录/注册成功后后端签发的一对令牌
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

// =========================================================
// 检测业务 (Inspections)
// =========================================================

/// 记录 ID
///
/// 后端有时返回数字，有时返回字符串 (UUID)，统一按字符串保存。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => RecordId(n.to_string()),
            Raw::Text(s) => RecordId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
}

impl InspectionType {
    /// 下拉框中显示的标签，如 "فحص إنشائي - 500 ريال"
    pub fn option_label(&self) -> String {
        format!("{} - {} ريال", self.name, self.price)
    }
}

/// 检测请求状态，未知值原样保留
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InspectionStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl InspectionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InspectionStatus::Pending => "pending",
            InspectionStatus::Confirmed => "confirmed",
            InspectionStatus::InProgress => "in_progress",
            InspectionStatus::Completed => "completed",
            InspectionStatus::Cancelled => "cancelled",
            InspectionStatus::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            InspectionStatus::Pending => "قيد الانتظار",
            InspectionStatus::Confirmed => "مؤكد",
            InspectionStatus::InProgress => "قيد التنفيذ",
            InspectionStatus::Completed => "مكتمل",
            InspectionStatus::Cancelled => "ملغى",
            InspectionStatus::Other(s) => s,
        }
    }

    /// 状态徽章的样式类
    pub fn badge_class(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "badge badge-warning",
            InspectionStatus::Confirmed => "badge badge-info",
            InspectionStatus::InProgress => "badge badge-secondary",
            InspectionStatus::Completed => "badge badge-success",
            InspectionStatus::Cancelled => "badge badge-error",
            InspectionStatus::Other(_) => "badge badge-ghost",
        }
    }
}

impl From<String> for InspectionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => InspectionStatus::Pending,
            "confirmed" => InspectionStatus::Confirmed,
            "in_progress" => InspectionStatus::InProgress,
            "completed" => InspectionStatus::Completed,
            "cancelled" => InspectionStatus::Cancelled,
            _ => InspectionStatus::Other(value),
        }
    }
}

impl From<InspectionStatus> for String {
    fn from(value: InspectionStatus) -> Self {
        value.as_str().to_string()
    }
}

/// 后端返回的检测请求记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: RecordId,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub property_address: String,
    #[serde(default)]
    pub property_type: String,
    /// 可能是类型 ID，也可能是展开后的名称
    #[serde(default)]
    pub inspection_type: Option<serde_json::Value>,
    #[serde(default)]
    pub status: InspectionStatus,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl InspectionRecord {
    pub fn property_type_label(&self) -> &'static str {
        PropertyType::parse(&self.property_type)
            .unwrap_or(PropertyType::Mixed)
            .label()
    }

    pub fn inspection_type_label(&self) -> String {
        match &self.inspection_type {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => format!("#{}", n),
            Some(serde_json::Value::Object(map)) => map
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        }
    }
}

/// 列表响应：分页对象或裸数组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
    },
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    /// 服务端报告的总数；裸数组时即为数组长度
    pub fn total(&self) -> u64 {
        match self {
            ListResponse::Paginated { results, count } => {
                count.unwrap_or(results.len() as u64)
            }
            ListResponse::Plain(items) => items.len() as u64,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListResponse::Paginated { results, .. } => results,
            ListResponse::Plain(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paginated { results, .. } => results,
            ListResponse::Plain(items) => items,
        }
    }
}
