//! Fahsna 客户端核心
//!
//! 与平台无关的部分：HTTP 抽象、类型化的 API 客户端、会话、路由守卫、
//! 多步表单、图片上传协调与面板数据。浏览器相关实现在 `frontend` 中注入。

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gate;
pub mod request;
pub mod route;
pub mod scope;
pub mod session;
pub mod storage;
pub mod upload;
pub mod wizard;

pub use api::{AiApi, BackendApi};
pub use config::ApiConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use gate::{GateConfig, GateDecision};
pub use request::{FileBlob, HttpClient};
pub use route::AppRoute;
pub use scope::RequestScope;
pub use session::{RegistrationForm, Session, SessionStore};
pub use storage::TokenStorage;
pub use upload::{EntryId, EntryState, ImageEntry, UploadCoordinator};
pub use wizard::{InspectionDraft, InspectionWizard, WizardStep};
