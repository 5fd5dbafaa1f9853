//! 运行时配置
//!
//! 解析顺序：显式传入 → 环境变量 → 默认值。
//! 浏览器构建没有进程环境，由前端通过 `option_env!` 在编译期注入。

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_AI_API_URL: &str = "http://127.0.0.1:8001";
pub const DEFAULT_SIGN_IN_PATH: &str = "/auth/login";

pub const ENV_API_URL: &str = "FAHSNA_API_URL";
pub const ENV_AI_API_URL: &str = "FAHSNA_AI_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// 核心后端地址
    pub api_base_url: String,
    /// AI 分析服务地址
    pub ai_base_url: String,
    /// 未登录访问受保护页面时的跳转地址
    pub sign_in_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            ai_base_url: DEFAULT_AI_API_URL.to_string(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
        }
    }
}

fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn pick(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => normalize(v),
        _ => default.to_string(),
    }
}

impl ApiConfig {
    /// 由可选值构建，空字符串视为未配置
    pub fn resolve(api_base_url: Option<&str>, ai_base_url: Option<&str>) -> Self {
        Self {
            api_base_url: pick(api_base_url, DEFAULT_API_URL),
            ai_base_url: pick(ai_base_url, DEFAULT_AI_API_URL),
            ..Self::default()
        }
    }

    /// 从进程环境变量读取
    pub fn from_env() -> Self {
        let api = std::env::var(ENV_API_URL).ok();
        let ai = std::env::var(ENV_AI_API_URL).ok();
        Self::resolve(api.as_deref(), ai.as_deref())
    }

    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_to_local_services() {
        let cfg = ApiConfig::resolve(None, None);
        assert_eq!(cfg.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.ai_base_url, "http://127.0.0.1:8001");
        assert_eq!(cfg.sign_in_path, "/auth/login");
    }

    #[test]
    fn test_explicit_values_are_normalized() {
        let cfg = ApiConfig::resolve(Some(" https://api.fahsna.sa/ "), Some(""));
        assert_eq!(cfg.api_base_url, "https://api.fahsna.sa");
        assert_eq!(cfg.ai_base_url, DEFAULT_AI_API_URL);
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let cfg: ApiConfig =
            serde_json::from_str(r#"{"api_base_url":"https://api.fahsna.sa"}"#).unwrap();
        assert_eq!(cfg.api_base_url, "https://api.fahsna.sa");
        assert_eq!(cfg.ai_base_url, DEFAULT_AI_API_URL);
    }
}
