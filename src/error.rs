use std::fmt;

use thiserror::Error;

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "session.login", "upload.analyze"
    pub operation: String,
    pub detail: Option<String>,
}

impl fmt::Display for ErrorSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation)?;
        if let Some(detail) = &self.detail {
            write!(f, "({})", detail)?;
        }
        Ok(())
    }
}

// =========================================================
// 错误类型
// =========================================================

/// 错误种类
///
/// 对应三类远程失败（传输 / 非 2xx 状态 / 响应体无效）以及本地的校验与取消。
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("网络错误: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("响应解析失败: {0}")]
    Decode(String),
    #[error("输入无效: {0}")]
    Validation(String),
    #[error("请求已取消")]
    Aborted,
}

/// 客户端核心错误
///
/// - kind: 错误种类
/// - spans: 调用追踪栈（由外向内追加）
#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    spans: Vec<ErrorSpan>,
}

impl AppError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport(message.into()))
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::Status {
            status,
            body: body.into(),
        })
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode(message.into()))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation(message.into()))
    }

    pub fn aborted() -> Self {
        Self::new(ErrorKind::Aborted)
    }

    // --- Context builders ---

    /// 添加操作追踪
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    // --- Accessors ---

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    /// 非 2xx 响应的状态码
    pub fn http_status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Status { status, .. } => Some(status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.http_status(), Some(401 | 403))
    }

    /// 展示给用户的阿拉伯语说明
    pub fn user_message(&self) -> String {
        match &self.kind {
            ErrorKind::Transport(_) => "تعذر الاتصال بالخادم".to_string(),
            ErrorKind::Status { status: 401 | 403, .. } => "غير مصرح لك بهذا الإجراء".to_string(),
            ErrorKind::Status { status, body } if body.trim().is_empty() => {
                format!("استجابة غير متوقعة من الخادم ({})", status)
            }
            ErrorKind::Status { status, body } => format!("{} - {}", status, body.trim()),
            ErrorKind::Decode(_) => "استجابة غير صالحة من الخادم".to_string(),
            ErrorKind::Validation(msg) => msg.clone(),
            ErrorKind::Aborted => "تم إلغاء الطلب".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::decode(e.to_string())
    }
}

impl From<futures::future::Aborted> for AppError {
    fn from(_: futures::future::Aborted) -> Self {
        AppError::aborted()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_trace() {
        let err = AppError::status(500, "boom")
            .in_op("api.call")
            .in_op_with("upload.commit", "entry-1");
        assert_eq!(
            err.to_string(),
            "HTTP 500: boom | trace: api.call -> upload.commit(entry-1)"
        );
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(AppError::status(401, "").is_unauthorized());
        assert!(!AppError::status(500, "").is_unauthorized());
        assert!(!AppError::transport("offline").is_unauthorized());
    }

    #[test]
    fn test_user_message_is_localized() {
        assert_eq!(
            AppError::transport("dns").user_message(),
            "تعذر الاتصال بالخادم"
        );
        assert_eq!(
            AppError::status(400, " bad address ").user_message(),
            "400 - bad address"
        );
    }
}
