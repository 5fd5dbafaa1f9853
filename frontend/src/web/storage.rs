//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现核心库的 `TokenStorage`。

use fahsna::TokenStorage;

/// 浏览器 localStorage
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for BrowserStorage {
    /// 键不存在或存储不可用时返回 None
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
