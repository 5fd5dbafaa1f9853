//! 令牌持久化抽象
//!
//! 浏览器端由 `localStorage` 实现，测试中使用内存实现。

pub use fahsna_shared::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// 键值存储
///
/// 与浏览器 Storage API 一致：读取失败视为不存在，写入/删除返回是否成功。
pub trait TokenStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

impl<T: TokenStorage + ?Sized> TokenStorage for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> bool {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        (**self).delete(key)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::TokenStorage;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MemoryTokenStorage {
        values: RefCell<HashMap<String, String>>,
    }

    impl MemoryTokenStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(pairs: &[(&str, &str)]) -> Self {
            let storage = Self::new();
            for (k, v) in pairs {
                storage.set(k, v);
            }
            storage
        }

        pub fn is_empty(&self) -> bool {
            self.values.borrow().is_empty()
        }
    }

    impl TokenStorage for MemoryTokenStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> bool {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            true
        }

        fn delete(&self, key: &str) -> bool {
            self.values.borrow_mut().remove(key);
            true
        }
    }
}
