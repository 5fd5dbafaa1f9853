//! 认证模块
//!
//! `SessionStore` 在根组件创建并放入 Context；它的每次状态替换都镜像到一个
//! `RwSignal<Session>`，组件与路由只读这个信号，写操作统一走 store。

use std::rc::Rc;

use fahsna::{
    AiApi, ApiConfig, AppResult, AppRoute, BackendApi, RegistrationForm, Session, SessionStore,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::web::{BrowserStorage, FetchHttpClient};

pub type AppSession = SessionStore<FetchHttpClient, BrowserStorage>;

/// 浏览器构建在编译期注入服务地址
pub fn build_config() -> ApiConfig {
    ApiConfig::resolve(option_env!("FAHSNA_API_URL"), option_env!("FAHSNA_AI_API_URL"))
}

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    store: StoredValue<Rc<AppSession>, LocalStorage>,
    config: StoredValue<ApiConfig>,
    /// 会话镜像（只读使用）
    pub session: RwSignal<Session>,
}

impl AuthContext {
    pub fn new(config: ApiConfig) -> Self {
        let store = Rc::new(SessionStore::new(
            BackendApi::new(FetchHttpClient, &config.api_base_url),
            BrowserStorage,
        ));
        let session = RwSignal::new(store.snapshot());
        store.subscribe(move |next| session.set(next.clone()));

        Self {
            store: StoredValue::new_local(store),
            config: StoredValue::new(config),
            session,
        }
    }

    pub fn store(&self) -> Rc<AppSession> {
        self.store.get_value()
    }

    pub fn sign_in_route(&self) -> AppRoute {
        self.config.with_value(|c| AppRoute::from_path(&c.sign_in_path))
    }

    pub fn backend(&self) -> BackendApi<FetchHttpClient> {
        self.config
            .with_value(|c| BackendApi::new(FetchHttpClient, &c.api_base_url))
    }

    pub fn ai(&self) -> AiApi<FetchHttpClient> {
        self.config
            .with_value(|c| AiApi::new(FetchHttpClient, &c.ai_base_url))
    }

    /// 启动时校验持久化的令牌
    pub fn init(&self) {
        let store = self.store();
        spawn_local(async move {
            store.init().await;
        });
    }

    pub fn teardown(&self) {
        self.store().teardown();
    }

    pub async fn login(&self, email: String, password: String) -> bool {
        self.store().login(&email, &password).await
    }

    pub async fn register(&self, form: RegistrationForm) -> bool {
        self.store().register(&form).await
    }

    /// 执行需要令牌的请求；遇到 401 时刷新令牌并重试一次
    pub async fn authorized<T, F, Fut>(&self, call: F) -> AppResult<T>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let store = self.store();
        match call(store.access_token()).await {
            Err(err) if store.recover(&err).await => call(store.access_token()).await,
            other => other,
        }
    }

    /// 注销；导航由路由守卫在会话变化后自动处理
    pub fn logout(&self) {
        let store = self.store();
        spawn_local(async move {
            store.logout().await;
        });
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}
