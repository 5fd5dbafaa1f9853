//! 会话状态管理
//!
//! `SessionStore` 持有当前用户与访问令牌，并把两枚令牌镜像到持久化存储。
//! 它是一个显式创建、可注入的对象：前端在根组件中创建并通过 Context 下发，
//! 不存在模块级的全局状态。
//!
//! 所有网络失败都在这里被吞掉并降级为“未登录”，调用方只会拿到 `bool`。

use std::cell::RefCell;

use fahsna_shared::protocol::{LoginRequest, RegisterRequest};
use fahsna_shared::{Role, Tokens, User};
use tracing::{debug, info, warn};

use crate::api::BackendApi;
use crate::error::{AppError, AppResult};
use crate::request::HttpClient;
use crate::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TokenStorage};

/// 会话快照
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    /// 启动时的令牌校验尚未完成
    pub loading: bool,
}

impl Session {
    /// 应用启动时的初始状态
    pub fn resolving() -> Self {
        Self {
            user: None,
            token: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user: None,
            token: None,
            loading: false,
        }
    }

    pub fn authenticated(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::resolving()
    }
}

/// 注册表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: Role,
    pub phone: String,
}

impl RegistrationForm {
    /// 本地校验并转换为请求对象
    pub fn validate(&self) -> AppResult<RegisterRequest> {
        let required = [
            &self.email,
            &self.password,
            &self.first_name,
            &self.last_name,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(AppError::validation("يرجى تعبئة جميع الحقول المطلوبة"));
        }
        if self.password != self.password_confirm {
            return Err(AppError::validation("كلمتا المرور غير متطابقتين"));
        }

        let phone = self.phone.trim();
        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            user_type: self.user_type,
            phone: (!phone.is_empty()).then(|| phone.to_string()),
        })
    }
}

type Observer = Box<dyn Fn(&Session)>;

/// 会话存储
pub struct SessionStore<C, S> {
    api: BackendApi<C>,
    storage: S,
    state: RefCell<Session>,
    observers: RefCell<Vec<Observer>>,
}

impl<C: HttpClient, S: TokenStorage> SessionStore<C, S> {
    pub fn new(api: BackendApi<C>, storage: S) -> Self {
        Self {
            api,
            storage,
            state: RefCell::new(Session::resolving()),
            observers: RefCell::new(Vec::new()),
        }
    }

    // --- 读取 ---

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn api(&self) -> &BackendApi<C> {
        &self.api
    }

    /// 注册状态变化回调，每次整体替换会话后触发
    pub fn subscribe(&self, observer: impl Fn(&Session) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    fn replace(&self, next: Session) {
        *self.state.borrow_mut() = next.clone();
        for observer in self.observers.borrow().iter() {
            observer(&next);
        }
    }

    // --- 生命周期 ---

    /// 启动检查
    ///
    /// 存在持久化的访问令牌时用它获取用户资料；失败或不存在时清除令牌，
    /// 会话进入“已解析但未登录”状态。
    pub async fn init(&self) -> Session {
        let Some(token) = self.storage.get(ACCESS_TOKEN_KEY) else {
            debug!("no persisted token, session resolved as anonymous");
            self.clear_tokens();
            self.replace(Session::anonymous());
            return self.snapshot();
        };

        match self.api.profile(&token).await {
            Ok(user) => {
                info!(user_id = user.id, role = user.role.as_str(), "persisted token verified");
                self.replace(Session::authenticated(user, token));
            }
            Err(e) => {
                warn!(error = %e, "persisted token rejected, clearing session");
                self.clear_tokens();
                self.replace(Session::anonymous());
            }
        }
        self.snapshot()
    }

    /// 解除所有观察者，视图树卸载时调用
    pub fn teardown(&self) {
        self.observers.borrow_mut().clear();
    }

    // --- 操作 ---

    /// 登录
    ///
    /// 失败时：此前已登录则保持原会话不变，否则确保令牌与用户都被清除。
    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.try_login(email, password).await {
            Ok(user) => {
                info!(user_id = user.id, role = user.role.as_str(), "login succeeded");
                true
            }
            Err(e) => {
                warn!(error = %e, "login failed");
                self.after_failed_auth();
                false
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> AppResult<User> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let tokens = self
            .api
            .login(&req)
            .await
            .map_err(|e| e.in_op("session.login"))?
            .tokens;
        let user = self
            .api
            .profile(&tokens.access)
            .await
            .map_err(|e| e.in_op("session.profile"))?;

        self.persist_tokens(&tokens);
        self.replace(Session::authenticated(user.clone(), tokens.access));
        Ok(user)
    }

    /// 注册，成功后直接采用返回的用户，不再额外请求资料
    pub async fn register(&self, form: &RegistrationForm) -> bool {
        let req = match form.validate() {
            Ok(req) => req,
            Err(e) => {
                debug!(error = %e, "registration rejected locally");
                return false;
            }
        };

        match self.api.register(&req).await {
            Ok(resp) => {
                info!(user_id = resp.user.id, role = resp.user.role.as_str(), "registration succeeded");
                self.persist_tokens(&resp.tokens);
                self.replace(Session::authenticated(resp.user, resp.tokens.access));
                true
            }
            Err(e) => {
                warn!(error = %e.in_op("session.register"), "registration failed");
                self.after_failed_auth();
                false
            }
        }
    }

    /// 注销
    ///
    /// 先无条件清除本地令牌与用户，再尽力通知服务端作废刷新令牌。
    pub async fn logout(&self) {
        let refresh = self.storage.get(REFRESH_TOKEN_KEY);
        let access = self.access_token();

        self.clear_tokens();
        self.replace(Session::anonymous());
        info!("session cleared");

        if let Some(refresh) = refresh {
            if let Err(e) = self.api.logout(&refresh, access.as_deref()).await {
                warn!(error = %e, "server-side logout failed, ignored");
            }
        }
    }

    /// 用刷新令牌换取新的访问令牌，失败时完整注销
    pub async fn refresh(&self) -> bool {
        let Some(refresh) = self.storage.get(REFRESH_TOKEN_KEY) else {
            warn!("no refresh token available");
            self.logout().await;
            return false;
        };

        match self.api.refresh_token(&refresh).await {
            Ok(resp) => {
                self.storage.set(ACCESS_TOKEN_KEY, &resp.access);
                if let Some(rotated) = &resp.refresh {
                    self.storage.set(REFRESH_TOKEN_KEY, rotated);
                }
                let mut next = self.snapshot();
                next.token = Some(resp.access);
                self.replace(next);
                debug!("access token refreshed");
                true
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, logging out");
                self.logout().await;
                false
            }
        }
    }

    /// 对需要鉴权的请求失败做出反应：401/403 时尝试刷新令牌
    ///
    /// 返回 true 表示令牌已更新，调用方可以重试一次。
    pub async fn recover(&self, err: &AppError) -> bool {
        if err.is_unauthorized() && self.is_authenticated() {
            self.refresh().await
        } else {
            false
        }
    }

    /// 更新内存中的用户资料
    pub fn update_user(&self, user: User) {
        let mut next = self.snapshot();
        next.user = Some(user);
        self.replace(next);
    }

    // --- 持久化 ---

    fn persist_tokens(&self, tokens: &Tokens) {
        let ok = self.storage.set(ACCESS_TOKEN_KEY, &tokens.access)
            & self.storage.set(REFRESH_TOKEN_KEY, &tokens.refresh);
        if !ok {
            warn!("failed to persist tokens, session will not survive reload");
        }
    }

    fn clear_tokens(&self) {
        self.storage.delete(ACCESS_TOKEN_KEY);
        self.storage.delete(REFRESH_TOKEN_KEY);
    }

    fn after_failed_auth(&self) {
        if self.is_authenticated() {
            return;
        }
        self.clear_tokens();
        self.replace(Session::anonymous());
    }
}

// =========================================================
// 测试模块
// =========================================================

#[cfg(test)]
mod tests;
