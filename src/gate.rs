//! 受保护页面的访问判定
//!
//! 判定是会话状态与守卫配置的纯函数，自身不持有任何状态。

use fahsna_shared::Role;

use crate::route::AppRoute;
use crate::session::Session;

/// 守卫配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// 允许的角色；None 表示任何已登录用户
    pub allowed: Option<Vec<Role>>,
    /// 未登录时的跳转目标
    pub sign_in: AppRoute,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            allowed: None,
            sign_in: AppRoute::Login,
        }
    }
}

impl GateConfig {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn roles(roles: &[Role]) -> Self {
        Self {
            allowed: Some(roles.to_vec()),
            ..Self::default()
        }
    }

    pub fn with_sign_in(mut self, sign_in: AppRoute) -> Self {
        self.sign_in = sign_in;
        self
    }

    pub fn permits(&self, role: Role) -> bool {
        match &self.allowed {
            Some(allowed) => allowed.contains(&role),
            None => true,
        }
    }
}

/// 判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// 会话仍在解析，只渲染占位
    Pending,
    Redirect(AppRoute),
    Render,
}

/// 受保护页面的判定
///
/// 角色不在允许列表内时跳转到该角色自己的面板，而不是登录页。
/// 无法识别的角色没有自己的面板，只能回到登录页。
pub fn decide(session: &Session, config: &GateConfig) -> GateDecision {
    if session.loading {
        return GateDecision::Pending;
    }
    let Some(role) = session.role() else {
        return GateDecision::Redirect(config.sign_in);
    };
    if config.permits(role) {
        GateDecision::Render
    } else if role == Role::Unknown {
        GateDecision::Redirect(config.sign_in)
    } else {
        GateDecision::Redirect(AppRoute::dashboard_for(role))
    }
}

/// 分发页（`/dashboard`、`/engineer`）的判定：总是跳转
pub fn dispatch(session: &Session, sign_in: AppRoute) -> GateDecision {
    if session.loading {
        return GateDecision::Pending;
    }
    match session.role() {
        Some(role) => GateDecision::Redirect(AppRoute::dashboard_for(role)),
        None => GateDecision::Redirect(sign_in),
    }
}

/// 仅限访客的页面（登录、注册）
///
/// 已登录且角色可识别时离开到分发页；解析期间照常渲染表单。
pub fn guest_only(session: &Session) -> GateDecision {
    match session.role() {
        Some(role) if role != Role::Unknown => {
            GateDecision::Redirect(AppRoute::auth_success_redirect())
        }
        _ => GateDecision::Render,
    }
}

/// 按路由选择判定方式
pub fn decide_route(route: AppRoute, session: &Session, sign_in: AppRoute) -> GateDecision {
    if route.is_role_dispatch() {
        return dispatch(session, sign_in);
    }
    if route.should_redirect_when_authenticated() {
        return guest_only(session);
    }
    match route.gate() {
        Some(config) => decide(session, &config.with_sign_in(sign_in)),
        None => GateDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fahsna_shared::User;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "u".into(),
            email: "u@fahsna.sa".into(),
            first_name: String::new(),
            last_name: String::new(),
            role,
            phone: None,
            profile_image: None,
            is_verified: true,
        }
    }

    fn signed_in(role: Role) -> Session {
        Session::authenticated(user(role), "tok".into())
    }

    #[test]
    fn test_pending_while_resolving() {
        let config = GateConfig::roles(&[Role::Engineer]);
        assert_eq!(decide(&Session::resolving(), &config), GateDecision::Pending);
        assert_eq!(dispatch(&Session::resolving(), AppRoute::Login), GateDecision::Pending);
    }

    #[test]
    fn test_anonymous_goes_to_configured_sign_in() {
        let config = GateConfig::authenticated().with_sign_in(AppRoute::Register);
        assert_eq!(
            decide(&Session::anonymous(), &config),
            GateDecision::Redirect(AppRoute::Register)
        );
    }

    #[test]
    fn test_excluded_role_goes_to_own_dashboard() {
        let config = GateConfig::roles(&[Role::Engineer]);
        assert_eq!(
            decide(&signed_in(Role::Client), &config),
            GateDecision::Redirect(AppRoute::ClientDashboard)
        );
        assert_eq!(
            decide(&signed_in(Role::Partner), &config),
            GateDecision::Redirect(AppRoute::PartnerDashboard)
        );
        assert_eq!(
            decide(&signed_in(Role::Unknown), &config),
            GateDecision::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_allowed_role_renders() {
        let config = GateConfig::roles(&[Role::Engineer, Role::Admin]);
        assert_eq!(decide(&signed_in(Role::Admin), &config), GateDecision::Render);
        assert_eq!(
            decide(&signed_in(Role::Client), &GateConfig::authenticated()),
            GateDecision::Render
        );
    }

    #[test]
    fn test_route_level_decisions() {
        let engineer = signed_in(Role::Engineer);
        assert_eq!(
            decide_route(AppRoute::Dashboard, &engineer, AppRoute::Login),
            GateDecision::Redirect(AppRoute::EngineerDashboard)
        );
        assert_eq!(
            decide_route(AppRoute::Login, &engineer, AppRoute::Login),
            GateDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            decide_route(AppRoute::NewInspection, &engineer, AppRoute::Login),
            GateDecision::Render
        );
        assert_eq!(
            decide_route(AppRoute::EngineerHome, &Session::anonymous(), AppRoute::Login),
            GateDecision::Redirect(AppRoute::Login)
        );
        assert_eq!(
            decide_route(AppRoute::Home, &Session::anonymous(), AppRoute::Login),
            GateDecision::Render
        );
    }
}
