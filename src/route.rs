//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问规则。

use std::fmt::Display;

use fahsna_shared::Role;

use crate::gate::GateConfig;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页
    #[default]
    Home,
    Login,
    Register,
    /// 按角色分发到各自面板
    Dashboard,
    /// 工程师入口，同样按角色分发
    EngineerHome,
    EngineerDashboard,
    EngineerInspections,
    NewInspection,
    ClientDashboard,
    PartnerDashboard,
    AdminDashboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 查询串与末尾斜杠被忽略。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match path {
            "/" => Self::Home,
            "/auth/login" | "/login" => Self::Login,
            "/auth/register" | "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/engineer" => Self::EngineerHome,
            "/engineer/dashboard" => Self::EngineerDashboard,
            "/engineer/inspections" => Self::EngineerInspections,
            "/engineer/inspections/new" => Self::NewInspection,
            "/client/dashboard" => Self::ClientDashboard,
            "/partner/dashboard" => Self::PartnerDashboard,
            "/admin/dashboard" => Self::AdminDashboard,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::Dashboard => "/dashboard",
            Self::EngineerHome => "/engineer",
            Self::EngineerDashboard => "/engineer/dashboard",
            Self::EngineerInspections => "/engineer/inspections",
            Self::NewInspection => "/engineer/inspections/new",
            Self::ClientDashboard => "/client/dashboard",
            Self::PartnerDashboard => "/partner/dashboard",
            Self::AdminDashboard => "/admin/dashboard",
            Self::NotFound => "/404",
        }
    }

    /// 每个角色固定对应的面板
    ///
    /// 未知角色按客户处理。
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Engineer => Self::EngineerDashboard,
            Role::Partner => Self::PartnerDashboard,
            Role::Admin => Self::AdminDashboard,
            Role::Client | Role::Unknown => Self::ClientDashboard,
        }
    }

    /// **核心守卫配置：该路由的访问规则**
    ///
    /// 返回 None 表示公开页面。
    pub fn gate(&self) -> Option<GateConfig> {
        match self {
            Self::EngineerDashboard | Self::EngineerInspections | Self::NewInspection => {
                Some(GateConfig::roles(&[Role::Engineer, Role::Admin]))
            }
            Self::ClientDashboard => Some(GateConfig::roles(&[Role::Client])),
            Self::PartnerDashboard => Some(GateConfig::roles(&[Role::Partner])),
            Self::AdminDashboard => Some(GateConfig::roles(&[Role::Admin])),
            _ => None,
        }
    }

    /// 只负责分发、自身不渲染内容的路由
    pub fn is_role_dispatch(&self) -> bool {
        matches!(self, Self::Dashboard | Self::EngineerHome)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        let all = [
            AppRoute::Home,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::EngineerHome,
            AppRoute::EngineerDashboard,
            AppRoute::EngineerInspections,
            AppRoute::NewInspection,
            AppRoute::ClientDashboard,
            AppRoute::PartnerDashboard,
            AppRoute::AdminDashboard,
        ];
        for route in all {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn test_from_path_ignores_query_and_trailing_slash() {
        assert_eq!(AppRoute::from_path("/engineer/dashboard/"), AppRoute::EngineerDashboard);
        assert_eq!(AppRoute::from_path("/auth/login?next=/x"), AppRoute::Login);
        assert_eq!(AppRoute::from_path(""), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/engineer/inspections/42"), AppRoute::NotFound);
    }

    #[test]
    fn test_dashboard_mapping() {
        assert_eq!(AppRoute::dashboard_for(Role::Engineer).to_path(), "/engineer/dashboard");
        assert_eq!(AppRoute::dashboard_for(Role::Client).to_path(), "/client/dashboard");
        assert_eq!(AppRoute::dashboard_for(Role::Partner).to_path(), "/partner/dashboard");
        assert_eq!(AppRoute::dashboard_for(Role::Admin).to_path(), "/admin/dashboard");
        assert_eq!(AppRoute::dashboard_for(Role::Unknown), AppRoute::ClientDashboard);
    }

    #[test]
    fn test_public_routes_have_no_gate() {
        assert!(AppRoute::Home.gate().is_none());
        assert!(AppRoute::Login.gate().is_none());
        assert!(AppRoute::NewInspection.gate().is_some());
    }
}
