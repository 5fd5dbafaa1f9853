//! فحصنا 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `fahsna`: 平台无关的核心（会话、守卫、向导、上传协调）
//! - `web::router`: 路由服务（History API + 守卫裁决）
//! - `auth`: 会话存储的 Context 封装
//! - `components`: UI 组件层

mod auth;
mod components {
    pub mod dashboard;
    pub mod home;
    mod icons;
    pub mod inspections;
    pub mod layout;
    pub mod login;
    pub mod new_inspection;
    pub mod register;
}

use crate::auth::{AuthContext, build_config};
use crate::components::dashboard::DashboardPage;
use crate::components::home::HomePage;
use crate::components::inspections::InspectionsPage;
use crate::components::login::LoginPage;
use crate::components::new_inspection::NewInspectionPage;
use crate::components::register::RegisterPage;

use fahsna::AppRoute;
use fahsna_shared::Role;
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod file;
    mod http;
    pub mod log;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::BrowserStorage;
}

use web::router::{Link, Router, RouterOutlet};

/// 安装浏览器日志订阅者
pub fn init_logging() {
    web::log::init();
}

/// 路由匹配函数
///
/// 只在守卫放行后调用；角色分发页总会被重定向，这里不会渲染到。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::EngineerDashboard => view! { <DashboardPage role=Role::Engineer /> }.into_any(),
        AppRoute::EngineerInspections => view! { <InspectionsPage /> }.into_any(),
        AppRoute::NewInspection => view! { <NewInspectionPage /> }.into_any(),
        AppRoute::ClientDashboard => view! { <DashboardPage role=Role::Client /> }.into_any(),
        AppRoute::PartnerDashboard => view! { <DashboardPage role=Role::Partner /> }.into_any(),
        AppRoute::AdminDashboard => view! { <DashboardPage role=Role::Admin /> }.into_any(),
        AppRoute::Dashboard | AppRoute::EngineerHome => view! { <></> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200" dir="rtl">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"الصفحة غير موجودة"</p>
                    <Link to=AppRoute::Home class="btn btn-primary">"العودة للرئيسية"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let config = build_config();
    tracing::info!(api = %config.api_base_url, ai = %config.ai_base_url, "starting");
    let auth_ctx = AuthContext::new(config);
    provide_context(auth_ctx);

    // 2. 校验持久化的令牌
    auth_ctx.init();
    on_cleanup(move || auth_ctx.teardown());

    // 3. 会话信号注入路由服务
    let session: Signal<_> = auth_ctx.session.into();
    let sign_in = auth_ctx.sign_in_route();

    view! {
        <Router session=session sign_in=sign_in>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
