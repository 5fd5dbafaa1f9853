//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航只负责更新地址与路由信号；访问控制由 `fahsna::gate` 的纯函数裁决，
//! 路由信号或会话变化时统一重新裁决。

use fahsna::gate::{self, GateDecision};
use fahsna::{AppRoute, Session};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 重定向使用 replaceState，不在历史中留下被拒绝的页面
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 会话以信号注入，路由模块不依赖认证实现。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    session: Signal<Session>,
    sign_in: AppRoute,
}

impl RouterService {
    fn new(session: Signal<Session>, sign_in: AppRoute) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
            sign_in,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 当前路由的守卫结果（追踪路由与会话）
    pub fn decision(&self) -> GateDecision {
        let route = self.current_route.get();
        self.session
            .with(|session| gate::decide_route(route, session, self.sign_in))
    }

    pub fn navigate_to(&self, route: AppRoute) {
        tracing::debug!(%route, "navigate");
        push_history_state(route.to_path());
        self.set_route.set(route);
    }

    fn redirect(&self, route: AppRoute) {
        replace_history_state(route.to_path());
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 监听器与页面同生命周期
        closure.forget();
    }

    /// 路由或会话变化时执行守卫重定向
    fn setup_gate_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let route = router.current_route.get();
            if let GateDecision::Redirect(target) = router.decision() {
                if target != route {
                    tracing::info!(from = %route, to = %target, "gate redirect");
                    router.redirect(target);
                }
            }
        });
    }
}

fn provide_router(session: Signal<Session>, sign_in: AppRoute) -> RouterService {
    let router = RouterService::new(session, sign_in);

    router.init_popstate_listener();
    router.setup_gate_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(AppRoute) + Clone {
    let router = use_router();
    move |to: AppRoute| router.navigate_to(to)
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    /// 未登录时的登录页
    sign_in: AppRoute,
    children: Children,
) -> impl IntoView {
    provide_router(session, sign_in);

    children()
}

/// 路由出口组件
///
/// 会话解析中渲染占位；需要重定向时不渲染目标页面，等待 Effect 切换路由。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || match router.decision() {
        GateDecision::Render => matcher(router.current_route().get()),
        GateDecision::Pending | GateDecision::Redirect(_) => view! {
            <div class="gate-pending" role="status">
                <span class="spinner"></span>
                <p>"جاري التحميل..."</p>
            </div>
        }
        .into_any(),
    }
}

/// 站内链接，拦截点击改走 History API
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
