use fahsna::AppRoute;
use fahsna_shared::Role;
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::icons::{Building, LogOut};
use crate::web::router::Link;

/// 已登录页面的外壳：导航栏 + 内容区
#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let session = auth.session;

    let display_name = move || {
        session.with(|s| s.user.as_ref().map(|u| u.display_name()).unwrap_or_default())
    };
    let role = move || session.with(|s| s.role());
    let is_engineer = move || matches!(role(), Some(Role::Engineer | Role::Admin));

    view! {
        <div class="min-h-screen bg-base-200" dir="rtl">
            <div class="navbar bg-base-100 shadow px-4">
                <div class="flex-1 gap-2">
                    <Building attr:class="h-6 w-6 text-primary" />
                    <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl">"فحصنا"</Link>
                    <Show when=is_engineer>
                        <ul class="menu menu-horizontal px-1 hidden md:flex">
                            <li><Link to=AppRoute::EngineerDashboard>"لوحة التحكم"</Link></li>
                            <li><Link to=AppRoute::EngineerInspections>"طلبات الفحص"</Link></li>
                            <li><Link to=AppRoute::NewInspection>"فحص جديد"</Link></li>
                        </ul>
                    </Show>
                </div>
                <div class="flex-none gap-3">
                    <div class="text-left hidden md:block">
                        <div class="font-semibold">{display_name}</div>
                        <div class="text-xs text-base-content/60">
                            {move || role().map(|r| r.label()).unwrap_or_default()}
                        </div>
                    </div>
                    <button on:click=move |_| auth.logout() class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "تسجيل الخروج"
                    </button>
                </div>
            </div>
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">
                {children()}
            </main>
        </div>
    }
}

/// 全页加载占位
#[component]
pub fn PageSpinner() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-16">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 错误提示条
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
