use fahsna::dashboard::{DashboardSnapshot, RECENT_LIMIT, dashboard_title, load_dashboard};
use fahsna::{AppRoute, RequestScope};
use fahsna_shared::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::{ClipboardList, Plus, RefreshCw};
use crate::components::inspections::InspectionTable;
use crate::components::layout::{AppShell, ErrorAlert, PageSpinner};
use crate::web::router::Link;

#[component]
fn StatCard(
    title: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(default = "text-primary")] tone: &'static str,
    #[prop(optional)] desc: Option<&'static str>,
) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value {}", tone)>{move || value.get()}</div>
            {desc.map(|d| view! { <div class="stat-desc">{d}</div> })}
        </div>
    }
}

/// 角色面板
///
/// 每个面板挂载时独立拉取快照，用户变化时重新拉取。
#[component]
pub fn DashboardPage(role: Role) -> impl IntoView {
    let auth = use_auth();
    let session = auth.session;

    let snapshot = RwSignal::new(DashboardSnapshot::default());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(Option::<String>::None);

    let scope = StoredValue::new_local(RequestScope::new());
    on_cleanup(move || {
        scope.try_with_value(RequestScope::cancel);
    });

    let load = move || {
        set_loading.set(true);
        let backend = auth.backend();
        let fetch = async move {
            let backend = &backend;
            auth.authorized(|token| async move {
                load_dashboard(backend, token.as_deref(), RECENT_LIMIT).await
            })
            .await
        };
        let Some(task) = scope.try_with_value(|s| s.wrap(fetch)) else {
            return;
        };
        spawn_local(async move {
            match task.await {
                Ok(Ok(next)) => {
                    snapshot.set(next);
                    set_error.set(None);
                }
                Ok(Err(e)) => set_error.set(Some(format!("فشل تحميل البيانات: {}", e.user_message()))),
                Err(_) => return,
            }
            set_loading.set(false);
        });
    };

    let user_id = Memo::new(move |_| session.with(|s| s.user.as_ref().map(|u| u.id)));
    Effect::new(move |_| {
        if user_id.get().is_some() {
            load();
        }
    });

    let stats = move || snapshot.with(|s| s.stats);
    let recent = Signal::derive(move || snapshot.with(|s| s.recent.clone()));
    let greeting = move || {
        session.with(|s| {
            s.user
                .as_ref()
                .map(|u| format!("مرحباً، {}", u.display_name()))
                .unwrap_or_default()
        })
    };
    let is_engineer = matches!(role, Role::Engineer | Role::Admin);

    view! {
        <AppShell>
            <div class="flex flex-col md:flex-row md:items-center justify-between gap-4">
                <div>
                    <h1 class="text-2xl font-bold">{dashboard_title(role)}</h1>
                    <p class="text-base-content/70">{greeting}</p>
                </div>
                <Show when=move || is_engineer>
                    <Link to=AppRoute::NewInspection class="btn btn-primary gap-2">
                        <Plus attr:class="h-4 w-4" /> "طلب فحص جديد"
                    </Link>
                </Show>
            </div>

            <ErrorAlert message=error />

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="إجمالي الطلبات" value=Signal::derive(move || stats().total.to_string()) />
                <StatCard title="قيد الانتظار" tone="text-warning"
                    value=Signal::derive(move || stats().pending.to_string()) />
                <StatCard title="قيد التنفيذ" tone="text-secondary"
                    value=Signal::derive(move || stats().in_progress.to_string()) />
                <StatCard title="مكتملة" tone="text-success"
                    value=Signal::derive(move || stats().completed.to_string())
                    desc="من أحدث الطلبات" />
                <StatCard title="نسبة الإنجاز" tone="text-accent"
                    value=Signal::derive(move || format!("{}%", stats().completion_ratio())) />
                <Show when=move || role == Role::Admin>
                    <StatCard title="الإيرادات" tone="text-info"
                        value=Signal::derive(move || format!("{:.0} ريال", stats().revenue)) />
                </Show>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div class="flex items-center gap-2">
                            <ClipboardList attr:class="h-5 w-5 text-primary" />
                            <h3 class="card-title">"أحدث الطلبات"</h3>
                        </div>
                        <div class="flex items-center gap-2">
                            <Show when=move || is_engineer>
                                <Link to=AppRoute::EngineerInspections class="btn btn-ghost btn-sm">"عرض الكل"</Link>
                            </Show>
                            <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                                <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                            </button>
                        </div>
                    </div>
                    <Show when=move || !loading.get() fallback=|| view! { <PageSpinner /> }>
                        <InspectionTable records=recent empty_text="لا توجد طلبات حديثة" />
                    </Show>
                </div>
            </div>
        </AppShell>
    }
}
