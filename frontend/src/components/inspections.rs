use fahsna::dashboard::load_inspections;
use fahsna::{AppRoute, RequestScope};
use fahsna_shared::InspectionRecord;
use fahsna_shared::date::display_date;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::{Plus, RefreshCw};
use crate::components::layout::{AppShell, ErrorAlert, PageSpinner};
use crate::web::router::Link;

/// 检测记录表格
#[component]
pub fn InspectionTable(
    #[prop(into)] records: Signal<Vec<InspectionRecord>>,
    /// 无记录时的提示
    empty_text: &'static str,
) -> impl IntoView {
    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"العنوان"</th>
                        <th>"نوع العقار"</th>
                        <th class="hidden md:table-cell">"نوع الفحص"</th>
                        <th class="hidden md:table-cell">"الموعد"</th>
                        <th>"الحالة"</th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || records.with(Vec::is_empty)>
                        <tr>
                            <td colspan="5" class="text-center py-8 text-base-content/50">{empty_text}</td>
                        </tr>
                    </Show>
                    <For
                        each=move || records.get()
                        key=|r| r.id.clone()
                        children=move |record| {
                            let scheduled = record
                                .scheduled_date
                                .as_deref()
                                .or(record.created_at.as_deref())
                                .map(display_date)
                                .unwrap_or_default();
                            view! {
                                <tr>
                                    <td class="font-semibold">{record.property_address.clone()}</td>
                                    <td>{record.property_type_label()}</td>
                                    <td class="hidden md:table-cell">{record.inspection_type_label()}</td>
                                    <td class="hidden md:table-cell text-sm opacity-70">{scheduled}</td>
                                    <td>
                                        <span class=record.status.badge_class()>
                                            {record.status.label().to_string()}
                                        </span>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}

/// 工程师的检测请求列表
#[component]
pub fn InspectionsPage() -> impl IntoView {
    let auth = use_auth();

    let records = RwSignal::new(Vec::<InspectionRecord>::new());
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
            auth.authorized(|token| async move { load_inspections(backend, token.as_deref()).await })
                .await
        };
        let Some(task) = scope.try_with_value(|s| s.wrap(fetch)) else {
            return;
        };
        spawn_local(async move {
            match task.await {
                Ok(Ok(list)) => {
                    records.set(list);
                    set_error.set(None);
                }
                Ok(Err(e)) => set_error.set(Some(format!("فشل تحميل الطلبات: {}", e.user_message()))),
                // 页面已卸载
                Err(_) => return,
            }
            set_loading.set(false);
        });
    };

    load();

    view! {
        <AppShell>
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"طلبات الفحص"</h1>
                <div class="flex gap-2">
                    <button on:click=move |_| load() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                    <Link to=AppRoute::NewInspection class="btn btn-primary gap-2">
                        <Plus attr:class="h-4 w-4" /> "فحص جديد"
                    </Link>
                </div>
            </div>

            <ErrorAlert message=error />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <Show when=move || !loading.get() fallback=|| view! { <PageSpinner /> }>
                        <InspectionTable records=records empty_text="لا توجد طلبات فحص بعد" />
                    </Show>
                </div>
            </div>
        </AppShell>
    }
}
