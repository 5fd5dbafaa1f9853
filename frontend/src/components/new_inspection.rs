//! 新建检测请求向导
//!
//! 三步：基本信息 -> 图片 -> 核对提交。步骤规则由 `fahsna::wizard` 决定，
//! 这里只负责渲染与把事件转交给核心库。

mod details_step;
mod form_state;
mod image_preview;
mod images_step;
mod review_step;
mod upload_state;

use fahsna::wizard::{submit_error_message, submit_inspection};
use fahsna::{AppRoute, InspectionWizard, UploadCoordinator, WizardStep};
use fahsna_shared::InspectionType;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::layout::{AppShell, ErrorAlert};
use crate::web::router::use_router;

use details_step::DetailsStep;
use form_state::FormState;
use images_step::ImagesStep;
use review_step::ReviewStep;
use upload_state::UploadState;

fn now_local() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[component]
fn StepIndicator(#[prop(into)] current: Signal<WizardStep>) -> impl IntoView {
    view! {
        <ul class="steps w-full">
            {WizardStep::ALL
                .into_iter()
                .map(|step| view! {
                    <li class=move || {
                        if step.number() <= current.get().number() { "step step-primary" } else { "step" }
                    }>
                        {step.title()}
                    </li>
                })
                .collect_view()}
        </ul>
    }
}

#[component]
pub fn NewInspectionPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let state = FormState::new(now_local());
    let wizard = RwSignal::new(InspectionWizard::new());
    let uploads = UploadState::new(UploadCoordinator::new(auth.ai(), auth.backend()));
    let progress = RwSignal::new(0u8);
    let (error, set_error) = signal(Option::<String>::None);

    on_cleanup(move || uploads.dispose());

    // 检测类型选项
    let types = RwSignal::new(Vec::<InspectionType>::new());
    let (types_loading, set_types_loading) = signal(true);
    {
        let backend = auth.backend();
        if let Some(task) = uploads.run(async move { backend.inspection_types().await }) {
            spawn_local(async move {
                match task.await {
                    Ok(Ok(list)) => types.set(list),
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "failed to load inspection types");
                        set_error.set(Some(format!("فشل تحميل أنواع الفحص: {}", e.user_message())));
                    }
                    Err(_) => return,
                }
                set_types_loading.set(false);
            });
        }
    }

    let step = Signal::derive(move || wizard.with(|w| w.step));
    let submitting = Signal::derive(move || wizard.with(|w| w.submitting));
    let can_advance = move || {
        let draft = state.to_draft();
        wizard.with(|w| w.can_advance(&draft))
    };
    let can_submit = move || {
        let draft = state.to_draft();
        let count = uploads.count();
        wizard.with(|w| w.can_submit(&draft, count))
    };

    let on_next = move |_| {
        let draft = state.to_draft_untracked();
        wizard.update(|w| {
            w.next(&draft);
        });
    };
    let on_prev = move |_| {
        wizard.update(|w| {
            w.prev();
        });
    };

    let on_submit = move |_| {
        let draft = state.to_draft_untracked();
        let count = uploads.entries.with_untracked(Vec::len);
        if !wizard.with_untracked(|w| w.can_submit(&draft, count)) {
            return;
        }
        let Some(coordinator) = uploads.coordinator() else {
            return;
        };

        wizard.update(|w| w.submitting = true);
        set_error.set(None);

        let backend = auth.backend();
        let submit = async move {
            let (backend, coordinator, draft) = (&backend, &*coordinator, &draft);
            auth.authorized(|token| async move {
                submit_inspection(backend, coordinator, draft, token.as_deref(), |p| {
                    progress.try_set(p);
                })
                .await
            })
            .await
        };
        let Some(task) = uploads.run(submit) else {
            return;
        };

        spawn_local(async move {
            match task.await {
                Ok(Ok(outcome)) => {
                    tracing::info!(
                        record = %outcome.record_id,
                        committed = outcome.images.committed,
                        failed = outcome.images.failed,
                        "inspection submitted"
                    );
                    uploads.release();
                    state.reset(now_local());
                    router.navigate_to(AppRoute::EngineerInspections);
                }
                Ok(Err(e)) => {
                    set_error.set(Some(submit_error_message(&e)));
                    progress.set(0);
                    wizard.update(|w| w.submitting = false);
                }
                Err(_) => {}
            }
        });
    };

    view! {
        <AppShell>
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">"طلب فحص جديد"</h1>
                <span class="badge badge-outline">
                    {move || format!("الخطوة {} من {}", step.get().number(), WizardStep::ALL.len())}
                </span>
            </div>

            <StepIndicator current=step />
            <ErrorAlert message=error />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">{move || step.get().title()}</h2>
                    {move || match step.get() {
                        WizardStep::Details => view! {
                            <DetailsStep state=state types=types types_loading=types_loading />
                        }
                        .into_any(),
                        WizardStep::Images => view! {
                            <ImagesStep uploads=uploads locked=submitting />
                        }
                        .into_any(),
                        WizardStep::Review => view! {
                            <ReviewStep state=state uploads=uploads types=types progress=progress />
                        }
                        .into_any(),
                    }}

                    <div class="card-actions justify-between mt-6">
                        <button
                            type="button"
                            class="btn btn-ghost"
                            disabled=move || !wizard.with(|w| w.can_go_back())
                            on:click=on_prev
                        >
                            "السابق"
                        </button>
                        {move || if step.get() == WizardStep::Review {
                            view! {
                                <button
                                    type="button"
                                    class="btn btn-primary"
                                    disabled=move || !can_submit()
                                    on:click=on_submit
                                >
                                    {move || if submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "جاري الإرسال..." }.into_any()
                                    } else {
                                        "إرسال الطلب".into_any()
                                    }}
                                </button>
                            }
                            .into_any()
                        } else {
                            view! {
                                <button
                                    type="button"
                                    class="btn btn-primary"
                                    disabled=move || !can_advance()
                                    on:click=on_next
                                >
                                    "التالي"
                                </button>
                            }
                            .into_any()
                        }}
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
