//! 单张图片卡片：预览、进度、分析结果与编辑

use fahsna::{EntryId, EntryState, ImageEntry};
use fahsna_shared::ImageCategory;
use fahsna_shared::analysis::AnalysisPayload;
use leptos::prelude::*;

use super::upload_state::UploadState;
use crate::components::icons::Trash2;

fn state_badge(state: EntryState) -> (&'static str, &'static str) {
    match state {
        EntryState::Staged => ("badge badge-ghost", "بانتظار التحليل"),
        EntryState::Analyzing => ("badge badge-info", "جاري التحليل"),
        EntryState::Analyzed => ("badge badge-success", "تم التحليل"),
        EntryState::Committing => ("badge badge-info", "جاري الرفع"),
        EntryState::Committed => ("badge badge-success", "تم الرفع"),
        EntryState::Failed => ("badge badge-error", "فشل"),
    }
}

fn format_size(bytes: usize) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        format!("{:.0} KB", kb)
    } else {
        format!("{:.1} MB", kb / 1024.0)
    }
}

#[component]
fn AnalysisSummary(analysis: AnalysisPayload) -> impl IntoView {
    if analysis.is_empty() {
        return view! { <p class="text-xs opacity-60">"لا توجد ملاحظات من التحليل"</p> }.into_any();
    }
    let cost = analysis.total_estimated_cost();

    view! {
        <div class="text-xs space-y-1 bg-base-200 rounded p-2">
            {analysis.confidence_percent().map(|c| view! {
                <div>"درجة الثقة: " <span class="font-bold">{format!("{}%", c)}</span></div>
            })}
            {analysis.saudi_code_compliance.as_ref().map(|c| view! {
                <div>
                    "المطابقة لكود البناء السعودي: "
                    <span class="font-bold">{c.overall_grade.clone()}</span>
                    {format!(" ({:.0}%)", c.compliance_percentage)}
                </div>
            })}
            <ul class="list-disc pr-4">
                {analysis
                    .detected_issues
                    .iter()
                    .map(|issue| view! {
                        <li>
                            <span class="font-semibold">{issue.kind.clone()}</span>
                            " - " {issue.severity_label().to_string()} ": "
                            {issue.description.clone()}
                        </li>
                    })
                    .collect_view()}
            </ul>
            {(cost > 0.0).then(|| view! {
                <div>"التكلفة التقديرية للإصلاح: " {format!("{:.0} ريال", cost)}</div>
            })}
        </div>
    }
    .into_any()
}

/// 图片卡片
///
/// 按 id 从快照中取条目，条目被移除后不再渲染。
#[component]
pub fn ImagePreview(id: EntryId, uploads: UploadState, #[prop(into)] locked: Signal<bool>) -> impl IntoView {
    let entry = Signal::derive(move || {
        uploads
            .entries
            .with(|list| list.iter().find(|e| e.id == id).cloned())
    });
    let field = move |f: fn(&ImageEntry) -> bool| entry.with(|e| e.as_ref().is_some_and(f));
    let frozen = move || {
        locked.get() || field(|e| matches!(e.state, EntryState::Committing | EntryState::Committed))
    };

    let on_category = move |ev: web_sys::Event| {
        if let (Some(category), Some(c)) = (
            ImageCategory::parse(&event_target_value(&ev)),
            uploads.coordinator(),
        ) {
            c.set_category(id, category);
        }
    };
    let on_description = move |ev: web_sys::Event| {
        if let Some(c) = uploads.coordinator() {
            c.set_description(id, &event_target_value(&ev));
        }
    };

    move || {
        entry.get().map(|e| {
            let (badge, label) = state_badge(e.state);
            let category = e.category;
            view! {
                <div class="card bg-base-100 shadow border border-base-300">
                    <figure class="h-40 bg-base-200">
                        {e.preview.clone().map(|src| view! {
                            <img src=src alt=e.file.name.clone() class="object-cover w-full h-full" />
                        })}
                    </figure>
                    <div class="card-body p-3 space-y-2">
                        <div class="flex items-center justify-between gap-2">
                            <span class="text-sm font-semibold truncate" title=e.file.name.clone()>
                                {e.file.name.clone()}
                            </span>
                            <span class="text-xs opacity-60">{format_size(e.file.size())}</span>
                        </div>
                        <div class="flex items-center gap-2">
                            <span class=badge>{label}</span>
                            <progress class="progress progress-primary flex-1" value=e.progress.to_string() max="100"></progress>
                        </div>
                        {e.error.clone().map(|msg| view! {
                            <div class="flex items-center justify-between text-error text-xs">
                                <span>{msg}</span>
                                <Show when=move || field(|e| e.state == EntryState::Failed && e.analysis.is_none()) && !locked.get()>
                                    <button type="button" class="btn btn-ghost btn-xs" on:click=move |_| uploads.retry(id)>
                                        "إعادة المحاولة"
                                    </button>
                                </Show>
                            </div>
                        })}
                        {e.analysis.clone().map(|analysis| view! { <AnalysisSummary analysis=analysis /> })}

                        <select class="select select-bordered select-sm w-full"
                            disabled=frozen
                            on:change=on_category
                        >
                            {ImageCategory::ALL
                                .into_iter()
                                .map(|c| view! {
                                    <option value=c.as_str() selected={c == category}>{c.label()}</option>
                                })
                                .collect_view()}
                        </select>
                        <input type="text"
                            class="input input-bordered input-sm w-full"
                            placeholder="وصف الصورة"
                            disabled=frozen
                            prop:value=e.description.clone()
                            on:change=on_description
                        />
                        <div class="card-actions justify-end">
                            <button type="button"
                                class="btn btn-ghost btn-xs text-error gap-1"
                                disabled=frozen
                                on:click=move |_| uploads.remove(id)
                            >
                                <Trash2 attr:class="h-3 w-3" /> "حذف"
                            </button>
                        </div>
                    </div>
                </div>
            }
        })
    }
}
