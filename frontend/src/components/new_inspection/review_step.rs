//! 第三步：核对并提交

use fahsna::EntryState;
use fahsna_shared::InspectionType;
use fahsna_shared::date::display_date;
use leptos::prelude::*;

use super::form_state::FormState;
use super::upload_state::UploadState;

#[component]
fn Row(label: &'static str, #[prop(into)] value: Signal<String>) -> impl IntoView {
    view! {
        <tr>
            <th class="w-1/3 font-normal opacity-70">{label}</th>
            <td class="font-semibold">{move || value.get()}</td>
        </tr>
    }
}

#[component]
pub fn ReviewStep(
    state: FormState,
    uploads: UploadState,
    #[prop(into)] types: Signal<Vec<InspectionType>>,
    /// 提交进度，0 表示未开始
    #[prop(into)]
    progress: Signal<u8>,
) -> impl IntoView {
    let type_label = Signal::derive(move || {
        let selected = state.inspection_type.get();
        types.with(|list| {
            list.iter()
                .find(|t| Some(t.id) == selected)
                .map(|t| t.option_label())
                .unwrap_or_default()
        })
    });
    let optional = |v: String| if v.trim().is_empty() { "-".to_string() } else { v };

    let analyzed = move || {
        uploads
            .entries
            .with(|list| list.iter().filter(|e| e.analysis.is_some()).count())
    };
    let failed = move || {
        uploads
            .entries
            .with(|list| list.iter().filter(|e| e.state == EntryState::Failed).count())
    };

    view! {
        <div class="space-y-6">
            <table class="table">
                <tbody>
                    <Row label="اسم العميل" value=Signal::derive(move || state.client_name.get()) />
                    <Row label="رقم الجوال" value=Signal::derive(move || optional(state.client_phone.get())) />
                    <Row label="البريد الإلكتروني" value=Signal::derive(move || optional(state.client_email.get())) />
                    <Row label="عنوان العقار" value=Signal::derive(move || state.property_address.get()) />
                    <Row label="نوع العقار" value=Signal::derive(move || {
                        state.property_type.get().map(|t| t.label().to_string()).unwrap_or_default()
                    }) />
                    <Row label="نوع الفحص" value=type_label />
                    <Row label="موعد الفحص" value=Signal::derive(move || display_date(&state.scheduled_date.get())) />
                    <Row label="الأولوية" value=Signal::derive(move || state.priority.get().label().to_string()) />
                    <Row label="الوصف" value=Signal::derive(move || optional(state.description.get())) />
                </tbody>
            </table>

            <div class="stats shadow w-full bg-base-100">
                <div class="stat">
                    <div class="stat-title">"عدد الصور"</div>
                    <div class="stat-value text-primary">{move || uploads.count()}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"تم تحليلها"</div>
                    <div class="stat-value text-success">{analyzed}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"فشلت"</div>
                    <div class="stat-value text-error">{failed}</div>
                </div>
            </div>

            <Show when=move || uploads.count() == 0>
                <div role="alert" class="alert alert-warning text-sm">
                    "يجب إضافة صورة واحدة على الأقل قبل الإرسال"
                </div>
            </Show>

            <Show when=move || { progress.get() > 0 }>
                <div class="space-y-1">
                    <div class="text-sm">{move || format!("جاري الإرسال... {}%", progress.get())}</div>
                    <progress class="progress progress-primary w-full" value=move || progress.get().to_string() max="100"></progress>
                </div>
            </Show>
        </div>
    }
}
