//! 第一步：客户与物业信息

use fahsna_shared::{InspectionType, Priority, PropertyType};
use leptos::prelude::*;

use super::form_state::FormState;

#[component]
fn TextInput(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] required: bool,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">
                    {label}
                    {required.then_some(" *")}
                </span>
            </label>
            <input id=id
                type=kind
                required=required
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class="input input-bordered w-full"
            />
        </div>
    }
}

/// 客户信息、物业信息与检测安排
#[component]
pub fn DetailsStep(
    state: FormState,
    #[prop(into)] types: Signal<Vec<InspectionType>>,
    #[prop(into)] types_loading: Signal<bool>,
) -> impl IntoView {
    view! {
        <div class="space-y-6">
            <section class="space-y-2">
                <h3 class="font-bold text-lg">"بيانات العميل"</h3>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <TextInput id="client_name" label="اسم العميل" value=state.client_name required=true />
                    <TextInput id="client_phone" label="رقم الجوال" value=state.client_phone kind="tel" placeholder="05xxxxxxxx" />
                    <TextInput id="client_email" label="البريد الإلكتروني" value=state.client_email kind="email" />
                </div>
            </section>

            <section class="space-y-2">
                <h3 class="font-bold text-lg">"بيانات العقار"</h3>
                <TextInput id="property_address" label="عنوان العقار" value=state.property_address required=true />
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <div class="form-control">
                        <label for="property_type" class="label">
                            <span class="label-text">"نوع العقار *"</span>
                        </label>
                        <select id="property_type"
                            class="select select-bordered w-full"
                            on:change=move |ev| state.property_type.set(PropertyType::parse(&event_target_value(&ev)))
                        >
                            {PropertyType::ALL
                                .into_iter()
                                .map(|t| view! {
                                    <option
                                        value=t.as_str()
                                        selected=move || state.property_type.get() == Some(t)
                                    >
                                        {t.label()}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <TextInput id="building_year" label="سنة البناء" value=state.building_year kind="number" />
                    <TextInput id="building_area" label="المساحة (م²)" value=state.building_area kind="number" />
                </div>
            </section>

            <section class="space-y-2">
                <h3 class="font-bold text-lg">"تفاصيل الفحص"</h3>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <div class="form-control">
                        <label for="inspection_type" class="label">
                            <span class="label-text">"نوع الفحص *"</span>
                        </label>
                        <select id="inspection_type"
                            class="select select-bordered w-full"
                            disabled=move || types_loading.get()
                            on:change=move |ev| state.inspection_type.set(event_target_value(&ev).parse().ok())
                        >
                            <option value="" selected=move || state.inspection_type.get().is_none()>
                                {move || if types_loading.get() { "جاري التحميل..." } else { "اختر نوع الفحص" }}
                            </option>
                            <For
                                each=move || types.get()
                                key=|t| t.id
                                children=move |t| {
                                    let id = t.id;
                                    view! {
                                        <option
                                            value=id.to_string()
                                            selected=move || state.inspection_type.get() == Some(id)
                                        >
                                            {t.option_label()}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </div>
                    <TextInput id="scheduled_date" label="موعد الفحص" value=state.scheduled_date kind="datetime-local" />
                    <div class="form-control">
                        <label for="priority" class="label">
                            <span class="label-text">"الأولوية"</span>
                        </label>
                        <select id="priority"
                            class="select select-bordered w-full"
                            on:change=move |ev| {
                                if let Some(p) = Priority::parse(&event_target_value(&ev)) {
                                    state.priority.set(p);
                                }
                            }
                        >
                            {Priority::ALL
                                .into_iter()
                                .map(|p| view! {
                                    <option value=p.as_str() selected=move || state.priority.get() == p>
                                        {p.label()}
                                    </option>
                                })
                                .collect_view()}
                        </select>
                    </div>
                </div>
                <div class="form-control">
                    <label for="description" class="label">
                        <span class="label-text">"وصف الطلب"</span>
                    </label>
                    <textarea id="description"
                        class="textarea textarea-bordered w-full"
                        rows="3"
                        placeholder="فحص العقار"
                        on:input=move |ev| state.description.set(event_target_value(&ev))
                        prop:value=move || state.description.get()
                    ></textarea>
                </div>
                <div class="form-control">
                    <label for="client_notes" class="label">
                        <span class="label-text">"ملاحظات العميل"</span>
                    </label>
                    <textarea id="client_notes"
                        class="textarea textarea-bordered w-full"
                        rows="2"
                        on:input=move |ev| state.client_notes.set(event_target_value(&ev))
                        prop:value=move || state.client_notes.get()
                    ></textarea>
                </div>
            </section>
        </div>
    }
}
