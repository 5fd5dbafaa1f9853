use fahsna::{AppRoute, RegistrationForm};
use fahsna_shared::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::ShieldCheck;
use crate::components::layout::ErrorAlert;
use crate::web::router::{Link, use_navigate};

/// 文本输入框，写回表单的某个字段
#[component]
fn FormField(
    form: RwSignal<RegistrationForm>,
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] required: bool,
    get: fn(&RegistrationForm) -> &String,
    set: fn(&mut RegistrationForm, String),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                class="input input-bordered w-full"
                required=required
                prop:value=move || form.with(|f| get(f).clone())
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let form = RwSignal::new(RegistrationForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let current = form.get_untracked();
        // 先在本地校验，失败时不发请求并显示具体原因
        if let Err(e) = current.validate() {
            set_error_msg.set(Some(e.user_message()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            if auth.register(current).await {
                navigate(AppRoute::auth_success_redirect());
            } else {
                set_error_msg.set(Some("فشل إنشاء الحساب، يرجى المحاولة مرة أخرى".to_string()));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200" dir="rtl">
            <div class="hero-content flex-col w-full max-w-xl">
                <div class="flex flex-col items-center gap-2 mb-4">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <ShieldCheck attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"إنشاء حساب جديد"</h1>
                </div>

                <div class="card w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=error_msg />

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <FormField form=form id="first_name" label="الاسم الأول" required=true
                                get=|f| &f.first_name set=|f, v| f.first_name = v />
                            <FormField form=form id="last_name" label="اسم العائلة" required=true
                                get=|f| &f.last_name set=|f, v| f.last_name = v />
                        </div>
                        <FormField form=form id="email" label="البريد الإلكتروني" kind="email" required=true
                            get=|f| &f.email set=|f, v| f.email = v />
                        <FormField form=form id="phone" label="رقم الجوال (اختياري)" kind="tel"
                            get=|f| &f.phone set=|f, v| f.phone = v />

                        <div class="form-control">
                            <label class="label" for="user_type">
                                <span class="label-text">"نوع الحساب"</span>
                            </label>
                            <select
                                id="user_type"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    let role = Role::parse(&event_target_value(&ev));
                                    form.update(|f| f.user_type = role);
                                }
                            >
                                {Role::SELECTABLE
                                    .into_iter()
                                    .map(|role| view! {
                                        <option
                                            value=role.as_str()
                                            selected=move || form.with(|f| f.user_type == role)
                                        >
                                            {role.label()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            <FormField form=form id="password" label="كلمة المرور" kind="password" required=true
                                get=|f| &f.password set=|f, v| f.password = v />
                            <FormField form=form id="password_confirm" label="تأكيد كلمة المرور" kind="password" required=true
                                get=|f| &f.password_confirm set=|f, v| f.password_confirm = v />
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "جاري إنشاء الحساب..." }.into_any()
                                } else {
                                    "إنشاء الحساب".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "لديك حساب بالفعل؟ "
                            <Link to=AppRoute::Login class="link link-primary">"تسجيل الدخول"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
