use fahsna::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::ShieldCheck;
use crate::components::layout::ErrorAlert;
use crate::web::router::{Link, use_navigate};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.with(|v| v.trim().is_empty()) || password.with(String::is_empty) {
            set_error_msg.set(Some("يرجى إدخال البريد الإلكتروني وكلمة المرور".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let navigate = navigate.clone();
        spawn_local(async move {
            let success = auth
                .login(email.get_untracked().trim().to_string(), password.get_untracked())
                .await;
            if success {
                navigate(AppRoute::auth_success_redirect());
            } else {
                set_error_msg.set(Some(
                    "البريد الإلكتروني أو كلمة المرور غير صحيحة".to_string(),
                ));
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200" dir="rtl">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"تسجيل الدخول"</h1>
                        <p class="text-base-content/70">"أدخل بيانات حسابك للمتابعة"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=error_msg />

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"البريد الإلكتروني"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                dir="ltr"
                                placeholder="name@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"كلمة المرور"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                dir="ltr"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "جاري تسجيل الدخول..." }.into_any()
                                } else {
                                    "تسجيل الدخول".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "ليس لديك حساب؟ "
                            <Link to=AppRoute::Register class="link link-primary">"إنشاء حساب"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
