use fahsna::AppRoute;
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::icons::Building;
use crate::web::router::Link;

/// 落地页
#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_auth().session;
    let signed_in = move || session.with(|s| s.is_authenticated());

    view! {
        <div class="hero min-h-screen bg-base-200" dir="rtl">
            <div class="hero-content text-center">
                <div class="max-w-xl space-y-6">
                    <Building attr:class="h-16 w-16 mx-auto text-primary" />
                    <h1 class="text-5xl font-bold">"فحصنا"</h1>
                    <p class="text-lg text-base-content/70">
                        "منصة فحص المباني بالذكاء الاصطناعي وفق كود البناء السعودي"
                    </p>
                    <Show
                        when=signed_in
                        fallback=|| view! {
                            <div class="flex gap-4 justify-center">
                                <Link to=AppRoute::Login class="btn btn-primary">"تسجيل الدخول"</Link>
                                <Link to=AppRoute::Register class="btn btn-outline">"إنشاء حساب"</Link>
                            </div>
                        }
                    >
                        <Link to=AppRoute::Dashboard class="btn btn-primary">"الذهاب إلى لوحة التحكم"</Link>
                    </Show>
                </div>
            </div>
        </div>
    }
}
