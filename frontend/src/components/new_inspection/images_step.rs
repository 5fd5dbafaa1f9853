//! 第二步：图片收集
//!
//! 支持拖放与文件选择；文件被接受后立即送去分析。

use fahsna::upload::{MAX_ENTRIES, MAX_FILE_SIZE};
use leptos::prelude::*;
use web_sys::{DragEvent, HtmlInputElement};

use super::image_preview::ImagePreview;
use super::upload_state::UploadState;
use crate::components::icons::UploadCloud;
use crate::web::file::list_files;

#[component]
pub fn ImagesStep(uploads: UploadState, #[prop(into)] locked: Signal<bool>) -> impl IntoView {
    let (dragging, set_dragging) = signal(false);
    let input_ref = NodeRef::<leptos::html::Input>::new();

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        if locked.get_untracked() {
            return;
        }
        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            uploads.add_files(list_files(&files));
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            uploads.add_files(list_files(&files));
        }
        // 允许再次选择同一文件
        input.set_value("");
    };

    let open_picker = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let ids = move || uploads.entries.with(|list| list.iter().map(|e| e.id).collect::<Vec<_>>());
    let limit_hint = format!(
        "JPG / PNG / WEBP، بحد أقصى {} ميجابايت للصورة و{} صورة",
        MAX_FILE_SIZE / (1024 * 1024),
        MAX_ENTRIES
    );

    view! {
        <div class="space-y-4">
            <div
                class=move || {
                    if dragging.get() {
                        "border-2 border-dashed border-primary bg-primary/5 rounded-box p-10 text-center cursor-pointer"
                    } else {
                        "border-2 border-dashed border-base-300 rounded-box p-10 text-center cursor-pointer"
                    }
                }
                on:dragover=move |ev: DragEvent| {
                    ev.prevent_default();
                    set_dragging.set(true);
                }
                on:dragleave=move |_| set_dragging.set(false)
                on:drop=on_drop
                on:click=open_picker
            >
                <UploadCloud attr:class="h-12 w-12 mx-auto text-primary" />
                <p class="mt-2 font-semibold">"اسحب الصور هنا أو انقر للاختيار"</p>
                <p class="text-sm opacity-60">{limit_hint}</p>
                <input
                    node_ref=input_ref
                    type="file"
                    accept="image/jpeg,image/png,image/webp"
                    multiple
                    class="hidden"
                    disabled=move || locked.get()
                    on:change=on_change
                />
            </div>

            <Show when=move || uploads.rejected.with(|r| !r.is_empty())>
                <div role="alert" class="alert alert-warning text-sm">
                    <ul>
                        {move || uploads
                            .rejected
                            .get()
                            .into_iter()
                            .map(|msg| view! { <li>{msg}</li> })
                            .collect_view()}
                    </ul>
                </div>
            </Show>

            <div class="flex items-center justify-between">
                <span class="font-semibold">{move || format!("الصور المضافة: {}", uploads.count())}</span>
            </div>

            <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4">
                <For
                    each=ids
                    key=|id| *id
                    children=move |id| view! { <ImagePreview id=id uploads=uploads locked=locked /> }
                />
            </div>
        </div>
    }
}
