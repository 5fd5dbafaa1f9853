//! 图片上传状态
//!
//! 持有 `UploadCoordinator` 与本页的 `RequestScope`，条目集合镜像到信号。
//! 预览地址在移除条目或离开页面时释放。

use std::rc::Rc;

use fahsna::{AppResult, EntryId, ImageEntry, RequestScope, UploadCoordinator};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::File;

use crate::web::FetchHttpClient;
use crate::web::file::{create_preview, read_file, revoke_preview};

pub type Uploads = UploadCoordinator<FetchHttpClient>;

#[derive(Clone, Copy)]
pub struct UploadState {
    coordinator: StoredValue<Rc<Uploads>, LocalStorage>,
    scope: StoredValue<RequestScope, LocalStorage>,
    /// 条目快照
    pub entries: RwSignal<Vec<ImageEntry>>,
    /// 最近一次选择中被拒绝的文件说明
    pub rejected: RwSignal<Vec<String>>,
}

impl UploadState {
    pub fn new(coordinator: Uploads) -> Self {
        let entries = RwSignal::new(Vec::new());
        coordinator.subscribe(move |list| {
            entries.try_set(list.to_vec());
        });

        Self {
            coordinator: StoredValue::new_local(Rc::new(coordinator)),
            scope: StoredValue::new_local(RequestScope::new()),
            entries,
            rejected: RwSignal::new(Vec::new()),
        }
    }

    pub fn coordinator(&self) -> Option<Rc<Uploads>> {
        self.coordinator.try_get_value()
    }

    pub fn count(&self) -> usize {
        self.entries.with(Vec::len)
    }

    /// 经本页作用域运行，离开页面时中止
    pub fn run<F>(&self, fut: F) -> Option<impl Future<Output = AppResult<F::Output>> + use<F>>
    where
        F: Future,
    {
        self.scope.try_with_value(|s| s.wrap(fut))
    }

    /// 读取、校验并暂存文件，随后立即并发分析被接受的文件
    pub fn add_files(&self, files: Vec<File>) {
        if files.is_empty() {
            return;
        }
        let Some(coordinator) = self.coordinator() else {
            return;
        };
        let state = *self;

        spawn_local(async move {
            let mut blobs = Vec::with_capacity(files.len());
            let mut unreadable = Vec::new();
            for file in &files {
                match read_file(file).await {
                    Ok(blob) => blobs.push(blob),
                    Err(e) => {
                        tracing::warn!(file = %file.name(), error = %e, "failed to read file");
                        unreadable.push(format!("{}: تعذر قراءة الملف", file.name()));
                    }
                }
            }

            let report = coordinator.stage(blobs);
            let mut messages = unreadable;
            messages.extend(
                report
                    .rejected
                    .iter()
                    .map(|r| format!("{}: {}", r.name, r.reason.message())),
            );
            state.rejected.try_set(messages);

            for id in &report.accepted {
                let preview = coordinator.entry(*id).and_then(|e| create_preview(&e.file));
                if let Some(url) = preview {
                    coordinator.set_preview(*id, url);
                }
            }

            let ids = report.accepted;
            let analysis = {
                let coordinator = coordinator.clone();
                async move { coordinator.analyze_all(&ids).await }
            };
            if let Some(task) = state.run(analysis) {
                if let Ok(analyzed) = task.await {
                    tracing::debug!(analyzed, "batch analysis settled");
                }
            }
        });
    }

    /// 重新分析一张失败的图片
    pub fn retry(&self, id: EntryId) {
        let Some(coordinator) = self.coordinator() else {
            return;
        };
        let Some(task) = self.run(async move { coordinator.analyze(id).await }) else {
            return;
        };
        spawn_local(async move {
            let _ = task.await;
        });
    }

    pub fn remove(&self, id: EntryId) {
        let removed = self.coordinator().and_then(|c| c.remove(id));
        if let Some(url) = removed.and_then(|e| e.preview) {
            revoke_preview(&url);
        }
    }

    /// 丢弃所有条目并释放预览
    pub fn release(&self) {
        let Some(coordinator) = self.coordinator() else {
            return;
        };
        for url in coordinator.clear().into_iter().filter_map(|e| e.preview) {
            revoke_preview(&url);
        }
    }

    /// 页面卸载：中止在途请求并释放资源
    pub fn dispose(&self) {
        self.scope.try_with_value(RequestScope::cancel);
        self.release();
    }
}

