//! 图片上传协调器
//!
//! 每张图片是一个独立的状态机：
//!
//! ```text
//! Staged -> Analyzing -> Analyzed -> Committing -> Committed
//!               |                        |
//!               +-------> Failed <-------+
//! ```
//!
//! 分析阶段在选中文件后立即进行，此时还没有检测记录；
//! 提交阶段在记录创建后把每张尚未提交的图片关联到该记录。
//! 条目集合每次都整体替换，观察者拿到的是一致的快照。

use std::cell::RefCell;
use std::fmt;

use fahsna_shared::{AnalysisPayload, ImageCategory, RecordId};
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{AiApi, BackendApi};
use crate::error::AppError;
use crate::request::{FileBlob, HttpClient};

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
pub const MAX_ENTRIES: usize = 50;
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

pub const COMMIT_FAILED_MESSAGE: &str = "فشل في رفع الصورة";

fn analysis_failed_message(reason: &str) -> String {
    format!("فشل في تحليل الصورة: {}", reason)
}

// =========================================================
// 条目模型
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Staged,
    Analyzing,
    Analyzed,
    Committing,
    Committed,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub id: EntryId,
    pub file: FileBlob,
    /// 预览地址（浏览器中为 object URL），由前端创建与释放
    pub preview: Option<String>,
    pub category: ImageCategory,
    pub description: String,
    /// 0..=100，只增不减
    pub progress: u8,
    pub state: EntryState,
    pub error: Option<String>,
    pub analysis: Option<AnalysisPayload>,
}

impl ImageEntry {
    fn new(file: FileBlob) -> Self {
        Self {
            id: EntryId::new(),
            file,
            preview: None,
            category: ImageCategory::default(),
            description: String::new(),
            progress: 0,
            state: EntryState::Staged,
            error: None,
            analysis: None,
        }
    }

    /// 已成功送达任一服务端
    pub fn uploaded(&self) -> bool {
        matches!(
            self.state,
            EntryState::Analyzed | EntryState::Committing | EntryState::Committed
        )
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, EntryState::Analyzing | EntryState::Committing)
    }

    fn advance(&mut self, progress: u8) {
        self.progress = self.progress.max(progress.min(100));
    }
}

// =========================================================
// 文件接收规则
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedType,
    TooLarge,
    TooMany,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::UnsupportedType => "نوع الملف غير مدعوم",
            RejectReason::TooLarge => "حجم الملف يتجاوز 10 ميغابايت",
            RejectReason::TooMany => "تم تجاوز الحد الأقصى لعدد الصور",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub name: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    pub accepted: Vec<EntryId>,
    pub rejected: Vec<Rejected>,
}

fn is_accepted_type(file: &FileBlob) -> bool {
    if ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return true;
    }
    file.name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

fn check(file: &FileBlob, current: usize) -> Result<(), RejectReason> {
    if !is_accepted_type(file) {
        return Err(RejectReason::UnsupportedType);
    }
    if file.size() > MAX_FILE_SIZE {
        return Err(RejectReason::TooLarge);
    }
    if current >= MAX_ENTRIES {
        return Err(RejectReason::TooMany);
    }
    Ok(())
}

// =========================================================
// 协调器
// =========================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub committed: usize,
    pub failed: usize,
}

type Observer = Box<dyn Fn(&[ImageEntry])>;

pub struct UploadCoordinator<C> {
    ai: AiApi<C>,
    backend: BackendApi<C>,
    entries: RefCell<Vec<ImageEntry>>,
    observers: RefCell<Vec<Observer>>,
}

impl<C: HttpClient> UploadCoordinator<C> {
    pub fn new(ai: AiApi<C>, backend: BackendApi<C>) -> Self {
        Self {
            ai,
            backend,
            entries: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&[ImageEntry]) + 'static) {
        self.observers.borrow_mut().push(Box::new(observer));
    }

    pub fn entries(&self) -> Vec<ImageEntry> {
        self.entries.borrow().clone()
    }

    pub fn entry(&self, id: EntryId) -> Option<ImageEntry> {
        self.entries.borrow().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn publish(&self, next: Vec<ImageEntry>) {
        *self.entries.borrow_mut() = next.clone();
        for observer in self.observers.borrow().iter() {
            observer(&next);
        }
    }

    /// 以整体替换的方式修改单个条目；条目已被移除时返回 false
    fn update(&self, id: EntryId, f: impl FnOnce(&mut ImageEntry)) -> bool {
        let mut next = self.entries();
        let Some(entry) = next.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        f(entry);
        self.publish(next);
        true
    }

    // --- 条目管理 ---

    /// 接收一批文件，不符合规则的文件不会进入集合
    pub fn stage(&self, files: Vec<FileBlob>) -> StageReport {
        let mut next = self.entries();
        let mut report = StageReport::default();

        for file in files {
            match check(&file, next.len()) {
                Ok(()) => {
                    let entry = ImageEntry::new(file);
                    report.accepted.push(entry.id);
                    next.push(entry);
                }
                Err(reason) => {
                    debug!(file = %file.name, ?reason, "file rejected");
                    report.rejected.push(Rejected {
                        name: file.name,
                        reason,
                    });
                }
            }
        }

        if !report.accepted.is_empty() {
            self.publish(next);
        }
        report
    }

    pub fn set_preview(&self, id: EntryId, preview: String) -> bool {
        self.update(id, |e| e.preview = Some(preview))
    }

    /// 分类与描述只在提交开始前可改
    pub fn set_category(&self, id: EntryId, category: ImageCategory) -> bool {
        self.update(id, |e| {
            if !matches!(e.state, EntryState::Committing | EntryState::Committed) {
                e.category = category;
            }
        })
    }

    pub fn set_description(&self, id: EntryId, description: &str) -> bool {
        self.update(id, |e| {
            if !matches!(e.state, EntryState::Committing | EntryState::Committed) {
                e.description = description.to_string();
            }
        })
    }

    /// 移除恰好该 id 的条目，返回它以便调用方释放预览
    pub fn remove(&self, id: EntryId) -> Option<ImageEntry> {
        let mut next = self.entries();
        let pos = next.iter().position(|e| e.id == id)?;
        let removed = next.remove(pos);
        self.publish(next);
        Some(removed)
    }

    /// 清空集合（提交成功后丢弃草稿）
    pub fn clear(&self) -> Vec<ImageEntry> {
        let removed = self.entries();
        self.publish(Vec::new());
        removed
    }

    // --- 分析阶段 ---

    /// 分析单张图片：先探测服务可用性，再上传
    ///
    /// 返回是否得到分析结果。分析期间若条目已进入提交流程，
    /// 迟到的结果只补充分析数据，不回退状态。
    pub async fn analyze(&self, id: EntryId) -> bool {
        let mut file = None;
        self.update(id, |e| {
            if matches!(e.state, EntryState::Staged | EntryState::Failed) && e.analysis.is_none() {
                e.state = EntryState::Analyzing;
                e.error = None;
                e.advance(10);
                file = Some(e.file.clone());
            }
        });
        let Some(file) = file else {
            return false;
        };

        debug!(entry = %id, file = %file.name, "analysis started");
        let result = match self.ai.health().await {
            Ok(()) => self.ai.analyze(file).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(payload) => {
                info!(entry = %id, issues = payload.detected_issues.len(), "analysis finished");
                self.update(id, |e| {
                    if e.state == EntryState::Analyzing {
                        e.state = EntryState::Analyzed;
                        e.advance(100);
                    }
                    if e.analysis.is_none() {
                        e.analysis = Some(payload);
                    }
                });
                true
            }
            Err(err) => {
                warn!(entry = %id, error = %err, "analysis failed");
                let message = analysis_failed_message(&failure_reason(&err));
                self.update(id, |e| {
                    if e.state == EntryState::Analyzing {
                        e.state = EntryState::Failed;
                        e.error = Some(message);
                    }
                });
                false
            }
        }
    }

    /// 并发分析多张图片，彼此独立，一张失败不影响其他
    pub async fn analyze_all(&self, ids: &[EntryId]) -> usize {
        let results = join_all(ids.iter().map(|id| self.analyze(*id))).await;
        results.into_iter().filter(|ok| *ok).count()
    }

    // --- 提交阶段 ---

    /// 把所有尚未提交的图片关联到记录
    ///
    /// 所有请求并发发出，等待全部结束。单张失败只记录在该条目上。
    pub async fn commit_all(&self, record_id: &RecordId, token: Option<&str>) -> CommitReport {
        let mut pending = Vec::new();
        let mut next = self.entries();
        for entry in next.iter_mut() {
            if matches!(entry.state, EntryState::Committing | EntryState::Committed) {
                continue;
            }
            entry.state = EntryState::Committing;
            entry.error = None;
            entry.advance(10);
            pending.push((entry.id, entry.file.clone(), entry.category, entry.description.clone()));
        }
        if pending.is_empty() {
            return CommitReport::default();
        }
        self.publish(next);
        info!(record = %record_id, images = pending.len(), "committing images");

        let uploads = pending.into_iter().map(|(id, file, category, description)| async move {
            let result = self
                .backend
                .upload_image(record_id, file, category.as_str(), &description, token)
                .await;
            match result {
                Ok(resp) => {
                    self.update(id, |e| {
                        e.state = EntryState::Committed;
                        e.advance(100);
                        if let Some(analysis) = resp.ai_analysis_result {
                            e.analysis = Some(analysis);
                        }
                    });
                    true
                }
                Err(err) => {
                    warn!(entry = %id, error = %err, "image commit failed");
                    self.update(id, |e| {
                        e.state = EntryState::Failed;
                        e.error = Some(COMMIT_FAILED_MESSAGE.to_string());
                    });
                    false
                }
            }
        });

        let results = join_all(uploads).await;
        let committed = results.iter().filter(|ok| **ok).count();
        CommitReport {
            committed,
            failed: results.len() - committed,
        }
    }
}

fn failure_reason(err: &AppError) -> String {
    if err
        .spans()
        .first()
        .is_some_and(|span| span.operation == "ai.health")
    {
        "خدمة التحليل غير متاحة".to_string()
    } else {
        err.user_message()
    }
}

// =========================================================
// 测试模块
// =========================================================
