//! 新建检测请求的多步表单
//!
//! 三个步骤：客户与房产信息 → 图片 → 确认提交。
//! 步骤只能前后移动一步；离开第一步需要必填项齐全，提交还需要至少一张图片。

use chrono::NaiveDateTime;
use fahsna_shared::date::to_datetime_local;
use fahsna_shared::protocol::CreateInspectionRequest;
use fahsna_shared::{Priority, PropertyType, RecordId};
use tracing::{info, warn};

use crate::api::BackendApi;
use crate::error::{AppError, AppResult};
use crate::request::HttpClient;
use crate::upload::{CommitReport, UploadCoordinator};

pub const DEFAULT_DESCRIPTION: &str = "فحص العقار";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Details,
    Images,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [WizardStep::Details, WizardStep::Images, WizardStep::Review];

    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Details => 1,
            WizardStep::Images => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Details => "معلومات العميل والعقار",
            WizardStep::Images => "صور العقار",
            WizardStep::Review => "مراجعة وإرسال",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            WizardStep::Details => Some(WizardStep::Images),
            WizardStep::Images => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn prev(&self) -> Option<Self> {
        match self {
            WizardStep::Details => None,
            WizardStep::Images => Some(WizardStep::Details),
            WizardStep::Review => Some(WizardStep::Images),
        }
    }
}

/// 检测请求草稿
#[derive(Debug, Clone, PartialEq)]
pub struct InspectionDraft {
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub property_address: String,
    pub property_type: Option<PropertyType>,
    pub inspection_type: Option<u64>,
    /// `datetime-local` 格式
    pub scheduled_date: String,
    pub description: String,
    pub priority: Priority,
    pub client_notes: String,
    pub building_year: String,
    pub building_area: String,
}

impl InspectionDraft {
    /// 预约时间默认为当前分钟
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            client_name: String::new(),
            client_phone: String::new(),
            client_email: String::new(),
            property_address: String::new(),
            property_type: Some(PropertyType::default()),
            inspection_type: None,
            scheduled_date: to_datetime_local(now),
            description: String::new(),
            priority: Priority::default(),
            client_notes: String::new(),
            building_year: String::new(),
            building_area: String::new(),
        }
    }

    pub fn is_step_one_complete(&self) -> bool {
        !self.client_name.trim().is_empty()
            && !self.property_address.trim().is_empty()
            && self.property_type.is_some()
            && self.inspection_type.is_some()
    }

    /// 转换为创建请求
    ///
    /// 只发送后端需要的字段，客户联系方式与建筑信息留在本地。
    pub fn to_payload(&self) -> AppResult<CreateInspectionRequest> {
        let (Some(inspection_type), Some(property_type)) = (self.inspection_type, self.property_type)
        else {
            return Err(AppError::validation("يرجى اختيار نوع الفحص ونوع العقار"));
        };
        let description = match self.description.trim() {
            "" => DEFAULT_DESCRIPTION.to_string(),
            d => d.to_string(),
        };
        Ok(CreateInspectionRequest {
            inspection_type,
            property_address: self.property_address.trim().to_string(),
            property_type: property_type.as_str().to_string(),
            description,
            scheduled_date: self.scheduled_date.clone(),
            priority: self.priority.as_str().to_string(),
            client_notes: self.client_notes.clone(),
        })
    }
}

/// 步骤导航状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InspectionWizard {
    pub step: WizardStep,
    pub submitting: bool,
}

impl InspectionWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_advance(&self, draft: &InspectionDraft) -> bool {
        if self.submitting {
            return false;
        }
        match self.step {
            WizardStep::Details => draft.is_step_one_complete(),
            WizardStep::Images => true,
            WizardStep::Review => false,
        }
    }

    pub fn can_go_back(&self) -> bool {
        !self.submitting && self.step.prev().is_some()
    }

    pub fn can_submit(&self, draft: &InspectionDraft, image_count: usize) -> bool {
        !self.submitting && can_submit(draft, image_count)
    }

    /// 前进一步，不满足条件时不动
    pub fn next(&mut self, draft: &InspectionDraft) -> bool {
        if !self.can_advance(draft) {
            return false;
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub fn prev(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        match self.step.prev() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }
}

pub fn can_submit(draft: &InspectionDraft, image_count: usize) -> bool {
    draft.is_step_one_complete() && image_count > 0
}

// =========================================================
// 提交
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub record_id: RecordId,
    pub images: CommitReport,
}

/// 提交失败时展示给用户的文本
pub fn submit_error_message(err: &AppError) -> String {
    format!("حدث خطأ في إرسال طلب الفحص: {}", err.user_message())
}

/// 创建检测记录并把所有图片关联上去
///
/// 记录创建必须先成功，之后才发出图片请求；图片失败不影响整体结果。
/// 进度依次为 10、40、100。
pub async fn submit_inspection<C: HttpClient>(
    backend: &BackendApi<C>,
    uploads: &UploadCoordinator<C>,
    draft: &InspectionDraft,
    token: Option<&str>,
    progress: impl Fn(u8),
) -> AppResult<SubmitOutcome> {
    if !can_submit(draft, uploads.len()) {
        return Err(AppError::validation("يرجى إكمال البيانات وإضافة صورة واحدة على الأقل")
            .in_op("wizard.submit"));
    }
    let payload = draft.to_payload()?;

    progress(10);
    let created = backend
        .create_inspection(&payload, token)
        .await
        .map_err(|e| e.in_op("wizard.submit"))?;
    info!(record = %created.id, "inspection request created");
    progress(40);

    let images = uploads.commit_all(&created.id, token).await;
    if images.failed > 0 {
        warn!(record = %created.id, failed = images.failed, "some images were not attached");
    }
    progress(100);

    Ok(SubmitOutcome {
        record_id: created.id,
        images,
    })
}
