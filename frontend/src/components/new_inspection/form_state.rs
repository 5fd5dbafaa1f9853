//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到草稿对象的转换

use chrono::NaiveDateTime;
use fahsna::InspectionDraft;
use fahsna_shared::{Priority, PropertyType};
use leptos::prelude::*;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    // 客户信息
    pub client_name: RwSignal<String>,
    pub client_phone: RwSignal<String>,
    pub client_email: RwSignal<String>,

    // 物业信息
    pub property_address: RwSignal<String>,
    pub property_type: RwSignal<Option<PropertyType>>,
    pub building_year: RwSignal<String>,
    pub building_area: RwSignal<String>,

    // 检测安排
    pub inspection_type: RwSignal<Option<u64>>,
    pub scheduled_date: RwSignal<String>,
    pub priority: RwSignal<Priority>,
    pub description: RwSignal<String>,
    pub client_notes: RwSignal<String>,
}

impl FormState {
    pub fn new(now: NaiveDateTime) -> Self {
        let draft = InspectionDraft::new(now);
        Self {
            client_name: RwSignal::new(draft.client_name),
            client_phone: RwSignal::new(draft.client_phone),
            client_email: RwSignal::new(draft.client_email),
            property_address: RwSignal::new(draft.property_address),
            property_type: RwSignal::new(draft.property_type),
            building_year: RwSignal::new(draft.building_year),
            building_area: RwSignal::new(draft.building_area),
            inspection_type: RwSignal::new(draft.inspection_type),
            scheduled_date: RwSignal::new(draft.scheduled_date),
            priority: RwSignal::new(draft.priority),
            description: RwSignal::new(draft.description),
            client_notes: RwSignal::new(draft.client_notes),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self, now: NaiveDateTime) {
        let draft = InspectionDraft::new(now);
        self.client_name.set(draft.client_name);
        self.client_phone.set(draft.client_phone);
        self.client_email.set(draft.client_email);
        self.property_address.set(draft.property_address);
        self.property_type.set(draft.property_type);
        self.building_year.set(draft.building_year);
        self.building_area.set(draft.building_area);
        self.inspection_type.set(draft.inspection_type);
        self.scheduled_date.set(draft.scheduled_date);
        self.priority.set(draft.priority);
        self.description.set(draft.description);
        self.client_notes.set(draft.client_notes);
    }

    /// 当前草稿（追踪所有字段）
    pub fn to_draft(&self) -> InspectionDraft {
        InspectionDraft {
            client_name: self.client_name.get(),
            client_phone: self.client_phone.get(),
            client_email: self.client_email.get(),
            property_address: self.property_address.get(),
            property_type: self.property_type.get(),
            inspection_type: self.inspection_type.get(),
            scheduled_date: self.scheduled_date.get(),
            description: self.description.get(),
            priority: self.priority.get(),
            client_notes: self.client_notes.get(),
            building_year: self.building_year.get(),
            building_area: self.building_area.get(),
        }
    }

    pub fn to_draft_untracked(&self) -> InspectionDraft {
        untrack(|| self.to_draft())
    }
}
