//! 面板数据
//!
//! 每个面板自行拉取快照，彼此之间没有缓存。

use fahsna_shared::{InspectionRecord, InspectionStatus, ListResponse, Role};
use tracing::debug;

use crate::api::BackendApi;
use crate::error::AppResult;
use crate::request::HttpClient;

/// 面板上显示的最近记录条数
pub const RECENT_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    /// 服务端报告的总数
    pub total: u64,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub revenue: f64,
    /// 参与统计的记录数
    sampled: usize,
}

impl DashboardStats {
    /// 由一页记录推导统计；`total` 取服务端的计数
    pub fn from_list(list: &ListResponse<InspectionRecord>) -> Self {
        let mut stats = Self {
            total: list.total(),
            sampled: list.items().len(),
            ..Self::default()
        };
        for record in list.items() {
            match record.status {
                InspectionStatus::Pending | InspectionStatus::Confirmed => stats.pending += 1,
                InspectionStatus::InProgress => stats.in_progress += 1,
                InspectionStatus::Completed => {
                    stats.completed += 1;
                    stats.revenue += record.total_cost.unwrap_or_default();
                }
                _ => {}
            }
        }
        stats
    }

    /// 已完成占比（百分比，取整）
    pub fn completion_ratio(&self) -> u8 {
        if self.sampled == 0 {
            return 0;
        }
        ((self.completed * 100) as f64 / self.sampled as f64).round() as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub recent: Vec<InspectionRecord>,
}

pub fn dashboard_title(role: Role) -> &'static str {
    match role {
        Role::Engineer => "لوحة تحكم المهندس",
        Role::Client => "لوحة تحكم العميل",
        Role::Partner => "لوحة تحكم الشريك",
        Role::Admin => "لوحة تحكم المدير",
        Role::Unknown => "لوحة التحكم",
    }
}

pub async fn load_dashboard<C: HttpClient>(
    api: &BackendApi<C>,
    token: Option<&str>,
    limit: u32,
) -> AppResult<DashboardSnapshot> {
    let list = api
        .inspection_requests(Some(limit), token)
        .await
        .map_err(|e| e.in_op("dashboard.load"))?;
    let stats = DashboardStats::from_list(&list);
    debug!(total = stats.total, recent = list.items().len(), "dashboard snapshot loaded");
    Ok(DashboardSnapshot {
        stats,
        recent: list.into_items(),
    })
}

pub async fn load_inspections<C: HttpClient>(
    api: &BackendApi<C>,
    token: Option<&str>,
) -> AppResult<Vec<InspectionRecord>> {
    api.inspection_requests(None, token)
        .await
        .map(ListResponse::into_items)
        .map_err(|e| e.in_op("inspections.load"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::mock::MockHttpClient;
    use crate::request::HttpMethod;
    use serde_json::json;
    use std::rc::Rc;

    const API: &str = "http://api.test";

    fn record(id: u64, status: &str, cost: f64) -> serde_json::Value {
        json!({
            "id": id,
            "property_address": "جدة",
            "property_type": "commercial",
            "status": status,
            "total_cost": cost
        })
    }

    #[tokio::test]
    async fn test_load_dashboard_uses_limit_and_derives_stats() {
        let client = Rc::new(MockHttpClient::new());
        let api = BackendApi::new(client.clone(), API);
        client.mock_response(
            HttpMethod::Get,
            &format!("{API}/api/v1/inspections/requests/?limit=5"),
            200,
            json!({
                "count": 12,
                "results": [
                    record(1, "pending", 300.0),
                    record(2, "completed", 500.0),
                    record(3, "completed", 750.0),
                    record(4, "in_progress", 200.0),
                ]
            }),
        );

        let snapshot = load_dashboard(&api, Some("tok"), RECENT_LIMIT).await.unwrap();
        assert_eq!(snapshot.recent.len(), 4);
        assert_eq!(snapshot.stats.total, 12);
        assert_eq!(snapshot.stats.pending, 1);
        assert_eq!(snapshot.stats.completed, 2);
        assert_eq!(snapshot.stats.in_progress, 1);
        assert_eq!(snapshot.stats.revenue, 1250.0);
        assert_eq!(snapshot.stats.completion_ratio(), 50);
    }

    #[tokio::test]
    async fn test_load_inspections_accepts_bare_array() {
        let client = Rc::new(MockHttpClient::new());
        let api = BackendApi::new(client.clone(), API);
        client.mock_response(
            HttpMethod::Get,
            &format!("{API}/api/v1/inspections/requests/"),
            200,
            json!([record(1, "archived", 0.0)]),
        );

        let records = load_inspections(&api, None).await.unwrap();
        assert_eq!(records[0].status, InspectionStatus::Other("archived".into()));
    }

    #[tokio::test]
    async fn test_failure_carries_operation() {
        let client = Rc::new(MockHttpClient::new());
        let api = BackendApi::new(client.clone(), API);

        let err = load_dashboard(&api, None, 5).await.unwrap_err();
        assert_eq!(err.http_status(), Some(404));
        assert_eq!(err.spans().last().unwrap().operation, "dashboard.load");
    }

    #[test]
    fn test_empty_stats() {
        let stats = DashboardStats::from_list(&ListResponse::Plain(Vec::new()));
        assert_eq!(stats.completion_ratio(), 0);
        assert_eq!(dashboard_title(Role::Partner), "لوحة تحكم الشريك");
    }
}
