// ==========================================
// 广告预算智能分配引擎 - 预算变更日志
// ==========================================
// 职责: 应用建议时的审计/回滚痕迹
// 红线: 每次预算写入必须同时落一条变更日志
// ==========================================

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 预算变更历史记录 (budget_change_log 表)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetChangeLog {
    pub log_id: String,
    pub campaign_id: String,
    pub budget_before: f64,
    pub budget_after: f64,
    /// 变更时点的指标快照 (效果追踪用)
    pub metrics_snapshot_json: Option<serde_json::Value>,
    pub reason: String,
    pub actor: String,
    pub changed_at: NaiveDateTime,
}

impl BudgetChangeLog {
    /// 构造一条新的变更记录
    pub fn new(
        campaign_id: &str,
        budget_before: f64,
        budget_after: f64,
        metrics_snapshot_json: Option<serde_json::Value>,
        reason: &str,
        actor: &str,
    ) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            campaign_id: campaign_id.to_string(),
            budget_before,
            budget_after,
            metrics_snapshot_json,
            reason: reason.to_string(),
            actor: actor.to_string(),
            changed_at: Utc::now().naive_utc(),
        }
    }
}
