// ==========================================
// 广告预算智能分配引擎 - 广告活动主数据
// ==========================================
// 来源: campaign 表 (协作方维护, 本引擎只读预算字段)
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 广告活动主数据
///
/// 预算分组 (group_id) 是调用方定义的活动集合,
/// 同组活动共享一个每日预算池。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub campaign_id: String,
    pub campaign_name: String,
    pub group_id: String,
    /// 当前每日预算 (货币单位)
    pub daily_budget: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
