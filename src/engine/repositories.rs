// ==========================================
// 广告预算智能分配引擎 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合分配引擎所需的所有 Repository
// 目标: 减少编排器/应用引擎的构造函数参数数量
// ==========================================

use std::sync::{Arc, Mutex};

use crate::repository::{
    CampaignRepository, HistoryRepository, PerformanceRepository, SuggestionRepository,
};
use rusqlite::Connection;

/// 分配引擎仓储集合
///
/// 聚合分配流程所需的所有 Repository，简化依赖注入。
///
/// # 包含的仓储
/// - `campaign_repo`: 活动主数据与预算读写
/// - `performance_repo`: 日绩效窗口聚合 (只读)
/// - `suggestion_repo`: 建议持久化与状态流转
/// - `history_repo`: 预算变更审计日志
#[derive(Clone)]
pub struct AllocationRepositories {
    /// 活动仓储
    pub campaign_repo: Arc<CampaignRepository>,
    /// 绩效仓储
    pub performance_repo: Arc<PerformanceRepository>,
    /// 建议仓储
    pub suggestion_repo: Arc<SuggestionRepository>,
    /// 变更日志仓储
    pub history_repo: Arc<HistoryRepository>,
}

impl AllocationRepositories {
    /// 创建新的仓储集合
    pub fn new(
        campaign_repo: Arc<CampaignRepository>,
        performance_repo: Arc<PerformanceRepository>,
        suggestion_repo: Arc<SuggestionRepository>,
        history_repo: Arc<HistoryRepository>,
    ) -> Self {
        Self {
            campaign_repo,
            performance_repo,
            suggestion_repo,
            history_repo,
        }
    }

    /// 在同一条共享连接上构建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            campaign_repo: Arc::new(CampaignRepository::new(conn.clone())),
            performance_repo: Arc::new(PerformanceRepository::new(conn.clone())),
            suggestion_repo: Arc::new(SuggestionRepository::new(conn.clone())),
            history_repo: Arc::new(HistoryRepository::new(conn)),
        }
    }
}
