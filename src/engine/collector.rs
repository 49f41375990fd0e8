// ==========================================
// 广告预算智能分配引擎 - 绩效窗口采集器
// ==========================================
// 职责: 拉取每个活动的 7/14/30 天重叠历史聚合
// 输入: 分组ID + 截止日期
// 输出: CampaignPerformanceSnapshot 列表 + 分组基准
// 红线: 无副作用; 空分组返回空列表 (调用方按 no-op 处理, 不是错误)
// ==========================================

use crate::domain::snapshot::{CampaignPerformanceSnapshot, GroupBaseline};
use crate::repository::error::RepositoryResult;
use crate::repository::{CampaignRepository, PerformanceRepository};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// PerformanceWindowCollector - 绩效窗口采集器
// ==========================================
pub struct PerformanceWindowCollector {
    campaign_repo: Arc<CampaignRepository>,
    performance_repo: Arc<PerformanceRepository>,
}

impl PerformanceWindowCollector {
    /// 构造函数
    pub fn new(
        campaign_repo: Arc<CampaignRepository>,
        performance_repo: Arc<PerformanceRepository>,
    ) -> Self {
        Self {
            campaign_repo,
            performance_repo,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 采集分组内全部活动的多窗口绩效快照
    ///
    /// 三个窗口均以 as_of 为结束日: 7/14/30 天。
    /// 缺失的日行在聚合中按 0 计入。
    ///
    /// # 参数
    /// - `group_id`: 绩效分组ID
    /// - `as_of`: 窗口截止日期 (含)
    ///
    /// # 返回
    /// - Ok(Vec<...>): 分组为空时返回空列表
    /// - Err: 存储读取失败 (对本次运行是致命的, 不产出部分建议)
    pub fn collect(
        &self,
        group_id: &str,
        as_of: NaiveDate,
    ) -> RepositoryResult<Vec<CampaignPerformanceSnapshot>> {
        let campaigns = self.campaign_repo.get_campaigns_in_group(group_id)?;

        if campaigns.is_empty() {
            info!(group_id = %group_id, "分组内无活动, 返回空快照列表");
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::with_capacity(campaigns.len());
        for campaign in campaigns {
            let last_7d =
                self.performance_repo
                    .get_window_totals(&campaign.campaign_id, as_of, 7)?;
            let last_14d =
                self.performance_repo
                    .get_window_totals(&campaign.campaign_id, as_of, 14)?;
            let last_30d =
                self.performance_repo
                    .get_window_totals(&campaign.campaign_id, as_of, 30)?;

            debug!(
                campaign_id = %campaign.campaign_id,
                spend_30d = last_30d.spend,
                roas_30d = last_30d.roas(),
                "活动快照采集完成"
            );

            snapshots.push(CampaignPerformanceSnapshot {
                campaign_id: campaign.campaign_id,
                campaign_name: campaign.campaign_name,
                current_budget: campaign.daily_budget,
                last_7d,
                last_14d,
                last_30d,
            });
        }

        info!(
            group_id = %group_id,
            as_of = %as_of,
            snapshot_count = snapshots.len(),
            "绩效窗口采集完成"
        );
        Ok(snapshots)
    }

    /// 从快照集合构建分组基准
    ///
    /// 单活动分组的基准等于其自身 (比值型子分数恒为 1.0)。
    pub fn build_baseline(&self, snapshots: &[CampaignPerformanceSnapshot]) -> GroupBaseline {
        GroupBaseline::from_snapshots(snapshots)
    }
}
