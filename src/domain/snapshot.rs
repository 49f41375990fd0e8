// ==========================================
// 广告预算智能分配引擎 - 绩效快照
// ==========================================
// 职责: 多窗口 (7/14/30天) 历史绩效聚合
// 生命周期: 每次引擎运行重新构建, 只读, 运行结束丢弃
// 红线: 派生指标现算不落库, 除零一律按 0 处理
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// WindowAggregate - 单窗口聚合
// ==========================================

/// 单个时间窗口内的绩效合计
///
/// 缺失的日行按 0 计入, 不按缺席处理。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAggregate {
    /// 窗口天数 (7/14/30)
    pub days: i64,
    pub impressions: i64,
    pub clicks: i64,
    pub spend: f64,
    pub sales: f64,
    pub conversions: i64,
}

impl WindowAggregate {
    /// 空窗口 (全零)
    pub fn empty(days: i64) -> Self {
        Self {
            days,
            impressions: 0,
            clicks: 0,
            spend: 0.0,
            sales: 0.0,
            conversions: 0,
        }
    }

    /// ROAS = sales / spend (spend=0 时为 0)
    pub fn roas(&self) -> f64 {
        if self.spend > 0.0 {
            self.sales / self.spend
        } else {
            0.0
        }
    }

    /// ACoS = spend / sales * 100 (sales=0 时为 0)
    pub fn acos(&self) -> f64 {
        if self.sales > 0.0 {
            self.spend / self.sales * 100.0
        } else {
            0.0
        }
    }

    /// CTR = clicks / impressions * 100
    pub fn ctr(&self) -> f64 {
        if self.impressions > 0 {
            self.clicks as f64 / self.impressions as f64 * 100.0
        } else {
            0.0
        }
    }

    /// CVR = conversions / clicks * 100
    pub fn cvr(&self) -> f64 {
        if self.clicks > 0 {
            self.conversions as f64 / self.clicks as f64 * 100.0
        } else {
            0.0
        }
    }

    /// CPC = spend / clicks
    pub fn cpc(&self) -> f64 {
        if self.clicks > 0 {
            self.spend / self.clicks as f64
        } else {
            0.0
        }
    }

    /// 日均消耗
    pub fn daily_avg_spend(&self) -> f64 {
        if self.days > 0 {
            self.spend / self.days as f64
        } else {
            0.0
        }
    }

    /// 转化效率 = conversions / spend
    pub fn conversion_efficiency(&self) -> f64 {
        if self.spend > 0.0 {
            self.conversions as f64 / self.spend
        } else {
            0.0
        }
    }
}

// ==========================================
// CampaignPerformanceSnapshot - 活动绩效快照
// ==========================================

/// 单个广告活动的多窗口绩效快照 (每次运行一份)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignPerformanceSnapshot {
    pub campaign_id: String,
    pub campaign_name: String,
    /// 当前每日预算
    pub current_budget: f64,
    pub last_7d: WindowAggregate,
    pub last_14d: WindowAggregate,
    pub last_30d: WindowAggregate,
}

impl CampaignPerformanceSnapshot {
    /// 预算使用率 = 30天日均消耗 / 当前预算 * 100
    pub fn budget_utilization(&self) -> f64 {
        if self.current_budget > 0.0 {
            self.last_30d.daily_avg_spend() / self.current_budget * 100.0
        } else {
            0.0
        }
    }
}

// ==========================================
// GroupBaseline - 分组基准
// ==========================================

/// 绩效分组的自身基准 (每次运行重算)
///
/// 仅作为评分器的参照系。单活动分组的基准等于其自身,
/// 此时比值型子分数恒为 1.0。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupBaseline {
    pub avg_roas: f64,
    /// 平均转化效率 (conversions / spend)
    pub avg_conversion_efficiency: f64,
    pub avg_budget_utilization: f64,
}

impl GroupBaseline {
    /// 从快照集合构建基准
    ///
    /// # 返回
    /// 空集合返回全零基准 (调用方应按无数据处理)
    pub fn from_snapshots(snapshots: &[CampaignPerformanceSnapshot]) -> Self {
        if snapshots.is_empty() {
            return Self {
                avg_roas: 0.0,
                avg_conversion_efficiency: 0.0,
                avg_budget_utilization: 0.0,
            };
        }

        let n = snapshots.len() as f64;
        let avg_roas = snapshots.iter().map(|s| s.last_30d.roas()).sum::<f64>() / n;
        let avg_conversion_efficiency = snapshots
            .iter()
            .map(|s| s.last_30d.conversion_efficiency())
            .sum::<f64>()
            / n;
        let avg_budget_utilization =
            snapshots.iter().map(|s| s.budget_utilization()).sum::<f64>() / n;

        Self {
            avg_roas,
            avg_conversion_efficiency,
            avg_budget_utilization,
        }
    }
}
