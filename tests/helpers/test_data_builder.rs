// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use ad_budget_allocator::domain::snapshot::{CampaignPerformanceSnapshot, WindowAggregate};

// ==========================================
// CampaignPerformanceSnapshot 构建器
// ==========================================

pub struct SnapshotBuilder {
    campaign_id: String,
    campaign_name: String,
    current_budget: f64,
    last_7d: WindowAggregate,
    last_14d: WindowAggregate,
    last_30d: WindowAggregate,
}

impl SnapshotBuilder {
    pub fn new(campaign_id: &str) -> Self {
        Self {
            campaign_id: campaign_id.to_string(),
            campaign_name: format!("活动 {}", campaign_id),
            current_budget: 100.0,
            last_7d: WindowAggregate::empty(7),
            last_14d: WindowAggregate::empty(14),
            last_30d: WindowAggregate::empty(30),
        }
    }

    pub fn budget(mut self, current_budget: f64) -> Self {
        self.current_budget = current_budget;
        self
    }

    pub fn window_7d(
        mut self,
        spend: f64,
        sales: f64,
        conversions: i64,
        clicks: i64,
        impressions: i64,
    ) -> Self {
        self.last_7d = WindowAggregate {
            days: 7,
            impressions,
            clicks,
            spend,
            sales,
            conversions,
        };
        self
    }

    pub fn window_14d(
        mut self,
        spend: f64,
        sales: f64,
        conversions: i64,
        clicks: i64,
        impressions: i64,
    ) -> Self {
        self.last_14d = WindowAggregate {
            days: 14,
            impressions,
            clicks,
            spend,
            sales,
            conversions,
        };
        self
    }

    pub fn window_30d(
        mut self,
        spend: f64,
        sales: f64,
        conversions: i64,
        clicks: i64,
        impressions: i64,
    ) -> Self {
        self.last_30d = WindowAggregate {
            days: 30,
            impressions,
            clicks,
            spend,
            sales,
            conversions,
        };
        self
    }

    /// 按日均指标填满三个窗口 (完全均匀, 比值型指标全为 1)
    pub fn steady_daily(
        mut self,
        daily_spend: f64,
        daily_sales: f64,
        daily_conversions: i64,
        daily_clicks: i64,
        daily_impressions: i64,
    ) -> Self {
        for (window, days) in [
            (&mut self.last_7d, 7i64),
            (&mut self.last_14d, 14),
            (&mut self.last_30d, 30),
        ] {
            *window = WindowAggregate {
                days,
                impressions: daily_impressions * days,
                clicks: daily_clicks * days,
                spend: daily_spend * days as f64,
                sales: daily_sales * days as f64,
                conversions: daily_conversions * days,
            };
        }
        self
    }

    pub fn build(self) -> CampaignPerformanceSnapshot {
        CampaignPerformanceSnapshot {
            campaign_id: self.campaign_id,
            campaign_name: self.campaign_name,
            current_budget: self.current_budget,
            last_7d: self.last_7d,
            last_14d: self.last_14d,
            last_30d: self.last_30d,
        }
    }
}
