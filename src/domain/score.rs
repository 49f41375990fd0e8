// ==========================================
// 广告预算智能分配引擎 - 多维评分
// ==========================================
// 五个子分数 + 一个加权综合分, 全部限定 [0,100]
// 不变量: composite = Σ(subscore × weight), 权重和为 1.0
// ==========================================

use crate::domain::types::AllocationReason;
use serde::{Deserialize, Serialize};

/// 多维评分结果 (每活动一份)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiDimensionalScore {
    /// 转化效率分: 活动转化效率相对分组基准
    pub conversion_efficiency: f64,
    /// ROAS 分: 30天 ROAS 相对分组基准
    pub roas: f64,
    /// 成长潜力分: 预算使用率与效率的组合判定
    pub growth_potential: f64,
    /// 稳定性分: 短窗口与长窗口 ROAS 的偏离程度
    pub stability: f64,
    /// 趋势分: 7天对30天 ROAS 的相对变化
    pub trend: f64,
    /// 加权综合分
    pub composite: f64,
    /// 规则触发的解释 (有序)
    pub reasons: Vec<AllocationReason>,
}

impl MultiDimensionalScore {
    /// 所有子分数与综合分是否都在 [0,100] 内
    pub fn is_bounded(&self) -> bool {
        [
            self.conversion_efficiency,
            self.roas,
            self.growth_potential,
            self.stability,
            self.trend,
            self.composite,
        ]
        .iter()
        .all(|v| (0.0..=100.0).contains(v))
    }
}
