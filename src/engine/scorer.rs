// ==========================================
// 广告预算智能分配引擎 - 多维评分引擎
// ==========================================
// 职责: 把多窗口聚合转成五个归一化子分数和一个综合分
// 参照系: 分组自身基准 (GroupBaseline)
// 红线: 纯函数, 同输入必同输出; 所有规则必须输出 reason
// 红线: 除零一律按 0 处理, 分数全部限定 [0,100]
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::score::MultiDimensionalScore;
use crate::domain::snapshot::{CampaignPerformanceSnapshot, GroupBaseline};
use crate::domain::types::{AllocationReason, ReasonCategory};

/// 解释触发阈值: 比值偏离中性超过 ±20% 才输出说明
const EXPLAIN_RATIO_THRESHOLD: f64 = 0.2;

/// 分数限定到 [0,100]
fn clamp_score(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// 安全比值: 分母 <= 0 时按 0 处理
fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

// ==========================================
// MultiDimensionalScorer - 多维评分引擎
// ==========================================
pub struct MultiDimensionalScorer {
    // 无状态引擎,不需要注入依赖
}

impl MultiDimensionalScorer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对单个活动评分
    ///
    /// # 参数
    /// - `snapshot`: 活动绩效快照
    /// - `baseline`: 分组基准
    /// - `config`: 分配配置 (提供五个权重)
    ///
    /// # 返回
    /// MultiDimensionalScore, 综合分 = Σ(子分数 × 权重)
    pub fn score(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        baseline: &GroupBaseline,
        config: &AllocationConfig,
    ) -> MultiDimensionalScore {
        let mut reasons: Vec<AllocationReason> = Vec::new();

        let conversion_efficiency =
            self.conversion_efficiency_score(snapshot, baseline, &mut reasons);
        let roas = self.roas_score(snapshot, baseline, &mut reasons);
        let growth_potential = self.growth_potential_score(snapshot, baseline, &mut reasons);
        let stability = self.stability_score(snapshot, &mut reasons);
        let trend = self.trend_score(snapshot, &mut reasons);

        let composite = clamp_score(
            conversion_efficiency * config.weight_conversion_efficiency
                + roas * config.weight_roas
                + growth_potential * config.weight_growth_potential
                + stability * config.weight_stability
                + trend * config.weight_trend,
        );

        MultiDimensionalScore {
            conversion_efficiency,
            roas,
            growth_potential,
            stability,
            trend,
            composite,
            reasons,
        }
    }

    // ==========================================
    // 子分数计算
    // ==========================================

    /// 转化效率分: 活动转化效率 / 基准转化效率 × 50
    fn conversion_efficiency_score(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        baseline: &GroupBaseline,
        reasons: &mut Vec<AllocationReason>,
    ) -> f64 {
        let ratio = safe_ratio(
            snapshot.last_30d.conversion_efficiency(),
            baseline.avg_conversion_efficiency,
        );

        if (ratio - 1.0).abs() > EXPLAIN_RATIO_THRESHOLD {
            let detail = if ratio > 1.0 {
                format!("转化效率为分组基准的 {:.0}%, 高于平均水平", ratio * 100.0)
            } else {
                format!("转化效率为分组基准的 {:.0}%, 低于平均水平", ratio * 100.0)
            };
            reasons.push(AllocationReason::new(
                ReasonCategory::ConversionEfficiency,
                detail,
            ));
        }

        clamp_score(ratio * 50.0)
    }

    /// ROAS 分: 30天 ROAS / 基准 ROAS × 50
    fn roas_score(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        baseline: &GroupBaseline,
        reasons: &mut Vec<AllocationReason>,
    ) -> f64 {
        let ratio = safe_ratio(snapshot.last_30d.roas(), baseline.avg_roas);

        if (ratio - 1.0).abs() > EXPLAIN_RATIO_THRESHOLD {
            let detail = if ratio > 1.0 {
                format!(
                    "30天 ROAS {:.2} 为分组基准的 {:.0}%",
                    snapshot.last_30d.roas(),
                    ratio * 100.0
                )
            } else {
                format!(
                    "30天 ROAS {:.2} 仅为分组基准的 {:.0}%",
                    snapshot.last_30d.roas(),
                    ratio * 100.0
                )
            };
            reasons.push(AllocationReason::new(ReasonCategory::Roas, detail));
        }

        clamp_score(ratio * 50.0)
    }

    /// 成长潜力分
    ///
    /// 判定规则 (后序规则覆盖前序):
    /// - 基准 50
    /// - 使用率>80% 且 ROAS比值>1: 近饱和且高效 ⇒ 最多 +30
    /// - 使用率<50% 且 ROAS比值<0.8: 低用量且低效 ⇒ 置 30
    /// - 使用率>90%: 预算饥饿信号 ⇒ 置 70 (不看 ROAS)
    fn growth_potential_score(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        baseline: &GroupBaseline,
        reasons: &mut Vec<AllocationReason>,
    ) -> f64 {
        let utilization = snapshot.budget_utilization();
        let roas_ratio = safe_ratio(snapshot.last_30d.roas(), baseline.avg_roas);

        let mut score = 50.0;

        if utilization > 80.0 && roas_ratio > 1.0 {
            let bonus = ((roas_ratio - 1.0) * 30.0).min(30.0);
            score = 50.0 + bonus;
            reasons.push(AllocationReason::new(
                ReasonCategory::GrowthPotential,
                format!(
                    "预算使用率 {:.0}% 且效率高于基准, 具备增量空间",
                    utilization
                ),
            ));
        }

        if utilization < 50.0 && roas_ratio < 0.8 {
            score = 30.0;
            reasons.push(AllocationReason::new(
                ReasonCategory::GrowthPotential,
                format!("预算使用率仅 {:.0}% 且效率低于基准, 无增长依据", utilization),
            ));
        }

        if utilization > 90.0 {
            score = 70.0;
            reasons.push(AllocationReason::new(
                ReasonCategory::GrowthPotential,
                format!("预算使用率 {:.0}%, 存在预算饥饿信号", utilization),
            ));
        }

        clamp_score(score)
    }

    /// 稳定性分: 100 − 50×(|ROAS7/ROAS30−1| + |ROAS14/ROAS30−1|)
    ///
    /// 短窗口与长窗口偏离越大, 稳定性越低。
    fn stability_score(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        reasons: &mut Vec<AllocationReason>,
    ) -> f64 {
        let roas_30d = snapshot.last_30d.roas();
        let ratio_7d = safe_ratio(snapshot.last_7d.roas(), roas_30d);
        let ratio_14d = safe_ratio(snapshot.last_14d.roas(), roas_30d);

        let divergence = (ratio_7d - 1.0).abs() + (ratio_14d - 1.0).abs();
        let score = clamp_score(100.0 - 50.0 * divergence);

        if divergence > 2.0 * EXPLAIN_RATIO_THRESHOLD {
            reasons.push(AllocationReason::new(
                ReasonCategory::Stability,
                format!("短窗口与30天 ROAS 偏离 {:.0}%, 数据波动较大", divergence * 100.0),
            ));
        }

        score
    }

    /// 趋势分: 7天对30天 ROAS 的相对变化
    ///
    /// - ROAS7 > ROAS30×1.1: 向 100 上升 (按比例)
    /// - ROAS7 < ROAS30×0.9: 向 0 下降 (按比例)
    /// - 其余: 50
    fn trend_score(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        reasons: &mut Vec<AllocationReason>,
    ) -> f64 {
        let ratio = safe_ratio(snapshot.last_7d.roas(), snapshot.last_30d.roas());

        let score = if ratio > 1.1 {
            reasons.push(AllocationReason::new(
                ReasonCategory::Trend,
                format!("近7天 ROAS 较30天提升 {:.0}%", (ratio - 1.0) * 100.0),
            ));
            // ratio 1.1 -> 50, ratio 2.0 -> 100
            50.0 + (ratio - 1.1) / 0.9 * 50.0
        } else if ratio < 0.9 {
            reasons.push(AllocationReason::new(
                ReasonCategory::Trend,
                format!("近7天 ROAS 较30天下滑 {:.0}%", (1.0 - ratio) * 100.0),
            ));
            // ratio 0.9 -> 50, ratio 0 -> 0
            (ratio / 0.9) * 50.0
        } else {
            50.0
        };

        clamp_score(score)
    }
}

impl Default for MultiDimensionalScorer {
    fn default() -> Self {
        Self::new()
    }
}
