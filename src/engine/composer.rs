// ==========================================
// 广告预算智能分配引擎 - 建议合成器
// ==========================================
// 职责: 把评分、边际分析、异常检出合成为一条有界调整建议
// 输出: 调整幅度 + 风险等级 + 置信度 + 可读理由
// 红线: 调整幅度永远不超过 max_adjustment_percent
// 红线: missing_data 异常清零调整 (数据缺失时不动预算)
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::anomaly::AnomalyFinding;
use crate::domain::marginal::MarginalBenefitCurve;
use crate::domain::score::MultiDimensionalScore;
use crate::domain::snapshot::CampaignPerformanceSnapshot;
use crate::domain::suggestion::{BudgetAllocationSuggestion, PredictedMetrics};
use crate::domain::types::{
    AllocationReason, ReasonCategory, RiskLevel, SuggestionStatus,
};
use crate::engine::marginal::MarginalBenefitAnalyzer;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

/// 综合分高于该值进入增量区间
const INCREASE_THRESHOLD: f64 = 65.0;
/// 综合分低于该值进入减量区间
const DECREASE_THRESHOLD: f64 = 35.0;
/// 边际分析触发 ±5 微调的预算偏移比例
const MARGINAL_NUDGE_RATIO: f64 = 0.1;
/// 边际微调幅度 (百分点)
const MARGINAL_NUDGE_PERCENT: f64 = 5.0;
/// 置信度区间
const CONFIDENCE_RANGE: (f64, f64) = (30.0, 95.0);
/// 30天消耗低于该值视为样本稀薄
const THIN_SAMPLE_SPEND: f64 = 100.0;

// ==========================================
// SuggestionComposer - 建议合成器
// ==========================================
pub struct SuggestionComposer {
    // 无状态引擎,不需要注入依赖
}

impl SuggestionComposer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 合成单活动的预算调整建议 (再平衡前)
    ///
    /// # 调整幅度推导
    /// - 综合分 > 65: 正向调整 (综合分−50)/50×20, 上限 max_adjustment_percent
    /// - 综合分 < 35: 对称负向调整, 下限 −max_adjustment_percent
    /// - 其余: 小幅调整 (综合分−50)/50×5
    /// - 边际最优预算偏离当前 ±10% 以上时, 追加 ±5 微调
    /// - missing_data 异常: 调整清零
    pub fn compose(
        &self,
        group_id: &str,
        snapshot: &CampaignPerformanceSnapshot,
        score: MultiDimensionalScore,
        curve: MarginalBenefitCurve,
        anomaly: &AnomalyFinding,
        config: &AllocationConfig,
    ) -> BudgetAllocationSuggestion {
        let mut reasons: Vec<AllocationReason> = score.reasons.clone();
        let composite = score.composite;
        let current_budget = snapshot.current_budget;

        // 1. 基础调整幅度
        let mut adjustment_percent = if composite > INCREASE_THRESHOLD {
            let raw = (composite - 50.0) / 50.0 * 20.0;
            reasons.push(AllocationReason::new(
                ReasonCategory::Composite,
                format!("综合分 {:.1} 高于增量阈值 {}, 建议上调预算", composite, INCREASE_THRESHOLD),
            ));
            raw
        } else if composite < DECREASE_THRESHOLD {
            let raw = (composite - 50.0) / 50.0 * 20.0;
            reasons.push(AllocationReason::new(
                ReasonCategory::Composite,
                format!("综合分 {:.1} 低于减量阈值 {}, 建议下调预算", composite, DECREASE_THRESHOLD),
            ));
            raw
        } else {
            (composite - 50.0) / 50.0 * 5.0
        };

        // 2. 边际分析微调
        if curve.optimal_budget > current_budget * (1.0 + MARGINAL_NUDGE_RATIO) {
            adjustment_percent += MARGINAL_NUDGE_PERCENT;
            reasons.push(AllocationReason::new(
                ReasonCategory::MarginalHeadroom,
                format!("边际分析最优预算 {:.2} 高于当前, 仍有提升空间", curve.optimal_budget),
            ));
        } else if curve.optimal_budget < current_budget * (1.0 - MARGINAL_NUDGE_RATIO) {
            adjustment_percent -= MARGINAL_NUDGE_PERCENT;
            reasons.push(AllocationReason::new(
                ReasonCategory::MarginalContraction,
                format!("边际分析最优预算 {:.2} 低于当前, 建议收缩", curve.optimal_budget),
            ));
        }

        // 3. 限幅
        adjustment_percent = adjustment_percent
            .clamp(-config.max_adjustment_percent, config.max_adjustment_percent);

        // 4. 数据缺失: 调整清零
        if anomaly.is_missing_data() {
            adjustment_percent = 0.0;
            reasons.push(AllocationReason::new(
                ReasonCategory::AnomalySuppression,
                "30天消耗数据缺失, 本次不调整预算".to_string(),
            ));
        }

        // 5. 建议预算 (最低日预算兜底)
        let mut suggested_budget = current_budget * (1.0 + adjustment_percent / 100.0);
        if suggested_budget < config.min_daily_budget {
            suggested_budget = config.min_daily_budget;
            reasons.push(AllocationReason::new(
                ReasonCategory::BudgetFloor,
                format!("触发最低日预算下限 {:.2}", config.min_daily_budget),
            ));
        }
        let adjustment_amount = suggested_budget - current_budget;
        let adjustment_percent = if current_budget > 0.0 {
            adjustment_amount / current_budget * 100.0
        } else {
            0.0
        };

        // 6. 风险评定
        let (risk_level, risk_factors) =
            self.assess_risk(&score, anomaly, adjustment_percent);

        // 7. 置信度
        let confidence = self.assess_confidence(snapshot, &score, anomaly);

        // 8. 调整后预测指标
        let predicted = self.predict_metrics(snapshot, suggested_budget);

        debug!(
            campaign_id = %snapshot.campaign_id,
            composite = composite,
            adjustment_percent = adjustment_percent,
            risk_level = %risk_level,
            confidence = confidence,
            "建议合成完成"
        );

        BudgetAllocationSuggestion {
            suggestion_id: Uuid::new_v4().to_string(),
            group_id: group_id.to_string(),
            campaign_id: snapshot.campaign_id.clone(),
            campaign_name: snapshot.campaign_name.clone(),
            current_budget,
            suggested_budget,
            adjustment_amount,
            adjustment_percent,
            score,
            curve,
            predicted,
            risk_level,
            risk_factors,
            reasons,
            confidence,
            status: SuggestionStatus::Pending,
            created_at: Utc::now().naive_utc(),
        }
    }

    // ==========================================
    // 风险评定
    // ==========================================

    /// 风险等级与风险因子
    ///
    /// - 异常严重度直接映射风险等级
    /// - |调整| > 10%: 追加 "大幅调整" 因子
    /// - 稳定性分 < 40: 追加 "数据波动" 因子
    fn assess_risk(
        &self,
        score: &MultiDimensionalScore,
        anomaly: &AnomalyFinding,
        adjustment_percent: f64,
    ) -> (RiskLevel, Vec<String>) {
        let mut factors: Vec<String> = Vec::new();

        let risk_level = match anomaly.severity {
            Some(severity) => {
                factors.push(format!(
                    "检出数据异常 (严重度 {}): {}",
                    severity,
                    anomaly.triggers.join("; ")
                ));
                RiskLevel::from(severity)
            }
            None => RiskLevel::Low,
        };

        if adjustment_percent.abs() > 10.0 {
            factors.push(format!("单次调整幅度 {:.1}% 超过 10%", adjustment_percent));
        }
        if score.stability < 40.0 {
            factors.push(format!("稳定性分 {:.1}, 短期数据波动大", score.stability));
        }

        (risk_level, factors)
    }

    // ==========================================
    // 置信度评定
    // ==========================================

    /// 置信度: 基础 70, 按稳定性/异常/样本量修正, 限定 [30,95]
    fn assess_confidence(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        score: &MultiDimensionalScore,
        anomaly: &AnomalyFinding,
    ) -> f64 {
        let mut confidence: f64 = 70.0;

        if score.stability > 70.0 {
            confidence += 15.0;
        }
        if score.stability < 40.0 {
            confidence -= 20.0;
        }
        if anomaly.has_anomaly {
            confidence -= 15.0;
        }
        if snapshot.last_30d.spend < THIN_SAMPLE_SPEND {
            confidence -= 10.0;
        }

        confidence.clamp(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1)
    }

    // ==========================================
    // 调整后预测
    // ==========================================

    /// 调整后预测指标 (30天口径)
    ///
    /// 消耗按预算变化比例缩放, 销售/转化再套用
    /// 与边际分析相同的递减收益修正。
    fn predict_metrics(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        suggested_budget: f64,
    ) -> PredictedMetrics {
        let ratio = if snapshot.current_budget > 0.0 {
            suggested_budget / snapshot.current_budget
        } else {
            1.0
        };
        let efficiency = MarginalBenefitAnalyzer::efficiency_adjustment(ratio);

        let spend = snapshot.last_30d.spend * ratio;
        let sales = snapshot.last_30d.sales * ratio * efficiency;
        let conversions = snapshot.last_30d.conversions as f64 * ratio * efficiency;
        let roas = if spend > 0.0 { sales / spend } else { 0.0 };

        PredictedMetrics {
            spend,
            sales,
            conversions,
            roas,
        }
    }
}

impl Default for SuggestionComposer {
    fn default() -> Self {
        Self::new()
    }
}
