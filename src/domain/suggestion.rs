// ==========================================
// 广告预算智能分配引擎 - 预算分配建议
// ==========================================
// 本引擎唯一的持久化输出:
// 评分 + 边际分析 + 异常检出 合成的有界调整建议
// 状态流转 (pending→applied 等) 在 ApplicationEngine / 调用方完成
// ==========================================

use crate::domain::marginal::MarginalBenefitCurve;
use crate::domain::score::MultiDimensionalScore;
use crate::domain::types::{AllocationReason, RiskLevel, SuggestionStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// PredictedMetrics - 调整后预测指标
// ==========================================

/// 预算变更后的预测指标 (30天口径)
///
/// 按预算变化比例缩放消耗, 并套用与边际分析相同的递减收益修正。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedMetrics {
    pub spend: f64,
    pub sales: f64,
    pub conversions: f64,
    pub roas: f64,
}

// ==========================================
// BudgetAllocationSuggestion - 分配建议
// ==========================================

/// 单活动的预算调整建议 (再平衡后)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetAllocationSuggestion {
    pub suggestion_id: String,
    pub group_id: String,
    pub campaign_id: String,
    pub campaign_name: String,
    pub current_budget: f64,
    /// 再平衡后的建议预算
    pub suggested_budget: f64,
    pub adjustment_amount: f64,
    pub adjustment_percent: f64,
    pub score: MultiDimensionalScore,
    pub curve: MarginalBenefitCurve,
    pub predicted: PredictedMetrics,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub reasons: Vec<AllocationReason>,
    /// 置信度 [30,95]
    pub confidence: f64,
    pub status: SuggestionStatus,
    pub created_at: NaiveDateTime,
}

// ==========================================
// GroupSummary - 分组汇总
// ==========================================

/// 分组级汇总 (供看板/通知协作方消费)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub total_current_budget: f64,
    pub total_suggested_budget: f64,
    pub avg_score: f64,
    pub campaigns_to_increase: usize,
    pub campaigns_to_decrease: usize,
    pub campaigns_unchanged: usize,
}

// ==========================================
// AllocationRunResult - 单次运行结果
// ==========================================

/// 一次完整分配运行的结构化结果
///
/// 红线: 运行永远返回结构化结果, 不静默丢弃活动;
/// 空分组返回空建议列表 + warning, 不是错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRunResult {
    pub group_id: String,
    pub as_of: chrono::NaiveDate,
    pub suggestions: Vec<BudgetAllocationSuggestion>,
    pub summary: GroupSummary,
    /// 高严重度异常建议与运行级告警
    pub warnings: Vec<String>,
}
