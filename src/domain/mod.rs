// ==========================================
// 广告预算智能分配引擎 - 领域层
// ==========================================
// 职责: 实体与类型定义, 不含业务规则
// ==========================================

pub mod anomaly;
pub mod campaign;
pub mod change_log;
pub mod marginal;
pub mod score;
pub mod snapshot;
pub mod suggestion;
pub mod types;

// 重导出核心实体
pub use anomaly::AnomalyFinding;
pub use campaign::Campaign;
pub use change_log::BudgetChangeLog;
pub use marginal::{CurvePoint, MarginalBenefitCurve};
pub use score::MultiDimensionalScore;
pub use snapshot::{CampaignPerformanceSnapshot, GroupBaseline, WindowAggregate};
pub use suggestion::{
    AllocationRunResult, BudgetAllocationSuggestion, GroupSummary, PredictedMetrics,
};
pub use types::{
    AllocationReason, AnomalyType, ReasonCategory, RiskLevel, Severity, SuggestionStatus,
};
