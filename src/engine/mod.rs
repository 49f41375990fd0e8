// ==========================================
// 广告预算智能分配引擎 - 引擎层
// ==========================================
// 职责: 实现分配规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有规则必须输出 reason
// ==========================================

pub mod anomaly;
pub mod application;
pub mod collector;
pub mod composer;
pub mod marginal;
pub mod orchestrator;
pub mod rebalancer;
pub mod repositories;
pub mod scorer;

// 重导出核心引擎
pub use anomaly::AnomalyDetector;
pub use application::{ApplicationEngine, ApplyItemError, ApplyOutcome};
pub use collector::PerformanceWindowCollector;
pub use composer::SuggestionComposer;
pub use marginal::MarginalBenefitAnalyzer;
pub use orchestrator::AllocationOrchestrator;
pub use rebalancer::{ConservationRebalancer, CONSERVATION_TOLERANCE};
pub use repositories::AllocationRepositories;
pub use scorer::MultiDimensionalScorer;
