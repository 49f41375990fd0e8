// ==========================================
// 广告预算智能分配引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 决策支持系统 (人工最终控制权)
// 核心流程: 采集 → 评分 → 边际分析 → 异常检测 → 合成 → 守恒再平衡 → 应用
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AllocationReason, AnomalyType, ReasonCategory, RiskLevel, Severity, SuggestionStatus,
};

// 领域实体
pub use domain::{
    AllocationRunResult, AnomalyFinding, BudgetAllocationSuggestion, BudgetChangeLog, Campaign,
    CampaignPerformanceSnapshot, GroupBaseline, GroupSummary, MarginalBenefitCurve,
    MultiDimensionalScore, PredictedMetrics, WindowAggregate,
};

// 引擎
pub use engine::{
    AllocationOrchestrator, AllocationRepositories, AnomalyDetector, ApplicationEngine,
    ConservationRebalancer, MarginalBenefitAnalyzer, MultiDimensionalScorer,
    PerformanceWindowCollector, SuggestionComposer,
};

// 配置
pub use config::{AllocationConfig, ConfigManager};

// API
pub use api::AllocationApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "广告预算智能分配引擎";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
