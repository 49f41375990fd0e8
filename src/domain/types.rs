// ==========================================
// 广告预算智能分配引擎 - 领域类型定义
// ==========================================
// 红线: 分类必须是封闭枚举,不允许自由字符串分类
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 异常严重度 (Anomaly Severity)
// ==========================================
// 顺序: Low < Medium < High, 多项异常取最大值
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,    // 轻微
    Medium, // 关注
    High,   // 严重
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

// ==========================================
// 异常类型 (Anomaly Type)
// ==========================================
// 异常不阻断评分,只压低置信度并可能清零调整
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    Spike,       // 近期消耗突增
    Drop,        // 近期消耗骤降
    Outlier,     // 指标离群
    MissingData, // 数据缺失
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyType::Spike => write!(f, "SPIKE"),
            AnomalyType::Drop => write!(f, "DROP"),
            AnomalyType::Outlier => write!(f, "OUTLIER"),
            AnomalyType::MissingData => write!(f, "MISSING_DATA"),
        }
    }
}

// ==========================================
// 风险等级 (Risk Level)
// ==========================================
// 顺序: Low < Medium < High
// 异常严重度直接映射到建议的风险等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,    // 正常
    Medium, // 关注
    High,   // 危险
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

impl From<Severity> for RiskLevel {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Low => RiskLevel::Low,
            Severity::Medium => RiskLevel::Medium,
            Severity::High => RiskLevel::High,
        }
    }
}

impl RiskLevel {
    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// 从字符串解析风险等级
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "HIGH" => RiskLevel::High,
            "MEDIUM" => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }
}

// ==========================================
// 建议状态 (Suggestion Status)
// ==========================================
// 状态流转: pending -> approved/rejected -> applied/expired
// 红线: 只有 ApplicationEngine 可以写 applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionStatus {
    Pending,  // 待审
    Approved, // 已批准
    Rejected, // 已拒绝
    Applied,  // 已应用
    Expired,  // 已过期
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl SuggestionStatus {
    /// 从字符串解析状态
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "APPROVED" => SuggestionStatus::Approved,
            "REJECTED" => SuggestionStatus::Rejected,
            "APPLIED" => SuggestionStatus::Applied,
            "EXPIRED" => SuggestionStatus::Expired,
            _ => SuggestionStatus::Pending, // 默认值
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "PENDING",
            SuggestionStatus::Approved => "APPROVED",
            SuggestionStatus::Rejected => "REJECTED",
            SuggestionStatus::Applied => "APPLIED",
            SuggestionStatus::Expired => "EXPIRED",
        }
    }

    /// 该状态是否允许被应用
    pub fn is_applicable(&self) -> bool {
        matches!(self, SuggestionStatus::Pending | SuggestionStatus::Approved)
    }
}

// ==========================================
// 调整理由分类 (Reason Category)
// ==========================================
// 红线: 所有规则必须输出 reason, 且分类封闭可枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCategory {
    ConversionEfficiency, // 转化效率偏离基准
    Roas,                 // ROAS 偏离基准
    Composite,            // 综合分落入增量/减量区间
    GrowthPotential,      // 成长空间判定
    Stability,            // 短/长窗口稳定性
    Trend,                // 近期趋势
    MarginalHeadroom,     // 边际分析显示仍有提升空间
    MarginalContraction,  // 边际分析显示应收缩
    AnomalySuppression,   // 异常导致调整被抑制
    BudgetFloor,          // 触发最低日预算下限
    Rebalance,            // 守恒再平衡缩放
}

impl fmt::Display for ReasonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasonCategory::ConversionEfficiency => write!(f, "CONVERSION_EFFICIENCY"),
            ReasonCategory::Roas => write!(f, "ROAS"),
            ReasonCategory::Composite => write!(f, "COMPOSITE"),
            ReasonCategory::GrowthPotential => write!(f, "GROWTH_POTENTIAL"),
            ReasonCategory::Stability => write!(f, "STABILITY"),
            ReasonCategory::Trend => write!(f, "TREND"),
            ReasonCategory::MarginalHeadroom => write!(f, "MARGINAL_HEADROOM"),
            ReasonCategory::MarginalContraction => write!(f, "MARGINAL_CONTRACTION"),
            ReasonCategory::AnomalySuppression => write!(f, "ANOMALY_SUPPRESSION"),
            ReasonCategory::BudgetFloor => write!(f, "BUDGET_FLOOR"),
            ReasonCategory::Rebalance => write!(f, "REBALANCE"),
        }
    }
}

// ==========================================
// 调整理由 (Allocation Reason)
// ==========================================
// 分类 + 人类可读明细, 下游可安全按分类分流
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationReason {
    pub category: ReasonCategory,
    pub detail: String,
}

impl AllocationReason {
    pub fn new(category: ReasonCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for AllocationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.detail)
    }
}
