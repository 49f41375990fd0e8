// ==========================================
// 广告预算智能分配引擎 - 边际收益曲线
// ==========================================
// 闭式递减收益近似, 不是对原始数据的拟合回归
// (按预算档位的真实历史不存在, 只能做启发式投影)
// ==========================================

use serde::{Deserialize, Serialize};

/// 曲线采样点: 预算 → 预期销售额
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// 测试预算 (当前预算 × 乘数)
    pub budget: f64,
    /// 该预算下的预期销售额
    pub expected_sales: f64,
    /// 与上一采样点之间的边际 ROAS (首点取平均 ROAS)
    pub marginal_roas: f64,
}

/// 单活动的边际收益分析结果
///
/// 注意: 这是启发式投影, 不是统计显著的拟合模型,
/// 下游展示时必须标注为近似值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalBenefitCurve {
    /// 9 个采样点, 覆盖当前预算的 0.5×–2.0×
    pub points: Vec<CurvePoint>,
    /// 当前预算水平的边际 ROAS
    pub marginal_roas: f64,
    /// 递减点: 超过该预算后边际 ROAS 跌破当前 ROAS 的 70%
    /// (曲线范围内未跌破时为 None)
    pub diminishing_point: Option<f64>,
    /// 曲线上 销售额/预算 比值最高的预算点
    pub max_efficiency_budget: f64,
    /// 启发式最优预算
    pub optimal_budget: f64,
}
