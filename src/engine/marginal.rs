// ==========================================
// 广告预算智能分配引擎 - 边际收益分析器
// ==========================================
// 职责: 闭式递减收益近似, 估算效率最优预算
// 说明: 按预算档位的真实历史不存在, 这是启发式投影,
//       不是统计拟合模型, 下游必须按近似值对待
// ==========================================

use crate::domain::marginal::{CurvePoint, MarginalBenefitCurve};
use crate::domain::snapshot::CampaignPerformanceSnapshot;

/// 曲线采样乘数: 覆盖当前预算的 0.5×–2.0×
const BUDGET_MULTIPLIERS: [f64; 9] = [0.5, 0.7, 0.85, 1.0, 1.15, 1.3, 1.5, 1.75, 2.0];

/// 效率修正的对数衰减系数
const EFFICIENCY_DECAY: f64 = 0.25;

/// 效率修正下限
const EFFICIENCY_FLOOR: f64 = 0.5;

/// 递减点判定: 边际 ROAS 跌破当前 ROAS 的 70%
const DIMINISHING_RATIO: f64 = 0.7;

// ==========================================
// MarginalBenefitAnalyzer - 边际收益分析器
// ==========================================
pub struct MarginalBenefitAnalyzer {
    // 无状态引擎,不需要注入依赖
}

impl MarginalBenefitAnalyzer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 预算乘数对应的效率修正
    ///
    /// 随 |ln(乘数)| 对数收缩, 下限 0.5。
    /// 乘数 1.0 时修正为 1.0 (当前水平不打折)。
    pub fn efficiency_adjustment(multiplier: f64) -> f64 {
        if multiplier <= 0.0 {
            return EFFICIENCY_FLOOR;
        }
        (1.0 - EFFICIENCY_DECAY * multiplier.ln().abs()).max(EFFICIENCY_FLOOR)
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分析单个活动的边际收益曲线
    ///
    /// 对 9 个预算乘数采样:
    ///   预期销售额 = 当前ROAS × 测试预算 × 效率修正
    ///
    /// # 返回
    /// MarginalBenefitCurve (含递减点、最高效率预算、启发式最优预算)
    pub fn analyze(&self, snapshot: &CampaignPerformanceSnapshot) -> MarginalBenefitCurve {
        let current_budget = snapshot.current_budget;
        let current_roas = snapshot.last_30d.roas();
        let utilization = snapshot.budget_utilization();

        // 采样曲线
        let mut points: Vec<CurvePoint> = Vec::with_capacity(BUDGET_MULTIPLIERS.len());
        for &multiplier in BUDGET_MULTIPLIERS.iter() {
            let budget = current_budget * multiplier;
            let expected_sales =
                current_roas * budget * Self::efficiency_adjustment(multiplier);

            let marginal_roas = match points.last() {
                Some(prev) if budget > prev.budget => {
                    (expected_sales - prev.expected_sales) / (budget - prev.budget)
                }
                // 首点取平均 ROAS
                _ => current_roas,
            };

            points.push(CurvePoint {
                budget,
                expected_sales,
                marginal_roas,
            });
        }

        // 当前预算水平的边际 ROAS (当前点到下一点的斜率)
        let current_idx = BUDGET_MULTIPLIERS
            .iter()
            .position(|&m| (m - 1.0).abs() < f64::EPSILON)
            .unwrap_or(0);
        let marginal_roas = points
            .get(current_idx + 1)
            .map(|p| p.marginal_roas)
            .unwrap_or(current_roas);

        // 递减点: 当前预算之上第一个边际 ROAS < 70% 当前 ROAS 的预算
        let diminishing_point = points
            .iter()
            .filter(|p| p.budget > current_budget)
            .find(|p| p.marginal_roas < current_roas * DIMINISHING_RATIO)
            .map(|p| p.budget);

        // 最高效率预算: 销售额/预算 比值最高的采样点
        let max_efficiency_budget = points
            .iter()
            .filter(|p| p.budget > 0.0)
            .max_by(|a, b| {
                let ra = a.expected_sales / a.budget;
                let rb = b.expected_sales / b.budget;
                ra.partial_cmp(&rb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| p.budget)
            .unwrap_or(current_budget);

        // 启发式最优预算
        let optimal_budget = if utilization > 85.0 && current_roas > 1.5 {
            // 近饱和且高效: 上调 ~15%, 但不越过递减点
            let raised = current_budget * 1.15;
            match diminishing_point {
                Some(dp) => raised.min(dp),
                None => raised,
            }
        } else if utilization < 50.0 || current_roas < 0.8 {
            // 低用量或低效: 下调 ~10%
            current_budget * 0.9
        } else {
            current_budget
        };

        MarginalBenefitCurve {
            points,
            marginal_roas,
            diminishing_point,
            max_efficiency_budget,
            optimal_budget,
        }
    }
}

impl Default for MarginalBenefitAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
