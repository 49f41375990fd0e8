// ==========================================
// 广告预算智能分配引擎 - 守恒再平衡器
// ==========================================
// 职责: 按比例缩放分组内全部建议, 保证预算总量守恒
// 不变量: Σ 当前预算 ≈ Σ 建议预算 (误差 ≤ 0.01 货币单位)
// 说明: 固定预算池的再分配 —— 有活动加量, 必有活动等量让出
// ==========================================

use crate::domain::suggestion::BudgetAllocationSuggestion;
use crate::domain::types::{AllocationReason, ReasonCategory};
use tracing::{debug, info};

/// 守恒容差 (货币单位)
pub const CONSERVATION_TOLERANCE: f64 = 0.01;

// ==========================================
// ConservationRebalancer - 守恒再平衡器
// ==========================================
pub struct ConservationRebalancer {
    // 无状态引擎,不需要注入依赖
}

impl ConservationRebalancer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 再平衡分组内的全部建议
    ///
    /// 若 Σ建议预算 与 Σ当前预算 偏差超出容差, 则每条建议的
    /// suggested_budget 乘以 totalCurrent/totalSuggested,
    /// 并重算 adjustment_amount / adjustment_percent。
    ///
    /// # 前置条件
    /// 必须在分组内全部建议合成完毕后调用 (组级汇合点)。
    pub fn rebalance(
        &self,
        mut suggestions: Vec<BudgetAllocationSuggestion>,
    ) -> Vec<BudgetAllocationSuggestion> {
        if suggestions.is_empty() {
            return suggestions;
        }

        let total_current: f64 = suggestions.iter().map(|s| s.current_budget).sum();
        let total_suggested: f64 = suggestions.iter().map(|s| s.suggested_budget).sum();

        if (total_current - total_suggested).abs() <= CONSERVATION_TOLERANCE {
            debug!(
                total_current = total_current,
                total_suggested = total_suggested,
                "建议总额已守恒, 无需缩放"
            );
            return suggestions;
        }

        if total_suggested <= 0.0 {
            // 建议总额为 0 无法按比例分摊, 保持原建议并交由调用方告警
            info!(
                total_current = total_current,
                "建议预算总额为 0, 跳过再平衡缩放"
            );
            return suggestions;
        }

        let scale = total_current / total_suggested;
        info!(
            total_current = total_current,
            total_suggested = total_suggested,
            scale = scale,
            "执行守恒再平衡缩放"
        );

        for s in suggestions.iter_mut() {
            s.suggested_budget *= scale;
            s.adjustment_amount = s.suggested_budget - s.current_budget;
            s.adjustment_percent = if s.current_budget > 0.0 {
                s.adjustment_amount / s.current_budget * 100.0
            } else {
                0.0
            };
            s.reasons.push(AllocationReason::new(
                ReasonCategory::Rebalance,
                format!("按守恒系数 {:.4} 缩放至分组预算池内", scale),
            ));
        }

        suggestions
    }
}

impl Default for ConservationRebalancer {
    fn default() -> Self {
        Self::new()
    }
}
