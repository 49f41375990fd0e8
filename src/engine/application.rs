// ==========================================
// 广告预算智能分配引擎 - 建议应用引擎
// ==========================================
// 职责: 把已批准的建议落为真实预算变更, 并写审计痕迹
// 红线: 写前必须重读实时预算 (read-verify-write, 窄乐观并发检查)
// 红线: 单条失败只记录不中断批次; 取消只停后续写入, 不回滚已提交
// ==========================================

use crate::domain::change_log::BudgetChangeLog;
use crate::domain::types::SuggestionStatus;
use crate::engine::repositories::AllocationRepositories;
use crate::repository::error::RepositoryError;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// 实时预算与建议基准预算允许的最大偏差 (货币单位)
const STALE_BUDGET_TOLERANCE: f64 = 0.01;

// ==========================================
// ApplyOutcome - 批量应用结果
// ==========================================

/// 单条应用失败
#[derive(Debug, Clone)]
pub struct ApplyItemError {
    pub suggestion_id: String,
    pub message: String,
}

/// 批量应用的结构化结果 (部分成功是预期产出, 不是异常)
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    pub applied_count: usize,
    pub failed_count: usize,
    pub errors: Vec<ApplyItemError>,
    /// 因取消而未处理的建议数
    pub cancelled_count: usize,
}

// ==========================================
// ApplicationEngine - 建议应用引擎
// ==========================================
pub struct ApplicationEngine {
    repos: AllocationRepositories,
}

impl ApplicationEngine {
    /// 构造函数
    pub fn new(repos: AllocationRepositories) -> Self {
        Self { repos }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 批量应用建议
    ///
    /// # 参数
    /// - `suggestion_ids`: 待应用的建议ID列表
    /// - `actor`: 操作人
    ///
    /// # 返回
    /// ApplyOutcome, 单条失败收集进 errors, 不中断批次
    pub fn apply(&self, suggestion_ids: &[String], actor: &str) -> ApplyOutcome {
        let never_cancel = Arc::new(AtomicBool::new(false));
        self.apply_with_cancel(suggestion_ids, actor, never_cancel)
    }

    /// 批量应用建议 (支持协作式取消)
    ///
    /// 每条建议处理前检查取消标志: 置位后停止发起新的写入,
    /// 已提交的写入保持不变 (守恒不变量不因取消产生半写状态,
    /// 因为每条活动的写入+日志各自独立完成)。
    pub fn apply_with_cancel(
        &self,
        suggestion_ids: &[String],
        actor: &str,
        cancel: Arc<AtomicBool>,
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();

        info!(
            actor = %actor,
            batch_size = suggestion_ids.len(),
            "开始批量应用预算建议"
        );

        for (idx, suggestion_id) in suggestion_ids.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                outcome.cancelled_count = suggestion_ids.len() - idx;
                warn!(
                    processed = idx,
                    remaining = outcome.cancelled_count,
                    "批量应用被取消, 停止后续写入"
                );
                break;
            }

            match self.apply_one(suggestion_id, actor) {
                Ok(()) => outcome.applied_count += 1,
                Err(e) => {
                    warn!(suggestion_id = %suggestion_id, error = %e, "建议应用失败");
                    outcome.failed_count += 1;
                    outcome.errors.push(ApplyItemError {
                        suggestion_id: suggestion_id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            applied = outcome.applied_count,
            failed = outcome.failed_count,
            cancelled = outcome.cancelled_count,
            "批量应用结束"
        );
        outcome
    }

    // ==========================================
    // 单条应用 (read-verify-write)
    // ==========================================

    /// 应用单条建议
    ///
    /// # 步骤
    /// 1. 读取建议, 校验状态为 pending/approved
    /// 2. 重读实时预算, 与建议基准预算比对 (捕获并发外部修改)
    /// 3. 写入新预算
    /// 4. 落一条变更日志 (前后快照 + 操作人)
    /// 5. 建议状态置为 applied
    fn apply_one(&self, suggestion_id: &str, actor: &str) -> Result<(), RepositoryError> {
        let suggestion = self.repos.suggestion_repo.get_by_id(suggestion_id)?;

        if !suggestion.status.is_applicable() {
            return Err(RepositoryError::InvalidStateTransition {
                from: suggestion.status.to_db_str().to_string(),
                to: SuggestionStatus::Applied.to_db_str().to_string(),
            });
        }

        // 窄乐观并发检查: 实时预算必须仍等于建议合成时的基准预算
        let live_budget = self.repos.campaign_repo.get_budget(&suggestion.campaign_id)?;
        if (live_budget - suggestion.current_budget).abs() > STALE_BUDGET_TOLERANCE {
            return Err(RepositoryError::StaleBudget {
                campaign_id: suggestion.campaign_id.clone(),
                expected: suggestion.current_budget,
                actual: live_budget,
            });
        }

        self.repos
            .campaign_repo
            .set_budget(&suggestion.campaign_id, suggestion.suggested_budget)?;

        let metrics_snapshot = json!({
            "composite_score": suggestion.score.composite,
            "confidence": suggestion.confidence,
            "risk_level": suggestion.risk_level.to_db_str(),
            "predicted": suggestion.predicted,
        });
        let log = BudgetChangeLog::new(
            &suggestion.campaign_id,
            live_budget,
            suggestion.suggested_budget,
            Some(metrics_snapshot),
            &format!("应用预算分配建议 {}", suggestion.suggestion_id),
            actor,
        );
        self.repos.history_repo.record_change(&log)?;

        self.repos
            .suggestion_repo
            .update_status(suggestion_id, SuggestionStatus::Applied)?;

        info!(
            campaign_id = %suggestion.campaign_id,
            budget_before = live_budget,
            budget_after = suggestion.suggested_budget,
            actor = %actor,
            "预算变更已应用"
        );
        Ok(())
    }
}
