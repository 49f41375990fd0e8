// ==========================================
// 广告预算智能分配引擎 - 分配业务接口
// ==========================================
// 职责: 输入校验 + 引擎调用 + 错误转换
// 消费方: 看板/通知等协作方 (不在本系统范围内)
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::suggestion::{AllocationRunResult, BudgetAllocationSuggestion};
use crate::domain::types::SuggestionStatus;
use crate::engine::application::ApplyOutcome;
use crate::engine::{AllocationOrchestrator, AllocationRepositories, ApplicationEngine};
use chrono::NaiveDate;
use std::sync::Arc;

// ==========================================
// AllocationApi - 分配业务接口
// ==========================================
pub struct AllocationApi {
    repos: AllocationRepositories,
    orchestrator: AllocationOrchestrator,
    application: ApplicationEngine,
}

impl AllocationApi {
    /// 构造函数
    pub fn new(repos: AllocationRepositories, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            orchestrator: AllocationOrchestrator::new(repos.clone(), config_manager),
            application: ApplicationEngine::new(repos.clone()),
            repos,
        }
    }

    // ==========================================
    // 分配运行
    // ==========================================

    /// 执行一次预算分配
    ///
    /// # 参数
    /// - `group_id`: 绩效分组ID (非空)
    /// - `as_of`: 窗口截止日期, 格式 YYYY-MM-DD
    pub async fn run_allocation(
        &self,
        group_id: &str,
        as_of: &str,
    ) -> ApiResult<AllocationRunResult> {
        let group_id = group_id.trim();
        if group_id.is_empty() {
            return Err(ApiError::InvalidInput("group_id 不能为空".to_string()));
        }

        let as_of = NaiveDate::parse_from_str(as_of, "%Y-%m-%d").map_err(|_| {
            ApiError::InvalidInput(format!("as_of 日期格式无效 (应为 YYYY-MM-DD): {}", as_of))
        })?;

        let result = self.orchestrator.run_allocation(group_id, as_of).await?;
        Ok(result)
    }

    // ==========================================
    // 建议应用与状态流转
    // ==========================================

    /// 批量应用建议 (部分成功是预期结果)
    pub async fn apply_suggestions(
        &self,
        suggestion_ids: &[String],
        actor: &str,
    ) -> ApiResult<ApplyOutcome> {
        if suggestion_ids.is_empty() {
            return Err(ApiError::InvalidInput(
                "suggestion_ids 不能为空".to_string(),
            ));
        }
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(ApiError::InvalidInput("actor 不能为空".to_string()));
        }

        Ok(self.application.apply(suggestion_ids, actor))
    }

    /// 拒绝单条建议
    pub fn reject_suggestion(&self, suggestion_id: &str) -> ApiResult<()> {
        let suggestion = self.repos.suggestion_repo.get_by_id(suggestion_id)?;
        if !suggestion.status.is_applicable() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "建议 {} 状态为 {}, 不能拒绝",
                suggestion_id, suggestion.status
            )));
        }
        self.repos
            .suggestion_repo
            .update_status(suggestion_id, SuggestionStatus::Rejected)?;
        Ok(())
    }

    /// 查询单条建议
    pub fn get_suggestion(&self, suggestion_id: &str) -> ApiResult<BudgetAllocationSuggestion> {
        Ok(self.repos.suggestion_repo.get_by_id(suggestion_id)?)
    }

    /// 按分组列出建议
    pub fn list_suggestions(&self, group_id: &str) -> ApiResult<Vec<BudgetAllocationSuggestion>> {
        Ok(self.repos.suggestion_repo.list_by_group(group_id)?)
    }
}
