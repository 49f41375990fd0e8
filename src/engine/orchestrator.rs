// ==========================================
// 广告预算智能分配引擎 - 引擎编排器
// ==========================================
// 用途: 协调采集→评分→边际→异常→合成→再平衡的执行顺序
// 数据流严格向下: 1→2,3,4→5→6, 除建议落库外无写入
// 红线: 存储读取失败对本次运行致命, 不产出部分建议
//       (部分建议会破坏守恒不变量)
// ==========================================

use crate::config::ConfigManager;
use crate::domain::suggestion::{AllocationRunResult, GroupSummary};
use crate::domain::types::Severity;
use crate::engine::anomaly::AnomalyDetector;
use crate::engine::collector::PerformanceWindowCollector;
use crate::engine::composer::SuggestionComposer;
use crate::engine::marginal::MarginalBenefitAnalyzer;
use crate::engine::rebalancer::ConservationRebalancer;
use crate::engine::repositories::AllocationRepositories;
use crate::engine::scorer::MultiDimensionalScorer;
use chrono::NaiveDate;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, info};

/// 调整量小于该值视为"维持不变" (货币单位)
const UNCHANGED_TOLERANCE: f64 = 0.01;

// ==========================================
// AllocationOrchestrator - 引擎编排器
// ==========================================

pub struct AllocationOrchestrator {
    repos: AllocationRepositories,
    config_manager: Arc<ConfigManager>,
    collector: PerformanceWindowCollector,
    scorer: MultiDimensionalScorer,
    analyzer: MarginalBenefitAnalyzer,
    detector: AnomalyDetector,
    composer: SuggestionComposer,
    rebalancer: ConservationRebalancer,
}

impl AllocationOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - repos: 仓储集合
    /// - config_manager: 配置管理器
    pub fn new(repos: AllocationRepositories, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            collector: PerformanceWindowCollector::new(
                repos.campaign_repo.clone(),
                repos.performance_repo.clone(),
            ),
            scorer: MultiDimensionalScorer::new(),
            analyzer: MarginalBenefitAnalyzer::new(),
            detector: AnomalyDetector::new(),
            composer: SuggestionComposer::new(),
            rebalancer: ConservationRebalancer::new(),
            repos,
            config_manager,
        }
    }

    /// 执行完整分配流程 (单分组)
    ///
    /// # 参数
    /// - `group_id`: 绩效分组ID
    /// - `as_of`: 窗口截止日期
    ///
    /// # 返回
    /// AllocationRunResult: 建议列表 + 分组汇总 + 告警;
    /// 空分组返回空结果 + warning, 不是错误。
    pub async fn run_allocation(
        &self,
        group_id: &str,
        as_of: NaiveDate,
    ) -> Result<AllocationRunResult, Box<dyn Error>> {
        info!(group_id = %group_id, as_of = %as_of, "开始执行预算分配流程");

        // ==========================================
        // 步骤0: 加载并校验分配配置
        // ==========================================
        let config = self.config_manager.get_allocation_config(group_id)?;
        debug!(weight_sum = config.weight_sum(), "分配配置加载完成");

        // ==========================================
        // 步骤1: 采集多窗口绩效快照
        // ==========================================
        let snapshots = self.collector.collect(group_id, as_of)?;

        if snapshots.is_empty() {
            info!(group_id = %group_id, "分组为空, 返回空结果");
            return Ok(AllocationRunResult {
                group_id: group_id.to_string(),
                as_of,
                suggestions: Vec::new(),
                summary: GroupSummary {
                    total_current_budget: 0.0,
                    total_suggested_budget: 0.0,
                    avg_score: 0.0,
                    campaigns_to_increase: 0,
                    campaigns_to_decrease: 0,
                    campaigns_unchanged: 0,
                },
                warnings: vec![format!("分组 {} 内没有活动, 本次运行为 no-op", group_id)],
            });
        }

        // ==========================================
        // 步骤2: 构建分组基准
        // ==========================================
        let baseline = self.collector.build_baseline(&snapshots);
        debug!(
            avg_roas = baseline.avg_roas,
            avg_conversion_efficiency = baseline.avg_conversion_efficiency,
            "分组基准构建完成"
        );

        // ==========================================
        // 步骤3: 逐活动 评分 + 边际分析 + 异常检测 + 合成
        // ==========================================
        // 每个活动相互独立, 无共享可变状态; 再平衡是唯一的组级汇合点
        let mut warnings: Vec<String> = Vec::new();
        let mut suggestions = Vec::with_capacity(snapshots.len());

        for snapshot in &snapshots {
            let score = self.scorer.score(snapshot, &baseline, &config);
            let curve = self.analyzer.analyze(snapshot);
            let anomaly = self.detector.detect(snapshot, &config);

            // 高严重度异常的处理建议进入运行级告警
            if anomaly.severity == Some(Severity::High) {
                if let Some(rec) = &anomaly.recommendation {
                    warnings.push(format!("[{}] {}", snapshot.campaign_id, rec));
                }
            }

            let suggestion =
                self.composer
                    .compose(group_id, snapshot, score, curve, &anomaly, &config);
            suggestions.push(suggestion);
        }

        // ==========================================
        // 步骤4: 守恒再平衡 (组级汇合点)
        // ==========================================
        let suggestions = self.rebalancer.rebalance(suggestions);

        // ==========================================
        // 步骤5: 分组汇总
        // ==========================================
        let summary = Self::build_summary(&suggestions);

        // ==========================================
        // 步骤6: 建议落库 (pending)
        // ==========================================
        let inserted = self.repos.suggestion_repo.insert_batch(&suggestions)?;

        info!(
            group_id = %group_id,
            suggestion_count = inserted,
            to_increase = summary.campaigns_to_increase,
            to_decrease = summary.campaigns_to_decrease,
            unchanged = summary.campaigns_unchanged,
            warning_count = warnings.len(),
            "预算分配流程完成"
        );

        Ok(AllocationRunResult {
            group_id: group_id.to_string(),
            as_of,
            suggestions,
            summary,
            warnings,
        })
    }

    /// 构建分组汇总
    fn build_summary(
        suggestions: &[crate::domain::suggestion::BudgetAllocationSuggestion],
    ) -> GroupSummary {
        let total_current_budget: f64 = suggestions.iter().map(|s| s.current_budget).sum();
        let total_suggested_budget: f64 = suggestions.iter().map(|s| s.suggested_budget).sum();
        let avg_score = if suggestions.is_empty() {
            0.0
        } else {
            suggestions.iter().map(|s| s.score.composite).sum::<f64>() / suggestions.len() as f64
        };

        let mut campaigns_to_increase = 0;
        let mut campaigns_to_decrease = 0;
        let mut campaigns_unchanged = 0;
        for s in suggestions {
            if s.adjustment_amount > UNCHANGED_TOLERANCE {
                campaigns_to_increase += 1;
            } else if s.adjustment_amount < -UNCHANGED_TOLERANCE {
                campaigns_to_decrease += 1;
            } else {
                campaigns_unchanged += 1;
            }
        }

        GroupSummary {
            total_current_budget,
            total_suggested_budget,
            avg_score,
            campaigns_to_increase,
            campaigns_to_decrease,
            campaigns_unchanged,
        }
    }
}
