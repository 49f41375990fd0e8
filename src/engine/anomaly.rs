// ==========================================
// 广告预算智能分配引擎 - 异常检测器
// ==========================================
// 职责: 在不可靠/可疑数据影响建议之前打上标记
// 红线: 异常不阻断评分, 只压低置信度并可能清零调整
// 红线: 数据稀薄时显式暴露低置信度, 绝不合成数据
// ==========================================

use crate::config::AllocationConfig;
use crate::domain::anomaly::AnomalyFinding;
use crate::domain::snapshot::CampaignPerformanceSnapshot;
use crate::domain::types::{AnomalyType, Severity};
use tracing::debug;

/// CVR 合理区间 (百分比), 超出视为指标离群
const CVR_SANE_RANGE: (f64, f64) = (0.1, 50.0);

/// 单项检出
struct Check {
    anomaly_type: AnomalyType,
    severity: Severity,
    trigger: String,
    recommendation: String,
}

// ==========================================
// AnomalyDetector - 异常检测器
// ==========================================
pub struct AnomalyDetector {
    // 无状态引擎,不需要注入依赖
}

impl AnomalyDetector {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 检测单个活动的数据异常
    ///
    /// 检查顺序 (每项都可抬升严重度):
    /// 1. missing_data (high): 30天消耗为 0 而预算 > 0
    /// 2. spike/drop (medium/high): 7天日均对30天日均的偏离超过阈值
    /// 3. outlier (medium/high): 7天 ROAS 对30天 ROAS 的偏离超过阈值
    /// 4. outlier (medium): 7天 CVR 超出 [0.1%, 50%]
    ///
    /// 多项检出时: 严重度取最大, 主类型取最高严重度对应的检查项,
    /// 全部触发说明保留在 triggers 中。
    pub fn detect(
        &self,
        snapshot: &CampaignPerformanceSnapshot,
        config: &AllocationConfig,
    ) -> AnomalyFinding {
        let mut checks: Vec<Check> = Vec::new();
        let threshold = config.anomaly_threshold;

        // 1. 数据缺失
        if snapshot.last_30d.spend <= 0.0 && snapshot.current_budget > 0.0 {
            checks.push(Check {
                anomaly_type: AnomalyType::MissingData,
                severity: Severity::High,
                trigger: format!(
                    "30天消耗为 0, 但当前预算为 {:.2}",
                    snapshot.current_budget
                ),
                recommendation: "检查投放状态与数据摄取管道, 补齐历史数据前不做预算调整".to_string(),
            });
        }

        // 2. 消耗突增/骤降
        let daily_avg_7d = snapshot.last_7d.daily_avg_spend();
        let daily_avg_30d = snapshot.last_30d.daily_avg_spend();
        if daily_avg_30d > 0.0 {
            let deviation = (daily_avg_7d - daily_avg_30d).abs() / daily_avg_30d;
            if deviation > threshold {
                let severity = if deviation > 2.0 * threshold {
                    Severity::High
                } else {
                    Severity::Medium
                };
                if daily_avg_7d > daily_avg_30d {
                    checks.push(Check {
                        anomaly_type: AnomalyType::Spike,
                        severity,
                        trigger: format!(
                            "7天日均消耗 {:.2} 较30天日均 {:.2} 偏离 {:.0}%",
                            daily_avg_7d,
                            daily_avg_30d,
                            deviation * 100.0
                        ),
                        recommendation: "确认消耗突增是否为有意的投放变更".to_string(),
                    });
                } else {
                    checks.push(Check {
                        anomaly_type: AnomalyType::Drop,
                        severity,
                        trigger: format!(
                            "7天日均消耗 {:.2} 较30天日均 {:.2} 偏离 {:.0}%",
                            daily_avg_7d,
                            daily_avg_30d,
                            deviation * 100.0
                        ),
                        recommendation: "排查投放受限或预算外部被调低的可能".to_string(),
                    });
                }
            }
        }

        // 3. ROAS 离群
        let roas_7d = snapshot.last_7d.roas();
        let roas_30d = snapshot.last_30d.roas();
        if roas_30d > 0.0 {
            let deviation = (roas_7d - roas_30d).abs() / roas_30d;
            if deviation > threshold {
                let severity = if deviation > 2.0 * threshold {
                    Severity::High
                } else {
                    Severity::Medium
                };
                checks.push(Check {
                    anomaly_type: AnomalyType::Outlier,
                    severity,
                    trigger: format!(
                        "7天 ROAS {:.2} 较30天 ROAS {:.2} 偏离 {:.0}%",
                        roas_7d,
                        roas_30d,
                        deviation * 100.0
                    ),
                    recommendation: "近期转化表现离群, 建议人工复核后再调整预算".to_string(),
                });
            }
        }

        // 4. CVR 越界
        let cvr_7d = snapshot.last_7d.cvr();
        if snapshot.last_7d.clicks > 0 && (cvr_7d < CVR_SANE_RANGE.0 || cvr_7d > CVR_SANE_RANGE.1)
        {
            checks.push(Check {
                anomaly_type: AnomalyType::Outlier,
                severity: Severity::Medium,
                trigger: format!(
                    "7天 CVR {:.2}% 超出合理区间 [{}%, {}%]",
                    cvr_7d, CVR_SANE_RANGE.0, CVR_SANE_RANGE.1
                ),
                recommendation: "核对转化归因配置是否正确".to_string(),
            });
        }

        if checks.is_empty() {
            return AnomalyFinding::none();
        }

        // 严重度取最大; 主类型与建议取最高严重度的首个检出
        let mut dominant_idx = 0;
        for (i, c) in checks.iter().enumerate() {
            if c.severity > checks[dominant_idx].severity {
                dominant_idx = i;
            }
        }
        let dominant = &checks[dominant_idx];
        let max_severity = dominant.severity;

        debug!(
            campaign_id = %snapshot.campaign_id,
            anomaly_type = %dominant.anomaly_type,
            severity = %max_severity,
            trigger_count = checks.len(),
            "检出数据异常"
        );

        AnomalyFinding {
            has_anomaly: true,
            anomaly_type: Some(dominant.anomaly_type),
            severity: Some(max_severity),
            recommendation: Some(dominant.recommendation.clone()),
            triggers: checks.into_iter().map(|c| c.trigger).collect(),
        }
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}
