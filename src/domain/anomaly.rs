// ==========================================
// 广告预算智能分配引擎 - 异常检出
// ==========================================
// 红线: 异常不阻断评分, 只压低置信度并可能清零调整
// ==========================================

use crate::domain::types::{AnomalyType, Severity};
use serde::{Deserialize, Serialize};

/// 单活动的异常检出结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub has_anomaly: bool,
    /// 主异常类型 (取最高严重度对应的检查项)
    pub anomaly_type: Option<AnomalyType>,
    /// 严重度 (多项检出时取最大)
    pub severity: Option<Severity>,
    /// 每项触发检查的人类可读说明
    pub triggers: Vec<String>,
    /// 给运营的处理建议
    pub recommendation: Option<String>,
}

impl AnomalyFinding {
    /// 无异常的结果
    pub fn none() -> Self {
        Self {
            has_anomaly: false,
            anomaly_type: None,
            severity: None,
            triggers: Vec::new(),
            recommendation: None,
        }
    }

    /// 是否为数据缺失类异常 (会清零最终调整)
    pub fn is_missing_data(&self) -> bool {
        self.anomaly_type == Some(AnomalyType::MissingData)
    }
}
