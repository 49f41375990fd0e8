// ==========================================
// 广告预算智能分配引擎 - 分配配置
// ==========================================
// 红线: 配置是完整强类型结构, 加载时一次性解析默认值,
//       调用点禁止合并任意形状的 partial map
// 红线: 权重和必须为 1.0, 加载时校验, 不信任调用方输入
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 权重和允许的浮点误差
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// 配置校验错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("权重和必须为 1.0, 实际为 {actual}")]
    WeightSumInvalid { actual: f64 },

    #[error("配置项不能为负数 (field={field}, value={value})")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),
}

// ==========================================
// AllocationConfig - 分配配置
// ==========================================

/// 单次运行的分配配置 (调用方提供, 引擎只读)
///
/// 缺省值在反序列化时解析 (serde default),
/// 返回前必须通过 `validate()`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// 转化效率权重
    pub weight_conversion_efficiency: f64,
    /// ROAS 权重
    pub weight_roas: f64,
    /// 成长潜力权重
    pub weight_growth_potential: f64,
    /// 稳定性权重
    pub weight_stability: f64,
    /// 趋势权重
    pub weight_trend: f64,
    /// 单次调整幅度上限 (百分比)
    pub max_adjustment_percent: f64,
    /// 最低每日预算 (货币单位)
    pub min_daily_budget: f64,
    /// 两次调整之间的冷却天数
    pub cooldown_days: i64,
    /// 新活动保护期 (天)
    pub new_campaign_protection_days: i64,
    /// 异常阈值 (标准差倍数)
    pub anomaly_threshold: f64,
    /// 最少数据天数
    pub min_data_days: i64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            weight_conversion_efficiency: 0.25,
            weight_roas: 0.25,
            weight_growth_potential: 0.20,
            weight_stability: 0.15,
            weight_trend: 0.15,
            max_adjustment_percent: 25.0,
            min_daily_budget: 1.0,
            cooldown_days: 3,
            new_campaign_protection_days: 7,
            anomaly_threshold: 2.0,
            min_data_days: 7,
        }
    }
}

impl AllocationConfig {
    /// 五个权重之和
    pub fn weight_sum(&self) -> f64 {
        self.weight_conversion_efficiency
            + self.weight_roas
            + self.weight_growth_potential
            + self.weight_stability
            + self.weight_trend
    }

    /// 校验配置 (加载时调用, 失败即拒绝整个配置)
    ///
    /// # 校验项
    /// - 权重和 = 1.0 (±1e-6)
    /// - 各权重/阈值/预算非负
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSumInvalid { actual: sum });
        }

        let non_negative: [(&'static str, f64); 9] = [
            ("weight_conversion_efficiency", self.weight_conversion_efficiency),
            ("weight_roas", self.weight_roas),
            ("weight_growth_potential", self.weight_growth_potential),
            ("weight_stability", self.weight_stability),
            ("weight_trend", self.weight_trend),
            ("max_adjustment_percent", self.max_adjustment_percent),
            ("min_daily_budget", self.min_daily_budget),
            ("anomaly_threshold", self.anomaly_threshold),
            ("min_data_days", self.min_data_days as f64),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }

        Ok(())
    }

    /// 从 JSON 字符串解析并校验
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: AllocationConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}
