// ==========================================
// 广告预算智能分配引擎 - 配置层
// ==========================================
// 职责: 分配配置的加载与校验, 支持分组级覆写
// 存储: config_kv 表
// ==========================================

pub mod allocation_config;
pub mod config_manager;

// 重导出核心配置类型
pub use allocation_config::{AllocationConfig, ConfigError};
pub use config_manager::{ConfigManager, ALLOCATION_CONFIG_KEY};
