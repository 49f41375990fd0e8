// ==========================================
// 广告预算智能分配引擎 - API 层
// ==========================================
// 职责: 业务接口, 输入校验与错误转换
// ==========================================

pub mod allocation_api;
pub mod error;

// 重导出核心接口
pub use allocation_api::AllocationApi;
pub use error::{ApiError, ApiResult};
