// ==========================================
// 广告预算智能分配引擎 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 转换底层错误为用户友好的错误消息
// 红线: 所有错误信息必须包含显式原因 (可解释性)
// ==========================================

use crate::config::ConfigError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("配置无效: {0}")]
    ConfigInvalid(#[from] ConfigError),

    // ==========================================
    // 底层错误透传
    // ==========================================
    #[error(transparent)]
    Repository(RepositoryError),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            other => ApiError::Repository(other),
        }
    }
}

impl From<Box<dyn std::error::Error>> for ApiError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
