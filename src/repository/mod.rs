// ==========================================
// 广告预算智能分配引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 连接: Arc<Mutex<Connection>> 共享, PRAGMA 统一由 db 模块配置
// ==========================================

pub mod campaign_repo;
pub mod error;
pub mod history_repo;
pub mod performance_repo;
pub mod suggestion_repo;

// 重导出核心仓储
pub use campaign_repo::CampaignRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::HistoryRepository;
pub use performance_repo::PerformanceRepository;
pub use suggestion_repo::SuggestionRepository;
