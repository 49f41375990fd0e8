// ==========================================
// 广告预算智能分配引擎 - 命令行入口
// ==========================================
// 用法: ad-budget-allocator <group_id> [as_of] [db_path]
// 输出: 单次分配运行结果 (JSON)
// ==========================================

use ad_budget_allocator::api::AllocationApi;
use ad_budget_allocator::config::ConfigManager;
use ad_budget_allocator::engine::AllocationRepositories;
use ad_budget_allocator::{db, logging};
use chrono::Utc;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 默认数据库路径: <data_dir>/ad-budget-allocator/allocator.db
fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    base.join("ad-budget-allocator")
        .join("allocator.db")
        .to_string_lossy()
        .to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", ad_budget_allocator::APP_NAME);
    tracing::info!("系统版本: {}", ad_budget_allocator::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    let group_id = match args.get(1) {
        Some(g) => g.clone(),
        None => {
            eprintln!("用法: ad-budget-allocator <group_id> [as_of: YYYY-MM-DD] [db_path]");
            std::process::exit(2);
        }
    };
    let as_of = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
    let db_path = args.get(3).cloned().unwrap_or_else(get_default_db_path);

    tracing::info!("使用数据库: {}", db_path);

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 打开连接并初始化 schema
    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    // 装配仓储与接口
    let repos = AllocationRepositories::from_connection(conn.clone());
    let config_manager = Arc::new(ConfigManager::from_connection(conn)?);
    let api = AllocationApi::new(repos, config_manager);

    // 执行一次分配运行
    let result = api.run_allocation(&group_id, &as_of).await?;

    for warning in &result.warnings {
        tracing::warn!("{}", warning);
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
