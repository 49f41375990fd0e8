// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据写入等功能
// ==========================================

use ad_budget_allocator::db;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - Arc<Mutex<Connection>>: 共享连接
pub fn create_test_db() -> Result<(NamedTempFile, Arc<Mutex<Connection>>), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非法")?
        .to_string();

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;

    Ok((temp_file, Arc::new(Mutex::new(conn))))
}

/// 写入一个测试活动
pub fn seed_campaign(
    conn: &Arc<Mutex<Connection>>,
    campaign_id: &str,
    campaign_name: &str,
    group_id: &str,
    daily_budget: f64,
) -> Result<(), Box<dyn Error>> {
    let conn = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
    conn.execute(
        r#"
        INSERT INTO campaign (campaign_id, campaign_name, group_id, daily_budget)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![campaign_id, campaign_name, group_id, daily_budget],
    )?;
    Ok(())
}

/// 写入连续 days 天完全一致的日绩效 (截止 as_of, 含)
///
/// 均匀数据让 7/14/30 天窗口的比值型指标全部为 1,
/// 便于构造稳定基线场景。
#[allow(clippy::too_many_arguments)]
pub fn seed_uniform_performance(
    conn: &Arc<Mutex<Connection>>,
    campaign_id: &str,
    as_of: NaiveDate,
    days: i64,
    daily_impressions: i64,
    daily_clicks: i64,
    daily_spend: f64,
    daily_sales: f64,
    daily_conversions: i64,
) -> Result<(), Box<dyn Error>> {
    let conn = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
    for offset in 0..days {
        let record_date = as_of - chrono::Duration::days(offset);
        conn.execute(
            r#"
            INSERT INTO daily_performance (
                campaign_id, record_date, impressions, clicks, spend, sales, conversions
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                campaign_id,
                record_date.format("%Y-%m-%d").to_string(),
                daily_impressions,
                daily_clicks,
                daily_spend,
                daily_sales,
                daily_conversions,
            ],
        )?;
    }
    Ok(())
}

/// 写入单天日绩效
#[allow(clippy::too_many_arguments)]
pub fn seed_daily_performance(
    conn: &Arc<Mutex<Connection>>,
    campaign_id: &str,
    record_date: NaiveDate,
    impressions: i64,
    clicks: i64,
    spend: f64,
    sales: f64,
    conversions: i64,
) -> Result<(), Box<dyn Error>> {
    let conn = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
    conn.execute(
        r#"
        INSERT INTO daily_performance (
            campaign_id, record_date, impressions, clicks, spend, sales, conversions
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            campaign_id,
            record_date.format("%Y-%m-%d").to_string(),
            impressions,
            clicks,
            spend,
            sales,
            conversions,
        ],
    )?;
    Ok(())
}
