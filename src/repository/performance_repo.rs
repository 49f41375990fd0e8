// ==========================================
// PerformanceRepository - 绩效数据仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 只读: 日绩效由协作方的摄取管道写入
// ==========================================

use crate::domain::snapshot::WindowAggregate;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct PerformanceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PerformanceRepository {
    /// 创建新的绩效仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 聚合指定窗口内的绩效合计
    ///
    /// 窗口口径: record_date ∈ (end−days, end], 恰好 days 个自然日。
    /// 缺失的日行按 0 计入 (COALESCE), 不按缺席处理。
    ///
    /// # 参数
    /// - `campaign_id`: 活动ID
    /// - `end`: 窗口结束日 (含)
    /// - `days`: 窗口天数
    pub fn get_window_totals(
        &self,
        campaign_id: &str,
        end: NaiveDate,
        days: i64,
    ) -> RepositoryResult<WindowAggregate> {
        let conn = self.get_conn()?;

        let start = end - chrono::Duration::days(days);
        let (impressions, clicks, spend, sales, conversions) = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(impressions), 0),
                COALESCE(SUM(clicks), 0),
                COALESCE(SUM(spend), 0.0),
                COALESCE(SUM(sales), 0.0),
                COALESCE(SUM(conversions), 0)
            FROM daily_performance
            WHERE campaign_id = ?1
              AND record_date > ?2
              AND record_date <= ?3
            "#,
            params![
                campaign_id,
                start.format("%Y-%m-%d").to_string(),
                end.format("%Y-%m-%d").to_string(),
            ],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        )?;

        Ok(WindowAggregate {
            days,
            impressions,
            clicks,
            spend,
            sales,
            conversions,
        })
    }

    /// 插入一条日绩效记录 (测试与数据工具使用)
    pub fn insert_daily_record(
        &self,
        campaign_id: &str,
        record_date: NaiveDate,
        impressions: i64,
        clicks: i64,
        spend: f64,
        sales: f64,
        conversions: i64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO daily_performance (
                campaign_id, record_date, impressions, clicks, spend, sales, conversions
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(campaign_id, record_date) DO UPDATE SET
                impressions = excluded.impressions,
                clicks = excluded.clicks,
                spend = excluded.spend,
                sales = excluded.sales,
                conversions = excluded.conversions
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
}
