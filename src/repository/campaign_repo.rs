// ==========================================
// CampaignRepository - 广告活动仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 写入面: 仅 set_budget (由 ApplicationEngine 调用)
// ==========================================

use crate::domain::campaign::Campaign;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct CampaignRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CampaignRepository {
    /// 创建新的活动仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<Campaign> {
        Ok(Campaign {
            campaign_id: row.get(0)?,
            campaign_name: row.get(1)?,
            group_id: row.get(2)?,
            daily_budget: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    // ==========================================
    // 读取操作
    // ==========================================

    /// 查询分组内所有活动
    ///
    /// # 返回
    /// - Ok(Vec<Campaign>): 分组为空时返回空列表 (非错误)
    pub fn get_campaigns_in_group(&self, group_id: &str) -> RepositoryResult<Vec<Campaign>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT campaign_id, campaign_name, group_id, daily_budget, created_at, updated_at
            FROM campaign
            WHERE group_id = ?1
            ORDER BY campaign_id
            "#,
        )?;

        let rows = stmt.query_map(params![group_id], Self::map_row)?;

        let mut campaigns = Vec::new();
        for row in rows {
            campaigns.push(row?);
        }
        Ok(campaigns)
    }

    /// 读取活动当前预算
    ///
    /// # 返回
    /// - Ok(f64): 当前每日预算
    /// - Err(NotFound): 活动不存在
    pub fn get_budget(&self, campaign_id: &str) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;

        conn.query_row(
            "SELECT daily_budget FROM campaign WHERE campaign_id = ?1",
            params![campaign_id],
            |row| row.get::<_, f64>(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Campaign".to_string(),
                id: campaign_id.to_string(),
            },
            other => other.into(),
        })
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 写入活动预算
    ///
    /// # 返回
    /// - Ok(()): 写入成功
    /// - Err(NotFound): 活动不存在
    pub fn set_budget(&self, campaign_id: &str, new_budget: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let rows = conn.execute(
            r#"
            UPDATE campaign
            SET daily_budget = ?2, updated_at = datetime('now')
            WHERE campaign_id = ?1
            "#,
            params![campaign_id, new_budget],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Campaign".to_string(),
                id: campaign_id.to_string(),
            });
        }
        Ok(())
    }
}
