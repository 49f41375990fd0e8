// ==========================================
// HistoryRepository - 预算变更日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::domain::change_log::BudgetChangeLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct HistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HistoryRepository {
    /// 创建新的变更日志仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<BudgetChangeLog> {
        let metrics_raw: Option<String> = row.get(4)?;
        Ok(BudgetChangeLog {
            log_id: row.get(0)?,
            campaign_id: row.get(1)?,
            budget_before: row.get(2)?,
            budget_after: row.get(3)?,
            metrics_snapshot_json: metrics_raw.and_then(|s| serde_json::from_str(&s).ok()),
            reason: row.get(5)?,
            actor: row.get(6)?,
            changed_at: row.get(7)?,
        })
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入预算变更记录
    ///
    /// # 返回
    /// - Ok(log_id): 成功插入,返回log_id
    pub fn record_change(&self, log: &BudgetChangeLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO budget_change_log (
                log_id, campaign_id, budget_before, budget_after,
                metrics_snapshot_json, reason, actor, changed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                log.log_id,
                log.campaign_id,
                log.budget_before,
                log.budget_after,
                log.metrics_snapshot_json.as_ref().map(|v| v.to_string()),
                log.reason,
                log.actor,
                log.changed_at,
            ],
        )?;

        Ok(log.log_id.clone())
    }

    // ==========================================
    // 读取操作
    // ==========================================

    /// 按活动列出变更历史 (新到旧)
    pub fn list_by_campaign(&self, campaign_id: &str) -> RepositoryResult<Vec<BudgetChangeLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT log_id, campaign_id, budget_before, budget_after,
                   metrics_snapshot_json, reason, actor, changed_at
            FROM budget_change_log
            WHERE campaign_id = ?1
            ORDER BY changed_at DESC
            "#,
        )?;

        let rows = stmt.query_map(params![campaign_id], Self::map_row)?;

        let mut logs = Vec::new();
        for row in rows {
            logs.push(row?);
        }
        Ok(logs)
    }
}
