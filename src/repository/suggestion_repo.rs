// ==========================================
// SuggestionRepository - 分配建议仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 嵌套结构 (评分/曲线/预测/理由) 以 JSON 列存储
// ==========================================

use crate::domain::suggestion::BudgetAllocationSuggestion;
use crate::domain::types::{RiskLevel, SuggestionStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

/// allocation_suggestion 表的原始行 (JSON 列未解析)
struct SuggestionRow {
    suggestion_id: String,
    group_id: String,
    campaign_id: String,
    campaign_name: String,
    current_budget: f64,
    suggested_budget: f64,
    adjustment_amount: f64,
    adjustment_percent: f64,
    score_json: String,
    curve_json: String,
    predicted_json: String,
    risk_level: String,
    risk_factors_json: String,
    reasons_json: String,
    confidence: f64,
    status: String,
    created_at: NaiveDateTime,
}

pub struct SuggestionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SuggestionRepository {
    /// 创建新的建议仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> rusqlite::Result<SuggestionRow> {
        Ok(SuggestionRow {
            suggestion_id: row.get(0)?,
            group_id: row.get(1)?,
            campaign_id: row.get(2)?,
            campaign_name: row.get(3)?,
            current_budget: row.get(4)?,
            suggested_budget: row.get(5)?,
            adjustment_amount: row.get(6)?,
            adjustment_percent: row.get(7)?,
            score_json: row.get(8)?,
            curve_json: row.get(9)?,
            predicted_json: row.get(10)?,
            risk_level: row.get(11)?,
            risk_factors_json: row.get(12)?,
            reasons_json: row.get(13)?,
            confidence: row.get(14)?,
            status: row.get(15)?,
            created_at: row.get(16)?,
        })
    }

    /// 解析 JSON 列, 还原完整建议实体
    fn hydrate(row: SuggestionRow) -> RepositoryResult<BudgetAllocationSuggestion> {
        Ok(BudgetAllocationSuggestion {
            suggestion_id: row.suggestion_id,
            group_id: row.group_id,
            campaign_id: row.campaign_id,
            campaign_name: row.campaign_name,
            current_budget: row.current_budget,
            suggested_budget: row.suggested_budget,
            adjustment_amount: row.adjustment_amount,
            adjustment_percent: row.adjustment_percent,
            score: serde_json::from_str(&row.score_json)?,
            curve: serde_json::from_str(&row.curve_json)?,
            predicted: serde_json::from_str(&row.predicted_json)?,
            risk_level: RiskLevel::from_str(&row.risk_level),
            risk_factors: serde_json::from_str(&row.risk_factors_json)?,
            reasons: serde_json::from_str(&row.reasons_json)?,
            confidence: row.confidence,
            status: SuggestionStatus::from_str(&row.status),
            created_at: row.created_at,
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        SELECT suggestion_id, group_id, campaign_id, campaign_name,
               current_budget, suggested_budget, adjustment_amount, adjustment_percent,
               score_json, curve_json, predicted_json,
               risk_level, risk_factors_json, reasons_json,
               confidence, status, created_at
        FROM allocation_suggestion
    "#;

    // ==========================================
    // 写入操作
    // ==========================================

    /// 批量插入分配建议 (单事务)
    ///
    /// # 返回
    /// - Ok(count): 插入条数
    pub fn insert_batch(
        &self,
        suggestions: &[BudgetAllocationSuggestion],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for s in suggestions {
            tx.execute(
                r#"
                INSERT INTO allocation_suggestion (
                    suggestion_id, group_id, campaign_id, campaign_name,
                    current_budget, suggested_budget, adjustment_amount, adjustment_percent,
                    score_json, curve_json, predicted_json,
                    risk_level, risk_factors_json, reasons_json,
                    confidence, status, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
                "#,
                params![
                    s.suggestion_id,
                    s.group_id,
                    s.campaign_id,
                    s.campaign_name,
                    s.current_budget,
                    s.suggested_budget,
                    s.adjustment_amount,
                    s.adjustment_percent,
                    serde_json::to_string(&s.score)?,
                    serde_json::to_string(&s.curve)?,
                    serde_json::to_string(&s.predicted)?,
                    s.risk_level.to_db_str(),
                    serde_json::to_string(&s.risk_factors)?,
                    serde_json::to_string(&s.reasons)?,
                    s.confidence,
                    s.status.to_db_str(),
                    s.created_at,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 更新建议状态
    pub fn update_status(
        &self,
        suggestion_id: &str,
        status: SuggestionStatus,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let rows = conn.execute(
            "UPDATE allocation_suggestion SET status = ?2 WHERE suggestion_id = ?1",
            params![suggestion_id, status.to_db_str()],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "AllocationSuggestion".to_string(),
                id: suggestion_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 读取操作
    // ==========================================

    /// 按ID读取建议
    pub fn get_by_id(&self, suggestion_id: &str) -> RepositoryResult<BudgetAllocationSuggestion> {
        let conn = self.get_conn()?;

        let sql = format!("{} WHERE suggestion_id = ?1", Self::SELECT_COLUMNS);
        let raw = conn
            .query_row(&sql, params![suggestion_id], Self::map_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "AllocationSuggestion".to_string(),
                    id: suggestion_id.to_string(),
                },
                other => other.into(),
            })?;

        Self::hydrate(raw)
    }

    /// 按分组列出建议
    pub fn list_by_group(
        &self,
        group_id: &str,
    ) -> RepositoryResult<Vec<BudgetAllocationSuggestion>> {
        let conn = self.get_conn()?;

        let sql = format!(
            "{} WHERE group_id = ?1 ORDER BY created_at DESC, campaign_id",
            Self::SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![group_id], Self::map_row)?;

        let mut suggestions = Vec::new();
        for row in rows {
            suggestions.push(Self::hydrate(row?)?);
        }
        Ok(suggestions)
    }
}
