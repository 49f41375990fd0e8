// ==========================================
// 广告预算智能分配引擎 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 统一 schema 初始化入口，二进制入口与集成测试共用同一套建表语句
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 说明：
/// - campaign / daily_performance / config_kv 属于协作方数据，
///   本引擎只读（引擎红线：除 ApplicationEngine 外不产生写入）
/// - allocation_suggestion / budget_change_log 为本系统的输出表
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS campaign (
            campaign_id   TEXT PRIMARY KEY,
            campaign_name TEXT NOT NULL,
            group_id      TEXT NOT NULL,
            daily_budget  REAL NOT NULL,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_campaign_group ON campaign(group_id);

        CREATE TABLE IF NOT EXISTS daily_performance (
            campaign_id TEXT NOT NULL REFERENCES campaign(campaign_id) ON DELETE CASCADE,
            record_date TEXT NOT NULL,
            impressions INTEGER NOT NULL DEFAULT 0,
            clicks      INTEGER NOT NULL DEFAULT 0,
            spend       REAL NOT NULL DEFAULT 0,
            sales       REAL NOT NULL DEFAULT 0,
            conversions INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (campaign_id, record_date)
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id   TEXT NOT NULL,
            key        TEXT NOT NULL,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS allocation_suggestion (
            suggestion_id      TEXT PRIMARY KEY,
            group_id           TEXT NOT NULL,
            campaign_id        TEXT NOT NULL,
            campaign_name      TEXT NOT NULL,
            current_budget     REAL NOT NULL,
            suggested_budget   REAL NOT NULL,
            adjustment_amount  REAL NOT NULL,
            adjustment_percent REAL NOT NULL,
            score_json         TEXT NOT NULL,
            curve_json         TEXT NOT NULL,
            predicted_json     TEXT NOT NULL,
            risk_level         TEXT NOT NULL,
            risk_factors_json  TEXT NOT NULL,
            reasons_json       TEXT NOT NULL,
            confidence         REAL NOT NULL,
            status             TEXT NOT NULL DEFAULT 'PENDING',
            created_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_suggestion_group ON allocation_suggestion(group_id);

        CREATE TABLE IF NOT EXISTS budget_change_log (
            log_id                TEXT PRIMARY KEY,
            campaign_id           TEXT NOT NULL,
            budget_before         REAL NOT NULL,
            budget_after          REAL NOT NULL,
            metrics_snapshot_json TEXT,
            reason                TEXT NOT NULL,
            actor                 TEXT NOT NULL,
            changed_at            TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_change_log_campaign ON budget_change_log(campaign_id);
        "#,
    )?;
    Ok(())
}
