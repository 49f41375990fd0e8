// ==========================================
// 广告预算智能分配引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 查找顺序: group/{group_id} -> global -> 内置默认值
// ==========================================

use crate::config::allocation_config::{AllocationConfig, ConfigError};
use crate::db::configure_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 分配配置在 config_kv 中的键
pub const ALLOCATION_CONFIG_KEY: &str = "allocation_config";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取指定 scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(
        &self,
        scope_id: &str,
        key: &str,
    ) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![scope_id, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入指定 scope 的配置值 (测试与运维工具使用)
    pub fn set_config_value(
        &self,
        scope_id: &str,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![scope_id, key, value],
        )?;
        Ok(())
    }

    /// 获取分组的分配配置
    ///
    /// # 查找顺序
    /// 1. scope `group/{group_id}`
    /// 2. scope `global`
    /// 3. 内置默认值
    ///
    /// # 返回
    /// - Ok(AllocationConfig): 已通过校验的完整配置
    /// - Err: 存储错误, 或配置存在但未通过校验 (权重和≠1 等)
    pub fn get_allocation_config(
        &self,
        group_id: &str,
    ) -> Result<AllocationConfig, Box<dyn Error>> {
        let group_scope = format!("group/{}", group_id);

        let raw = match self.get_config_value(&group_scope, ALLOCATION_CONFIG_KEY)? {
            Some(v) => {
                debug!(scope = %group_scope, "使用分组级分配配置");
                Some(v)
            }
            None => match self.get_config_value("global", ALLOCATION_CONFIG_KEY)? {
                Some(v) => {
                    debug!("使用全局分配配置");
                    Some(v)
                }
                None => None,
            },
        };

        let config = match raw {
            Some(raw) => AllocationConfig::from_json(&raw)
                .map_err(|e: ConfigError| Box::new(e) as Box<dyn Error>)?,
            None => {
                debug!("配置不存在, 使用内置默认值");
                AllocationConfig::default()
            }
        };

        Ok(config)
    }
}
