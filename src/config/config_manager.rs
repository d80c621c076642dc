// ==========================================
// 薪酬数据导入 - 配置管理器
// ==========================================
// 职责: 导入配置加载、查询、覆写
// 存储: config_kv 表 (scope_id = 'global')
// 容错: 缺失或格式错误的值回退为默认值并记录告警
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::config::import_settings::{ImportSettings, DEFAULT_LOCALE};
use crate::db::{ensure_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（表不存在时自动创建）
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA 并建表（均幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取并解析配置值；不存在或解析失败时返回默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 写入 global 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 将一组配置整体写入（用于初始化或导入配置）
    pub fn save_settings(&self, settings: &ImportSettings) -> Result<(), Box<dyn Error>> {
        self.set_config_value(
            config_keys::CONFIDENCE_THRESHOLD,
            &settings.confidence_threshold.to_string(),
        )?;
        self.set_config_value(config_keys::SAMPLE_COUNT, &settings.sample_count.to_string())?;
        self.set_config_value(config_keys::MAX_FILE_BYTES, &settings.max_file_bytes.to_string())?;
        self.set_config_value(config_keys::LOCALE, &settings.locale)?;
        Ok(())
    }

    /// 获取 global 配置快照（JSON 格式，key 有序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_confidence_threshold(&self) -> Result<f64, Box<dyn Error>> {
        let default = ImportSettings::default().confidence_threshold;
        let value = self.get_parsed_or_default(config_keys::CONFIDENCE_THRESHOLD, default)?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            warn!(value = value, "映射阈值超出 [0,1]，使用默认值");
            Ok(default)
        }
    }

    async fn get_sample_count(&self) -> Result<usize, Box<dyn Error>> {
        let default = ImportSettings::default().sample_count;
        self.get_parsed_or_default(config_keys::SAMPLE_COUNT, default)
    }

    async fn get_max_file_bytes(&self) -> Result<u64, Box<dyn Error>> {
        let default = ImportSettings::default().max_file_bytes;
        self.get_parsed_or_default(config_keys::MAX_FILE_BYTES, default)
    }

    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::LOCALE)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOCALE.to_string()))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const CONFIDENCE_THRESHOLD: &str = "import.confidence_threshold";
    pub const SAMPLE_COUNT: &str = "import.sample_count";
    pub const MAX_FILE_BYTES: &str = "import.max_file_bytes";
    pub const LOCALE: &str = "ui.locale";
}
