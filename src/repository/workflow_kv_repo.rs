// ==========================================
// 薪酬数据导入 - 向导位置仓储（SQLite）
// ==========================================
// 职责: KeyValueStore 端口的 SQLite 实现
// 存储: workflow_kv 表（key 唯一，UPSERT，记录 updated_at）
// 容错: 端口签名不可失败，数据库异常记日志后按"无值"处理
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::staging::store::KeyValueStore;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

// ==========================================
// SqliteKeyValueStore
// ==========================================
pub struct SqliteKeyValueStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStore {
    /// 创建新的仓储实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 使用共享连接创建实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取值
    pub fn find_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM workflow_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入值（UPSERT）
    pub fn upsert_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO workflow_kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// 读取最后更新时间（RFC3339）
    pub fn find_updated_at(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT updated_at FROM workflow_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.find_value(key) {
            Ok(value) => value,
            Err(e) => {
                error!(key = %key, error = %e, "读取向导位置失败");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self.upsert_value(key, value) {
            Ok(()) => debug!(key = %key, value = %value, "向导位置已保存"),
            Err(e) => error!(key = %key, error = %e, "保存向导位置失败"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteKeyValueStore {
        let conn = Connection::open_in_memory().unwrap();
        SqliteKeyValueStore::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_upsert_overwrites() {
        let store = store();
        assert_eq!(store.get("import_wizard.step.v1"), None);

        store.set("import_wizard.step.v1", "file-upload");
        store.set("import_wizard.step.v1", "validation");

        assert_eq!(store.get("import_wizard.step.v1").as_deref(), Some("validation"));
        assert!(store.find_updated_at("import_wizard.step.v1").unwrap().is_some());
    }
}
