// ==========================================
// 薪酬数据导入 - 向导位置持久化端口
// ==========================================
// 职责: 以 key-value 形式保存当前步骤与已选实体类型
// 约定: key 带版本后缀，结构变化时旧值自然失效
// 并发: 同一 key 多处写入时后写者生效，不做协调
// ==========================================

use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

/// 持久化端口
///
/// 签名不可失败: 实现方在存储异常时记录日志并按"无值"处理。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

// ==========================================
// MemoryKeyValueStore - 进程内实现
// ==========================================
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.lock() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                warn!(key = %key, error = %e, "内存存储锁获取失败");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
            }
            Err(e) => warn!(key = %key, error = %e, "内存存储锁获取失败，写入已丢弃"),
        }
    }
}
