// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、临时上传文件、记录型交付端
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use comp_import::db::{ensure_schema, open_sqlite_connection};
use comp_import::importer::ImportResult;
use comp_import::{EntityType, ImportSink, RowData, TableDecoder};
use std::error::Error;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入临时上传文件
///
/// # 参数
/// - suffix: 文件扩展名（含点，例如 ".csv"）
/// - content: 文件内容
pub fn write_upload(suffix: &str, content: &[u8]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(content)?;
    file.flush()?;
    Ok(file)
}

/// 固定输出的表格解码器（代替真实电子表格）
pub struct FixedDecoder {
    pub table: Vec<Vec<String>>,
}

impl FixedDecoder {
    pub fn new(rows: &[&[&str]]) -> Self {
        Self {
            table: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }
}

impl TableDecoder for FixedDecoder {
    fn decode(&self, _bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
        Ok(self.table.clone())
    }
}

/// 记录收到的决策集
#[derive(Default)]
pub struct RecordingSink {
    pub received: Mutex<Vec<(EntityType, Vec<RowData>)>>,
}

impl RecordingSink {
    pub fn rows(&self) -> Vec<RowData> {
        self.received
            .lock()
            .map(|r| r.iter().flat_map(|(_, rows)| rows.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImportSink for RecordingSink {
    async fn accept(&self, entity_type: EntityType, rows: Vec<RowData>) -> anyhow::Result<usize> {
        let count = rows.len();
        self.received
            .lock()
            .map_err(|e| anyhow::anyhow!("锁获取失败: {}", e))?
            .push((entity_type, rows));
        Ok(count)
    }
}
