// ==========================================
// 薪酬数据导入 - 解析后文件模型
// ==========================================
// 职责: 文件解析阶段的唯一产物（上传一次生成一次，之后只读）
// 不变量: 所有数据行宽度 == 表头宽度
// ==========================================

use crate::domain::types::SourceFormat;
use serde::{Deserialize, Serialize};

// ==========================================
// ParsedFile - 解析后的表格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub headers: Vec<String>,   // 表头（已补齐/截断到统一宽度）
    pub rows: Vec<Vec<String>>, // 数据行（已补齐/截断到统一宽度）
    pub row_count: usize,       // 数据行数
    pub file_name: String,      // 源文件名
    pub file_size: u64,         // 源文件字节数
    pub format: SourceFormat,   // 检测到的格式
}

impl ParsedFile {
    /// 由原始行构建（第一行为表头）
    ///
    /// 宽度取所有行（含表头）的最大列数，短行补空串，长行截断。
    /// 调用方需保证 `table` 至少包含表头行。
    pub(crate) fn from_table(
        mut table: Vec<Vec<String>>,
        file_name: &str,
        file_size: u64,
        format: SourceFormat,
    ) -> Self {
        let width = table.iter().map(Vec::len).max().unwrap_or(0);
        for row in table.iter_mut() {
            row.resize(width, String::new());
        }

        let mut iter = table.into_iter();
        let headers = iter.next().unwrap_or_default();
        let rows: Vec<Vec<String>> = iter.collect();

        Self {
            headers,
            row_count: rows.len(),
            rows,
            file_name: file_name.to_string(),
            file_size,
            format,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_from_table_pads_to_widest_row() {
        let table = vec![
            strings(&["a", "b"]),
            strings(&["1"]),
            strings(&["1", "2", "3"]),
        ];

        let parsed = ParsedFile::from_table(table, "t.csv", 10, SourceFormat::Text);

        assert_eq!(parsed.headers, strings(&["a", "b", ""]));
        assert_eq!(parsed.rows[0], strings(&["1", "", ""]));
        assert_eq!(parsed.rows[1], strings(&["1", "2", "3"]));
        assert_eq!(parsed.row_count, 2);
        assert_eq!(parsed.column_count(), 3);
    }
}
