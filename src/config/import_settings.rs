// ==========================================
// 薪酬数据导入 - 导入配置值对象
// ==========================================

use crate::importer::column_mapper::{
    ColumnMapper, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_SAMPLE_COUNT,
};
use crate::importer::file_parser::DEFAULT_MAX_FILE_BYTES;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub confidence_threshold: f64, // 映射阈值
    pub sample_count: usize,       // 每列样例值数量
    pub max_file_bytes: u64,       // 上传大小上限
    pub locale: String,            // 界面语言
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            sample_count: DEFAULT_SAMPLE_COUNT,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ImportSettings {
    pub fn column_mapper(&self) -> ColumnMapper {
        ColumnMapper::new(self.confidence_threshold, self.sample_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ImportSettings = serde_json::from_str(r#"{"sample_count": 5}"#).unwrap();
        assert_eq!(settings.sample_count, 5);
        assert_eq!(settings.confidence_threshold, 0.5);
        assert_eq!(settings.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.locale, "en");
    }
}
