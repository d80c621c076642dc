// ==========================================
// 薪酬数据导入 - 导入层
// ==========================================
// 职责: 原始文件 → 表格 → 列映射 → 行校验
// 支持: CSV/TSV/TXT 文本, XLSX/XLS/ODS 电子表格
// ==========================================

// 模块声明
pub mod column_mapper;
pub mod error;
pub mod file_parser;
pub mod row_validator;
pub mod table_decoder;

// 重导出核心类型
pub use column_mapper::{
    assign_target, missing_required_fields, normalize, similarity, ColumnMapper,
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_SAMPLE_COUNT,
};
pub use error::{ImportError, ImportResult};
pub use file_parser::{detect_delimiter, FileParser, DEFAULT_MAX_FILE_BYTES};
pub use row_validator::{parse_date, parse_number, RowValidator};

// 重导出 Trait 接口
pub use table_decoder::{CalamineDecoder, TableDecoder};
