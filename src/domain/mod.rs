// ==========================================
// 薪酬数据导入 - 领域模型层
// ==========================================
// 职责: 定义管道各阶段的数据结构与枚举
// 红线: 不含解析/映射/校验逻辑
// ==========================================

pub mod mapping;
pub mod parsed_file;
pub mod types;
pub mod validation;

// 重导出核心类型
pub use mapping::{is_injective, ColumnMapping};
pub use parsed_file::ParsedFile;
pub use types::{EntityType, FieldType, Severity, SourceFormat, WizardStep};
pub use validation::{CellValue, RowData, RowValidationResult, ValidationIssue, ValidationResult};
