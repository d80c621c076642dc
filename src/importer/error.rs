// ==========================================
// 薪酬数据导入 - 导入模块错误类型
// ==========================================
// 范围: 仅文件级终止错误（整文件失败，不做部分应用）
// 行级问题不是错误，见 ValidationIssue
// 工具: thiserror 派生宏
// ==========================================

use crate::i18n::t_with_args;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.tsv/.txt/.xlsx/.xlsm/.xlsb/.xls/.ods）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    UnreadableBytes(String),

    #[error("文件过大: {size} 字节（上限 {limit} 字节）")]
    FileTooLarge { size: u64, limit: u64 },

    // ===== 内容相关错误 =====
    #[error("文件为空")]
    EmptyFile,

    #[error("文件只有表头，没有数据行")]
    HeaderOnly,

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("电子表格解析失败: {0}")]
    SpreadsheetParseError(String),
}

impl ImportError {
    /// 面向用户的提示信息（按当前语言）
    pub fn user_message(&self) -> String {
        match self {
            ImportError::FileNotFound(path) => {
                t_with_args("import.file_not_found", &[("path", path)])
            }
            ImportError::UnsupportedFormat(ext) => {
                t_with_args("import.unsupported_format", &[("ext", ext)])
            }
            ImportError::UnreadableBytes(reason)
            | ImportError::CsvParseError(reason)
            | ImportError::SpreadsheetParseError(reason) => {
                t_with_args("import.unreadable", &[("reason", reason)])
            }
            ImportError::FileTooLarge { size, limit } => t_with_args(
                "import.file_too_large",
                &[("size", &size.to_string()), ("limit", &limit.to_string())],
            ),
            ImportError::EmptyFile => t_with_args("import.empty_file", &[]),
            ImportError::HeaderOnly => t_with_args("import.header_only", &[]),
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::UnreadableBytes(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::SpreadsheetParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
