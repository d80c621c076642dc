// ==========================================
// 薪酬数据导入 - 文件解析器实现
// ==========================================
// 职责: 原始字节 → ParsedFile
// 支持: 分隔符文本 (.csv/.tsv/.txt) / 电子表格 (.xlsx/.xlsm/.xlsb/.xls/.ods)
// 红线: 错误以返回值表达，不做部分应用
// ==========================================

use crate::domain::parsed_file::ParsedFile;
use crate::domain::types::SourceFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::table_decoder::{CalamineDecoder, TableDecoder};
use csv::{ReaderBuilder, Terminator};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 默认上传大小上限（10 MiB）
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

const TEXT_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];
const BINARY_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const OLE2_MAGIC: [u8; 4] = [0xD0, 0xCF, 0x11, 0xE0];

// ==========================================
// FileParser - 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct FileParser {
    decoder: Arc<dyn TableDecoder>,
    max_file_bytes: u64,
}

impl Default for FileParser {
    fn default() -> Self {
        Self::new(Arc::new(CalamineDecoder))
    }
}

impl FileParser {
    /// 创建解析器
    ///
    /// # 参数
    /// - decoder: 二进制表格解码能力（文本路径不使用）
    pub fn new(decoder: Arc<dyn TableDecoder>) -> Self {
        Self {
            decoder,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// 从磁盘读取并解析（唯一的异步边界）
    pub async fn parse_path<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ParsedFile> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        self.parse_bytes(&file_name, &bytes)
    }

    /// 解析上传的字节
    ///
    /// # 参数
    /// - file_name: 源文件名（用于判断扩展名）
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(ParsedFile): 至少包含表头和一行数据
    /// - Err: 空文件 / 只有表头 / 格式不支持 / 无法读取
    pub fn parse_bytes(&self, file_name: &str, bytes: &[u8]) -> ImportResult<ParsedFile> {
        let file_size = bytes.len() as u64;
        if file_size > self.max_file_bytes {
            return Err(ImportError::FileTooLarge {
                size: file_size,
                limit: self.max_file_bytes,
            });
        }

        let format = resolve_format(file_name, bytes)?;
        debug!(file_name = %file_name, format = %format, size = file_size, "开始解析文件");

        let table = match format {
            SourceFormat::Text => decode_text(bytes)?,
            SourceFormat::Binary => self.decoder.decode(bytes)?,
        };

        // 跳过完全空白的行（两条路径统一处理）
        let table: Vec<Vec<String>> = table
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        match table.len() {
            0 => {
                warn!(file_name = %file_name, "文件为空");
                return Err(ImportError::EmptyFile);
            }
            1 => {
                warn!(file_name = %file_name, "文件只有表头");
                return Err(ImportError::HeaderOnly);
            }
            _ => {}
        }

        let parsed = ParsedFile::from_table(table, file_name, file_size, format);
        info!(
            file_name = %file_name,
            format = %format,
            rows = parsed.row_count,
            columns = parsed.column_count(),
            "文件解析完成"
        );
        Ok(parsed)
    }
}

/// 判断源格式：优先扩展名，无扩展名时按文件头魔数嗅探
fn resolve_format(file_name: &str, bytes: &[u8]) -> ImportResult<SourceFormat> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some(ext) if TEXT_EXTENSIONS.contains(&ext) => Ok(SourceFormat::Text),
        Some(ext) if BINARY_EXTENSIONS.contains(&ext) => Ok(SourceFormat::Binary),
        Some(ext) => Err(ImportError::UnsupportedFormat(ext.to_string())),
        None if bytes.starts_with(&ZIP_MAGIC) || bytes.starts_with(&OLE2_MAGIC) => {
            Ok(SourceFormat::Binary)
        }
        None => Ok(SourceFormat::Text),
    }
}

/// 检测分隔符：统计首行中逗号/分号/制表符出现次数
///
/// 取最多者；并列时制表符优先，其次分号，否则逗号。
pub fn detect_delimiter(first_line: &str) -> u8 {
    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();
    let tabs = first_line.matches('\t').count();

    if tabs > 0 && tabs >= commas && tabs >= semicolons {
        b'\t'
    } else if semicolons > 0 && semicolons >= commas {
        b';'
    } else {
        b','
    }
}

/// 文本路径：去 BOM → 统一换行 → 检测分隔符 → 按引号规则切分
fn decode_text(bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| ImportError::UnreadableBytes(format!("非 UTF-8 文本: {}", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let first_line = normalized.split('\n').next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);
    debug!(delimiter = ?(delimiter as char), "检测到分隔符");

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 允许行长度不一致
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(normalized.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // 与二进制路径一致: 引号内的首尾空白同样去掉
        rows.push(
            record
                .iter()
                .map(|cell| cell.trim().to_string())
                .collect::<Vec<String>>(),
        );
    }

    Ok(rows)
}
