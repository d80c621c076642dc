// ==========================================
// 薪酬数据导入 - 电子表格解码能力
// ==========================================
// 职责: 二进制电子表格 → 字符串行（仅第一个工作表）
// 说明: 以 trait 注入解析器，管道本身不依赖具体解码库
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;

// ==========================================
// TableDecoder Trait
// ==========================================
// 用途: 二进制表格解码接口
// 实现者: CalamineDecoder（测试中可替换为桩实现）
pub trait TableDecoder: Send + Sync {
    /// 解码为行列表（每行为单元格字符串，已 trim，空行已跳过）
    fn decode(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>>;
}

// ==========================================
// CalamineDecoder - 基于 calamine 的实现
// ==========================================
// 支持: xlsx / xlsm / xlsb / xls / ods（按内容自动识别）
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineDecoder;

impl TableDecoder for CalamineDecoder {
    fn decode(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 只读第一个 sheet
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::SpreadsheetParseError("工作簿无工作表".to_string()))??;

        let rows = range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect::<Vec<String>>()
            })
            // 跳过完全空白的行
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calamine_decoder_rejects_garbage() {
        let result = CalamineDecoder.decode(b"definitely not a workbook");
        assert!(matches!(result, Err(ImportError::SpreadsheetParseError(_))));
    }
}
