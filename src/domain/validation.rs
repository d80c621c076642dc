// ==========================================
// 薪酬数据导入 - 校验结果模型
// ==========================================
// 职责: 行级问题、行级结果、整表结果
// 红线: ValidationResult 是 (rows, mappings, schema) 的纯投影，不做增量修补
// ==========================================

use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// CellValue - 转换后的单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }
}

/// 行数据: 字段 key → 转换后的值
pub type RowData = BTreeMap<String, CellValue>;

// ==========================================
// ValidationIssue - 校验问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub row: usize,         // 行号（从 1 开始）
    pub column: String,     // 源列名
    pub field: String,      // 目标字段 key（跨字段规则为 "p50/p75" 形式）
    pub value: String,      // 原始值
    pub message: String,    // 提示信息
    pub severity: Severity, // 级别
}

impl ValidationIssue {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ==========================================
// RowValidationResult - 单行校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowValidationResult {
    pub row_index: usize,              // 行下标（从 0 开始）
    pub is_valid: bool,                // 无 Error 级问题
    pub has_warnings: bool,            // 有效且至少一个 Warning
    pub issues: Vec<ValidationIssue>,  // 本行问题
    pub data: RowData,                 // 转换后的数据（仅已映射字段）
}

impl RowValidationResult {
    /// 由问题列表与数据构建，is_valid / has_warnings 由问题派生
    pub fn new(row_index: usize, issues: Vec<ValidationIssue>, data: RowData) -> Self {
        let is_valid = !issues.iter().any(ValidationIssue::is_error);
        let has_warnings = is_valid && issues.iter().any(|i| i.severity == Severity::Warning);
        Self {
            row_index,
            is_valid,
            has_warnings,
            issues,
            data,
        }
    }
}

// ==========================================
// ValidationResult - 整表校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub total_rows: usize,   // 总行数
    pub valid_rows: usize,   // 有效且无警告
    pub warning_rows: usize, // 有效但有警告
    pub error_rows: usize,   // 无效
    pub issues: Vec<ValidationIssue>,
    pub rows: Vec<RowValidationResult>,
}

impl ValidationResult {
    /// 由行结果汇总
    pub fn from_rows(rows: Vec<RowValidationResult>) -> Self {
        let warning_rows = rows.iter().filter(|r| r.has_warnings).count();
        let error_rows = rows.iter().filter(|r| !r.is_valid).count();
        let issues = rows.iter().flat_map(|r| r.issues.iter().cloned()).collect();

        Self {
            total_rows: rows.len(),
            valid_rows: rows.len() - warning_rows - error_rows,
            warning_rows,
            error_rows,
            issues,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> ValidationIssue {
        ValidationIssue {
            row: 1,
            column: "Email".to_string(),
            field: "email".to_string(),
            value: "x".to_string(),
            message: "m".to_string(),
            severity,
        }
    }

    #[test]
    fn test_row_validity_derived_from_severity() {
        let row = RowValidationResult::new(0, vec![issue(Severity::Warning)], RowData::new());
        assert!(row.is_valid);
        assert!(row.has_warnings);

        let row = RowValidationResult::new(
            0,
            vec![issue(Severity::Warning), issue(Severity::Error)],
            RowData::new(),
        );
        assert!(!row.is_valid);
        assert!(!row.has_warnings);
    }

    #[test]
    fn test_result_counts_partition_rows() {
        let result = ValidationResult::from_rows(vec![
            RowValidationResult::new(0, vec![], RowData::new()),
            RowValidationResult::new(1, vec![issue(Severity::Warning)], RowData::new()),
            RowValidationResult::new(2, vec![issue(Severity::Error)], RowData::new()),
        ]);

        assert_eq!(result.total_rows, 3);
        assert_eq!(result.valid_rows, 1);
        assert_eq!(result.warning_rows, 1);
        assert_eq!(result.error_rows, 1);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn test_cell_value_untagged_serde() {
        let json = serde_json::to_string(&CellValue::Number(1200.0)).unwrap();
        assert_eq!(json, "1200.0");
        let json = serde_json::to_string(&CellValue::Text("a".into())).unwrap();
        assert_eq!(json, "\"a\"");
    }
}
