// ==========================================
// 薪酬数据导入 - 领域类型定义
// ==========================================
// 职责: 实体类型、字段类型、问题级别、向导步骤等枚举
// 序列化格式: 与前端/外部系统约定的 wire 名称保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 实体类型 (Entity Type)
// ==========================================
// 三种固定的目标记录结构
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Employees,           // 员工花名册
    Benchmarks,          // 市场薪酬基准
    CompensationChanges, // 调薪记录
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [
        EntityType::Employees,
        EntityType::Benchmarks,
        EntityType::CompensationChanges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Employees => "employees",
            EntityType::Benchmarks => "benchmarks",
            EntityType::CompensationChanges => "compensation-changes",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employees" | "employee" | "roster" => Ok(EntityType::Employees),
            "benchmarks" | "benchmark" => Ok(EntityType::Benchmarks),
            "compensation-changes" | "compensation" | "comp-changes" => {
                Ok(EntityType::CompensationChanges)
            }
            other => Err(format!("未知实体类型: {}", other)),
        }
    }
}

// ==========================================
// 字段类型 (Field Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Date,
    Email,
    Enum,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Date => write!(f, "date"),
            FieldType::Email => write!(f, "email"),
            FieldType::Enum => write!(f, "enum"),
        }
    }
}

// ==========================================
// 问题级别 (Severity)
// ==========================================
// Error 阻断导入, Warning 仅提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

// ==========================================
// 源文件格式 (Source Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Text,   // 分隔符文本 (csv/tsv/txt)
    Binary, // 电子表格容器 (xlsx/xls/ods)
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Text => write!(f, "text"),
            SourceFormat::Binary => write!(f, "binary"),
        }
    }
}

// ==========================================
// 向导步骤 (Wizard Step)
// ==========================================
// 线性顺序: data-type → file-upload → column-mapping → validation → confirm → success
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    DataType,
    FileUpload,
    ColumnMapping,
    Validation,
    Confirm,
    Success,
}

impl WizardStep {
    pub const ORDER: [WizardStep; 6] = [
        WizardStep::DataType,
        WizardStep::FileUpload,
        WizardStep::ColumnMapping,
        WizardStep::Validation,
        WizardStep::Confirm,
        WizardStep::Success,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::DataType => "data-type",
            WizardStep::FileUpload => "file-upload",
            WizardStep::ColumnMapping => "column-mapping",
            WizardStep::Validation => "validation",
            WizardStep::Confirm => "confirm",
            WizardStep::Success => "success",
        }
    }

    fn position(&self) -> usize {
        Self::ORDER.iter().position(|s| s == self).unwrap_or(0)
    }

    /// 下一步（已是最后一步时返回 None）
    pub fn next(&self) -> Option<WizardStep> {
        Self::ORDER.get(self.position() + 1).copied()
    }

    /// 上一步（已是第一步时返回 None）
    pub fn previous(&self) -> Option<WizardStep> {
        self.position()
            .checked_sub(1)
            .and_then(|idx| Self::ORDER.get(idx).copied())
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardStep::ORDER
            .iter()
            .find(|step| step.as_str() == s)
            .copied()
            .ok_or_else(|| format!("未知向导步骤: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_round_trip_str() {
        for entity in EntityType::ALL {
            assert_eq!(entity.as_str().parse::<EntityType>().unwrap(), entity);
        }
        assert!("payroll".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_wizard_step_linear_order() {
        assert_eq!(WizardStep::DataType.previous(), None);
        assert_eq!(WizardStep::DataType.next(), Some(WizardStep::FileUpload));
        assert_eq!(WizardStep::Confirm.next(), Some(WizardStep::Success));
        assert_eq!(WizardStep::Success.next(), None);
        assert_eq!(
            "column-mapping".parse::<WizardStep>().unwrap(),
            WizardStep::ColumnMapping
        );
    }

    #[test]
    fn test_severity_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
