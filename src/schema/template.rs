// ==========================================
// 薪酬数据导入 - 示例模板生成
// ==========================================
// 职责: 为每种实体类型生成可下载的示例 CSV
// 字节契约: UTF-8，逗号分隔，换行连接，content-type = text/csv
// ==========================================

use crate::domain::types::EntityType;
use crate::schema::catalogs::get_fields_for_type;
use crate::schema::field_definition::find_field;
use serde::Serialize;

pub const TEMPLATE_CONTENT_TYPE: &str = "text/csv";

// ==========================================
// TemplateFile - 模板文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl TemplateFile {
    /// 模板文本（始终为合法 UTF-8）
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// 模板列（按 key，表头取字段 label）
fn template_columns(entity_type: EntityType) -> &'static [&'static str] {
    match entity_type {
        EntityType::Employees => &[
            "firstName",
            "lastName",
            "email",
            "department",
            "role",
            "level",
            "location",
            "baseSalary",
            "bonus",
            "equity",
            "currency",
            "status",
            "employmentType",
            "hireDate",
            "performanceRating",
        ],
        EntityType::Benchmarks => &[
            "role",
            "location",
            "level",
            "currency",
            "p10",
            "p25",
            "p50",
            "p75",
            "p90",
            "sampleSize",
        ],
        EntityType::CompensationChanges => &[
            "employeeId",
            "email",
            "newBaseSalary",
            "newBonus",
            "newEquity",
            "effectiveDate",
            "changeReason",
        ],
    }
}

/// 示例数据行（花名册与基准各带第二行示例）
fn example_lines(entity_type: EntityType) -> &'static [&'static str] {
    match entity_type {
        EntityType::Employees => &[
            "Jane,Doe,jane.doe@example.com,Engineering,Software Engineer,L4,Dubai,240000,24000,50000,AED,active,full-time,2023-03-15,meets",
            "Omar,Haddad,omar.haddad@example.com,Sales,Account Executive,L3,Riyadh,180000,36000,0,SAR,active,full-time,15/01/2022,exceeds",
        ],
        EntityType::Benchmarks => &[
            "Software Engineer,Dubai,L4,AED,180000,205000,235000,265000,300000,48",
            "Product Manager,Riyadh,L5,SAR,220000,250000,285000,320000,360000,31",
        ],
        EntityType::CompensationChanges => &[
            "EMP-001,jane.doe@example.com,260000,26000,60000,2024-04-01,Annual merit increase",
        ],
    }
}

/// 模板表头行
pub fn template_header(entity_type: EntityType) -> String {
    let fields = get_fields_for_type(entity_type);
    template_columns(entity_type)
        .iter()
        .filter_map(|key| find_field(fields, key))
        .map(|field| field.label)
        .collect::<Vec<_>>()
        .join(",")
}

/// 生成实体类型的示例模板
pub fn template_for(entity_type: EntityType) -> TemplateFile {
    let mut lines = vec![template_header(entity_type)];
    lines.extend(example_lines(entity_type).iter().map(|l| l.to_string()));

    TemplateFile {
        file_name: format!("{}-import-template.csv", entity_type.as_str()),
        content_type: TEMPLATE_CONTENT_TYPE,
        bytes: lines.join("\n").into_bytes(),
    }
}
