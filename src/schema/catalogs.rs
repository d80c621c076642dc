// ==========================================
// 薪酬数据导入 - 字段目录
// ==========================================
// 职责: 三种实体类型的目标字段全集
// 红线: key 名称为外部系统契约，不可随意修改
// ==========================================

use crate::domain::types::{EntityType, FieldType};
use crate::schema::field_definition::FieldDefinition;

/// 花名册中的姓名组合字段
pub const FULL_NAME_KEY: &str = "fullName";
pub const FIRST_NAME_KEY: &str = "firstName";
pub const LAST_NAME_KEY: &str = "lastName";

/// 基准数据的分位字段（按从低到高排序）
pub const PERCENTILE_KEYS: [&str; 5] = ["p10", "p25", "p50", "p75", "p90"];

// ==========================================
// 员工花名册
// ==========================================
static EMPLOYEE_FIELDS: [FieldDefinition; 16] = [
    FieldDefinition::new(
        FIRST_NAME_KEY,
        "First Name",
        true,
        FieldType::String,
        &["first name", "first", "given name", "forename", "firstname"],
    ),
    FieldDefinition::new(
        LAST_NAME_KEY,
        "Last Name",
        true,
        FieldType::String,
        &["last name", "last", "surname", "family name", "lastname"],
    ),
    FieldDefinition::new(
        FULL_NAME_KEY,
        "Full Name",
        false,
        FieldType::String,
        &["full name", "name", "employee name", "staff name"],
    ),
    FieldDefinition::new(
        "email",
        "Email",
        false,
        FieldType::Email,
        &["email", "email address", "work email", "e mail", "mail"],
    ),
    FieldDefinition::new(
        "department",
        "Department",
        true,
        FieldType::Enum,
        &["department", "dept", "team", "division", "function", "business unit"],
    )
    .with_values(&[
        "engineering",
        "product",
        "design",
        "data",
        "sales",
        "marketing",
        "customer success",
        "operations",
        "finance",
        "hr",
        "legal",
        "executive",
    ]),
    FieldDefinition::new(
        "role",
        "Role",
        true,
        FieldType::String,
        &["role", "title", "job title", "position", "designation"],
    ),
    FieldDefinition::new(
        "level",
        "Level",
        true,
        FieldType::String,
        &["level", "grade", "band", "seniority", "job level", "career level"],
    ),
    FieldDefinition::new(
        "location",
        "Location",
        true,
        FieldType::String,
        &["location", "city", "office", "country", "site", "work location"],
    ),
    FieldDefinition::new(
        "baseSalary",
        "Base Salary",
        true,
        FieldType::Number,
        &[
            "base salary",
            "base",
            "salary",
            "annual salary",
            "basic salary",
            "base pay",
            "annual base",
        ],
    ),
    FieldDefinition::new(
        "bonus",
        "Bonus",
        false,
        FieldType::Number,
        &["bonus", "annual bonus", "variable pay", "incentive", "target bonus"],
    ),
    FieldDefinition::new(
        "equity",
        "Equity",
        false,
        FieldType::Number,
        &["equity", "stock", "options", "rsu", "shares", "equity grant"],
    ),
    FieldDefinition::new(
        "currency",
        "Currency",
        false,
        FieldType::String,
        &["currency", "ccy", "currency code"],
    ),
    FieldDefinition::new(
        "status",
        "Status",
        false,
        FieldType::Enum,
        &["status", "employment status", "employee status"],
    )
    .with_values(&["active", "inactive"]),
    FieldDefinition::new(
        "employmentType",
        "Employment Type",
        false,
        FieldType::Enum,
        &["employment type", "contract type", "worker type", "type"],
    )
    .with_values(&["full-time", "part-time", "contractor", "intern"]),
    FieldDefinition::new(
        "hireDate",
        "Hire Date",
        false,
        FieldType::Date,
        &["hire date", "start date", "joining date", "date of joining", "doj", "joined"],
    ),
    FieldDefinition::new(
        "performanceRating",
        "Performance Rating",
        false,
        FieldType::Enum,
        &["performance rating", "rating", "performance", "perf rating"],
    )
    .with_values(&["exceptional", "exceeds", "meets", "below", "unsatisfactory"]),
];

// ==========================================
// 市场薪酬基准
// ==========================================
static BENCHMARK_FIELDS: [FieldDefinition; 10] = [
    FieldDefinition::new(
        "role",
        "Role",
        true,
        FieldType::String,
        &["role", "title", "job title", "position"],
    ),
    FieldDefinition::new(
        "location",
        "Location",
        true,
        FieldType::String,
        &["location", "city", "country", "market", "region"],
    ),
    FieldDefinition::new(
        "level",
        "Level",
        true,
        FieldType::String,
        &["level", "grade", "band", "job level"],
    ),
    FieldDefinition::new(
        "currency",
        "Currency",
        true,
        FieldType::String,
        &["currency", "ccy", "currency code"],
    ),
    FieldDefinition::new(
        "p10",
        "P10",
        true,
        FieldType::Number,
        &["p10", "10th percentile", "percentile 10", "10th"],
    ),
    FieldDefinition::new(
        "p25",
        "P25",
        true,
        FieldType::Number,
        &["p25", "25th percentile", "percentile 25", "25th", "lower quartile"],
    ),
    FieldDefinition::new(
        "p50",
        "P50",
        true,
        FieldType::Number,
        &["p50", "50th percentile", "percentile 50", "50th", "median"],
    ),
    FieldDefinition::new(
        "p75",
        "P75",
        true,
        FieldType::Number,
        &["p75", "75th percentile", "percentile 75", "75th", "upper quartile"],
    ),
    FieldDefinition::new(
        "p90",
        "P90",
        true,
        FieldType::Number,
        &["p90", "90th percentile", "percentile 90", "90th"],
    ),
    FieldDefinition::new(
        "sampleSize",
        "Sample Size",
        false,
        FieldType::Number,
        &["sample size", "sample", "data points", "incumbents"],
    ),
];

// ==========================================
// 调薪记录
// ==========================================
static COMPENSATION_CHANGE_FIELDS: [FieldDefinition; 7] = [
    FieldDefinition::new(
        "employeeId",
        "Employee ID",
        false,
        FieldType::String,
        &["employee id", "emp id", "staff id", "employee number", "employee no"],
    ),
    FieldDefinition::new(
        "email",
        "Email",
        true,
        FieldType::Email,
        &["email", "email address", "work email", "e mail", "employee email"],
    ),
    FieldDefinition::new(
        "newBaseSalary",
        "New Base Salary",
        true,
        FieldType::Number,
        &[
            "new base salary",
            "new salary",
            "new base",
            "revised salary",
            "updated salary",
            "new base pay",
        ],
    ),
    FieldDefinition::new(
        "newBonus",
        "New Bonus",
        false,
        FieldType::Number,
        &["new bonus", "revised bonus", "updated bonus", "bonus"],
    ),
    FieldDefinition::new(
        "newEquity",
        "New Equity",
        false,
        FieldType::Number,
        &["new equity", "revised equity", "updated equity", "equity"],
    ),
    FieldDefinition::new(
        "effectiveDate",
        "Effective Date",
        false,
        FieldType::Date,
        &["effective date", "effective from", "effective", "date"],
    ),
    FieldDefinition::new(
        "changeReason",
        "Change Reason",
        false,
        FieldType::String,
        &["change reason", "reason", "comment", "comments", "notes", "justification"],
    ),
];

/// 获取实体类型的字段目录
pub fn get_fields_for_type(entity_type: EntityType) -> &'static [FieldDefinition] {
    match entity_type {
        EntityType::Employees => &EMPLOYEE_FIELDS,
        EntityType::Benchmarks => &BENCHMARK_FIELDS,
        EntityType::CompensationChanges => &COMPENSATION_CHANGE_FIELDS,
    }
}
