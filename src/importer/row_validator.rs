// ==========================================
// 薪酬数据导入 - 行校验器实现
// ==========================================
// 职责: 单元格类型转换 + 校验 + 跨字段规则（基准分位有序）
// 级别: Error 阻断导入 / Warning 仅提示
// 红线: 必填为空时该单元格不再做后续检查，其他单元格照常检查
// ==========================================

use crate::domain::mapping::ColumnMapping;
use crate::domain::types::{EntityType, FieldType, Severity};
use crate::domain::validation::{
    CellValue, RowData, RowValidationResult, ValidationIssue, ValidationResult,
};
use crate::i18n::t_with_args;
use crate::schema::catalogs::{get_fields_for_type, PERCENTILE_KEYS};
use crate::schema::field_definition::{find_field, FieldDefinition};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("邮箱正则无效"));

/// 直接识别的日期格式（先于日/月启发式）
///
/// 斜杠/短横线的数字日期按月-日-年识别，识别失败才进入日优先启发式。
const NATIVE_DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

const NATIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// 可接受的最小年份（更小的年份视为两位年份或录入错误）
const MIN_YEAR: i32 = 1900;

/// 解析数值：去掉货币符号、千分位和空白后解析
///
/// 仅保留数字、小数点与负号，例如 "AED 1,200" → 1200。
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 解析日期：先尝试标准格式，失败后按 "/" 或 "-" 拆分走日优先启发式
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    parse_native_date(value).or_else(|| parse_day_first(value))
}

fn parse_native_date(value: &str) -> Option<NaiveDate> {
    NATIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NATIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        // "12/31/24" 会被 %Y 读成公元 24 年，交给启发式处理
        .filter(|date| date.year() >= MIN_YEAR)
}

/// 两位年份: 00-49 → 20xx，50-99 → 19xx；100..1900 之间视为无效
fn expand_year(year: u32) -> Option<i32> {
    let year = year as i32;
    match year {
        0..=49 => Some(2000 + year),
        50..=99 => Some(1900 + year),
        y if y >= MIN_YEAR => Some(y),
        _ => None,
    }
}

/// 日优先启发式
///
/// - 第一段 ≤31 且第二段 ≤12 且第三段 ≥1900 → 日-月-年
/// - 否则第一段 ≤12 且第二段 ≤31 → 月-日-年（两位年份展开）
fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let parts: Vec<u32> = value
        .split(['/', '-'])
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .ok()?;

    let [first, second, third] = parts[..] else {
        return None;
    };

    if first <= 31 && second <= 12 && third >= MIN_YEAR as u32 {
        NaiveDate::from_ymd_opt(third as i32, second, first)
    } else if first <= 12 && second <= 31 {
        NaiveDate::from_ymd_opt(expand_year(third)?, first, second)
    } else {
        None
    }
}

// ==========================================
// RowValidator - 行校验器
// ==========================================
pub struct RowValidator {
    entity_type: EntityType,
    fields: &'static [FieldDefinition],
}

impl RowValidator {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            fields: get_fields_for_type(entity_type),
        }
    }

    /// 校验全部数据行
    ///
    /// # 参数
    /// - rows: 数据行（短行按空串补齐）
    /// - mappings: 列映射（仅处理已映射列）
    ///
    /// # 返回
    /// - ValidationResult: 纯投影，映射或数据变化后需整体重算
    pub fn validate(&self, rows: &[Vec<String>], mappings: &[ColumnMapping]) -> ValidationResult {
        let results: Vec<RowValidationResult> = rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| self.validate_row(row_index, row, mappings))
            .collect();

        let result = ValidationResult::from_rows(results);
        info!(
            entity_type = %self.entity_type,
            total = result.total_rows,
            valid = result.valid_rows,
            warning = result.warning_rows,
            error = result.error_rows,
            "行校验完成"
        );
        result
    }

    fn validate_row(
        &self,
        row_index: usize,
        row: &[String],
        mappings: &[ColumnMapping],
    ) -> RowValidationResult {
        let row_number = row_index + 1;
        let mut issues = Vec::new();
        let mut data = RowData::new();

        for mapping in mappings {
            let Some(target) = mapping.target_field.as_deref() else {
                continue;
            };
            let Some(field) = find_field(self.fields, target) else {
                warn!(field = %target, entity_type = %self.entity_type, "映射到未知字段，已跳过");
                continue;
            };

            // 缺失单元格按空串处理（等价于补齐到表头宽度）
            let raw = row
                .get(mapping.source_index)
                .map(String::as_str)
                .unwrap_or("");

            let cell = Cell {
                row_number,
                column: &mapping.source_column,
                field,
                raw,
            };
            cell.check(&mut issues, &mut data);
        }

        if self.entity_type == EntityType::Benchmarks {
            self.check_percentile_order(row_number, mappings, &data, &mut issues);
        }

        RowValidationResult::new(row_index, issues, data)
    }

    /// 相邻分位必须非递减（两侧都解析成功时才比较）
    fn check_percentile_order(
        &self,
        row_number: usize,
        mappings: &[ColumnMapping],
        data: &RowData,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for pair in PERCENTILE_KEYS.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            let lower_value = data.get(lower).and_then(CellValue::as_f64);
            let upper_value = data.get(upper).and_then(CellValue::as_f64);

            if let (Some(lo), Some(hi)) = (lower_value, upper_value) {
                if lo > hi {
                    let lower_column = source_column_for(mappings, lower);
                    let upper_column = source_column_for(mappings, upper);
                    issues.push(ValidationIssue {
                        row: row_number,
                        column: format!("{} / {}", lower_column, upper_column),
                        field: format!("{}/{}", lower, upper),
                        value: format!("{} > {}", lo, hi),
                        message: t_with_args(
                            "validation.percentile_order",
                            &[
                                ("lower", lower),
                                ("upper", upper),
                                ("lower_value", &lo.to_string()),
                                ("upper_value", &hi.to_string()),
                            ],
                        ),
                        severity: Severity::Error,
                    });
                }
            }
        }
    }
}

fn source_column_for<'a>(mappings: &'a [ColumnMapping], field_key: &'a str) -> &'a str {
    mappings
        .iter()
        .find(|m| m.target_field.as_deref() == Some(field_key))
        .map(|m| m.source_column.as_str())
        .unwrap_or(field_key)
}

// ==========================================
// Cell - 单元格校验上下文
// ==========================================
struct Cell<'a> {
    row_number: usize,
    column: &'a str,
    field: &'a FieldDefinition,
    raw: &'a str,
}

impl Cell<'_> {
    fn issue(&self, severity: Severity, message: String) -> ValidationIssue {
        ValidationIssue {
            row: self.row_number,
            column: self.column.to_string(),
            field: self.field.key.to_string(),
            value: self.raw.to_string(),
            message,
            severity,
        }
    }

    fn message(&self, key: &str, value: &str) -> String {
        t_with_args(key, &[("field", self.field.label), ("value", value)])
    }

    fn check(&self, issues: &mut Vec<ValidationIssue>, data: &mut RowData) {
        let value = self.raw.trim();
        let key = self.field.key.to_string();

        // 必填为空: 单条 Error，本单元格不再继续检查
        if value.is_empty() {
            if self.field.required {
                issues.push(self.issue(
                    Severity::Error,
                    self.message("validation.required_missing", value),
                ));
            }
            return;
        }

        match self.field.field_type {
            FieldType::String => {
                data.insert(key, CellValue::Text(value.to_string()));
            }
            FieldType::Email => {
                if EMAIL_RE.is_match(value) {
                    data.insert(key, CellValue::Text(value.to_lowercase()));
                } else {
                    issues.push(self.issue(
                        Severity::Warning,
                        self.message("validation.invalid_email", value),
                    ));
                    data.insert(key, CellValue::Text(value.to_string()));
                }
            }
            FieldType::Number => match parse_number(value) {
                Some(n) if n < 0.0 && self.field.key.to_lowercase().contains("salary") => {
                    issues.push(self.issue(
                        Severity::Error,
                        self.message("validation.negative_salary", value),
                    ));
                }
                Some(n) => {
                    data.insert(key, CellValue::Number(n));
                }
                None => {
                    issues.push(self.issue(
                        Severity::Error,
                        self.message("validation.invalid_number", value),
                    ));
                }
            },
            FieldType::Date => match parse_date(value) {
                Some(date) => {
                    data.insert(key, CellValue::Text(date.format("%Y-%m-%d").to_string()));
                }
                None => {
                    issues.push(self.issue(
                        Severity::Warning,
                        self.message("validation.invalid_date", value),
                    ));
                    data.insert(key, CellValue::Text(value.to_string()));
                }
            },
            FieldType::Enum => {
                if self.field.allows(value) {
                    data.insert(key, CellValue::Text(value.to_lowercase()));
                } else {
                    issues.push(self.issue(
                        Severity::Warning,
                        t_with_args(
                            "validation.invalid_enum",
                            &[
                                ("field", self.field.label),
                                ("value", value),
                                ("allowed", &self.field.allowed_values.join(", ")),
                            ],
                        ),
                    ));
                    data.insert(key, CellValue::Text(value.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(index: usize, column: &str, field: Option<&str>) -> ColumnMapping {
        ColumnMapping {
            source_column: column.to_string(),
            source_index: index,
            target_field: field.map(str::to_string),
            confidence: if field.is_some() { 1.0 } else { 0.0 },
            sample_values: vec![],
        }
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn benchmark_mappings() -> Vec<ColumnMapping> {
        ["role", "location", "level", "currency", "p10", "p25", "p50", "p75", "p90"]
            .iter()
            .enumerate()
            .map(|(idx, key)| mapping(idx, &key.to_uppercase(), Some(key)))
            .collect()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234.50"), Some(1234.5));
        assert_eq!(parse_number("AED 1,200"), Some(1200.0));
        assert_eq!(parse_number(" $ 75 000 "), Some(75000.0));
        assert_eq!(parse_number("-500"), Some(-500.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn test_parse_date() {
        let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date("2024-01-15"), jan_15);
        assert_eq!(parse_date("2024-01-15T09:30:00"), jan_15);
        assert_eq!(parse_date("15 Jan 2024"), jan_15);
        assert_eq!(parse_date("31/01/2024"), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(parse_date("01-15-2024"), jan_15);
        assert_eq!(parse_date("13/13/2024"), None);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn test_parse_date_month_first_before_day_first() {
        // 标准格式先按月-日-年识别，两段都 ≤ 12 时不做交换
        assert_eq!(parse_date("03/04/2024"), NaiveDate::from_ymd_opt(2024, 3, 4));
        assert_eq!(parse_date("03-04-2024"), NaiveDate::from_ymd_opt(2024, 3, 4));
        // 月份位置 > 12 时才进入日优先启发式
        assert_eq!(parse_date("25/04/2024"), NaiveDate::from_ymd_opt(2024, 4, 25));
    }

    #[test]
    fn test_parse_date_two_digit_year() {
        assert_eq!(parse_date("12/31/24"), NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(parse_date("06/15/85"), NaiveDate::from_ymd_opt(1985, 6, 15));
        assert_eq!(parse_date("12/31/1024"), None);
        assert_eq!(parse_date("0024-12-31"), None);
    }

    #[test]
    fn test_required_empty_is_single_error() {
        let validator = RowValidator::new(EntityType::CompensationChanges);
        let mappings = vec![mapping(0, "Email", Some("email")), mapping(1, "Salary", Some("newBaseSalary"))];

        let result = validator.validate(&[row(&["  ", "abc"])], &mappings);

        let issues = &result.rows[0].issues;
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "email");
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].row, 1);
        // 其他字段照常检查
        assert_eq!(issues[1].field, "newBaseSalary");
        assert_eq!(issues[1].severity, Severity::Error);
        assert!(!result.rows[0].is_valid);
    }

    #[test]
    fn test_short_row_treated_as_padded() {
        let validator = RowValidator::new(EntityType::CompensationChanges);
        let mappings = vec![
            mapping(0, "Email", Some("email")),
            mapping(1, "New Base Salary", Some("newBaseSalary")),
            mapping(2, "Reason", Some("changeReason")),
        ];

        let result = validator.validate(&[row(&["a@b.com"])], &mappings);

        let issues = &result.rows[0].issues;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "newBaseSalary");
        assert_eq!(issues[0].value, "");
    }

    #[test]
    fn test_coercions_stored_in_row_data() {
        let validator = RowValidator::new(EntityType::Employees);
        let mappings = vec![
            mapping(0, "Email", Some("email")),
            mapping(1, "Salary", Some("baseSalary")),
            mapping(2, "Hire", Some("hireDate")),
            mapping(3, "Dept", Some("department")),
            mapping(4, "Notes", None),
        ];

        let result = validator.validate(
            &[row(&["Jane.Doe@Example.COM", "AED 1,200", "31/01/2024", "Engineering", "x"])],
            &mappings,
        );

        let data = &result.rows[0].data;
        assert_eq!(data["email"], CellValue::Text("jane.doe@example.com".into()));
        assert_eq!(data["baseSalary"], CellValue::Number(1200.0));
        assert_eq!(data["hireDate"], CellValue::Text("2024-01-31".into()));
        assert_eq!(data["department"], CellValue::Text("engineering".into()));
        assert_eq!(data.len(), 4);
        assert!(result.rows[0].is_valid);
        assert!(!result.rows[0].has_warnings);
    }

    #[test]
    fn test_warnings_keep_row_importable() {
        let validator = RowValidator::new(EntityType::Employees);
        let mappings = vec![
            mapping(0, "Email", Some("email")),
            mapping(1, "Hire Date", Some("hireDate")),
            mapping(2, "Dept", Some("department")),
        ];

        let result = validator.validate(&[row(&["not-an-email", "13/13/2024", "Astrology"])], &mappings);

        let row_result = &result.rows[0];
        assert_eq!(row_result.issues.len(), 3);
        assert!(row_result.issues.iter().all(|i| i.severity == Severity::Warning));
        assert!(row_result.is_valid);
        assert!(row_result.has_warnings);
        assert_eq!(result.warning_rows, 1);
    }

    #[test]
    fn test_negative_salary_is_error() {
        let validator = RowValidator::new(EntityType::Employees);
        let mappings = vec![mapping(0, "Salary", Some("baseSalary")), mapping(1, "Bonus", Some("bonus"))];

        let result = validator.validate(&[row(&["-100", "-5"])], &mappings);

        let issues = &result.rows[0].issues;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "baseSalary");
        // 非薪资字段允许负数
        assert_eq!(result.rows[0].data["bonus"], CellValue::Number(-5.0));
    }

    #[test]
    fn test_percentile_order_violation_attached_to_pair() {
        let validator = RowValidator::new(EntityType::Benchmarks);
        let cells = row(&["SWE", "Dubai", "L4", "AED", "50", "80", "100", "90", "120"]);

        let result = validator.validate(&[cells], &benchmark_mappings());

        let errors: Vec<_> = result.rows[0].issues.iter().filter(|i| i.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "p50/p75");
        assert!(!result.rows[0].is_valid);
        assert_eq!(result.error_rows, 1);
    }

    #[test]
    fn test_percentile_check_skips_unparsed_side() {
        let validator = RowValidator::new(EntityType::Benchmarks);
        let cells = row(&["SWE", "Dubai", "L4", "AED", "50", "80", "oops", "90", "120"]);

        let result = validator.validate(&[cells], &benchmark_mappings());

        let issues = &result.rows[0].issues;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "p50");
    }

    #[test]
    fn test_percentile_error_additive_to_field_error() {
        let validator = RowValidator::new(EntityType::Benchmarks);
        let cells = row(&["SWE", "Dubai", "L4", "AED", "abc", "80", "100", "90", "120"]);

        let result = validator.validate(&[cells], &benchmark_mappings());

        let fields: Vec<&str> = result.rows[0].issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["p10", "p50/p75"]);
        assert!(result.rows[0].issues.iter().all(ValidationIssue::is_error));
        assert!(!result.rows[0].is_valid);
    }

    #[test]
    fn test_percentile_rule_only_for_benchmarks() {
        let validator = RowValidator::new(EntityType::Employees);
        let mappings = vec![mapping(0, "Salary", Some("baseSalary")), mapping(1, "Bonus", Some("bonus"))];
        let result = validator.validate(&[row(&["100", "50"])], &mappings);
        assert!(result.rows[0].issues.is_empty());
    }

    #[test]
    fn test_is_valid_iff_no_error_issue() {
        let validator = RowValidator::new(EntityType::Employees);
        let mappings = vec![
            mapping(0, "Salary", Some("baseSalary")),
            mapping(1, "Email", Some("email")),
        ];
        let rows = vec![row(&["100", "a@b.co"]), row(&["x", "a@b.co"]), row(&["100", "bad"])];

        let result = validator.validate(&rows, &mappings);

        for r in &result.rows {
            assert_eq!(r.is_valid, !r.issues.iter().any(|i| i.severity == Severity::Error));
        }
        assert_eq!(result.total_rows, 3);
        assert_eq!(result.valid_rows, 1);
        assert_eq!(result.warning_rows, 1);
        assert_eq!(result.error_rows, 1);
    }
}
