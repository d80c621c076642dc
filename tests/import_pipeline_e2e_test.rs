// ==========================================
// 导入管道端到端测试
// ==========================================
// 解析 → 映射 → 校验 全流程（不经过向导）

use comp_import::api::{ApiError, ImportApi};
use comp_import::config::ImportSettings;
use comp_import::importer::missing_required_fields;
use comp_import::logging;
use comp_import::{
    get_fields_for_type, template_for, CellValue, EntityType, ImportError, Severity,
    SourceFormat,
};
use std::sync::Arc;

mod test_helpers;
use test_helpers::{write_upload, FixedDecoder};

/// 每种模板回灌: 必填字段全部映射且模板示例行全部有效
#[test]
fn test_template_round_trip_for_every_entity() {
    logging::init_test();
    let api = ImportApi::default();

    for entity in EntityType::ALL {
        let template = template_for(entity);
        let file = api
            .parse_upload(&template.file_name, &template.bytes)
            .expect("模板解析失败");
        let preview = api.preview_mapping(entity, &file);

        assert!(preview.missing_required.is_empty(), "{} 缺少必填: {:?}", entity, preview.missing_required);

        let fields = get_fields_for_type(entity);
        for field in fields.iter().filter(|f| f.required) {
            if let Some(mapping) = preview
                .mappings
                .iter()
                .find(|m| m.target_field.as_deref() == Some(field.key))
            {
                assert!(mapping.confidence >= 0.5, "{}.{} 置信度过低", entity, field.key);
            }
        }
        assert!(missing_required_fields(&preview.mappings, fields).is_empty());

        let validation = api.validate(entity, &file, &preview.mappings);
        assert_eq!(validation.error_rows, 0, "{} 模板示例存在错误: {:?}", entity, validation.issues);
        assert_eq!(validation.total_rows, file.row_count);
    }
}

/// 典型花名册表头映射 + 行校验
#[test]
fn test_roster_export_with_loose_headers() {
    logging::init_test();
    let api = ImportApi::default();
    let csv = "Employee Name,Dept,Title,Level,City,Base Pay\n\
               Jane Doe,Engineering,Software Engineer,L4,Dubai,\"240,000\"\n\
               Omar Haddad,Astrology,Account Executive,L3,Riyadh,abc\n";

    let file = api.parse_upload("roster.csv", csv.as_bytes()).unwrap();
    let preview = api.preview_mapping(EntityType::Employees, &file);

    let targets: Vec<Option<&str>> = preview
        .mappings
        .iter()
        .map(|m| m.target_field.as_deref())
        .collect();
    assert_eq!(
        targets,
        vec![
            Some("fullName"),
            Some("department"),
            Some("role"),
            Some("level"),
            Some("location"),
            Some("baseSalary"),
        ]
    );
    assert!(preview.mappings.iter().all(|m| m.confidence >= 0.5));
    assert!(preview.missing_required.is_empty());

    let validation = api.validate(EntityType::Employees, &file, &preview.mappings);
    assert_eq!(validation.total_rows, 2);
    assert_eq!(validation.valid_rows, 1);
    assert_eq!(validation.error_rows, 1);

    let first = &validation.rows[0];
    assert_eq!(first.data["baseSalary"], CellValue::Number(240000.0));
    assert_eq!(first.data["department"], CellValue::Text("engineering".into()));

    let second = &validation.rows[1];
    assert!(!second.is_valid);
    let severities: Vec<(&str, Severity)> = second
        .issues
        .iter()
        .map(|i| (i.field.as_str(), i.severity))
        .collect();
    assert_eq!(
        severities,
        vec![("department", Severity::Warning), ("baseSalary", Severity::Error)]
    );
    assert!(second.issues.iter().all(|i| i.row == 2));
}

/// 基准分位倒挂: 单条 error 指向 p50/p75
#[test]
fn test_benchmark_percentile_inversion() {
    logging::init_test();
    let api = ImportApi::default();
    let csv = "Role,Location,Level,Currency,P10,P25,P50,P75,P90\n\
               Data Scientist,Dubai,L4,AED,50,80,100,90,120\n\
               Data Scientist,Riyadh,L4,SAR,50,80,100,110,120\n";

    let file = api.parse_upload("market.csv", csv.as_bytes()).unwrap();
    let preview = api.preview_mapping(EntityType::Benchmarks, &file);
    assert!(preview.missing_required.is_empty());

    let validation = api.validate(EntityType::Benchmarks, &file, &preview.mappings);

    let inverted = &validation.rows[0];
    assert!(!inverted.is_valid);
    assert_eq!(inverted.issues.len(), 1);
    assert_eq!(inverted.issues[0].field, "p50/p75");
    assert_eq!(inverted.issues[0].severity, Severity::Error);

    assert!(validation.rows[1].is_valid);
    assert_eq!(validation.error_rows, 1);
    assert_eq!(validation.valid_rows, 1);
}

/// 分号分隔 + BOM + CRLF + 短行补齐
#[test]
fn test_semicolon_bom_crlf_and_short_rows() {
    logging::init_test();
    let api = ImportApi::default();
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"Email;New Base Salary;Effective Date\r\na@example.com;1000;31/01/2024\r\nb@example.com\r\n");

    let file = api.parse_upload("changes.txt", &bytes).unwrap();
    assert_eq!(file.headers, vec!["Email", "New Base Salary", "Effective Date"]);
    assert_eq!(file.rows[1], vec!["b@example.com", "", ""]);

    let preview = api.preview_mapping(EntityType::CompensationChanges, &file);
    let validation = api.validate(EntityType::CompensationChanges, &file, &preview.mappings);

    assert_eq!(validation.rows[0].data["effectiveDate"], CellValue::Text("2024-01-31".into()));
    assert!(validation.rows[0].is_valid);

    let short = &validation.rows[1];
    assert!(!short.is_valid);
    assert_eq!(short.issues.len(), 1);
    assert_eq!(short.issues[0].field, "newBaseSalary");
}

/// 二进制路径: 注入解码器，无需真实电子表格
#[test]
fn test_binary_upload_through_injected_decoder() {
    logging::init_test();
    let decoder = FixedDecoder::new(&[
        &["Email", "New Salary"],
        &["", ""],
        &["a@example.com", "1200"],
    ]);
    let api = ImportApi::with_decoder(ImportSettings::default(), Arc::new(decoder));

    let file = api.parse_upload("changes.xlsx", b"PK\x03\x04").unwrap();
    assert_eq!(file.format, SourceFormat::Binary);
    assert_eq!(file.row_count, 1);

    let preview = api.preview_mapping(EntityType::CompensationChanges, &file);
    assert!(preview.missing_required.is_empty());
}

/// 文件级终止错误
#[test]
fn test_terminal_file_failures() {
    logging::init_test();
    let api = ImportApi::default();

    let err = api.parse_upload("roster.pdf", b"%PDF").unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::UnsupportedFormat(_))));

    let err = api.parse_upload("roster.csv", b"Email,Salary\n").unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::HeaderOnly)));

    let err = api.parse_upload("roster.csv", b"\n\n").unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::EmptyFile)));

    let err = api.parse_upload("roster.csv", &[0xFF, 0xFE, 0x00, 0x41]).unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::UnreadableBytes(_))));
}

/// 磁盘文件一次性分析（CLI 使用的路径）
#[tokio::test]
async fn test_analyze_path_report() {
    logging::init_test();
    let upload = write_upload(
        ".csv",
        b"Email,New Base Salary,Reason\na@example.com,1000,merit\nnot-an-email,2000,promo\n",
    )
    .expect("写入临时文件失败");

    let api = ImportApi::default();
    let report = api
        .analyze_path(EntityType::CompensationChanges, upload.path())
        .await
        .expect("分析失败");

    assert_eq!(report.row_count, 2);
    assert_eq!(report.format, SourceFormat::Text);
    assert_eq!(report.valid_rows, 1);
    assert_eq!(report.warning_rows, 1);
    assert_eq!(report.error_rows, 0);
    assert_eq!(report.issues.len(), 1);
    assert!(!report.session_id.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["entity_type"], "compensation-changes");
    assert_eq!(json["issues"][0]["severity"], "warning");
}

#[tokio::test]
async fn test_analyze_missing_file() {
    logging::init_test();
    let api = ImportApi::default();
    let err = api
        .analyze_path(EntityType::Employees, "/nonexistent/roster.csv")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::FileNotFound(_))));
}
