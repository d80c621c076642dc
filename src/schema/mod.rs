// ==========================================
// 薪酬数据导入 - 字段目录层
// ==========================================
// 职责: 静态字段目录查询 + 示例模板生成
// 红线: 无运行期状态
// ==========================================

pub mod catalogs;
pub mod field_definition;
pub mod template;

// 重导出
pub use catalogs::{
    get_fields_for_type, FIRST_NAME_KEY, FULL_NAME_KEY, LAST_NAME_KEY, PERCENTILE_KEYS,
};
pub use field_definition::{find_field, FieldDefinition};
pub use template::{template_for, template_header, TemplateFile, TEMPLATE_CONTENT_TYPE};
