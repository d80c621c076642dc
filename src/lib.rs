// ==========================================
// 薪酬数据导入 - 核心库
// ==========================================
// 管道: 字节 → ParsedFile → ColumnMapping[] → ValidationResult → 决策集
// 系统定位: 只分类与转换，不直接写入业务系统
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 管道数据结构
pub mod domain;

// 字段目录 - 静态 schema 与模板
pub mod schema;

// 导入层 - 解析、映射、校验
pub mod importer;

// 分阶段层 - 向导状态机与决策集
pub mod staging;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 数据仓储层 - 向导位置持久化
pub mod repository;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 对外门面
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, ColumnMapping, EntityType, FieldType, ParsedFile, RowData, RowValidationResult,
    Severity, SourceFormat, ValidationIssue, ValidationResult, WizardStep,
};

// 字段目录
pub use schema::{get_fields_for_type, template_for, FieldDefinition, TemplateFile};

// 导入管道
pub use importer::{
    ColumnMapper, FileParser, ImportError, ImportResult, RowValidator, TableDecoder,
};

// 分阶段
pub use staging::{
    ImportSink, ImportSummary, KeyValueStore, MemoryKeyValueStore, StagingController,
    StagingError,
};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "薪酬数据导入";
