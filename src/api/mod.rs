// ==========================================
// 薪酬数据导入 - API层
// ==========================================
// 职责: 对外门面，组合导入层、分阶段层与配置层
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportReport, MappingPreview};
