// ==========================================
// 薪酬数据导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod workflow_kv_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use workflow_kv_repo::SqliteKeyValueStore;
