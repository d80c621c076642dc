// ==========================================
// 薪酬数据导入 - 分阶段层
// ==========================================
// 职责: 向导状态机、逐行排除、决策集交付
// 端口: KeyValueStore（向导位置持久化）, ImportSink（外部存储）
// ==========================================

pub mod controller;
pub mod error;
pub mod sink;
pub mod store;

pub use controller::{ImportSummary, StagingController, ENTITY_TYPE_KEY, STEP_KEY};
pub use error::{StagingError, StagingResult};
pub use sink::ImportSink;
pub use store::{KeyValueStore, MemoryKeyValueStore};
