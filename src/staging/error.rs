// ==========================================
// 薪酬数据导入 - 分阶段控制错误类型
// ==========================================
// 范围: 非法步骤切换、前置数据缺失、交付失败
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::{EntityType, WizardStep};
use crate::i18n::t_with_args;
use thiserror::Error;

/// 分阶段控制错误类型
#[derive(Error, Debug)]
pub enum StagingError {
    // ===== 步骤切换 =====
    #[error("无效的步骤切换: from={from} to={to}")]
    InvalidTransition { from: WizardStep, to: WizardStep },

    #[error("已是第一步: {0}")]
    AtFirstStep(WizardStep),

    #[error("步骤 {step} 缺少前置数据: {missing}")]
    StepIncomplete { step: WizardStep, missing: String },

    #[error("必填字段未映射: {}", .0.join(", "))]
    MissingRequiredFields(Vec<String>),

    // ===== 实体类型 =====
    #[error("尚未选择实体类型")]
    EntityTypeNotSelected,

    #[error("实体类型已预设为 {0}，不可修改")]
    EntityTypeLocked(EntityType),

    // ===== 映射/排除 =====
    #[error("列不存在: index={0}")]
    UnknownColumn(usize),

    #[error("目标字段不存在: {0}")]
    UnknownField(String),

    #[error("行不存在: index={0}")]
    UnknownRow(usize),

    // ===== 交付 =====
    #[error("没有可导入的数据行")]
    NothingToCommit,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StagingError {
    /// 面向用户的提示信息（仅覆盖需要展示给用户的分支）
    pub fn user_message(&self) -> String {
        match self {
            StagingError::InvalidTransition { from, to } => t_with_args(
                "wizard.invalid_transition",
                &[("from", from.as_str()), ("to", to.as_str())],
            ),
            StagingError::MissingRequiredFields(fields) => t_with_args(
                "import.missing_required",
                &[("fields", &fields.join(", "))],
            ),
            StagingError::NothingToCommit => t_with_args("wizard.nothing_to_commit", &[]),
            other => other.to_string(),
        }
    }
}

/// Result 类型别名
pub type StagingResult<T> = Result<T, StagingError>;
