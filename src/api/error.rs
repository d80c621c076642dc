// ==========================================
// 薪酬数据导入 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为用户可读的提示
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use crate::staging::error::StagingError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 管道错误 =====
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    // ===== 输入错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ===== 基础设施错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),
}

impl ApiError {
    /// 面向用户的提示信息（按当前语言）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Import(e) => e.user_message(),
            ApiError::Staging(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_inner_layers() {
        let err: ApiError = ImportError::HeaderOnly.into();
        assert!(matches!(err, ApiError::Import(ImportError::HeaderOnly)));

        let err: ApiError = StagingError::NothingToCommit.into();
        assert!(matches!(err, ApiError::Staging(_)));

        let err: ApiError = RepositoryError::LockError("poisoned".into()).into();
        assert!(err.to_string().contains("poisoned"));
    }
}
