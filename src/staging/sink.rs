// ==========================================
// 薪酬数据导入 - 导入交付端口
// ==========================================
// 职责: 接收最终决策集（外部存储层实现）
// 本库自身从不写入业务系统
// ==========================================

use crate::domain::types::EntityType;
use crate::domain::validation::RowData;
use async_trait::async_trait;

#[async_trait]
pub trait ImportSink: Send + Sync {
    /// 接收决策集
    ///
    /// # 参数
    /// - entity_type: 目标实体类型
    /// - rows: 有效且未被排除的行（字段 key → 转换后的值）
    ///
    /// # 返回
    /// - Ok(usize): 实际接收的行数
    async fn accept(&self, entity_type: EntityType, rows: Vec<RowData>) -> anyhow::Result<usize>;
}
