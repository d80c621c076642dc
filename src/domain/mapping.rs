// ==========================================
// 薪酬数据导入 - 列映射模型
// ==========================================
// 不变量: 同一文件的映射集合中，非空 target_field 不重复（单射）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ColumnMapping - 源列 → 目标字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_column: String,        // 源表头
    pub source_index: usize,          // 源列下标（从 0 开始）
    pub target_field: Option<String>, // 目标字段 key（None = 未映射）
    pub confidence: f64,              // 置信度 [0, 1]
    pub sample_values: Vec<String>,   // 样例值（最多 3 个，非空）
}

impl ColumnMapping {
    pub fn is_mapped(&self) -> bool {
        self.target_field.is_some()
    }
}

/// 检查映射集合是否满足单射约束
pub fn is_injective(mappings: &[ColumnMapping]) -> bool {
    let mut seen = std::collections::HashSet::new();
    mappings
        .iter()
        .filter_map(|m| m.target_field.as_deref())
        .all(|field| seen.insert(field))
}
