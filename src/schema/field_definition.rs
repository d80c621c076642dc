// ==========================================
// 薪酬数据导入 - 字段定义
// ==========================================
// 职责: 目标字段的静态描述（key / 标签 / 必填 / 类型 / 别名 / 枚举值）
// 红线: 纯数据，运行期不修改
// ==========================================

use crate::domain::types::FieldType;
use serde::Serialize;

// ==========================================
// FieldDefinition - 目标字段定义
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub key: &'static str,   // 字段 key（schema 内唯一，对外契约）
    pub label: &'static str, // 显示名（同时作为模板表头）
    pub required: bool,      // 是否必填
    #[serde(rename = "type")]
    pub field_type: FieldType, // 字段类型
    pub aliases: &'static [&'static str], // 常见表头写法
    pub allowed_values: &'static [&'static str], // 枚举允许值（小写）
}

impl FieldDefinition {
    pub(crate) const fn new(
        key: &'static str,
        label: &'static str,
        required: bool,
        field_type: FieldType,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            required,
            field_type,
            aliases,
            allowed_values: &[],
        }
    }

    pub(crate) const fn with_values(mut self, allowed_values: &'static [&'static str]) -> Self {
        self.allowed_values = allowed_values;
        self
    }

    /// 候选匹配串: key、label、全部别名
    pub fn candidates(&self) -> impl Iterator<Item = &'static str> {
        [self.key, self.label]
            .into_iter()
            .chain(self.aliases.iter().copied())
    }

    /// 枚举值校验（大小写不敏感）
    pub fn allows(&self, value: &str) -> bool {
        let lowered = value.trim().to_lowercase();
        self.allowed_values.iter().any(|v| v.to_lowercase() == lowered)
    }
}

/// 按 key 查找字段
pub fn find_field<'a>(fields: &'a [FieldDefinition], key: &str) -> Option<&'a FieldDefinition> {
    fields.iter().find(|f| f.key == key)
}
