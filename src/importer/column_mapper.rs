// ==========================================
// 薪酬数据导入 - 列映射器实现
// ==========================================
// 职责: 源表头 → 目标字段的模糊匹配 + 置信度
// 算法: 单遍贪心（按表头顺序，已分配字段不再参与后续匹配）
// 说明: 贪心结果依赖表头顺序，并非全局最优二分匹配
// ==========================================

use crate::domain::mapping::ColumnMapping;
use crate::schema::catalogs::{FIRST_NAME_KEY, FULL_NAME_KEY, LAST_NAME_KEY};
use crate::schema::field_definition::FieldDefinition;
use std::collections::HashSet;
use tracing::{debug, info};

/// 默认映射阈值（置信度必须严格大于该值）
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// 默认样例值数量
pub const DEFAULT_SAMPLE_COUNT: usize = 3;

const SCORE_EXACT: f64 = 1.0;
const SCORE_CONTAINS: f64 = 0.9;
const SCORE_WORD_OVERLAP: f64 = 0.7;
const SCORE_PREFIX: f64 = 0.5;
const PREFIX_LEN: usize = 3;

/// 归一化: 小写，非字母数字字符折叠为单个空格，去首尾空白
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 两个已归一化字符串的相似度
///
/// 完全相等 1.0；包含关系 0.9；共享整词 0.7 × 共享词数 / 较大词数；
/// 前 3 个字符相同 0.5；否则 0。
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return SCORE_EXACT;
    }
    if a.contains(b) || b.contains(a) {
        return SCORE_CONTAINS;
    }

    let words_a: HashSet<&str> = a.split(' ').collect();
    let words_b: HashSet<&str> = b.split(' ').collect();
    let shared = words_a.intersection(&words_b).count();
    if shared > 0 {
        let longest = words_a.len().max(words_b.len()) as f64;
        return SCORE_WORD_OVERLAP * (shared as f64 / longest);
    }

    let prefix_a: String = a.chars().take(PREFIX_LEN).collect();
    let prefix_b: String = b.chars().take(PREFIX_LEN).collect();
    if prefix_a.chars().count() == PREFIX_LEN && prefix_a == prefix_b {
        return SCORE_PREFIX;
    }

    0.0
}

/// 表头与字段的最佳得分（key / label / 全部别名取最大值）
fn field_score(normalized_header: &str, field: &FieldDefinition) -> f64 {
    field
        .candidates()
        .map(|candidate| similarity(normalized_header, &normalize(candidate)))
        .fold(0.0, f64::max)
}

// ==========================================
// ColumnMapper - 列映射器
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnMapper {
    threshold: f64,      // 映射阈值
    sample_count: usize, // 样例值数量
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_SAMPLE_COUNT)
    }
}

impl ColumnMapper {
    pub fn new(threshold: f64, sample_count: usize) -> Self {
        Self {
            threshold,
            sample_count,
        }
    }

    /// 自动映射
    ///
    /// # 参数
    /// - headers: 源表头（按文件顺序）
    /// - rows: 数据行（用于提取样例值）
    /// - fields: 目标字段目录
    ///
    /// # 返回
    /// - 每个表头一条 ColumnMapping，顺序与表头一致
    pub fn auto_map(
        &self,
        headers: &[String],
        rows: &[Vec<String>],
        fields: &[FieldDefinition],
    ) -> Vec<ColumnMapping> {
        let mut available: Vec<&FieldDefinition> = fields.iter().collect();
        let mut mappings = Vec::with_capacity(headers.len());

        for (index, header) in headers.iter().enumerate() {
            let normalized = normalize(header);

            // 在尚未分配的字段中找最高分（并列取目录中靠前者）
            let mut best: Option<(usize, f64)> = None;
            for (pos, field) in available.iter().enumerate() {
                let score = field_score(&normalized, field);
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((pos, score));
                }
            }

            let (target_field, confidence) = match best {
                Some((pos, score)) if score > self.threshold => {
                    let field = available.remove(pos);
                    debug!(header = %header, field = field.key, confidence = score, "列已映射");
                    (Some(field.key.to_string()), score)
                }
                _ => {
                    debug!(header = %header, "列未映射");
                    (None, 0.0)
                }
            };

            mappings.push(ColumnMapping {
                source_column: header.clone(),
                source_index: index,
                target_field,
                confidence,
                sample_values: self.sample_values(rows, index),
            });
        }

        let mapped = mappings.iter().filter(|m| m.is_mapped()).count();
        info!(
            columns = mappings.len(),
            mapped = mapped,
            unmapped = mappings.len() - mapped,
            "列映射完成"
        );

        mappings
    }

    /// 取该列前几个非空值作为样例
    fn sample_values(&self, rows: &[Vec<String>], index: usize) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.get(index))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .take(self.sample_count)
            .map(str::to_string)
            .collect()
    }
}

/// 缺失的必填字段
///
/// 若目录定义了 fullName 且已映射，则 firstName / lastName 不再视为缺失。
pub fn missing_required_fields<'a>(
    mappings: &[ColumnMapping],
    fields: &'a [FieldDefinition],
) -> Vec<&'a FieldDefinition> {
    let mapped: HashSet<&str> = mappings
        .iter()
        .filter_map(|m| m.target_field.as_deref())
        .collect();

    let full_name_mapped =
        fields.iter().any(|f| f.key == FULL_NAME_KEY) && mapped.contains(FULL_NAME_KEY);

    fields
        .iter()
        .filter(|f| f.required && !mapped.contains(f.key))
        .filter(|f| !(full_name_mapped && (f.key == FIRST_NAME_KEY || f.key == LAST_NAME_KEY)))
        .collect()
}

/// 人工修改某列的目标字段
///
/// 保持单射: 若目标字段已被其他列占用，则清除该列的映射。
/// 人工指定的置信度记为 1.0，清除记为 0。
///
/// # 返回
/// - true: 找到该列并已修改
/// - false: 列下标不存在
pub fn assign_target(
    mappings: &mut [ColumnMapping],
    source_index: usize,
    target_field: Option<&str>,
) -> bool {
    if !mappings.iter().any(|m| m.source_index == source_index) {
        return false;
    }

    for mapping in mappings.iter_mut() {
        if mapping.source_index == source_index {
            mapping.target_field = target_field.map(str::to_string);
            mapping.confidence = if target_field.is_some() { 1.0 } else { 0.0 };
        } else if target_field.is_some() && mapping.target_field.as_deref() == target_field {
            mapping.target_field = None;
            mapping.confidence = 0.0;
        }
    }

    true
}
