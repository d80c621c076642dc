// ==========================================
// 薪酬数据导入 - 分阶段控制器
// ==========================================
// 职责: 驱动线性向导状态机 + 维护逐行排除决定 + 交付决策集
// 状态机: data-type → file-upload → column-mapping → validation → confirm → success
// 预设入口: 预设实体类型时跳过 data-type，且后退不可达
// 红线: confirm 之前不产生任何外部副作用
// ==========================================

use crate::domain::mapping::ColumnMapping;
use crate::domain::parsed_file::ParsedFile;
use crate::domain::types::{EntityType, WizardStep};
use crate::domain::validation::{RowData, RowValidationResult, ValidationResult};
use crate::importer::column_mapper::{assign_target, missing_required_fields};
use crate::schema::catalogs::get_fields_for_type;
use crate::schema::field_definition::{find_field, FieldDefinition};
use crate::staging::error::{StagingError, StagingResult};
use crate::staging::sink::ImportSink;
use crate::staging::store::KeyValueStore;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// 持久化 key（带结构版本后缀）
pub const STEP_KEY: &str = "import_wizard.step.v1";
pub const ENTITY_TYPE_KEY: &str = "import_wizard.entity_type.v1";

// ==========================================
// ImportSummary - 汇总计数（派生，不存储）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ImportSummary {
    pub total: usize,     // 数据行总数
    pub importing: usize, // 将导入（有效且未排除）
    pub excluded: usize,  // 人工排除
    pub errors: usize,    // 含 error 的行
}

// ==========================================
// StagingController - 单个向导实例的状态
// ==========================================
pub struct StagingController {
    store: Arc<dyn KeyValueStore>,
    preseeded: bool,
    entity_type: Option<EntityType>,
    step: WizardStep,
    file: Option<ParsedFile>,
    mappings: Vec<ColumnMapping>,
    validation: Option<ValidationResult>,
    excluded: BTreeSet<usize>,
}

impl StagingController {
    /// 创建控制器并恢复持久化的向导位置
    ///
    /// 内存中没有文件，因此恢复的步骤最多回到 file-upload。
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let entity_type = store
            .get(ENTITY_TYPE_KEY)
            .and_then(|v| v.parse::<EntityType>().ok());
        let stored_step = store.get(STEP_KEY).and_then(|v| v.parse::<WizardStep>().ok());

        let mut controller = Self::blank(store, false, entity_type);
        controller.restore_step(stored_step);
        controller
    }

    /// 创建预设实体类型的控制器（固定入口，跳过 data-type）
    pub fn preseeded(store: Arc<dyn KeyValueStore>, entity_type: EntityType) -> Self {
        let stored_step = store.get(STEP_KEY).and_then(|v| v.parse::<WizardStep>().ok());

        let mut controller = Self::blank(store, true, Some(entity_type));
        controller.restore_step(stored_step);
        controller.persist_entity_type();
        controller
    }

    fn blank(store: Arc<dyn KeyValueStore>, preseeded: bool, entity_type: Option<EntityType>) -> Self {
        Self {
            store,
            preseeded,
            entity_type,
            step: Self::first_step_for(preseeded),
            file: None,
            mappings: Vec::new(),
            validation: None,
            excluded: BTreeSet::new(),
        }
    }

    fn first_step_for(preseeded: bool) -> WizardStep {
        if preseeded {
            WizardStep::FileUpload
        } else {
            WizardStep::DataType
        }
    }

    fn restore_step(&mut self, stored: Option<WizardStep>) {
        let Some(stored) = stored else {
            self.persist_step();
            return;
        };

        let ceiling = if self.entity_type.is_some() {
            WizardStep::FileUpload
        } else {
            WizardStep::DataType
        };
        let floor = self.first_step();
        let restored = stored.min(ceiling).max(floor);

        if restored != stored {
            info!(stored = %stored, restored = %restored, "恢复的向导步骤已回退（文件不在内存中）");
        }
        self.step = restored;
        self.persist_step();
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn entity_type(&self) -> Option<EntityType> {
        self.entity_type
    }

    pub fn is_preseeded(&self) -> bool {
        self.preseeded
    }

    pub fn file(&self) -> Option<&ParsedFile> {
        self.file.as_ref()
    }

    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        self.validation.as_ref()
    }

    pub fn excluded_rows(&self) -> &BTreeSet<usize> {
        &self.excluded
    }

    /// 当前实体类型的字段目录
    pub fn fields(&self) -> Option<&'static [FieldDefinition]> {
        self.entity_type.map(get_fields_for_type)
    }

    /// 当前映射下缺失的必填字段
    pub fn missing_required(&self) -> Vec<&'static FieldDefinition> {
        self.fields()
            .map(|fields| missing_required_fields(&self.mappings, fields))
            .unwrap_or_default()
    }

    pub fn first_step(&self) -> WizardStep {
        Self::first_step_for(self.preseeded)
    }

    // ==========================================
    // 状态修改
    // ==========================================

    /// 选择实体类型
    ///
    /// 切换到不同类型时，已有映射与校验结果作废（文件保留）。
    pub fn select_entity_type(&mut self, entity_type: EntityType) -> StagingResult<()> {
        if self.preseeded {
            if let Some(locked) = self.entity_type.filter(|t| *t != entity_type) {
                return Err(StagingError::EntityTypeLocked(locked));
            }
        }

        if self.entity_type != Some(entity_type) {
            self.mappings.clear();
            self.validation = None;
            self.excluded.clear();
        }

        self.entity_type = Some(entity_type);
        self.persist_entity_type();
        info!(entity_type = %entity_type, "已选择实体类型");
        Ok(())
    }

    /// 设置上传文件（下游映射、校验、排除全部清空）
    pub fn set_file(&mut self, file: ParsedFile) {
        info!(
            file_name = %file.file_name,
            rows = file.row_count,
            columns = file.column_count(),
            "已设置上传文件"
        );
        self.file = Some(file);
        self.mappings.clear();
        self.validation = None;
        self.excluded.clear();
    }

    /// 整体替换映射（不自动重新校验）
    pub fn set_mappings(&mut self, mappings: Vec<ColumnMapping>) {
        self.mappings = mappings;
    }

    /// 修改单列的目标字段（不自动重新校验）
    ///
    /// # 参数
    /// - source_index: 源列下标
    /// - target_field: 目标字段 key，None 表示取消映射
    pub fn update_mapping(
        &mut self,
        source_index: usize,
        target_field: Option<&str>,
    ) -> StagingResult<()> {
        if let Some(key) = target_field {
            let fields = self.fields().ok_or(StagingError::EntityTypeNotSelected)?;
            if find_field(fields, key).is_none() {
                return Err(StagingError::UnknownField(key.to_string()));
            }
        }

        if !assign_target(&mut self.mappings, source_index, target_field) {
            return Err(StagingError::UnknownColumn(source_index));
        }

        info!(source_index = source_index, target_field = ?target_field, "已修改列映射");
        Ok(())
    }

    /// 设置校验结果（排除集合独立于有效性，保持不变）
    pub fn set_validation_result(&mut self, result: ValidationResult) {
        self.validation = Some(result);
    }

    /// 切换单行的人工排除
    ///
    /// # 返回
    /// - true: 切换后该行被排除
    pub fn toggle_row_exclusion(&mut self, row_index: usize) -> StagingResult<bool> {
        let total = self.validation.as_ref().map_or(0, |v| v.rows.len());
        if row_index >= total {
            return Err(StagingError::UnknownRow(row_index));
        }

        let excluded = if self.excluded.remove(&row_index) {
            false
        } else {
            self.excluded.insert(row_index);
            true
        };
        Ok(excluded)
    }

    /// 批量排除所有无效行
    ///
    /// # 返回
    /// - 新增排除的行数
    pub fn exclude_invalid_rows(&mut self) -> usize {
        let Some(validation) = self.validation.as_ref() else {
            return 0;
        };

        let before = self.excluded.len();
        self.excluded.extend(
            validation
                .rows
                .iter()
                .filter(|r| !r.is_valid)
                .map(|r| r.row_index),
        );
        let added = self.excluded.len() - before;
        info!(added = added, "已排除全部无效行");
        added
    }

    // ==========================================
    // 导航
    // ==========================================

    /// 前进一步（confirm → success 只能经由 commit）
    pub fn advance(&mut self) -> StagingResult<WizardStep> {
        let from = self.step;
        let to = from.next().ok_or(StagingError::InvalidTransition { from, to: from })?;

        if from == WizardStep::Confirm {
            return Err(StagingError::InvalidTransition { from, to });
        }

        self.ensure_ready(from)?;
        self.move_to(to);
        Ok(to)
    }

    /// 后退一步（success 为终态；预设入口不可回到 data-type）
    pub fn retreat(&mut self) -> StagingResult<WizardStep> {
        let from = self.step;

        if from == WizardStep::Success {
            return Err(StagingError::InvalidTransition {
                from,
                to: WizardStep::Confirm,
            });
        }
        if from == self.first_step() {
            return Err(StagingError::AtFirstStep(from));
        }

        let to = from.previous().ok_or(StagingError::AtFirstStep(from))?;
        self.move_to(to);
        Ok(to)
    }

    /// 重置全部状态，准备新的上传
    pub fn reset(&mut self) {
        if !self.preseeded {
            self.entity_type = None;
            self.persist_entity_type();
        }
        self.file = None;
        self.mappings.clear();
        self.validation = None;
        self.excluded.clear();
        self.move_to(self.first_step());
    }

    fn ensure_ready(&self, step: WizardStep) -> StagingResult<()> {
        let incomplete = |missing: &str| StagingError::StepIncomplete {
            step,
            missing: missing.to_string(),
        };

        match step {
            WizardStep::DataType => {
                self.entity_type.ok_or(StagingError::EntityTypeNotSelected)?;
            }
            WizardStep::FileUpload => {
                if self.file.is_none() {
                    return Err(incomplete("file"));
                }
            }
            WizardStep::ColumnMapping => {
                if !self.mappings.iter().any(ColumnMapping::is_mapped) {
                    return Err(incomplete("mappings"));
                }
                let missing = self.missing_required();
                if !missing.is_empty() {
                    return Err(StagingError::MissingRequiredFields(
                        missing.iter().map(|f| f.key.to_string()).collect(),
                    ));
                }
            }
            WizardStep::Validation => {
                if self.validation.is_none() {
                    return Err(incomplete("validation"));
                }
            }
            WizardStep::Confirm | WizardStep::Success => {}
        }
        Ok(())
    }

    fn move_to(&mut self, to: WizardStep) {
        let from = self.step;
        self.step = to;
        self.persist_step();
        info!(from = %from, to = %to, "向导步骤切换");
    }

    fn persist_step(&self) {
        self.store.set(STEP_KEY, self.step.as_str());
    }

    fn persist_entity_type(&self) {
        let value = self.entity_type.map(|t| t.as_str()).unwrap_or_default();
        self.store.set(ENTITY_TYPE_KEY, value);
    }

    // ==========================================
    // 决策集
    // ==========================================

    /// 决策集: 有效且未被人工排除的行
    pub fn decision_set(&self) -> Vec<&RowValidationResult> {
        self.validation
            .as_ref()
            .map(|v| {
                v.rows
                    .iter()
                    .filter(|r| r.is_valid && !self.excluded.contains(&r.row_index))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn summary(&self) -> ImportSummary {
        let Some(validation) = self.validation.as_ref() else {
            return ImportSummary::default();
        };

        ImportSummary {
            total: validation.total_rows,
            importing: self.decision_set().len(),
            excluded: self
                .excluded
                .iter()
                .filter(|idx| **idx < validation.rows.len())
                .count(),
            errors: validation.error_rows,
        }
    }

    /// 交付决策集（仅 confirm 步骤可调用）
    ///
    /// 交付成功后进入 success；交付失败时停留在 confirm。
    ///
    /// # 返回
    /// - Ok(usize): 接收方确认的行数
    #[instrument(skip(self, sink), fields(entity_type = ?self.entity_type))]
    pub async fn commit(&mut self, sink: &dyn ImportSink) -> StagingResult<usize> {
        if self.step != WizardStep::Confirm {
            return Err(StagingError::InvalidTransition {
                from: self.step,
                to: WizardStep::Success,
            });
        }

        let entity_type = self.entity_type.ok_or(StagingError::EntityTypeNotSelected)?;
        let rows: Vec<RowData> = self.decision_set().into_iter().map(|r| r.data.clone()).collect();
        if rows.is_empty() {
            warn!("决策集为空，未交付");
            return Err(StagingError::NothingToCommit);
        }

        let handed_off = rows.len();
        let accepted = sink.accept(entity_type, rows).await.map_err(|e| {
            error!(error = %e, rows = handed_off, "决策集交付失败");
            StagingError::Other(e)
        })?;

        info!(rows = handed_off, accepted = accepted, "决策集已交付");
        self.move_to(WizardStep::Success);
        Ok(accepted)
    }
}
