// ==========================================
// 薪酬数据导入 - 导入API
// ==========================================
// 职责: 封装 解析 → 映射 → 校验 → 分阶段 的完整流程
// 调用方: CLI、外部宿主（向导界面）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ImportConfigReader, ImportSettings};
use crate::domain::mapping::ColumnMapping;
use crate::domain::parsed_file::ParsedFile;
use crate::domain::types::{EntityType, SourceFormat};
use crate::domain::validation::{ValidationIssue, ValidationResult};
use crate::importer::column_mapper::{missing_required_fields, ColumnMapper};
use crate::importer::file_parser::FileParser;
use crate::importer::row_validator::RowValidator;
use crate::importer::table_decoder::{CalamineDecoder, TableDecoder};
use crate::repository::SqliteKeyValueStore;
use crate::schema::catalogs::get_fields_for_type;
use crate::schema::template::{template_for, TemplateFile};
use crate::staging::{ImportSummary, StagingController, StagingError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 映射预览
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingPreview {
    /// 每个源列一条映射（顺序与表头一致）
    pub mappings: Vec<ColumnMapping>,
    /// 未映射的必填字段 key
    pub missing_required: Vec<String>,
    pub mapped_count: usize,
    pub unmapped_count: usize,
}

/// 单文件分析报告（CLI 输出）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// 本次分析的会话ID
    pub session_id: String,
    pub entity_type: EntityType,
    pub file_name: String,
    pub file_size: u64,
    pub format: SourceFormat,
    pub row_count: usize,
    pub mapping: MappingPreview,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub warning_rows: usize,
    pub error_rows: usize,
    /// 全部问题明细
    pub issues: Vec<ValidationIssue>,
    pub generated_at: DateTime<Utc>,
}

/// 导入API
pub struct ImportApi {
    settings: ImportSettings,
    parser: FileParser,
    mapper: ColumnMapper,
}

impl ImportApi {
    /// 使用默认电子表格解码器创建
    pub fn new(settings: ImportSettings) -> Self {
        Self::with_decoder(settings, Arc::new(CalamineDecoder))
    }

    /// 注入解码器创建（测试或替换解码实现）
    pub fn with_decoder(settings: ImportSettings, decoder: Arc<dyn TableDecoder>) -> Self {
        let parser = FileParser::new(decoder).with_max_file_bytes(settings.max_file_bytes);
        let mapper = settings.column_mapper();
        Self {
            settings,
            parser,
            mapper,
        }
    }

    /// 从配置源加载设置后创建，并切换界面语言
    pub async fn from_config(reader: &dyn ImportConfigReader) -> ApiResult<Self> {
        let settings = reader
            .load_settings()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        crate::i18n::set_locale(&settings.locale);
        Ok(Self::new(settings))
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    // ==========================================
    // 管道各阶段
    // ==========================================

    /// 解析上传的字节
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub fn parse_upload(&self, file_name: &str, bytes: &[u8]) -> ApiResult<ParsedFile> {
        Ok(self.parser.parse_bytes(file_name, bytes)?)
    }

    /// 从磁盘读取并解析
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> ApiResult<ParsedFile> {
        Ok(self.parser.parse_path(path).await?)
    }

    /// 自动映射并给出缺失必填字段
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub fn preview_mapping(&self, entity_type: EntityType, file: &ParsedFile) -> MappingPreview {
        let fields = get_fields_for_type(entity_type);
        let mappings = self.mapper.auto_map(&file.headers, &file.rows, fields);
        let missing_required: Vec<String> = missing_required_fields(&mappings, fields)
            .iter()
            .map(|f| f.key.to_string())
            .collect();

        if !missing_required.is_empty() {
            warn!(missing = ?missing_required, "存在未映射的必填字段");
        }

        let mapped_count = mappings.iter().filter(|m| m.is_mapped()).count();
        MappingPreview {
            unmapped_count: mappings.len() - mapped_count,
            mapped_count,
            mappings,
            missing_required,
        }
    }

    /// 按映射校验全部数据行
    #[instrument(skip(self, file, mappings), fields(rows = file.row_count))]
    pub fn validate(
        &self,
        entity_type: EntityType,
        file: &ParsedFile,
        mappings: &[ColumnMapping],
    ) -> ValidationResult {
        RowValidator::new(entity_type).validate(&file.rows, mappings)
    }

    /// 生成导入模板
    pub fn template(&self, entity_type: EntityType) -> TemplateFile {
        template_for(entity_type)
    }

    /// 一次性分析磁盘文件: 解析 → 映射 → 校验
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn analyze_path<P: AsRef<Path>>(
        &self,
        entity_type: EntityType,
        path: P,
    ) -> ApiResult<ImportReport> {
        let file = self.load_file(path).await?;
        let mapping = self.preview_mapping(entity_type, &file);
        let validation = self.validate(entity_type, &file, &mapping.mappings);

        let report = ImportReport {
            session_id: Uuid::new_v4().to_string(),
            entity_type,
            file_name: file.file_name,
            file_size: file.file_size,
            format: file.format,
            row_count: file.row_count,
            mapping,
            total_rows: validation.total_rows,
            valid_rows: validation.valid_rows,
            warning_rows: validation.warning_rows,
            error_rows: validation.error_rows,
            issues: validation.issues,
            generated_at: Utc::now(),
        };

        info!(
            session_id = %report.session_id,
            valid = report.valid_rows,
            warning = report.warning_rows,
            error = report.error_rows,
            "文件分析完成"
        );
        Ok(report)
    }

    // ==========================================
    // 向导集成
    // ==========================================

    /// 打开向导（位置持久化到 SQLite）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - preseeded: 预设实体类型（固定入口），None 表示从 data-type 开始
    pub fn open_wizard(
        &self,
        db_path: &str,
        preseeded: Option<EntityType>,
    ) -> ApiResult<StagingController> {
        let store = Arc::new(SqliteKeyValueStore::new(db_path)?);
        Ok(match preseeded {
            Some(entity_type) => StagingController::preseeded(store, entity_type),
            None => StagingController::new(store),
        })
    }

    /// 将解析后的文件放入向导并自动映射
    pub fn stage_file(
        &self,
        controller: &mut StagingController,
        file: ParsedFile,
    ) -> ApiResult<MappingPreview> {
        let entity_type = controller
            .entity_type()
            .ok_or(StagingError::EntityTypeNotSelected)?;
        let preview = self.preview_mapping(entity_type, &file);

        controller.set_file(file);
        controller.set_mappings(preview.mappings.clone());
        Ok(preview)
    }

    /// 按向导当前文件与映射重新校验（映射修改后需调用）
    pub fn revalidate(&self, controller: &mut StagingController) -> ApiResult<ImportSummary> {
        let entity_type = controller
            .entity_type()
            .ok_or(StagingError::EntityTypeNotSelected)?;
        let file = controller
            .file()
            .ok_or_else(|| ApiError::InvalidInput("尚未上传文件".to_string()))?;

        let result = self.validate(entity_type, file, controller.mappings());
        controller.set_validation_result(result);
        Ok(controller.summary())
    }
}

impl Default for ImportApi {
    fn default() -> Self {
        Self::new(ImportSettings::default())
    }
}
