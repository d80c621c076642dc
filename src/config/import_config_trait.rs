// ==========================================
// 薪酬数据导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::import_settings::ImportSettings;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入管道所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取列映射阈值（置信度必须严格大于该值）
    ///
    /// # 默认值
    /// - 0.5
    async fn get_confidence_threshold(&self) -> Result<f64, Box<dyn Error>>;

    /// 获取每列样例值数量
    ///
    /// # 默认值
    /// - 3
    async fn get_sample_count(&self) -> Result<usize, Box<dyn Error>>;

    /// 获取上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 10 MiB
    async fn get_max_file_bytes(&self) -> Result<u64, Box<dyn Error>>;

    /// 获取界面语言
    ///
    /// # 默认值
    /// - "en"
    async fn get_locale(&self) -> Result<String, Box<dyn Error>>;

    /// 一次性读取全部导入配置
    async fn load_settings(&self) -> Result<ImportSettings, Box<dyn Error>> {
        let confidence_threshold = self.get_confidence_threshold().await?;
        let sample_count = self.get_sample_count().await?;
        let max_file_bytes = self.get_max_file_bytes().await?;
        let locale = self.get_locale().await?;

        Ok(ImportSettings {
            confidence_threshold,
            sample_count,
            max_file_bytes,
            locale,
        })
    }
}
