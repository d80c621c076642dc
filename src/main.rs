// ==========================================
// 薪酬数据导入 - 命令行入口
// ==========================================
// 用法:
//   comp-import <entity-type> <file>             解析 → 映射 → 校验，输出 JSON 报告
//   comp-import template <entity-type> [out]     输出导入模板（默认写到 stdout）
// 环境变量:
//   COMP_IMPORT_DB_PATH   配置库路径（config_kv）
//   COMP_IMPORT_LOG_JSON  非空时日志输出为 JSON
//   RUST_LOG              日志级别
// ==========================================

use anyhow::{bail, Context};
use comp_import::api::ImportApi;
use comp_import::config::ConfigManager;
use comp_import::db::default_db_path;
use comp_import::logging::{self, LogFormat};
use comp_import::EntityType;
use std::io::Write;

const USAGE: &str = "用法:
  comp-import <entity-type> <file>
  comp-import template <entity-type> [out]

entity-type: employees | benchmarks | compensation-changes";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_format = match std::env::var("COMP_IMPORT_LOG_JSON") {
        Ok(v) if !v.trim().is_empty() => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    logging::init_with_format(log_format);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, entity, rest @ ..] if cmd == "template" && rest.len() <= 1 => {
            write_template(entity, rest.first().map(String::as_str))
        }
        [entity, file] => analyze(entity, file).await,
        _ => bail!("{}", USAGE),
    }
}

fn parse_entity(raw: &str) -> anyhow::Result<EntityType> {
    raw.parse::<EntityType>()
        .map_err(|e| anyhow::anyhow!("{}\n\n{}", e, USAGE))
}

async fn analyze(entity: &str, file: &str) -> anyhow::Result<()> {
    let entity_type = parse_entity(entity)?;

    let db_path = default_db_path();
    tracing::info!(db_path = %db_path, "使用配置库");
    let config = ConfigManager::new(&db_path)
        .map_err(|e| anyhow::anyhow!("无法打开配置库 {}: {}", db_path, e))?;
    let api = ImportApi::from_config(&config).await?;

    let report = match api.analyze_path(entity_type, file).await {
        Ok(report) => report,
        Err(e) => bail!("{}", e.user_message()),
    };

    let json = serde_json::to_string_pretty(&report).context("报告序列化失败")?;
    println!("{}", json);

    if !report.mapping.missing_required.is_empty() {
        tracing::warn!(missing = ?report.mapping.missing_required, "必填字段未映射");
    }
    Ok(())
}

fn write_template(entity: &str, out: Option<&str>) -> anyhow::Result<()> {
    let entity_type = parse_entity(entity)?;
    let template = comp_import::template_for(entity_type);

    match out {
        Some(path) => {
            std::fs::write(path, &template.bytes)
                .with_context(|| format!("模板写入失败: {}", path))?;
            tracing::info!(path = %path, file_name = %template.file_name, "模板已生成");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&template.bytes)?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
