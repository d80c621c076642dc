// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认/回退）和中文
// 覆盖: 文件级错误提示、行校验消息、向导提示
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// 当前支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"），不支持的代码回退为 "en"
pub fn set_locale(locale: &str) {
    if SUPPORTED_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale = %locale, "不支持的语言，回退为 en");
        rust_i18n::set_locale("en");
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use comp_import::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use comp_import::i18n::t_with_args;
/// let msg = t_with_args("validation.required_missing", &[("field", "Email")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let template = rust_i18n::t!(key).to_string();

    // 单次扫描模板，替换进来的值不再参与占位符匹配
    PLACEHOLDER_RE
        .replace_all(&template, |caps: &Captures| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\{(\w+)\}").expect("占位符正则无效"));

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，测试并行执行时需串行化
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_unsupported_locale_falls_back_to_en() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("fr");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("common.success"), "操作成功");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/roster.csv")]);
        assert!(msg.contains("/tmp/roster.csv"));
        assert!(msg.contains("文件不存在"));

        set_locale("en");
        let msg = t_with_args("validation.required_missing", &[("field", "Email")]);
        assert_eq!(msg, "Email is required");
    }

    #[test]
    fn test_args_are_not_expanded_recursively() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args(
            "validation.invalid_enum",
            &[("field", "Status"), ("value", "%{allowed}"), ("allowed", "active, inactive")],
        );
        assert_eq!(
            msg,
            "\"%{allowed}\" is not an accepted value for Status (expected one of: active, inactive)"
        );
    }
}
