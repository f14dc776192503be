//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use anyhow::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::counter::QuestionStats;
use crate::services::notifier::{Severity, Toast};

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info 级别。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\nAI 出题日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 把通知追加到日志文件
pub fn append_notices(log_file_path: &str, toasts: &[Toast]) -> Result<()> {
    if toasts.is_empty() {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    for toast in toasts {
        let level = match toast.severity {
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        };
        writeln!(
            file,
            "[{}] {} #{} {}",
            chrono::Local::now().format("%H:%M:%S"),
            level,
            toast.id,
            toast.message
        )?;
    }

    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - AI 出题模式");
    match &config.generation_api_base_url {
        Some(url) => info!("🌐 生成后端: {}", url),
        None => info!("🤖 直接调用 LLM: {}", config.llm_model_name),
    }
    info!("📄 草稿存储: {} ({})", config.draft_store_path, config.draft_key);
    info!("{}", "=".repeat(60));
}

/// 记录审阅页统计信息
pub fn log_review_summary(subject: &str, stats: &QuestionStats) {
    info!("\n{}", "─".repeat(60));
    info!("📊 审阅试卷: {}", subject);
    info!("题目总数: {} | 已选: {}", stats.total, stats.selected);
    info!(
        "MC: {} | VF: {} | AN: {} | EJ: {}",
        stats.multiple_choice, stats.true_false, stats.open_analysis, stats.open_exercise
    );
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
