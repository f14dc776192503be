use anyhow::Result;
use exam_ai_propose::utils::logging;
use exam_ai_propose::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_toml_file(std::path::Path::new(&path))?,
        None => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let report = App::initialize(config)?.run().await?;
    tracing::info!(
        "完成: 生成 {} 道题目, 保存: {}, 通知: {}",
        report.generated,
        report.saved,
        report.notices
    );

    Ok(())
}
