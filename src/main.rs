use anyhow::{Context, Result};
use quiz_runner::utils::logging;
use quiz_runner::{App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（QUIZ_CONFIG 指向可选的 TOML 文件，环境变量优先）
    let config_path = std::env::var("QUIZ_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("加载配置失败")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _results = App::initialize(config).await?.run().await?;

    Ok(())
}
