use std::io;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use rfind::cli::Cli;
use rfind::finder::Finder;

fn main() -> Result<ExitCode> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 初始化日志：默认只输出警告，诊断信息保持简洁
    env_logger::Builder::new()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    info!("开始运行 rfind");
    let start_time = Instant::now();

    let query = cli.build_query()?;
    debug!("查询: {:?}", query);

    let finder = Finder::new(query);
    let stdout = io::stdout();
    let summary = finder.run(&mut stdout.lock())?;

    let elapsed = start_time.elapsed();
    info!(
        "搜索完成，共 {} 个起始路径，耗时 {:.2?}",
        finder.query().roots.len(),
        elapsed
    );

    if summary.errors > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
