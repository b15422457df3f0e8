//! Amesh Observer CLI
//!
//! 监控东京アメッシュ雷达，开始下雨时发送通知

use amesh_observer::{
    build_notifier, AmeshSource, Config, EventKind, Notifier, NotifierKind, Observer, Poller,
    RainAlert, ReadingSource, ThrottleGate,
};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "amesh")]
#[command(about = "Amesh Observer - 东京アメッシュ降雨监控与通知")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConfigArgs {
    /// 配置文件路径（默认: <config_dir>/amesh/config.json）
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 后台监控模式：定时检查雷达，下雨时发送通知
    Watch {
        /// 轮询间隔（秒）
        #[arg(long, short)]
        interval: Option<u64>,
        /// 限流窗口（秒）
        #[arg(long, short)]
        window: Option<u64>,
        /// 只打印不发送
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// 检查一次当前雷达状态
    Check {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// 通过当前配置的渠道发送一条测试消息
    NotifyTest {
        /// 消息内容
        #[arg(long, short, default_value = "amesh notification test")]
        message: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug amesh watch
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("amesh_observer=info,amesh=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            interval,
            window,
            dry_run,
            config,
        } => {
            let mut config = Config::load(config.config.as_deref())?;
            if let Some(interval) = interval {
                config.interval_secs = interval;
            }
            if let Some(window) = window {
                config.throttle_window_secs = window;
            }
            if dry_run {
                config.notifier.service = NotifierKind::None;
            }
            config.validate()?;
            watch(config).await?;
        }
        Commands::Check { json, config } => {
            let config = Config::load(config.config.as_deref())?;
            let reading = tokio::task::spawn_blocking(move || -> Result<_> {
                AmeshSource::new(config.source)?.fetch_current_reading()
            })
            .await??;

            if json {
                println!("{}", serde_json::to_string_pretty(&reading)?);
                return Ok(());
            }

            let status = if reading.is_raining { "雨" } else { "晴れ/曇り" };
            println!("{} {}", reading.timestamp.format("%Y-%m-%d %H:%M"), status);
            if let Some(url) = reading.url {
                println!("#amesh {}", url);
            }
        }
        Commands::NotifyTest { message, config } => {
            let config = Config::load(config.config.as_deref())?;
            let channel = tokio::task::spawn_blocking(move || -> Result<String> {
                let notifier = build_notifier(&config.notifier)?;
                notifier.notify(&message)?;
                Ok(notifier.name().to_string())
            })
            .await??;
            println!("已通过 {} 发送测试消息", channel);
        }
    }

    Ok(())
}

/// 启动轮询循环，Ctrl+C 时停止
async fn watch(config: Config) -> Result<()> {
    let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);

    info!(
        interval_secs = config.interval_secs,
        window_secs = config.throttle_window_secs,
        service = %config.notifier.service,
        "Amesh watcher starting"
    );

    // HTTP 客户端是阻塞的，整个循环放在 blocking 线程上
    let mut worker = tokio::task::spawn_blocking(move || -> Result<_> {
        let source = AmeshSource::new(config.source.clone())?;
        let notifier = build_notifier(&config.notifier)?;
        let page_url = format!("{}/", config.source.base_url.trim_end_matches('/'));

        let mut alert = RainAlert::new(
            notifier,
            ThrottleGate::new(config.throttle_window()),
            config.users.clone(),
        )
        .with_page_url(page_url);

        let mut observer = Observer::new();
        observer.on(EventKind::Rain, move |ev| alert.handle(ev));

        let mut poller = Poller::new(source, observer);
        Ok(poller.run(config.interval(), &stop_rx))
    });

    let stats = tokio::select! {
        joined = &mut worker => joined??,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, waiting for current tick to finish");
            let _ = stop_tx.send(());
            worker.await??
        }
    };

    eprintln!(
        "Amesh watcher 已停止: {} 次轮询, {} 次降雨事件, {} 次获取失败",
        stats.ticks, stats.events, stats.fetch_failures
    );
    Ok(())
}
