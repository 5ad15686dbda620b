//! 不可靠信道上的滑动窗口 ARQ 仿真
//!
//! 基本参数可以用命令行给出，缺失的会交互式询问。

use clap::Parser;
use gbnsim_rs::config::{Params, SimConfig};
use gbnsim_rs::proto::{GbnConfig, WindowMode};
use gbnsim_rs::sim::DEFAULT_SEED;
use gbnsim_rs::testbed::run_simulation;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "gbn-sim",
    about = "Sliding-window ARQ over a simulated lossy, corrupting channel"
)]
struct Args {
    /// 要仿真的消息总数
    #[arg(long)]
    messages: Option<u64>,
    /// 丢包概率 [0.0, 1.0]
    #[arg(long)]
    loss: Option<f64>,
    /// 损坏概率 [0.0, 1.0]
    #[arg(long)]
    corrupt: Option<f64>,
    /// 发送端上层消息的平均到达间隔（> 0.0）
    #[arg(long)]
    mean_interarrival: Option<f64>,
    /// 诊断输出等级：0 只输出汇总，越大越详细
    #[arg(long)]
    trace: Option<u8>,
    /// 随机种子
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// 窗口大小
    #[arg(long, default_value_t = 20)]
    window_size: usize,
    /// 重传超时（时间单位）
    #[arg(long, default_value_t = 500.0)]
    timeout: f64,
    /// 窗口发送策略
    #[arg(long, value_enum, default_value_t = WindowMode::Sliding)]
    window_mode: WindowMode,
    /// 把汇总写成 JSON 文件
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let params = Params {
        messages: args.messages,
        loss_prob: args.loss,
        corrupt_prob: args.corrupt,
        mean_interarrival: args.mean_interarrival,
        trace: args.trace,
    };
    if !params.is_complete() {
        println!("-----  Stop and Wait Network Simulator Version 1.1 -------- \n");
    }
    let base = SimConfig {
        seed: args.seed,
        gbn: GbnConfig {
            window_size: args.window_size,
            timeout: args.timeout,
            mode: args.window_mode,
        },
        ..SimConfig::default()
    };
    let cfg = match params.resolve(base, &mut io::stdin().lock(), &mut io::stdout()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // 初始化 tracing：RUST_LOG 优先，否则按 TRACE 等级
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.log_filter())),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    info!(?cfg, "参数");

    let summary = match run_simulation(&cfg) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("It is likely that random number generation on your machine");
            eprintln!("is different from what this emulator expects.");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "done @ {:.3}, generated_msgs={}, delivered_msgs={}, to_channel={}, lost={}, corrupted={}, retransmitted={}",
        summary.final_time,
        summary.generated,
        summary.delivered,
        summary.channel.to_channel,
        summary.channel.lost,
        summary.channel.corrupted,
        summary.entity_a.retransmitted + summary.entity_b.retransmitted,
    );

    if let Some(path) = args.summary_json {
        let written = serde_json::to_string_pretty(&summary)
            .map_err(io::Error::other)
            .and_then(|json| fs::write(&path, json));
        if let Err(e) = written {
            eprintln!("error: failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
