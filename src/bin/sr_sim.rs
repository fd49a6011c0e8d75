//! Selective Repeat 单向可靠传输仿真
//!
//! A 端应用层产生消息，经不可靠信道（丢包/损坏/时延，不乱序）送到 B 端，
//! 最后打印收发两端与信道的统计。

use clap::Parser;
use sr_arq::error::ScenarioError;
use sr_arq::net::Scenario;
use sr_arq::sim::{SimTime, Simulator};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "sr-sim", about = "Selective Repeat ARQ 仿真：A -> B 单向可靠传输")]
struct Args {
    /// 场景文件（JSON）；命令行参数会覆盖其中对应字段
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// 应用层产生的消息数
    #[arg(long)]
    messages: Option<u64>,

    /// 平均消息间隔（毫秒）
    #[arg(long)]
    mean_interval_ms: Option<f64>,

    /// 丢包概率
    #[arg(long)]
    loss: Option<f64>,

    /// 损坏概率
    #[arg(long)]
    corrupt: Option<f64>,

    /// 单向最小时延（毫秒）
    #[arg(long)]
    min_delay_ms: Option<f64>,

    /// 单向最大时延（毫秒）
    #[arg(long)]
    max_delay_ms: Option<f64>,

    /// 窗口大小（序号空间为其两倍）
    #[arg(long)]
    window: Option<u32>,

    /// 重传超时（毫秒）
    #[arg(long)]
    rtt_ms: Option<f64>,

    /// 随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 仿真运行到多少毫秒；不填则运行到事件队列为空
    #[arg(long)]
    until_ms: Option<u64>,

    /// 输出协议事件 JSON 文件；不填则不记录
    #[arg(long)]
    trace_json: Option<PathBuf>,

    /// 输出运行汇总 JSON 文件
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    fn scenario(&self) -> Result<Scenario, ScenarioError> {
        let mut s = match &self.scenario {
            Some(path) => Scenario::load(path)?,
            None => Scenario::default(),
        };
        if let Some(v) = self.messages {
            s.messages = v;
        }
        if let Some(v) = self.mean_interval_ms {
            s.mean_interval_ms = v;
        }
        if let Some(v) = self.loss {
            s.loss_prob = v;
        }
        if let Some(v) = self.corrupt {
            s.corrupt_prob = v;
        }
        if let Some(v) = self.min_delay_ms {
            s.min_delay_ms = v;
        }
        if let Some(v) = self.max_delay_ms {
            s.max_delay_ms = v;
        }
        if let Some(v) = self.window {
            s.window_size = v;
        }
        if let Some(v) = self.rtt_ms {
            s.rtt_ms = v;
        }
        if let Some(v) = self.seed {
            s.seed = v;
        }
        if self.until_ms.is_some() {
            s.until_ms = self.until_ms;
        }
        Ok(s)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let scenario = match args.scenario() {
        Ok(s) => s,
        Err(e) => {
            error!(error = ?e, "场景加载失败");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut world = match scenario.build_world() {
        Ok(w) => w,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(?scenario, "场景");

    if args.trace_json.is_some() {
        world.enable_trace();
    }

    let mut sim = Simulator::default();
    world.start(&mut sim);
    match scenario.until_ms {
        Some(ms) => sim.run_until(SimTime::from_millis(ms), &mut world),
        None => sim.run(&mut world),
    }

    if let Some(path) = &args.trace_json {
        if let Some(log) = world.link.trace.take() {
            let json = serde_json::to_string_pretty(&log.events).expect("serialize trace events");
            if let Err(e) = fs::write(path, json) {
                eprintln!("error: write {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
            eprintln!("wrote trace events to {}", path.display());
        }
    }

    let summary = world.summary(&sim);
    if let Some(path) = &args.summary_json {
        let json = serde_json::to_string_pretty(&summary).expect("serialize summary");
        if let Err(e) = fs::write(path, json) {
            eprintln!("error: write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    let s = &summary;
    println!(
        "done @ {:.3}ms ({} events)\n  app: generated={}, accepted={}, rejected={}, delivered={}, in_order={}, complete={}\n  A: sent={}, window_full={}, acks={}, new_acks={}, dup_acks={}, corrupted={}, timeouts={}, retransmissions={}\n  B: received={}, delivered={}, duplicates={}, previous_window={}, out_of_window={}, corrupted={}, acks_sent={}\n  channel: offered={}, lost={}, corrupted={}, arrived={}",
        s.end_ms,
        s.events,
        s.app.generated,
        s.app.accepted,
        s.app.rejected,
        s.delivered,
        s.in_order,
        s.complete,
        s.sender.messages_sent,
        s.sender.window_full,
        s.sender.acks_received,
        s.sender.new_acks,
        s.sender.duplicate_acks,
        s.sender.corrupted,
        s.sender.timeouts,
        s.sender.retransmissions,
        s.receiver.packets_received,
        s.receiver.delivered,
        s.receiver.duplicates,
        s.receiver.previous_window,
        s.receiver.out_of_window,
        s.receiver.corrupted,
        s.receiver.acks_sent,
        s.channel.offered,
        s.channel.lost,
        s.channel.corrupted,
        s.channel.arrived,
    );
    ExitCode::SUCCESS
}
