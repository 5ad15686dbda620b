//! 仿真参数
//!
//! 五个基本参数可以来自命令行，缺失的按原顺序交互式询问；
//! 之后统一校验，并把 TRACE 等级映射为日志过滤器。

use std::io::{BufRead, Write};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::net::ChannelConfig;
use crate::proto::GbnConfig;
use crate::sim::DEFAULT_SEED;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read parameters: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input while reading {field}")]
    Eof { field: &'static str },
    #[error("invalid value for {field}: {input:?}")]
    Parse { field: &'static str, input: String },
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// 一次仿真的全部参数
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// 要生成的消息总数
    pub messages: u64,
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    /// 上层消息的平均到达间隔
    pub mean_interarrival: f64,
    /// 诊断输出等级（0 只输出最终汇总）
    pub trace: u8,
    pub seed: u64,
    pub gbn: GbnConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            messages: 10,
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            mean_interarrival: 1000.0,
            trace: 0,
            seed: DEFAULT_SEED,
            gbn: GbnConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.messages == 0 {
            return Err(out_of_range("message count", self.messages, ">= 1"));
        }
        check_probability("loss probability", self.loss_prob)?;
        check_probability("corruption probability", self.corrupt_prob)?;
        if !(self.mean_interarrival > 0.0 && self.mean_interarrival.is_finite()) {
            return Err(out_of_range(
                "mean interarrival time",
                self.mean_interarrival,
                "> 0.0",
            ));
        }
        if self.gbn.window_size == 0 {
            return Err(out_of_range("window size", self.gbn.window_size, ">= 1"));
        }
        if !(self.gbn.timeout > 0.0 && self.gbn.timeout.is_finite()) {
            return Err(out_of_range("timeout", self.gbn.timeout, "> 0.0"));
        }
        Ok(())
    }

    pub fn channel(&self) -> ChannelConfig {
        ChannelConfig {
            loss_prob: self.loss_prob,
            corrupt_prob: self.corrupt_prob,
        }
    }

    /// `RUST_LOG` 未设置时使用的过滤器
    pub fn log_filter(&self) -> &'static str {
        trace_filter(self.trace)
    }
}

/// TRACE 等级 → `EnvFilter` 指令
pub fn trace_filter(level: u8) -> &'static str {
    match level {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn check_probability(field: &'static str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(out_of_range(field, p, "within [0.0, 1.0]"))
    }
}

fn out_of_range(field: &'static str, value: impl ToString, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        value: value.to_string(),
        expected,
    }
}

/// 命令行上给出的基本参数；`None` 的项需要交互询问
#[derive(Debug, Clone, Default)]
pub struct Params {
    pub messages: Option<u64>,
    pub loss_prob: Option<f64>,
    pub corrupt_prob: Option<f64>,
    pub mean_interarrival: Option<f64>,
    pub trace: Option<u8>,
}

impl Params {
    pub fn is_complete(&self) -> bool {
        self.messages.is_some()
            && self.loss_prob.is_some()
            && self.corrupt_prob.is_some()
            && self.mean_interarrival.is_some()
            && self.trace.is_some()
    }

    /// 按原顺序补齐缺失参数，并写入 `base`（其余字段保持不变）。
    pub fn resolve<R: BufRead, W: Write>(
        self,
        base: SimConfig,
        input: &mut R,
        out: &mut W,
    ) -> Result<SimConfig, ConfigError> {
        let mut prompt = Prompter { input, out };
        let messages = match self.messages {
            Some(v) => v,
            None => prompt.ask("message count", "Enter the number of messages to simulate: ")?,
        };
        let loss_prob = match self.loss_prob {
            Some(v) => v,
            None => prompt.ask(
                "loss probability",
                "Enter  packet loss probability [enter 0.0 for no loss]:",
            )?,
        };
        let corrupt_prob = match self.corrupt_prob {
            Some(v) => v,
            None => prompt.ask(
                "corruption probability",
                "Enter packet corruption probability [0.0 for no corruption]:",
            )?,
        };
        let mean_interarrival = match self.mean_interarrival {
            Some(v) => v,
            None => prompt.ask(
                "mean interarrival time",
                "Enter average time between messages from sender's layer5 [ > 0.0]:",
            )?,
        };
        let trace = match self.trace {
            Some(v) => v,
            None => prompt.ask("trace level", "Enter TRACE:")?,
        };

        let cfg = SimConfig {
            messages,
            loss_prob,
            corrupt_prob,
            mean_interarrival,
            trace,
            ..base
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

struct Prompter<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    /// 打印提示并读取下一个非空行
    fn ask<T: FromStr>(&mut self, field: &'static str, text: &str) -> Result<T, ConfigError> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ConfigError::Eof { field });
            }
            let token = line.trim();
            if token.is_empty() {
                continue;
            }
            return token.parse().map_err(|_| ConfigError::Parse {
                field,
                input: token.to_string(),
            });
        }
    }
}
