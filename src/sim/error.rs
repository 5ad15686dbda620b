//! 仿真核心错误类型

use thiserror::Error;

/// 时间轴错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    /// 时间轴已空：仿真结束的信号
    #[error("event timeline is empty")]
    Empty,
}

/// 随机源自检失败（启动时唯一的致命错误）
#[derive(Debug, Error, PartialEq)]
pub enum SelfCheckError {
    #[error(
        "uniform random source looks broken: mean of {samples} samples is {mean:.4}, expected within [0.25, 0.75]"
    )]
    NonUniform { samples: usize, mean: f64 },
}
