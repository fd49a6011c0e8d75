//! 错误类型
//!
//! 协议层面的异常（损坏包、重复 ACK、窗口已满等）以结果枚举返回，不属于错误；
//! 这里只描述配置与场景加载失败。

use std::path::PathBuf;

use thiserror::Error;

/// 配置校验失败。
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window size must be at least 1")]
    ZeroWindow,
    #[error("window size {window} exceeds half of the sequence space {space}")]
    WindowTooLarge { window: u32, space: u32 },
    #[error("retransmission timeout must be non-zero")]
    ZeroRtt,
    #[error("{name} probability {value} is outside [0, 1]")]
    Probability { name: &'static str, value: f64 },
    #[error("channel delay range is inverted: min {min_ns}ns > max {max_ns}ns")]
    DelayRange { min_ns: u64, max_ns: u64 },
    #[error("{name} probability 1 never lets a packet through; set until_ms to bound the run")]
    Unbounded { name: &'static str },
}

/// 场景文件加载失败。
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
