//! 协议配置
//!
//! 窗口大小与重传超时在一次运行中固定不变。

use crate::error::ConfigError;
use crate::sim::SimTime;

use super::window::SeqSpace;

pub const DEFAULT_WINDOW_SIZE: u32 = 6;
pub const DEFAULT_RTT_MS: u64 = 16;

#[derive(Debug, Clone)]
pub struct SrConfig {
    /// 发送/接收窗口大小 W（序号空间为 2W）
    pub window_size: u32,
    /// 往返时间估计，用作重传定时器时长
    pub rtt: SimTime,
}

impl Default for SrConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            rtt: SimTime::from_millis(DEFAULT_RTT_MS),
        }
    }
}

impl SrConfig {
    pub fn seq_space(&self) -> Result<SeqSpace, ConfigError> {
        SeqSpace::new(self.window_size)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.seq_space()?;
        if self.rtt == SimTime::ZERO {
            return Err(ConfigError::ZeroRtt);
        }
        Ok(())
    }
}
