//! 运行场景
//!
//! 一份 JSON 描述一次完整运行：应用层消息数与间隔、信道参数、窗口与 RTT、
//! 随机种子和可选的时间上限。CLI 在此基础上用命令行参数覆盖。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::app::AppConfig;
use super::channel::ChannelConfig;
use super::sr_world::SrWorld;
use crate::error::{ConfigError, ScenarioError};
use crate::proto::{DEFAULT_RTT_MS, DEFAULT_WINDOW_SIZE, SrConfig};
use crate::sim::SimTime;

/// 一次完整运行的描述（JSON）。缺省字段取默认值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub messages: u64,
    pub mean_interval_ms: f64,
    pub loss_prob: f64,
    pub corrupt_prob: f64,
    pub min_delay_ms: f64,
    pub max_delay_ms: f64,
    pub window_size: u32,
    pub rtt_ms: f64,
    pub seed: u64,
    /// 仿真时间上限；`None` 表示运行到事件队列为空
    pub until_ms: Option<u64>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            messages: 20,
            mean_interval_ms: 10.0,
            loss_prob: 0.0,
            corrupt_prob: 0.0,
            min_delay_ms: 1.0,
            max_delay_ms: 10.0,
            window_size: DEFAULT_WINDOW_SIZE,
            rtt_ms: DEFAULT_RTT_MS as f64,
            seed: 1,
            until_ms: None,
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let raw = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario: Scenario =
            serde_json::from_str(&raw).map_err(|source| ScenarioError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn sr_config(&self) -> SrConfig {
        SrConfig {
            window_size: self.window_size,
            rtt: SimTime::from_millis_f64(self.rtt_ms),
        }
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            loss_prob: self.loss_prob,
            corrupt_prob: self.corrupt_prob,
            min_delay: SimTime::from_millis_f64(self.min_delay_ms),
            max_delay: SimTime::from_millis_f64(self.max_delay_ms),
        }
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            messages: self.messages,
            mean_interval: SimTime::from_millis_f64(self.mean_interval_ms),
        }
    }

    /// 除各层配置外，还要求没有时间上限的运行最终能结束：
    /// 丢包或损坏概率为 1 时发送端会无限重传。
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sr_config().validate()?;
        self.channel_config().validate()?;
        if self.until_ms.is_none() && self.messages > 0 {
            if self.loss_prob >= 1.0 {
                return Err(ConfigError::Unbounded { name: "loss" });
            }
            if self.corrupt_prob >= 1.0 {
                return Err(ConfigError::Unbounded { name: "corrupt" });
            }
        }
        Ok(())
    }

    pub fn build_world(&self) -> Result<SrWorld, ConfigError> {
        self.validate()?;
        SrWorld::new(
            self.sr_config(),
            self.channel_config(),
            self.app_config(),
            self.seed,
        )
    }
}
