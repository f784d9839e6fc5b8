//! 核心模块 - 配置与后台任务
//!
//! - [`Config`] / [`SimulationConfig`] - 运行配置
//! - [`TaskHandle`] - 可取消的后台任务句柄

pub mod config;
pub mod tasks;

pub use config::{Config, DEFAULT_ORIGIN, MAX_DELIVERY_TICKS, MAX_TIMER_PERIOD, SimulationConfig};
pub use tasks::{TaskHandle, spawn_cancellable};
