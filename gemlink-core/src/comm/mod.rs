// 公共基础设施模块 / Shared infrastructure modules

#[cfg(feature = "config")]
pub mod config;
pub mod tracing;
