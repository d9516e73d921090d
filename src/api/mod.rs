//! HTTP 接口
//!
//! - `services::analytics`：dashboard 聚合与链接列表
//! - `services::health`：健康检查

pub mod services;
