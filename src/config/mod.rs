//! 配置
//!
//! 只有静态配置：启动时从 TOML + 环境变量加载一次，之后以 `Arc<StaticConfig>`
//! 显式传给 HTTP 层和 CLI，不存在全局实例。

mod structs;

pub use structs::*;
