//! CLI 子命令实现

pub mod config_gen;
pub mod links;
pub mod report;

pub use config_gen::config_generate;
pub use links::list_links;
pub use report::run_report;
