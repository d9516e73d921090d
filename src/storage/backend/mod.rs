//! SeaORM storage backend
//!
//! This module provides the metrics repository on top of SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod analytics;
mod bucket;
mod connection;

use sea_orm::{DatabaseConnection, DbBackend};
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{LinkpulseError, Result};

pub use bucket::TimeBucket;
pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(LinkpulseError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://, memory",
            database_url
        )))
    }
}

/// SeaORM-based metrics repository
#[derive(Clone)]
pub struct SeaOrmMetricsRepository {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmMetricsRepository {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(LinkpulseError::database_config(
                "database_url 未设置".to_string(),
            ));
        }

        // 根据不同数据库类型配置连接选项
        let db = if backend_name == "sqlite" {
            connect_sqlite(config).await?
        } else {
            connect_generic(config, backend_name).await?
        };

        let repository = SeaOrmMetricsRepository {
            db,
            backend_name: backend_name.to_string(),
        };

        // 运行迁移
        run_migrations(&repository.db).await?;

        warn!(
            "{} metrics repository initialized.",
            repository.backend_name.to_uppercase()
        );
        Ok(repository)
    }

    /// 获取数据库连接（测试写入数据时使用）
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn db_backend(&self) -> DbBackend {
        match self.backend_name.as_str() {
            "sqlite" => DbBackend::Sqlite,
            "mysql" => DbBackend::MySql,
            _ => DbBackend::Postgres,
        }
    }
}
