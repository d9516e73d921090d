use serde::{Deserialize, Serialize};

use crate::analytics::{DEFAULT_MAX_PERIOD_DAYS, LabelLocale};
use crate::errors::{LinkpulseError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LP";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 监听地址、端口、worker 数量、CORS
/// - database: 指标存储连接
/// - logging: 日志配置
/// - analytics: 报告时区、标签语言、周期限制
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：LP，分隔符：__
    /// 示例：LP__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let explicit = path.is_some();
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        if explicit && !std::path::Path::new(path).exists() {
            return Err(LinkpulseError::file_operation(format!(
                "Configuration file not found: {}",
                path
            )));
        }

        let settings = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| LinkpulseError::validation(format!("Failed to build config: {}", e)))?;

        let config: StaticConfig = settings.try_deserialize().map_err(|e| {
            LinkpulseError::validation(format!("Failed to deserialize config: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// 启动前检查取值范围
    pub fn validate(&self) -> Result<()> {
        let analytics = &self.analytics;

        // FixedOffset 只接受 (-24h, 24h)
        if analytics.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(LinkpulseError::validation(format!(
                "analytics.utc_offset_minutes must be within ±1439, got {}",
                analytics.utc_offset_minutes
            )));
        }
        if analytics.max_period_days == 0 {
            return Err(LinkpulseError::validation(
                "analytics.max_period_days must be at least 1",
            ));
        }
        if analytics.default_period_days == 0
            || analytics.default_period_days > analytics.max_period_days
        {
            return Err(LinkpulseError::validation(format!(
                "analytics.default_period_days must be between 1 and {}, got {}",
                analytics.max_period_days, analytics.default_period_days
            )));
        }
        if self.database.pool_size == 0 {
            return Err(LinkpulseError::validation(
                "database.pool_size must be at least 1",
            ));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(LinkpulseError::validation(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LinkpulseError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// API 路由前缀
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// 为空时只允许同源请求；`["*"]` 允许任意来源
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    /// `sqlite://…`、`mysql://…`、`postgres://…` 或 `memory`
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// 连接 / 获取连接超时（秒）
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    /// `memory` 后端的 JSON 数据集
    #[serde(default)]
    pub dataset_path: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 分析统计配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// 报告时区（相对 UTC 的分钟数，例如 UTC-3 为 -180）
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default)]
    pub label_locale: LabelLocale,
    #[serde(default = "default_max_period_days")]
    pub max_period_days: u32,
    /// 请求未指定周期时使用
    #[serde(default = "default_period_days")]
    pub default_period_days: u32,
    /// 单次聚合的总超时（秒），0 表示不限制
    #[serde(default)]
    pub query_timeout_secs: u64,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_database_url() -> String {
    "sqlite://linkpulse.db?mode=rwc".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_period_days() -> u32 {
    DEFAULT_MAX_PERIOD_DAYS
}

fn default_period_days() -> u32 {
    30
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            api_prefix: default_api_prefix(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            dataset_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            label_locale: LabelLocale::default(),
            max_period_days: default_max_period_days(),
            default_period_days: default_period_days(),
            query_timeout_secs: 0,
        }
    }
}
