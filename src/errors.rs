use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkpulseError {
    InvalidPeriod(String),
    RepositoryFailure(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    DateParse(String),
    Validation(String),
    NotFound(String),
}

impl LinkpulseError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkpulseError::InvalidPeriod(_) => "E001",
            LinkpulseError::RepositoryFailure(_) => "E002",
            LinkpulseError::DatabaseConfig(_) => "E003",
            LinkpulseError::DatabaseConnection(_) => "E004",
            LinkpulseError::DatabaseOperation(_) => "E005",
            LinkpulseError::FileOperation(_) => "E006",
            LinkpulseError::Serialization(_) => "E007",
            LinkpulseError::DateParse(_) => "E008",
            LinkpulseError::Validation(_) => "E009",
            LinkpulseError::NotFound(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkpulseError::InvalidPeriod(_) => "Invalid Period",
            LinkpulseError::RepositoryFailure(_) => "Analytics Query Failed",
            LinkpulseError::DatabaseConfig(_) => "Database Configuration Error",
            LinkpulseError::DatabaseConnection(_) => "Database Connection Error",
            LinkpulseError::DatabaseOperation(_) => "Database Operation Error",
            LinkpulseError::FileOperation(_) => "File Operation Error",
            LinkpulseError::Serialization(_) => "Serialization Error",
            LinkpulseError::DateParse(_) => "Date Parse Error",
            LinkpulseError::Validation(_) => "Validation Error",
            LinkpulseError::NotFound(_) => "Resource Not Found",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkpulseError::InvalidPeriod(msg) => msg,
            LinkpulseError::RepositoryFailure(msg) => msg,
            LinkpulseError::DatabaseConfig(msg) => msg,
            LinkpulseError::DatabaseConnection(msg) => msg,
            LinkpulseError::DatabaseOperation(msg) => msg,
            LinkpulseError::FileOperation(msg) => msg,
            LinkpulseError::Serialization(msg) => msg,
            LinkpulseError::DateParse(msg) => msg,
            LinkpulseError::Validation(msg) => msg,
            LinkpulseError::NotFound(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    ///
    /// 调用方输入错误返回 4xx，存储层故障统一返回 5xx。
    #[cfg(feature = "server")]
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            LinkpulseError::InvalidPeriod(_)
            | LinkpulseError::Validation(_)
            | LinkpulseError::DateParse(_) => StatusCode::BAD_REQUEST,
            LinkpulseError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkpulseError::RepositoryFailure(_)
            | LinkpulseError::DatabaseConfig(_)
            | LinkpulseError::DatabaseConnection(_)
            | LinkpulseError::DatabaseOperation(_)
            | LinkpulseError::FileOperation(_)
            | LinkpulseError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkpulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkpulseError {}

// 便捷的构造函数
impl LinkpulseError {
    pub fn invalid_period<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::InvalidPeriod(msg.into())
    }

    pub fn repository_failure<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::RepositoryFailure(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::DateParse(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkpulseError::NotFound(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkpulseError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkpulseError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkpulseError {
    fn from(err: std::io::Error) -> Self {
        LinkpulseError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkpulseError {
    fn from(err: serde_json::Error) -> Self {
        LinkpulseError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LinkpulseError {
    fn from(err: chrono::ParseError) -> Self {
        LinkpulseError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkpulseError>;
