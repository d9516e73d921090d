//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::LinkpulseError;

use super::types::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 6000-6099: 分析统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // 分析统计错误 6000-6099
    AnalyticsQueryFailed = 6000,
    AnalyticsInvalidPeriod = 6001,
}

impl From<&LinkpulseError> for ErrorCode {
    fn from(err: &LinkpulseError) -> Self {
        match err {
            LinkpulseError::InvalidPeriod(_) => ErrorCode::AnalyticsInvalidPeriod,
            LinkpulseError::RepositoryFailure(_) => ErrorCode::AnalyticsQueryFailed,
            LinkpulseError::Validation(_) => ErrorCode::BadRequest,
            LinkpulseError::DateParse(_) => ErrorCode::InvalidDateFormat,
            LinkpulseError::NotFound(_) => ErrorCode::NotFound,
            LinkpulseError::DatabaseConfig(_)
            | LinkpulseError::DatabaseConnection(_)
            | LinkpulseError::DatabaseOperation(_)
            | LinkpulseError::FileOperation(_)
            | LinkpulseError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
