//! Analytics HTTP API

mod dashboard;
mod error_code;
mod helpers;
mod routes;
mod types;

pub use dashboard::AnalyticsApi;
pub use error_code::ErrorCode;
pub use helpers::{api_result, error_from_linkpulse, error_response, json_response, success_response};
pub use routes::analytics_routes;
pub use types::*;
