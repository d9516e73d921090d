//! 时间分桶表达式
//!
//! `clicked_at` 以 UTC 存储；分桶前先按报告时区偏移平移，
//! 再取日期 / 星期 / 小时。三种数据库的写法各不相同。

use sea_orm::{DbBackend, sea_query::Expr};

const CLICKED_AT: &str = "click_logs.clicked_at";

#[derive(Debug, Clone, Copy)]
pub struct TimeBucket {
    backend: DbBackend,
    offset_minutes: i32,
}

impl TimeBucket {
    pub fn new(backend: DbBackend, offset_minutes: i32) -> Self {
        Self {
            backend,
            offset_minutes,
        }
    }

    /// 平移后的时间戳表达式（SQLite 通过 strftime 修饰符平移，不单独生成）
    fn shifted(&self) -> String {
        match self.backend {
            DbBackend::MySql => format!(
                "DATE_ADD({}, INTERVAL {} MINUTE)",
                CLICKED_AT, self.offset_minutes
            ),
            DbBackend::Postgres => format!(
                "(({} AT TIME ZONE 'UTC') + INTERVAL '{} minutes')",
                CLICKED_AT, self.offset_minutes
            ),
            _ => CLICKED_AT.to_string(),
        }
    }

    fn sqlite_strftime(&self, fmt: &str) -> String {
        format!(
            "strftime('{}', {}, '{:+} minutes')",
            fmt, CLICKED_AT, self.offset_minutes
        )
    }

    /// `YYYY-MM-DD`
    pub fn day_sql(&self) -> String {
        match self.backend {
            DbBackend::MySql => format!("DATE_FORMAT({}, '%Y-%m-%d')", self.shifted()),
            DbBackend::Postgres => format!("TO_CHAR({}, 'YYYY-MM-DD')", self.shifted()),
            _ => self.sqlite_strftime("%Y-%m-%d"),
        }
    }

    /// 0 = 周日 … 6 = 周六
    pub fn day_of_week_sql(&self) -> String {
        match self.backend {
            DbBackend::MySql => format!("CAST(DAYOFWEEK({}) - 1 AS SIGNED)", self.shifted()),
            DbBackend::Postgres => format!("CAST(EXTRACT(DOW FROM {}) AS BIGINT)", self.shifted()),
            _ => format!("CAST({} AS INTEGER)", self.sqlite_strftime("%w")),
        }
    }

    /// 0..23
    pub fn hour_sql(&self) -> String {
        match self.backend {
            DbBackend::MySql => format!("CAST(HOUR({}) AS SIGNED)", self.shifted()),
            DbBackend::Postgres => format!("CAST(EXTRACT(HOUR FROM {}) AS BIGINT)", self.shifted()),
            _ => format!("CAST({} AS INTEGER)", self.sqlite_strftime("%H")),
        }
    }

    pub fn day(&self) -> Expr {
        Expr::cust(self.day_sql())
    }

    pub fn day_of_week(&self) -> Expr {
        Expr::cust(self.day_of_week_sql())
    }

    pub fn hour(&self) -> Expr {
        Expr::cust(self.hour_sql())
    }
}
