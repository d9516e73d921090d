//! MetricsRepository 的 SeaORM 实现
//!
//! 所有聚合都在数据库中完成，只把分组后的行取回。

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, sea_query::Expr,
};

use super::{SeaOrmMetricsRepository, TimeBucket};
use crate::analytics::DateRange;
use crate::storage::models::{
    BreakdownRow, DailyCountRow, HeatmapRow, LinkDailyRow, TopLinkRow, UserLinkRow,
};
use crate::storage::{MetricsFilter, MetricsRepository, UtmDimension};

use migration::entities::{click_log, lead, short_link};

// ============ 查询结果类型 ============

#[derive(Debug, FromQueryResult)]
struct DayCount {
    day: String,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct LabelCount {
    label: Option<String>,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct HeatmapCount {
    day_of_week: i64,
    hour: i64,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct TopLinkCount {
    link_id: i64,
    slug: String,
    total_clicks: i64,
}

#[derive(Debug, FromQueryResult)]
struct LinkDayCount {
    link_id: i64,
    slug: String,
    day: String,
    count: i64,
}

fn to_count(value: i64) -> u64 {
    value.max(0) as u64
}

fn parse_day(value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("unexpected day bucket '{}'", value))
}

fn range_condition(range: &DateRange) -> Condition {
    Condition::all()
        .add(click_log::Column::ClickedAt.gte(range.start_utc()))
        .add(click_log::Column::ClickedAt.lt(range.end_exclusive_utc()))
}

/// 用户 + 可选链接 + 时间范围
fn click_condition(filter: &MetricsFilter) -> Condition {
    let mut condition = range_condition(&filter.range)
        .add(click_log::Column::UserId.eq(filter.user_id.as_str()));
    if let Some(link_id) = filter.link_id {
        condition = condition.add(click_log::Column::LinkId.eq(link_id));
    }
    condition
}

fn utm_column(dimension: UtmDimension) -> click_log::Column {
    match dimension {
        UtmDimension::Source => click_log::Column::UtmSource,
        UtmDimension::Medium => click_log::Column::UtmMedium,
        UtmDimension::Campaign => click_log::Column::UtmCampaign,
        UtmDimension::Content => click_log::Column::UtmContent,
    }
}

impl SeaOrmMetricsRepository {
    fn bucket(&self, range: &DateRange) -> TimeBucket {
        TimeBucket::new(self.db_backend(), range.offset().local_minus_utc() / 60)
    }

    /// 按单列分组计数，次数降序、标签升序
    async fn group_count(
        &self,
        filter: &MetricsFilter,
        column: click_log::Column,
        limit: Option<u64>,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        let rows = click_log::Entity::find()
            .select_only()
            .column_as(column, "label")
            .column_as(click_log::Column::Id.count(), "count")
            .filter(click_condition(filter))
            .group_by(column)
            .order_by_desc(Expr::cust("count"))
            .order_by_asc(Expr::cust("label"))
            .limit(limit)
            .into_model::<LabelCount>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| BreakdownRow {
                label: row.label,
                count: to_count(row.count),
            })
            .collect())
    }
}

#[async_trait]
impl MetricsRepository for SeaOrmMetricsRepository {
    async fn count_clicks(&self, filter: &MetricsFilter) -> anyhow::Result<u64> {
        click_log::Entity::find()
            .filter(click_condition(filter))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn count_leads(&self, filter: &MetricsFilter) -> anyhow::Result<u64> {
        let mut query = lead::Entity::find()
            .filter(lead::Column::UserId.eq(filter.user_id.as_str()))
            .filter(lead::Column::CreatedAt.gte(filter.range.start_utc()))
            .filter(lead::Column::CreatedAt.lt(filter.range.end_exclusive_utc()));
        if let Some(link_id) = filter.link_id {
            query = query.filter(lead::Column::LinkId.eq(link_id));
        }
        query.count(&self.db).await.map_err(Into::into)
    }

    async fn clicks_per_day(&self, filter: &MetricsFilter) -> anyhow::Result<Vec<DailyCountRow>> {
        let day_expr = self.bucket(&filter.range).day();
        let rows = click_log::Entity::find()
            .select_only()
            .column_as(day_expr.clone(), "day")
            .column_as(click_log::Column::Id.count(), "count")
            .filter(click_condition(filter))
            .group_by(day_expr)
            .order_by_asc(Expr::cust("day"))
            .into_model::<DayCount>()
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(DailyCountRow {
                    day: parse_day(&row.day)?,
                    count: to_count(row.count),
                })
            })
            .collect()
    }

    async fn breakdown_by(
        &self,
        filter: &MetricsFilter,
        dimension: UtmDimension,
        limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.group_count(filter, utm_column(dimension), Some(limit))
            .await
    }

    async fn breakdown_by_device(
        &self,
        filter: &MetricsFilter,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.group_count(filter, click_log::Column::Device, None)
            .await
    }

    async fn breakdown_by_referrer(
        &self,
        filter: &MetricsFilter,
        limit: u64,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        self.group_count(filter, click_log::Column::Referrer, Some(limit))
            .await
    }

    async fn heatmap(&self, filter: &MetricsFilter) -> anyhow::Result<Vec<HeatmapRow>> {
        let bucket = self.bucket(&filter.range);
        let rows = click_log::Entity::find()
            .select_only()
            .column_as(bucket.day_of_week(), "day_of_week")
            .column_as(bucket.hour(), "hour")
            .column_as(click_log::Column::Id.count(), "count")
            .filter(click_condition(filter))
            .group_by(bucket.day_of_week())
            .group_by(bucket.hour())
            .into_model::<HeatmapCount>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(HeatmapRow {
                    day_of_week: u8::try_from(row.day_of_week).ok()?,
                    hour: u8::try_from(row.hour).ok()?,
                    count: to_count(row.count),
                })
            })
            .collect())
    }

    async fn top_links_by_clicks(
        &self,
        user_id: &str,
        range: &DateRange,
        limit: u64,
    ) -> anyhow::Result<Vec<TopLinkRow>> {
        let rows = click_log::Entity::find()
            .select_only()
            .column_as(click_log::Column::LinkId, "link_id")
            .column_as(short_link::Column::Slug, "slug")
            .column_as(click_log::Column::Id.count(), "total_clicks")
            .join(JoinType::InnerJoin, click_log::Relation::ShortLink.def())
            .filter(short_link::Column::UserId.eq(user_id))
            .filter(range_condition(range))
            .group_by(click_log::Column::LinkId)
            .group_by(short_link::Column::Slug)
            .order_by_desc(Expr::cust("total_clicks"))
            .order_by_asc(click_log::Column::LinkId)
            .limit(limit)
            .into_model::<TopLinkCount>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| TopLinkRow {
                link_id: row.link_id,
                slug: row.slug,
                total_clicks: to_count(row.total_clicks),
            })
            .collect())
    }

    async fn clicks_per_day_for_links(
        &self,
        user_id: &str,
        link_ids: &[i64],
        range: &DateRange,
    ) -> anyhow::Result<Vec<LinkDailyRow>> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let day_expr = self.bucket(range).day();
        let rows = click_log::Entity::find()
            .select_only()
            .column_as(click_log::Column::LinkId, "link_id")
            .column_as(short_link::Column::Slug, "slug")
            .column_as(day_expr.clone(), "day")
            .column_as(click_log::Column::Id.count(), "count")
            .join(JoinType::InnerJoin, click_log::Relation::ShortLink.def())
            .filter(short_link::Column::UserId.eq(user_id))
            .filter(click_log::Column::LinkId.is_in(link_ids.iter().copied()))
            .filter(range_condition(range))
            .group_by(click_log::Column::LinkId)
            .group_by(short_link::Column::Slug)
            .group_by(day_expr)
            .order_by_asc(Expr::cust("day"))
            .order_by_asc(click_log::Column::LinkId)
            .into_model::<LinkDayCount>()
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(LinkDailyRow {
                    link_id: row.link_id,
                    slug: row.slug,
                    day: parse_day(&row.day)?,
                    count: to_count(row.count),
                })
            })
            .collect()
    }

    async fn user_links(&self, user_id: &str) -> anyhow::Result<Vec<UserLinkRow>> {
        let models = short_link::Entity::find()
            .filter(short_link::Column::UserId.eq(user_id))
            .order_by_asc(short_link::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|model| UserLinkRow {
                id: model.id,
                slug: model.slug,
                click_count: to_count(model.click_count),
            })
            .collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.db.ping().await.map_err(Into::into)
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
