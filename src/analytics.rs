use crate::featured::normalize_url;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;

/// Longest rolling window (and default retention) in days.
pub const MAX_WINDOW_DAYS: u32 = 90;

/// One day in the dense range-query series. Days with no activity appear
/// with zero counts, never omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStat {
    pub day: NaiveDate,
    pub views: i64,
    pub clicks: i64,
}

/// A link's aggregate clicks across the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLink {
    pub url: String,
    pub clicks: i64,
    pub first_seen: NaiveDate,
}

// ── Writes ─────────────────────────────────────────────────────────────────
//
// Both writes are atomic insert-or-increment upserts: concurrent increments
// for the same key must sum, never clobber, so read-modify-write is off the
// table. Callers treat failures as best-effort (log and continue); nothing
// here may block a page view or click from completing.

/// Count one page view for `(page_id, day)`.
pub async fn record_view(
    pool: &SqlitePool,
    page_id: i64,
    day: NaiveDate,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO daily_views (page_id, day, view_count) VALUES (?1, ?2, 1)
         ON CONFLICT(page_id, day) DO UPDATE SET view_count = view_count + 1",
    )
    .bind(page_id)
    .bind(day)
    .execute(pool)
    .await?;
    Ok(())
}

/// Count one click for `(page_id, day, normalized url)`. The URL is
/// normalized here with the same rule featured-link matching uses, so
/// `https://x.com/a` and `https://x.com/a/` accumulate together.
pub async fn record_click(
    pool: &SqlitePool,
    page_id: i64,
    day: NaiveDate,
    url: &str,
) -> Result<(), sqlx::Error> {
    let link_url = normalize_url(url);
    sqlx::query(
        "INSERT INTO daily_link_clicks (page_id, day, link_url, click_count) VALUES (?1, ?2, ?3, 1)
         ON CONFLICT(page_id, day, link_url) DO UPDATE SET click_count = click_count + 1",
    )
    .bind(page_id)
    .bind(day)
    .bind(&link_url)
    .execute(pool)
    .await?;
    Ok(())
}

// ── Queries ────────────────────────────────────────────────────────────────

/// Dense per-day series over the trailing window ending at `today`,
/// ascending by date. `days` is clamped to 1..=90; the series always has
/// exactly `days` entries.
pub async fn query_range(
    pool: &SqlitePool,
    page_id: i64,
    today: NaiveDate,
    days: u32,
) -> Result<Vec<DayStat>, sqlx::Error> {
    let days = days.clamp(1, MAX_WINDOW_DAYS);
    let start = today - Duration::days(i64::from(days) - 1);

    let views: Vec<(NaiveDate, i64)> = sqlx::query_as(
        "SELECT day, view_count FROM daily_views
         WHERE page_id = ?1 AND day >= ?2 AND day <= ?3",
    )
    .bind(page_id)
    .bind(start)
    .bind(today)
    .fetch_all(pool)
    .await?;

    let clicks: Vec<(NaiveDate, i64)> = sqlx::query_as(
        "SELECT day, SUM(click_count) FROM daily_link_clicks
         WHERE page_id = ?1 AND day >= ?2 AND day <= ?3
         GROUP BY day",
    )
    .bind(page_id)
    .bind(start)
    .bind(today)
    .fetch_all(pool)
    .await?;

    let view_by_day: std::collections::HashMap<NaiveDate, i64> = views.into_iter().collect();
    let click_by_day: std::collections::HashMap<NaiveDate, i64> = clicks.into_iter().collect();

    let series = (0..days)
        .map(|offset| {
            let day = start + Duration::days(i64::from(offset));
            DayStat {
                day,
                views: view_by_day.get(&day).copied().unwrap_or(0),
                clicks: click_by_day.get(&day).copied().unwrap_or(0),
            }
        })
        .collect();

    Ok(series)
}

/// Top `limit` links by total clicks across the window, descending. Exact
/// ties rank the earlier-seen link higher; the trailing URL comparison makes
/// same-day ties deterministic too.
pub async fn top_links(
    pool: &SqlitePool,
    page_id: i64,
    today: NaiveDate,
    days: u32,
    limit: u32,
) -> Result<Vec<TopLink>, sqlx::Error> {
    let days = days.clamp(1, MAX_WINDOW_DAYS);
    let start = today - Duration::days(i64::from(days) - 1);
    let limit = limit.clamp(1, 100);

    let rows: Vec<(String, i64, NaiveDate)> = sqlx::query_as(
        "SELECT link_url, SUM(click_count) AS total, MIN(day) AS first_seen
         FROM daily_link_clicks
         WHERE page_id = ?1 AND day >= ?2 AND day <= ?3
         GROUP BY link_url
         ORDER BY total DESC, first_seen ASC, link_url ASC
         LIMIT ?4",
    )
    .bind(page_id)
    .bind(start)
    .bind(today)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(url, clicks, first_seen)| TopLink {
            url,
            clicks,
            first_seen,
        })
        .collect())
}

// ── Retention ──────────────────────────────────────────────────────────────

/// Delete counter rows strictly older than `today - retention_days`.
/// Idempotent: a second run the same day deletes nothing, and rows inside
/// the retention window are never touched.
pub async fn prune(
    pool: &SqlitePool,
    today: NaiveDate,
    retention_days: u32,
) -> Result<u64, sqlx::Error> {
    let cutoff = today - Duration::days(i64::from(retention_days));

    let views = sqlx::query("DELETE FROM daily_views WHERE day < ?1")
        .bind(cutoff)
        .execute(pool)
        .await?
        .rows_affected();

    let clicks = sqlx::query("DELETE FROM daily_link_clicks WHERE day < ?1")
        .bind(cutoff)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(views + clicks)
}
