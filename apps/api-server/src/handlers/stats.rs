//! System statistics endpoint (admin only).

use actix_web::{HttpResponse, web};
use chrono::{Datelike, Duration, NaiveTime, Utc};

use atrium_shared::dto::{GrowthPoint, StatsResponse};

use crate::handlers::{current_user, user_response};
use crate::middleware::auth::BearerToken;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const RECENT_USERS: u64 = 5;
const GROWTH_WINDOW_DAYS: i64 = 30;

/// GET /api/stats
pub async fn get_stats(state: web::Data<AppState>, bearer: BearerToken) -> AppResult<HttpResponse> {
    let caller = current_user(&state, &bearer).await?;
    if !caller.is_admin() {
        return Err(AppError::Forbidden);
    }

    let now = Utc::now();
    let today_start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let week_start =
        today_start - Duration::days(today_start.weekday().num_days_from_monday() as i64);
    let month_start = today_start
        .with_day(1)
        .unwrap_or(today_start);

    let total_users = state.stats.count_users().await?;
    let users_today = state.stats.count_registered_since(today_start).await?;
    let users_this_week = state.stats.count_registered_since(week_start).await?;
    let users_this_month = state.stats.count_registered_since(month_start).await?;

    let recent = state.stats.recent_users(RECENT_USERS).await?;

    let mut growth_data = Vec::with_capacity(GROWTH_WINDOW_DAYS as usize + 1);
    for days_ago in (0..=GROWTH_WINDOW_DAYS).rev() {
        let day_start = today_start - Duration::days(days_ago);
        let day_end = day_start + Duration::days(1);
        let count = state
            .stats
            .count_registered_between(day_start, day_end)
            .await?;

        growth_data.push(GrowthPoint {
            date: day_start.date_naive(),
            count,
        });
    }

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_users,
        users_today,
        users_this_week,
        users_this_month,
        recent_users: recent.iter().map(user_response).collect(),
        growth_data,
    }))
}
