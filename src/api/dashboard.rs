//! Dashboard API endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::AppResult, models::dashboard::DashboardOverview};

#[derive(Debug, Deserialize, IntoParams)]
pub struct OverviewQuery {
    /// Year of the monthly chart (defaults to the current year)
    pub year: Option<i32>,
}

/// Home page overview
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    params(OverviewQuery),
    responses(
        (status = 200, description = "Overview", body = DashboardOverview)
    )
)]
pub async fn overview(
    State(state): State<crate::AppState>,
    Query(query): Query<OverviewQuery>,
) -> AppResult<Json<DashboardOverview>> {
    let overview = state.services.dashboard.overview(query.year).await?;
    Ok(Json(overview))
}
