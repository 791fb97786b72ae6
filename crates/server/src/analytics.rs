//! Analytics endpoints.

use api_types::analytics::{
    CategorySpendingView, ForecastResponse, MonthlyTrendView, OverviewResponse,
};
use axum::{extract::State, Extension, Json};

use crate::{auth::AuthUser, expenses, server::ServerState, success, ServerError, Success};
use engine::CategorySpending;

fn spending_view(row: CategorySpending) -> CategorySpendingView {
    CategorySpendingView {
        name: row.name,
        total: row.total.to_major_f64(),
    }
}

pub async fn overview(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Success<OverviewResponse>>, ServerError> {
    let overview = state.engine.analytics_overview(user.id).await?;
    Ok(success(OverviewResponse {
        current_month_total: overview.current_month_total.to_major_f64(),
        previous_month_total: overview.previous_month_total.to_major_f64(),
        top_categories: overview
            .top_categories
            .into_iter()
            .map(spending_view)
            .collect(),
        recent_expenses: overview
            .recent_expenses
            .into_iter()
            .map(expenses::view)
            .collect(),
    }))
}

pub async fn spending_by_category(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Success<Vec<CategorySpendingView>>>, ServerError> {
    let rows = state.engine.spending_by_category(user.id).await?;
    Ok(success(rows.into_iter().map(spending_view).collect()))
}

pub async fn monthly_trends(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Success<Vec<MonthlyTrendView>>>, ServerError> {
    let rows = state.engine.monthly_trends(user.id).await?;
    Ok(success(
        rows.into_iter()
            .map(|row| MonthlyTrendView {
                year: row.year,
                month: row.month,
                total: row.total.to_major_f64(),
            })
            .collect(),
    ))
}

pub async fn forecast(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Success<ForecastResponse>>, ServerError> {
    let forecast = state.engine.forecast(user.id).await?;
    Ok(success(ForecastResponse {
        avg_daily: forecast.avg_daily.to_major_f64(),
        projected_month_total: forecast.projected_month_total.to_major_f64(),
    }))
}
