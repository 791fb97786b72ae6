//! Category API endpoints.

use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{auth::AuthUser, done, server::ServerState, success, Done, ServerError, Success};
use engine::Category;

fn view(category: Category) -> CategoryView {
    CategoryView {
        id: category.id,
        user_id: category.user_id,
        name: category.name,
        color_code: category.color_code,
        is_system: category.is_system,
    }
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Success<Vec<CategoryView>>>, ServerError> {
    let categories = state.engine.list_categories(user.id).await?;
    Ok(success(categories.into_iter().map(view).collect()))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<Json<Success<CategoryView>>, ServerError> {
    let category = state
        .engine
        .create_category(user.id, &payload.name, payload.color_code.as_deref())
        .await?;
    Ok(success(view(category)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<Success<CategoryView>>, ServerError> {
    let category = state
        .engine
        .update_category(
            user.id,
            id,
            payload.name.as_deref(),
            payload.color_code.as_deref(),
        )
        .await?;
    Ok(success(view(category)))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<Done>, ServerError> {
    state.engine.delete_category(user.id, id).await?;
    Ok(done("category deleted"))
}
