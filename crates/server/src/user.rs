//! Profile endpoints.

use api_types::user::{ProfileUpdate, ProfileView};
use axum::{extract::State, Extension, Json};
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait};

use crate::{auth, auth::AuthUser, server::ServerState, success, ServerError, Success};
use engine::users;

fn view(model: users::Model) -> ProfileView {
    ProfileView {
        id: model.id,
        username: model.username,
        email: model.email,
        full_name: model.full_name,
    }
}

async fn load(state: &ServerState, user_id: i64) -> Result<users::Model, ServerError> {
    users::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ServerError::unauthorized("INVALID_TOKEN", "unknown user"))
}

pub async fn profile(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Success<ProfileView>>, ServerError> {
    let model = load(&state, user.id).await?;
    Ok(success(view(model)))
}

pub async fn update_profile(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<Success<ProfileView>>, ServerError> {
    let mut active: users::ActiveModel = load(&state, user.id).await?.into();

    if let Some(username) = payload.username {
        auth::check_username(&username)?;
        active.username = ActiveValue::Set(username.trim().to_string());
    }
    if let Some(full_name) = payload.full_name {
        let trimmed = full_name.trim();
        active.full_name = ActiveValue::Set((!trimmed.is_empty()).then(|| trimmed.to_string()));
    }

    let model = active.update(&state.db).await?;
    Ok(success(view(model)))
}
