use axum::{http::StatusCode, response::IntoResponse, Json};
use engine::EngineError;
use serde::Serialize;

pub use crate::auth::AuthUser;
pub use crate::server::{router, run, run_with_listener, spawn_with_listener, ServerConfig};

mod analytics;
mod auth;
mod categories;
mod expenses;
mod receipts;
mod server;
mod user;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{AuthResponse, AuthUserView, LoginRequest, RegisterRequest};
    }

    pub mod user {
        pub use api_types::user::{ProfileUpdate, ProfileView};
    }

    pub mod category {
        pub use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
    }

    pub mod expense {
        pub use api_types::expense::{
            BulkDeleteRequest, BulkDeleteResponse, ExpenseBody, ExpenseListResponse, ExpenseView,
        };
    }

    pub mod analytics {
        pub use api_types::analytics::{
            CategorySpendingView, ForecastResponse, MonthlyTrendView, OverviewResponse,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// 400 with a stable machine code.
    BadRequest {
        code: &'static str,
        message: String,
    },
    /// 401 with a stable machine code.
    Unauthorized {
        code: &'static str,
        message: String,
    },
    /// Logged server-side, reported as a generic 500.
    Internal(String),
}

impl ServerError {
    pub(crate) fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Body of every successful response.
#[derive(Serialize)]
pub(crate) struct Success<T: Serialize> {
    success: bool,
    data: T,
}

pub(crate) fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}

#[derive(Serialize)]
pub(crate) struct Done {
    success: bool,
    message: &'static str,
}

pub(crate) fn done(message: &'static str) -> Json<Done> {
    Json(Done {
        success: true,
        message,
    })
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_)
        | EngineError::InvalidCategory(_)
        | EngineError::DuplicateCategory(_)
        | EngineError::CategoryInUse(_)
        | EngineError::SystemCategory(_)
        | EngineError::TooOld(_) => StatusCode::BAD_REQUEST,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::PossibleDuplicate(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_for_engine_error(err: &EngineError) -> &'static str {
    match err {
        EngineError::Validation(_) => "VALIDATION_ERROR",
        EngineError::KeyNotFound(_) => "NOT_FOUND",
        EngineError::Forbidden(_) => "FORBIDDEN",
        EngineError::InvalidCategory(_) => "INVALID_CATEGORY",
        EngineError::DuplicateCategory(_) => "DUPLICATE_CATEGORY",
        EngineError::CategoryInUse(_) => "CATEGORY_IN_USE",
        EngineError::SystemCategory(_) => "SYSTEM_CATEGORY",
        EngineError::PossibleDuplicate(_) => "POSSIBLE_DUPLICATE",
        EngineError::TooOld(_) => "TOO_OLD",
        EngineError::Database(_) => "INTERNAL_ERROR",
    }
}

fn detail_for_engine_error(err: EngineError) -> (String, Option<serde_json::Value>) {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ("internal server error".to_string(), None)
        }
        EngineError::PossibleDuplicate(candidate) => {
            let details = serde_json::json!({
                "id": candidate.id,
                "amount": candidate.amount.to_major_f64(),
                "description": candidate.description,
                "expense_date": candidate.expense_date,
            });
            (
                "a similar expense already exists".to_string(),
                Some(details),
            )
        }
        EngineError::TooOld(ids) => (
            "expenses older than one year cannot be bulk deleted".to_string(),
            Some(serde_json::json!({ "ids": ids })),
        ),
        other => (other.to_string(), None),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message, details) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let code = code_for_engine_error(&err);
                let (message, details) = detail_for_engine_error(err);
                (status, code, message, details)
            }
            ServerError::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, code, message, None)
            }
            ServerError::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, code, message, None)
            }
            ServerError::Internal(reason) => {
                tracing::error!("internal server error: {reason}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        (
            status,
            Json(ErrorEnvelope {
                success: false,
                error: ErrorDetail {
                    code,
                    message,
                    details,
                },
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<sea_orm::DbErr> for ServerError {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Engine(EngineError::Database(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use engine::{DuplicateCandidate, MoneyCents};

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("amount: required".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("expense".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("category".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn system_category_maps_to_400() {
        let res = ServerError::from(EngineError::SystemCategory("Food".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn duplicate_category_maps_to_400() {
        let res =
            ServerError::from(EngineError::DuplicateCategory("Games".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn possible_duplicate_maps_to_409() {
        let candidate = DuplicateCandidate {
            id: 7,
            amount: MoneyCents::new(25_000),
            description: "Lunch".to_string(),
            expense_date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
        };
        let res = ServerError::from(EngineError::PossibleDuplicate(candidate)).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn too_old_maps_to_400() {
        let res = ServerError::from(EngineError::TooOld(vec![3, 5])).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let res = ServerError::unauthorized("INVALID_TOKEN", "invalid token").into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn bad_request_maps_to_400() {
        let res = ServerError::bad_request("NO_DATA", "no expenses to export").into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
