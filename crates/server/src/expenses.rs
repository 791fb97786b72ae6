//! Expense API endpoints.
//!
//! Create and update accept either a JSON body or multipart form data; the
//! multipart variant may carry a `receipt` file part that is stored before
//! the engine sees the draft.

use api_types::expense::{
    BulkDeleteRequest, BulkDeleteResponse, ExpenseBody, ExpenseListResponse, ExpenseView,
};
use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    auth::AuthUser, done, server::ServerState, success, Done, ServerError, Success,
};
use engine::{CreateExpenseCmd, Expense, ExpenseDraft, ExpenseListFilter, UpdateExpenseCmd};

pub(crate) fn view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        category_id: expense.category_id,
        amount: expense.amount.to_major_f64(),
        description: expense.description,
        payment_method: expense.payment_method.as_str().to_string(),
        tags: expense.tags,
        receipt_path: expense.receipt_path,
        expense_date: expense.expense_date,
        created_at: expense.created_at,
    }
}

fn draft_from_body(body: ExpenseBody) -> ExpenseDraft {
    ExpenseDraft {
        amount: body.amount.map(|v| v.to_string()),
        description: body.description,
        category_id: body.category_id.map(|v| v.to_string()),
        payment_method: body.payment_method,
        expense_date: body.expense_date,
        tags: body.tags,
        receipt_path: None,
    }
}

async fn draft_from_multipart(
    state: &ServerState,
    mut multipart: Multipart,
) -> Result<ExpenseDraft, ServerError> {
    let form_error = |err: axum::extract::multipart::MultipartError| {
        ServerError::bad_request("VALIDATION_ERROR", err.to_string())
    };

    let mut draft = ExpenseDraft::default();
    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "receipt" {
            let file_name = field.file_name().unwrap_or("receipt").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(form_error)?;
            let path = state
                .receipts
                .store(&file_name, content_type.as_deref(), &bytes)
                .await?;
            draft.receipt_path = Some(path);
            continue;
        }

        let value = field.text().await.map_err(form_error)?;
        match name.as_str() {
            "amount" => draft.amount = Some(value),
            "description" => draft.description = Some(value),
            "category_id" => draft.category_id = Some(value),
            "payment_method" => draft.payment_method = Some(value),
            "expense_date" => draft.expense_date = Some(value),
            "tags" => draft.tags = Some(value),
            _ => {}
        }
    }

    Ok(draft)
}

async fn extract_draft(state: &ServerState, request: Request) -> Result<ExpenseDraft, ServerError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|err| ServerError::bad_request("VALIDATION_ERROR", err.to_string()))?;
        draft_from_multipart(state, multipart).await
    } else {
        let Json(body) = Json::<ExpenseBody>::from_request(request, &())
            .await
            .map_err(|err| ServerError::bad_request("VALIDATION_ERROR", err.body_text()))?;
        Ok(draft_from_body(body))
    }
}

#[derive(Deserialize)]
pub(crate) struct CreateParams {
    force: Option<bool>,
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(params): Query<CreateParams>,
    request: Request,
) -> Result<Json<Success<ExpenseView>>, ServerError> {
    let draft = extract_draft(&state, request).await?;
    let cmd = CreateExpenseCmd::new(user.id, draft).force(params.force.unwrap_or(false));
    let expense = state.engine.create_expense(cmd).await?;
    Ok(success(view(expense)))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Success<ExpenseView>>, ServerError> {
    let draft = extract_draft(&state, request).await?;
    let expense = state
        .engine
        .update_expense(UpdateExpenseCmd::new(user.id, id, draft))
        .await?;
    Ok(success(view(expense)))
}

#[derive(Deserialize)]
pub(crate) struct ListParams {
    page: Option<u64>,
    limit: Option<u64>,
    category: Option<i64>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Success<ExpenseListResponse>>, ServerError> {
    let mut filter = ExpenseListFilter::default();
    if let Some(page) = params.page {
        filter.page = page;
    }
    if let Some(limit) = params.limit {
        filter.limit = limit;
    }
    filter.category_id = params.category;
    filter.date_from = params.date_from;
    filter.date_to = params.date_to;

    let page = state.engine.list_expenses(user.id, &filter).await?;
    Ok(success(ExpenseListResponse {
        items: page.items.into_iter().map(view).collect(),
        total: page.total,
        page: page.page,
        limit: page.limit,
    }))
}

pub async fn remove(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Json<Done>, ServerError> {
    state.engine.delete_expense(user.id, id).await?;
    Ok(done("expense deleted"))
}

pub async fn bulk_delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BulkDeleteRequest>,
) -> Result<Json<Success<BulkDeleteResponse>>, ServerError> {
    let deleted = state
        .engine
        .bulk_delete_expenses(user.id, &payload.ids)
        .await?;
    Ok(success(BulkDeleteResponse { deleted }))
}

pub async fn export_csv(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Response, ServerError> {
    let expenses = state.engine.export_expenses(user.id).await?;
    if expenses.is_empty() {
        return Err(ServerError::bad_request("NO_DATA", "no expenses to export"));
    }

    let csv_error = |err: csv::Error| ServerError::Internal(format!("failed to build csv: {err}"));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "id",
            "category_id",
            "amount",
            "description",
            "payment_method",
            "tags",
            "receipt_path",
            "expense_date",
            "created_at",
        ])
        .map_err(csv_error)?;
    for expense in expenses {
        writer
            .write_record([
                expense.id.to_string(),
                expense.category_id.to_string(),
                expense.amount.to_string(),
                expense.description,
                expense.payment_method.as_str().to_string(),
                expense.tags,
                expense.receipt_path.unwrap_or_default(),
                expense.expense_date.to_string(),
                expense.created_at.to_rfc3339(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ServerError::Internal(format!("failed to build csv: {err}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
