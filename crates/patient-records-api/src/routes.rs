//! Route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use patient_records_core::{
    FieldMap, Patient, PatientCollection, PatientRecord, PatientStore, PatientUpdate, SortField,
    SortOrder, StoreResult,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::AppState;

type Message = (StatusCode, Json<Value>);

/// Request body as a loose field map, so type errors are reported per field
/// instead of by the extractor.
type Body = Result<Json<FieldMap>, JsonRejection>;

fn message(status: StatusCode, text: &str) -> Message {
    (status, Json(json!({ "message": text })))
}

/// Run `op` against the store on the blocking pool. Every store call does
/// file or SQLite I/O and may wait on the write lock.
async fn with_store<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    F: FnOnce(&PatientStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    Ok(tokio::task::spawn_blocking(move || op(&store)).await??)
}

pub async fn home() -> Json<Value> {
    Json(json!({ "message": "Welcome to Patient API" }))
}

pub async fn view_patients(State(state): State<AppState>) -> ApiResult<Json<PatientCollection>> {
    Ok(Json(with_store(&state, |store| store.load_all()).await?))
}

pub async fn view_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<PatientRecord>> {
    Ok(Json(with_store(&state, move |store| store.get(&patient_id)).await?))
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    /// height, weight or bmi
    sort_by: String,
    /// asc (default) or desc
    order: Option<String>,
}

pub async fn sort_patients(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> ApiResult<Json<Vec<PatientRecord>>> {
    let field: SortField = params.sort_by.parse()?;
    let order = params
        .order
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()?
        .unwrap_or_default();

    Ok(Json(with_store(&state, move |store| store.list_sorted(field, order)).await?))
}

pub async fn create_patient(
    State(state): State<AppState>,
    body: Body,
) -> ApiResult<Message> {
    let Json(fields) = body?;
    let patient = Patient::from_fields(&fields)?;
    with_store(&state, move |store| store.create_patient(&patient)).await?;
    Ok(message(StatusCode::CREATED, "Patient created successfully"))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    body: Body,
) -> ApiResult<Message> {
    let Json(fields) = body?;
    let update = PatientUpdate::from_fields(&fields)?;
    with_store(&state, move |store| store.update_patient(&patient_id, &update)).await?;
    Ok(message(StatusCode::ACCEPTED, "patient updated"))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Message> {
    with_store(&state, move |store| store.delete_patient(&patient_id)).await?;
    Ok(message(StatusCode::OK, "patient deleted"))
}
