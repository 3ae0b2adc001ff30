// Plumbing shared by every entity controller: paging query parsing, the
// paged list envelope, DTO mapping, JSON body unwrapping, and the
// field-error collector used by DTO validation.
use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::database::pagination::PageParams;
use crate::error::ApiError;

/// Paging values exactly as the client sent them. Clamping happens in
/// [`PageParams`], so out-of-range values never reach a query.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn clamped(&self) -> PageParams {
        PageParams::clamped(self.page, self.page_size)
    }
}

/// One page of mapped items plus the paging window it was cut from.
#[derive(Debug, Serialize)]
pub struct PagedData<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T: Serialize> PagedData<T> {
    pub fn new(items: Vec<T>, total: i64, params: &PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            page_size: params.page_size,
        }
    }
}

/// Map a page of rows into response DTOs.
pub fn map_all<E, D: From<E>>(rows: Vec<E>) -> Vec<D> {
    rows.into_iter().map(D::from).collect()
}

/// Unwrap a JSON body extraction. Rejections (bad syntax, wrong shape,
/// missing content type) become `ApiError`s instead of axum's plain-text
/// responses.
pub fn require_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = payload?;
    Ok(value)
}

/// Referential check shared by the child-entity controllers: a scenario,
/// asset, or document may only point at a project that exists. A dangling
/// id is reported as a field error, not a bare 400.
pub async fn ensure_project_exists(project_id: uuid::Uuid) -> Result<(), ApiError> {
    let service =
        crate::services::ProjectService::new(crate::database::manager::DatabaseManager::pool().await?);
    if service.exists(project_id).await? {
        return Ok(());
    }

    let mut errors = FieldErrors::new();
    errors.push("project_id", format!("project {} does not exist", project_id));
    errors.finish()
}

/// Collector for per-field validation failures. DTO `validate()` methods
/// push everything wrong with the payload, then `finish()` turns a non-empty
/// set into a single 400 response.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        // First failure per field wins; later checks assume the earlier ones
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Required string: must be non-empty after trimming.
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{} is required", field));
        }
    }

    /// Upper bound on character count.
    pub fn cap_chars(&mut self, field: &str, value: &str, max_chars: usize) {
        if value.chars().count() > max_chars {
            self.push(field, format!("{} must be at most {} characters", field, max_chars));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Validation failed", Some(self.errors)))
        }
    }
}
