//! Route handlers.

use std::collections::BTreeSet;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::Uri,
    Json,
};

use crate::http::error::{ApiError, ApiResult};
use crate::http::server::AppState;
use crate::model::{Course, SubjectCode, Term};

/// `GET /schools`
pub async fn list_schools(State(state): State<AppState>) -> Json<BTreeSet<String>> {
    Json(state.catalog.all_schools())
}

/// `GET /subjects`
pub async fn list_subjects(State(state): State<AppState>) -> ApiResult<Json<Vec<SubjectCode>>> {
    Ok(Json(state.catalog.all_subjects(None)?))
}

/// `GET /subjects/{school}`
pub async fn list_school_subjects(
    State(state): State<AppState>,
    school: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<SubjectCode>>> {
    let Path(school) = school?;
    let subjects = state.catalog.all_subjects(Some(school.as_str())).inspect_err(|_| {
        tracing::debug!(school = %school, "Subject listing for unknown school");
    })?;
    Ok(Json(subjects))
}

/// `GET /{term}/{school}/{subject}`
pub async fn select_courses(
    State(state): State<AppState>,
    segments: Result<Path<(String, String, String)>, PathRejection>,
) -> ApiResult<Json<Vec<Course>>> {
    let Path((term, school, subject)) = segments.inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected course path");
    })?;
    let term = term.parse::<Term>().inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected term id");
    })?;
    let subject = SubjectCode::new(subject, school);

    let courses = state.catalog.select_courses(term, &subject).await?;
    tracing::debug!(term = %term, subject = %subject, count = courses.len(), "Courses selected");
    Ok(Json(courses))
}

/// Fallback for paths that match no route.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
