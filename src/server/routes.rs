// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Xqr-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Xqr and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;

use super::page::ADMIN_PAGE;
use super::types::{
    ErrorResponse, FileEntry, FileResponse, FilesResponse, LoadRequest, LoadResponse,
    MessageResponse, QueryLanguage, QueryRequest, QueryResponse, SaveRequest, UpdateKind,
    UpdateRequest,
};
use super::worker::WorkspaceHandle;
use crate::model::Saved;
use crate::ops::{Command, DispatchError, Outcome, WriteTarget};
use crate::query::Expression;

pub fn router(workspace: WorkspaceHandle) -> Router {
    Router::new()
        .route("/", get(admin_page))
        .route("/api/load", post(load).options(preflight))
        .route("/api/query", post(query).options(preflight))
        .route("/api/update", post(update).options(preflight))
        .route("/api/save", post(save).options(preflight))
        .route("/api/files", get(files))
        .route("/api/file/{*path}", get(file_info))
        .fallback(not_found)
        .layer(middleware::map_response(allow_any_origin))
        .with_state(workspace)
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    NotFound,
    Dispatch(DispatchError),
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self::Dispatch(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_owned()),
            Self::Dispatch(
                err @ (DispatchError::MissingArgument { .. } | DispatchError::StdinUnavailable),
            ) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Dispatch(err @ DispatchError::Internal(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            // Operation failures are reported in the body, not the status.
            Self::Dispatch(err) => (StatusCode::OK, err.to_string()),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("invalid request body: {err}")))
}

fn unexpected(outcome: Outcome) -> ApiError {
    ApiError::Dispatch(DispatchError::Internal(format!("unexpected outcome: {outcome:?}")))
}

async fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

async fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}

async fn admin_page() -> Html<&'static str> {
    Html(ADMIN_PAGE)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn load(State(workspace): State<WorkspaceHandle>, body: Bytes) -> ApiResult<LoadResponse> {
    let request: LoadRequest = parse_body(&body)?;
    let command = Command::Load { path: PathBuf::from(&request.file_path) };
    match workspace.execute(None, command).await? {
        Outcome::Loaded(info) => Ok(Json(LoadResponse {
            success: true,
            message: format!("File loaded: {}", request.file_path),
            file_type: info.file_type,
            elements_count: info.elements_count,
        })),
        other => Err(unexpected(other)),
    }
}

async fn query(State(workspace): State<WorkspaceHandle>, body: Bytes) -> ApiResult<QueryResponse> {
    let request: QueryRequest = parse_body(&body)?;
    let expression =
        Expression::with_language(request.query, request.language == QueryLanguage::Css);
    let command = Command::List { expression: Some(expression) };
    match workspace.execute(request.file_path, command).await? {
        Outcome::Matches(elements) => {
            Ok(Json(QueryResponse { success: true, count: elements.len(), elements }))
        }
        other => Err(unexpected(other)),
    }
}

async fn update(
    State(workspace): State<WorkspaceHandle>,
    body: Bytes,
) -> ApiResult<MessageResponse> {
    let request: UpdateRequest = parse_body(&body)?;
    let target = match request.kind {
        UpdateKind::Text => WriteTarget::Text,
        UpdateKind::Attribute => WriteTarget::Attribute(
            request.attribute.ok_or(DispatchError::MissingArgument { name: "attribute" })?,
        ),
    };
    let command = Command::Set {
        expression: Expression::xpath(request.xpath),
        target,
        value: request.value,
    };
    match workspace.execute(request.file_path, command).await? {
        Outcome::Changed(true) => Ok(Json(MessageResponse {
            success: true,
            message: "Element updated successfully".to_owned(),
        })),
        Outcome::Changed(false) => Ok(Json(MessageResponse {
            success: false,
            message: "Element not found".to_owned(),
        })),
        other => Err(unexpected(other)),
    }
}

async fn save(State(workspace): State<WorkspaceHandle>, body: Bytes) -> ApiResult<MessageResponse> {
    let request: SaveRequest =
        if body.is_empty() { SaveRequest::default() } else { parse_body(&body)? };
    let command = Command::Save { output: request.output_path.map(PathBuf::from) };
    let message = match workspace.execute(request.file_path, command).await? {
        Outcome::Saved(Saved::Written(path)) => {
            format!("File saved successfully to {}", path.display())
        }
        Outcome::Saved(Saved::Unchanged(path)) => {
            format!("No changes to save; {} is up to date", path.display())
        }
        Outcome::Saved(Saved::Stdout(_)) => {
            "Document was read from stdin; pass output_path to write it".to_owned()
        }
        other => return Err(unexpected(other)),
    };
    Ok(Json(MessageResponse { success: true, message }))
}

async fn files(State(workspace): State<WorkspaceHandle>) -> ApiResult<FilesResponse> {
    match workspace.execute(None, Command::Files).await? {
        Outcome::Files(infos) => {
            let files: Vec<FileEntry> = infos
                .into_iter()
                .map(|info| FileEntry {
                    path: info.path,
                    file_type: info.file_type,
                    elements_count: info.elements_count,
                })
                .collect();
            Ok(Json(FilesResponse { success: true, count: files.len(), files }))
        }
        other => Err(unexpected(other)),
    }
}

async fn file_info(
    State(workspace): State<WorkspaceHandle>,
    UrlPath(path): UrlPath<String>,
) -> ApiResult<FileResponse> {
    // The wildcard drops the leading slash of absolute paths.
    let outcome = match workspace.execute(Some(path.clone()), Command::Describe).await {
        Err(DispatchError::UnknownDocument { .. }) if !path.starts_with('/') => {
            workspace.execute(Some(format!("/{path}")), Command::Describe).await?
        }
        other => other?,
    };
    match outcome {
        Outcome::Described(info) => Ok(Json(FileResponse {
            success: true,
            file_path: path,
            file_type: info.file_type,
            elements_count: info.elements_count,
        })),
        other => Err(unexpected(other)),
    }
}
