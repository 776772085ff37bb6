use crate::media::{self, DownloadError, DownloadRequest, Extractor, FormatDescriptor};
use axum::{
    body::Body,
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn Extractor>,
    pub output_dir: Arc<PathBuf>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/fetch", post(fetch_formats))
        .route("/download", post(download_file))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FetchRequest {
    pub url: String,
}

/// Body of every `/fetch` reply. Failures still travel with a 200 status.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchResponse {
    Success {
        url: String,
        formats: Vec<FormatDescriptor>,
    },
    Error {
        message: String,
    },
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn fetch_formats(
    State(state): State<AppState>,
    payload: Result<Json<FetchRequest>, JsonRejection>,
) -> Json<FetchResponse> {
    let url = match payload {
        Ok(Json(request)) => request.url,
        Err(rejection) => {
            warn!("Rejected /fetch body: {}", rejection);
            return Json(FetchResponse::Error {
                message: rejection.body_text(),
            });
        }
    };

    info!("Listing formats for {}", url);
    match media::list_formats(state.extractor.as_ref(), &url).await {
        Ok(formats) => Json(FetchResponse::Success { url, formats }),
        Err(e) => {
            warn!("Error fetching info for {}: {}", url, e);
            Json(FetchResponse::Error {
                message: e.to_string(),
            })
        }
    }
}

async fn download_file(
    State(state): State<AppState>,
    form: Result<Form<DownloadRequest>, FormRejection>,
) -> Response {
    let request = match form {
        Ok(Form(request)) => request,
        Err(rejection) => {
            warn!("Rejected /download form: {}", rejection);
            return download_error(&rejection.body_text());
        }
    };

    info!(
        "Download requested for {} in format {}",
        request.url, request.format_id
    );

    match send_download(&state, &request).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Download of {} failed: {}", request.url, e);
            download_error(&e.to_string())
        }
    }
}

async fn send_download(
    state: &AppState,
    request: &DownloadRequest,
) -> Result<Response, DownloadError> {
    let media_file = media::download(state.extractor.as_ref(), &state.output_dir, request).await?;

    let file = tokio::fs::File::open(&media_file.path).await?;
    let size = file.metadata().await?.len();

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    let disposition = format!("attachment; filename=\"{}\"", media_file.filename);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| DownloadError::Fetch(format!("Invalid file name: {e}")))?,
    );

    info!("Sending {} ({} bytes)", media_file.filename, size);
    let body = Body::from_stream(ReaderStream::new(file));
    Ok((StatusCode::OK, headers, body).into_response())
}

fn download_error(message: &str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        format!("Download error: {message}"),
    )
        .into_response()
}
