use crate::analysis::RegionOfInterest;
use crate::classifier::{decode, CaptureState, Classification, Classifier};
use crate::config::{ClassifierConfig, Config};
use crate::engines::{EngineInfo, EngineRegistry};
use crate::error::CaptureError;
use crate::overlay;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engines: Arc<EngineRegistry>,
    pub config: Arc<Config>,
}

/// Classification response
#[derive(Serialize)]
pub struct ClassifyResponse {
    pub state: CaptureState,
    pub color: &'static str,
    pub guidance: &'static str,
    pub sharpness: f64,
    pub tokens: Vec<String>,
    pub roi: RegionOfInterest,
    pub engine: String,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub default_engine: String,
    pub available_engines: Vec<EngineInfo>,
    pub max_file_size_bytes: usize,
    pub blur_threshold: f64,
    pub min_confidence: u8,
    pub min_token_len: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engines = EngineRegistry::new(&config.engine)?;
    let addr = format!("{}:{}", config.host, config.port);

    let app = router(AppState {
        engines: Arc::new(engines),
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/classify", post(handle_classify))
        .route("/classify/:engine", post(handle_classify_with_engine))
        .route("/overlay", post(handle_overlay))
        .route("/overlay/:engine", post(handle_overlay_with_engine))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_file_size.saturating_add(MULTIPART_OVERHEAD)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle classification with the default engine
async fn handle_classify(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, CaptureError> {
    let engine = state.engines.default_name().to_string();
    classify_upload(state, &engine, multipart).await
}

/// Handle classification with an explicitly named engine
async fn handle_classify_with_engine(
    State(state): State<AppState>,
    Path(engine): Path<String>,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, CaptureError> {
    classify_upload(state, &engine, multipart).await
}

async fn classify_upload(
    state: AppState,
    engine: &str,
    multipart: Multipart,
) -> Result<Json<ClassifyResponse>, CaptureError> {
    let start = Instant::now();
    let data = read_upload(multipart, state.config.max_file_size).await?;
    let classifier = Classifier::new(state.engines.get(engine)?, state.config.classifier);
    let engine = classifier.engine_name();

    let (roi, classification) = run_blocking(move || {
        let image = decode(&data)?;
        classifier.classify_with_region(&image)
    })
    .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    let capture_state = classification.state();

    tracing::info!(
        "Classified frame in {}ms with {}: {} (sharpness {:.1})",
        processing_time_ms,
        engine,
        capture_state.as_str(),
        classification.sharpness()
    );

    Ok(Json(ClassifyResponse {
        state: capture_state,
        color: capture_state.color(),
        guidance: capture_state.guidance(),
        sharpness: classification.sharpness(),
        tokens: tokens_of(&classification),
        roi,
        engine: engine.to_string(),
        processing_time_ms,
    }))
}

/// Return the frame with the region of interest drawn in the state color,
/// classified with the default engine
async fn handle_overlay(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, CaptureError> {
    let engine = state.engines.default_name().to_string();
    overlay_upload(state, &engine, multipart).await
}

/// Overlay variant of `/classify/:engine`
async fn handle_overlay_with_engine(
    State(state): State<AppState>,
    Path(engine): Path<String>,
    multipart: Multipart,
) -> Result<Response, CaptureError> {
    overlay_upload(state, &engine, multipart).await
}

async fn overlay_upload(
    state: AppState,
    engine: &str,
    multipart: Multipart,
) -> Result<Response, CaptureError> {
    let data = read_upload(multipart, state.config.max_file_size).await?;
    let classifier = Classifier::new(state.engines.get(engine)?, state.config.classifier);

    let (classification, png) = run_blocking(move || {
        let image = decode(&data)?;
        let (roi, classification) = classifier.classify_with_region(&image)?;
        let annotated = overlay::annotate(&image, &roi, classification.state());
        Ok((classification, overlay::encode_png(&annotated)?))
    })
    .await?;

    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (
            HeaderName::from_static("x-capture-state"),
            classification.state().as_str().to_string(),
        ),
        (
            HeaderName::from_static("x-sharpness"),
            format!("{:.2}", classification.sharpness()),
        ),
    ];

    Ok((headers, png).into_response())
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    let ClassifierConfig {
        blur_threshold,
        min_confidence,
        min_token_len,
    } = state.config.classifier;

    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_engine: state.engines.default_name().to_string(),
        available_engines: state.engines.info(),
        max_file_size_bytes: state.config.max_file_size,
        blur_threshold,
        min_confidence,
        min_token_len,
    })
}

/// Pull the `file` field out of a multipart upload
async fn read_upload(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<Bytes, CaptureError> {
    let mut file_data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, "Failed to parse multipart", max_file_size))?
    {
        if field.name() == Some("file") {
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| upload_error(e, "Failed to read file data", max_file_size))?,
            );
        }
    }

    let data = file_data.ok_or(CaptureError::MissingFile)?;

    if data.len() > max_file_size {
        return Err(CaptureError::ImageTooLarge {
            size: data.len(),
            max: max_file_size,
        });
    }

    Ok(data)
}

/// Body-limit failures surface as multipart errors with a 413 status
fn upload_error(err: MultipartError, context: &str, max_file_size: usize) -> CaptureError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CaptureError::UploadTooLarge { max: max_file_size }
    } else {
        CaptureError::InvalidRequest(format!("{}: {}", context, err))
    }
}

/// Run CPU-bound decoding and recognition off the async workers
async fn run_blocking<T, F>(work: F) -> Result<T, CaptureError>
where
    F: FnOnce() -> Result<T, CaptureError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CaptureError::Internal(format!("Classification task failed: {}", e)))?
}

fn tokens_of(classification: &Classification) -> Vec<String> {
    classification
        .tokens()
        .map(|tokens| tokens.iter().cloned().collect())
        .unwrap_or_default()
}
