use clap::Parser;
use label_capture::config::{ClassifierConfig, Config, EngineConfig};
use label_capture::server;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "label-capture-server")]
#[command(about = "Guided-capture quality server for medicine label photos")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "CAPTURE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CAPTURE_PORT", default_value = "9393")]
    pub port: u16,

    /// Maximum upload size in bytes (default: 20MB)
    #[arg(long, env = "CAPTURE_MAX_FILE_SIZE", default_value = "20971520")]
    pub max_file_size: usize,

    /// Text detection engine used when a request does not name one
    #[arg(long, env = "CAPTURE_ENGINE", default_value = "ocrs")]
    pub engine: String,

    /// Language for Tesseract (e.g., "eng", "deu", "fra")
    #[arg(long, env = "CAPTURE_LANGUAGE", default_value = "eng")]
    pub language: String,

    /// Path to tessdata directory (downloaded into the cache if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<PathBuf>,

    /// Directory for cached OCR models
    #[arg(long, env = "CAPTURE_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Never download models or tessdata
    #[arg(long, env = "CAPTURE_OFFLINE")]
    pub offline: bool,

    /// Laplacian variance below which a frame is blurry
    #[arg(long, env = "CAPTURE_BLUR_THRESHOLD", default_value = "100.0")]
    pub blur_threshold: f64,

    /// Detections at or below this confidence (0-100) are ignored
    #[arg(long, env = "CAPTURE_MIN_CONFIDENCE", default_value = "60")]
    pub min_confidence: u8,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            engine: EngineConfig {
                default_engine: args.engine,
                language: args.language,
                tessdata_path: args.tessdata_path,
                model_dir: args.model_dir,
                offline: args.offline,
            },
            classifier: ClassifierConfig {
                blur_threshold: args.blur_threshold,
                min_confidence: args.min_confidence,
                ..Default::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(args);

    tracing::info!(
        "Starting label-capture-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        "Binding to {}:{} (default engine: {})",
        config.host,
        config.port,
        config.engine.default_engine
    );

    server::run(config).await
}
