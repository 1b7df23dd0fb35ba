use std::path::{Path, PathBuf};

const MB: usize = 1024 * 1024;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | . | base directory |
/// | DATA_DIR | {WORK_DIR}/data | holds home.json and galerias.json |
/// | UPLOADS_DIR | {WORK_DIR}/uploads | flat uploads directory |
/// | HTTP_HOST | 0.0.0.0 | bind address |
/// | HTTP_PORT | 3000 | bind port |
/// | MAX_FILE_SIZE_MB | 50 | per file, home updates |
/// | MAX_FILES_PER_REQUEST | 50 | per home update |
/// | MAX_GALLERY_PHOTO_MB | 10 | per gallery photo |
/// | MAX_REQUEST_MB | 512 | whole request body |
/// | LOG_LEVEL | info | default filter (RUST_LOG wins) |
/// | LOG_JSON | false | JSON console output |
/// | LOG_DIR | unset | enables daily rotating log files |
/// | ENVIRONMENT | development | development / production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/feira HTTP_PORT=8080 cargo run -p feira-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub http_host: String,
    pub http_port: u16,
    /// Per-file limit for home document uploads
    pub max_file_size_bytes: usize,
    /// File count limit for one home update
    pub max_files_per_request: usize,
    /// Per-file limit for gallery photos and covers
    pub max_gallery_photo_bytes: usize,
    /// Whole-body limit applied by the router
    pub max_request_bytes: usize,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | production
    pub environment: String,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Byte count for a megabyte setting, saturating at `usize::MAX`
fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(MB)
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        let work_dir = PathBuf::from(std::env::var("WORK_DIR").unwrap_or_else(|_| ".".into()));
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("data"));
        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| work_dir.join("uploads"));

        Self {
            work_dir,
            data_dir,
            uploads_dir,
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: env_parse("HTTP_PORT", 3000),
            max_file_size_bytes: megabytes(env_parse("MAX_FILE_SIZE_MB", 50)),
            max_files_per_request: env_parse("MAX_FILES_PER_REQUEST", 50),
            max_gallery_photo_bytes: megabytes(env_parse("MAX_GALLERY_PHOTO_MB", 10)),
            max_request_bytes: megabytes(env_parse("MAX_REQUEST_MB", 512)),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Configuration rooted at explicit directories, ignoring the environment
    ///
    /// Used by tests.
    pub fn with_dirs(data_dir: impl Into<PathBuf>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: PathBuf::from("."),
            data_dir: data_dir.into(),
            uploads_dir: uploads_dir.into(),
            http_host: "127.0.0.1".into(),
            http_port: 0,
            max_file_size_bytes: 50 * MB,
            max_files_per_request: 50,
            max_gallery_photo_bytes: 10 * MB,
            max_request_bytes: 512 * MB,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            environment: "development".into(),
        }
    }

    pub fn home_file(&self) -> PathBuf {
        self.data_dir.join("home.json")
    }

    pub fn galleries_file(&self) -> PathBuf {
        self.data_dir.join("galerias.json")
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
