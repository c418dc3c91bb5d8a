//! API configuration.

use std::path::PathBuf;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size (uploads included)
    pub max_body_size: usize,
    /// Directory for raw uploaded input files
    pub upload_dir: PathBuf,
    /// Directory for produced job artifacts
    pub output_dir: PathBuf,
    /// Directory for preview stills
    pub preview_dir: PathBuf,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            max_body_size: 512 * 1024 * 1024, // 512MB
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
            preview_dir: PathBuf::from("previews"),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            preview_dir: std::env::var("PREVIEW_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.preview_dir),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Create the three storage areas if they do not exist yet.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.upload_dir, &self.output_dir, &self.preview_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_dirs_creates_storage_areas() {
        let dir = tempfile::tempdir().unwrap();
        let config = ApiConfig {
            upload_dir: dir.path().join("uploads"),
            output_dir: dir.path().join("outputs"),
            preview_dir: dir.path().join("previews"),
            ..ApiConfig::default()
        };

        config.ensure_dirs().unwrap();
        assert!(config.upload_dir.is_dir());
        assert!(config.output_dir.is_dir());
        assert!(config.preview_dir.is_dir());
    }
}
