//! Path context for runtime environment detection and application-aware paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the runtime environment where the application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or in development mode
    Development,
    /// Running as an installed binary in production
    Production,
}

/// Context for managing application paths based on a single app identity.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// The runtime environment (development or production)
    environment: RuntimeEnvironment,
    /// Base path for all application data
    base_path: Arc<Path>,
    /// Application identifier (e.g., "wizard")
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(app_id: &'static str) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            environment,
            base_path: base_path.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (useful for testing).
    pub fn with_base_path(base_path: PathBuf, app_id: &'static str) -> Self {
        let environment = Self::detect_environment();

        Self {
            environment,
            base_path: base_path.into(),
            app_id,
        }
    }

    /// Detects the runtime environment based on executable location.
    fn detect_environment() -> RuntimeEnvironment {
        // Check if running from cargo (development)
        if let Ok(exe_path) = std::env::current_exe() {
            // If the executable is in a "target/debug" or "target/release" directory,
            // we're likely in development mode
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        // Check for cargo environment variables
        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    /// Determines the base path based on the runtime environment.
    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => {
                // In development, use project root or current directory
                if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
                    PathBuf::from(manifest_dir)
                } else if let Ok(current_dir) = std::env::current_dir() {
                    current_dir
                } else {
                    PathBuf::from(".")
                }
            }
            RuntimeEnvironment::Production => {
                // In production, use platform-specific data directory
                if cfg!(target_os = "macos") {
                    dirs::data_local_dir()
                        .expect("failed to determine Application Support directory")
                        .join("Enroll")
                } else if cfg!(target_os = "windows") {
                    dirs::data_local_dir()
                        .expect("failed to determine LocalAppData directory")
                        .join("Enroll")
                } else if cfg!(any(target_os = "linux", target_os = "freebsd")) {
                    dirs::data_local_dir()
                        .expect("failed to determine XDG_DATA_HOME directory")
                        .join("Enroll")
                } else {
                    PathBuf::from(".")
                }
            }
        }
    }

    /// Returns the runtime environment.
    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    /// Returns the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the app identifier.
    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// Returns the application root path: `<base>/<app_id>`
    pub fn app_root(&self) -> PathBuf {
        self.base_path.join(self.app_id)
    }

    /// Returns the config directory path: `<base>/<app_id>/config/`
    pub fn config_dir(&self) -> PathBuf {
        self.app_root().join("config")
    }

    /// Returns the data directory path: `<base>/<app_id>/data/`
    pub fn data_dir(&self) -> PathBuf {
        self.app_root().join("data")
    }

    /// Returns the logs directory path: `<base>/<app_id>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.app_root().join("logs")
    }

    /// Returns a log file path: `<base>/<app_id>/logs/<file_name>`
    pub fn log_file(&self, file_name: &str) -> PathBuf {
        self.logs_dir().join(file_name)
    }

    /// Ensures all necessary directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        let dirs = vec![
            self.app_root(),
            self.config_dir(),
            self.data_dir(),
            self.logs_dir(),
        ];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_context_structure() {
        let ctx = PathContext::with_base_path(PathBuf::from("/test/base"), "wizard");

        assert_eq!(ctx.app_id(), "wizard");
        assert_eq!(ctx.app_root(), PathBuf::from("/test/base/wizard"));
    }

    #[test]
    fn test_directory_paths() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "app");

        assert_eq!(ctx.config_dir(), PathBuf::from("/base/app/config"));
        assert_eq!(ctx.data_dir(), PathBuf::from("/base/app/data"));
        assert_eq!(ctx.logs_dir(), PathBuf::from("/base/app/logs"));
    }

    #[test]
    fn test_log_file_path() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "app");

        assert_eq!(
            ctx.log_file("app.log"),
            PathBuf::from("/base/app/logs/app.log")
        );
    }
}
