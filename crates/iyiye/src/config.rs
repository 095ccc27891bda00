use std::env;

use crate::catalog::CatalogConfig;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment name (default: "dev")
    pub environment: String,
    /// Application naming prefix (default: "iyiye")
    pub application: String,
    /// Path to the notification SQLite database file (default: "iyiye-notif.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Endpoint of the external user function (default: "http://localhost:9000/user")
    /// Note: Only used when the `lambda` feature is enabled.
    #[allow(dead_code)]
    pub user_function_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ENVIRONMENT` - Deployment environment name (default: "dev")
    /// - `APPLICATION_NAME` - Application naming prefix (default: "iyiye")
    /// - `SQLITE_PATH` - Notification database path (default: "iyiye-notif.db")
    /// - `USER_FUNCTION_URL` - User function endpoint (default: "http://localhost:9000/user")
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()),
            application: env::var("APPLICATION_NAME").unwrap_or_else(|_| "iyiye".to_string()),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "iyiye-notif.db".to_string()),
            user_function_url: env::var("USER_FUNCTION_URL")
                .unwrap_or_else(|_| "http://localhost:9000/user".to_string()),
        }
    }

    /// Naming configuration handed to the catalog builder.
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            environment: self.environment.clone(),
            application: self.application.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
