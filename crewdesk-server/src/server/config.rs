use std::env;

/// Runtime configuration, sourced from the environment with sane
/// defaults for local development.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for the database and log files.
    pub work_dir: String,
    /// Port the HTTP API listens on.
    pub http_port: u16,
    /// Database file name inside `work_dir`.
    pub db_file: String,
    /// `development` or `production`.
    pub environment: String,
    /// Log directory; empty means stdout only.
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            work_dir: env::var("WORK_DIR").unwrap_or_else(|_| "./data".to_string()),
            http_port: env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8700),
            db_file: env::var("DB_FILE").unwrap_or_else(|_| "crewdesk.db".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_dir: env::var("LOG_DIR").unwrap_or_default(),
        }
    }

    /// Build a config from the environment, then apply explicit overrides.
    pub fn with_overrides(work_dir: Option<String>, http_port: Option<u16>) -> Self {
        let mut config = Self::from_env();
        if let Some(dir) = work_dir {
            config.work_dir = dir;
        }
        if let Some(port) = http_port {
            config.http_port = port;
        }
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        !self.is_production()
    }

    /// Absolute-ish path of the SQLite file this config points at.
    pub fn db_path(&self) -> String {
        format!("{}/{}", self.work_dir, self.db_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_environment() {
        let config = Config::with_overrides(Some("/tmp/crewdesk-test".to_string()), Some(9000));
        assert_eq!(config.work_dir, "/tmp/crewdesk-test");
        assert_eq!(config.http_port, 9000);
    }

    #[test]
    fn db_path_joins_work_dir_and_file() {
        let mut config = Config::with_overrides(Some("/srv/crewdesk".to_string()), None);
        config.db_file = "main.db".to_string();
        assert_eq!(config.db_path(), "/srv/crewdesk/main.db");
    }

    #[test]
    fn development_is_the_default_environment() {
        let config = Config::with_overrides(None, None);
        if config.environment == "development" {
            assert!(config.is_development());
            assert!(!config.is_production());
        }
    }
}
