//! Process configuration
//!
//! Everything comes from environment variables with working defaults,
//! including which storage backend the repository is built against.

/// Runtime configuration for the server process
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub secret_key: String,
    pub debug: bool,
    pub backend: Backend,
}

/// Storage backend selection
#[derive(Debug, Clone)]
pub enum Backend {
    Sql { database_url: String },
    Mongo { url: String, database: String },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sql { .. } => "sql",
            Backend::Mongo { .. } => "mongo",
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8000);
        let secret_key =
            std::env::var("SECRET_KEY").unwrap_or_else(|_| "defaultsecretkey".to_string());
        let debug = std::env::var("DEBUG")
            .map(|value| parse_bool(&value))
            .unwrap_or(false);
        let backend = backend_from(
            &std::env::var("TASK_BACKEND").unwrap_or_else(|_| "sql".to_string()),
            std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://tasks.db".to_string()),
            std::env::var("MONGO_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            std::env::var("MONGO_DB").unwrap_or_else(|_| "task_database".to_string()),
        );

        Self {
            port,
            secret_key,
            debug,
            backend,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn backend_from(kind: &str, database_url: String, mongo_url: String, mongo_db: String) -> Backend {
    match kind.to_ascii_lowercase().as_str() {
        "mongo" | "mongodb" => Backend::Mongo {
            url: mongo_url,
            database: mongo_db,
        },
        "sql" | "sqlite" => Backend::Sql { database_url },
        other => {
            tracing::warn!("Unknown TASK_BACKEND {:?}, falling back to sql", other);
            Backend::Sql { database_url }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("True"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("1"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_backend_selection() {
        let backend = backend_from(
            "mongo",
            "sqlite://tasks.db".into(),
            "mongodb://example:27017".into(),
            "tasks".into(),
        );
        assert_eq!(backend.name(), "mongo");

        let backend = backend_from(
            "sql",
            "sqlite://tasks.db".into(),
            "mongodb://example:27017".into(),
            "tasks".into(),
        );
        assert_eq!(backend.name(), "sql");

        // Unknown values fall back to the relational store.
        let backend = backend_from(
            "cassandra",
            "sqlite://tasks.db".into(),
            "mongodb://example:27017".into(),
            "tasks".into(),
        );
        assert_eq!(backend.name(), "sql");
    }
}
