use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse screen catalogue {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("screen catalogue defines no screens")]
    EmptyCatalogue,

    #[error("duplicate screen id in catalogue: {id}")]
    DuplicateScreen { id: String },

    #[error("invalid screen {screen}: {message}")]
    InvalidScreen { screen: String, message: String },

    #[error("unknown screen: {id}")]
    UnknownScreen { id: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(screen: &str, message: impl Into<String>) -> Self {
        Self::InvalidScreen {
            screen: screen.to_string(),
            message: message.into(),
        }
    }
}
