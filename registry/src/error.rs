use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate primary id: {0}")]
    DuplicatePrimaryId(String),

    #[error("failed to read record file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse record file: {0}")]
    Parse(String),
}
