use std::path::PathBuf;

/// Errors raised while loading or building a mission catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("catalog contains no missions")]
    Empty,
    #[error("duplicate mission id: {0}")]
    DuplicateId(String),
    #[error("mission {id} has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { id: String, lat: f64, lon: f64 },
}
