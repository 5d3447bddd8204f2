use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("case catalog is empty; configure at least one case")]
    Empty,

    #[error("failed to read case catalog at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid case catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate case id: {0}")]
    DuplicateId(u32),
}
