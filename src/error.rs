pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid pedigree JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Pedigree input must be a JSON object")]
    NotAnObject,

    #[error("Pedigree schema error: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Individual #{index} has no id")]
    MissingId { index: usize },

    #[error("Duplicate individual id: {id}")]
    DuplicateId { id: String },
}
