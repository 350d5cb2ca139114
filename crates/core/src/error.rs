#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The `id` is a string because lookups happen both by storage id and
    /// by the human-readable case code.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
