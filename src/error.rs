use thiserror::Error;

/// Form-data Error
#[derive(Debug, Error)]
pub enum Error {
    /// IO Error
    #[error(transparent)]
    Stream(#[from] std::io::Error),

    /// Box Error
    #[error(transparent)]
    BoxError(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Missing or unreadable boundary
    #[error("invalid boundary")]
    InvalidBoundary,

    /// Part header line without a `:` separator
    #[error("invalid part header `{0}`")]
    InvalidHeader(String),

    /// Declared content type is not `multipart/form-data`
    #[error("invalid content type `{0}`")]
    InvalidContentType(String),

    /// Payload too large
    #[error("payload is too large, limit to `{0}`")]
    PayloadTooLarge(u64),
}
