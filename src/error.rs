use thiserror::Error;

/// Every failure the client can surface.
///
/// Transport and decode failures keep their source error; the rest carry
/// just enough context to act on. The client never retries: callers own
/// retry policy.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response body")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Response is missing the expected {0} record")]
    MissingRecord(&'static str),

    #[error("Request rejected by the remote service: {cause}")]
    RemoteRejected { cause: String },

    #[error("Handshake response carried no authorization key")]
    AuthKeyMissing,

    #[error("Operation requires a nomember session")]
    AuthRequired,

    #[error("Image upload failed: response carried no FL_DATA/OFL_DATA tokens")]
    ImageUploadFailed,

    #[error("Write failed: {0}")]
    WriteFailed(&'static str),

    #[error("Article fetch succeeded but yielded no subject (removed or inaccessible)")]
    EmptyArticle,

    #[error("Not a canonical article URL: {0}")]
    InvalidArticleUrl(String),
}
