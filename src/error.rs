use std::path::PathBuf;

use thiserror::Error;

/// Problems with the inputs of a synthesis request.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Please provide an inquiry (--query)")]
    EmptyInquiry,

    #[error("Unknown {kind} '{value}'. Valid options: {options}")]
    Unknown {
        kind: &'static str,
        value: String,
        options: String,
    },

    #[error("{kind} '{value}' is not offered by the selected science fields. Valid options: {options}")]
    NotOffered {
        kind: &'static str,
        value: String,
        options: String,
    },

    #[error("Attachment {} exceeds the {limit} byte limit ({size} bytes)", path.display())]
    AttachmentTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Attachment {} must be a UTF-8 .txt file", path.display())]
    AttachmentNotText { path: PathBuf },

    #[error("Missing API key for {provider}. Run 'ksynth auth --provider {provider}' or set {env_var}")]
    MissingApiKey {
        provider: String,
        env_var: &'static str,
    },
}
