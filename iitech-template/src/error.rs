use thiserror::Error;

/// Errors while loading or writing a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template has no top image (no <img> marked with class '{class}')")]
    MissingTopImage { class: String },

    #[error("template has no top caption (no element with class '{class}')")]
    MissingTopCaption { class: String },

    #[error("HTML serialization failed: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("serialized HTML is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
