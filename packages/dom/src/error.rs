use thiserror::Error;

pub type DomResult<T> = Result<T, DomError>;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Node is not attached to a parent")]
    Detached,

    #[error("HTML serialization failed: {0}")]
    Serialize(#[from] std::io::Error),

    #[error("Serialized markup is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
