use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("options parse error: {0}")]
    Options(#[from] toml::de::Error),

    #[error("usage: {0}")]
    Usage(String),
}
