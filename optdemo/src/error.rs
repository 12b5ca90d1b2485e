use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("option setup: {0}")]
    Options(#[from] optparser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, DemoError>;
