use crate::tree::TreeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeSitterError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("failed to build syntax tree: {0}")]
    Tree(#[from] TreeError),
}
