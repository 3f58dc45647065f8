use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("finish_node called with no open node")]
    NoOpenNode,

    #[error("{open} node(s) left open when finishing the tree")]
    UnclosedNodes { open: usize },

    #[error("tree has {count} tokens, more than a u32 handle can address")]
    TooLarge { count: usize },
}
