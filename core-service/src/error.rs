use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("List error: {0}")]
    List(#[from] core_list::ListError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
