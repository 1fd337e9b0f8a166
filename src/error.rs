use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("order {0} not found")]
    NotFound(u64),
    #[error("order {0} is already cancelled")]
    AlreadyCancelled(u64),
    #[error("{0}")]
    TerminalState(&'static str),
    #[error("storage failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl OrderError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for OrderError {
    fn from(err: rocksdb::Error) -> Self {
        Self::storage(err)
    }
}
