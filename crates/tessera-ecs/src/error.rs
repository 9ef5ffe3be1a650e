use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcsError {
    #[error("sparse set page size must be greater than 0")]
    ZeroPageSize,
    #[error("unable to parse ecs settings: {0}")]
    Settings(#[from] ron::error::SpannedError),
}
