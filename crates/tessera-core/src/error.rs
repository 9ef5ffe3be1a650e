use tessera_ecs::EcsError;
use tessera_log::LogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unable to initialize logging: {0}")]
    Log(#[from] LogError),
    #[error("unable to create world: {0}")]
    Ecs(#[from] EcsError),
}
