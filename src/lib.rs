pub mod core {
    pub use tessera_core::*;
}

pub mod ecs {
    pub use tessera_ecs::*;
}

pub mod log {
    pub use tessera_log::*;
}
