pub mod app;
pub mod error;
pub mod plugin;

pub mod prelude {
    pub use crate::app::*;
    pub use crate::error::*;
    pub use crate::plugin::*;
}
