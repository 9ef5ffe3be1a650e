pub mod commands;
pub mod component;
pub mod entity;
pub mod error;
pub mod event;
pub mod id_map;
pub mod identity;
pub mod query;
pub mod resource;
pub mod settings;
pub mod sparse_set;
pub mod system;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::EcsError;
pub use settings::EcsSettings;

pub mod prelude {
    pub use crate::commands::Commands;
    pub use crate::component::info::ComponentInfo;
    pub use crate::component::pool::Pool;
    pub use crate::component::set::Bundle;
    pub use crate::component::set::ComponentSet;
    pub use crate::component::Component;
    pub use crate::component::Pooled;
    pub use crate::entity::Entity;
    pub use crate::entity::EntityId;
    pub use crate::error::EcsError;
    pub use crate::event::Event;
    pub use crate::event::EventReader;
    pub use crate::event::EventSlot;
    pub use crate::event::EventWriter;
    pub use crate::identity::ComponentTypeId;
    pub use crate::identity::EntityAllocator;
    pub use crate::identity::InstanceId;
    pub use crate::identity::PoolId;
    pub use crate::identity::ResourceTypeId;
    pub use crate::query::Query;
    pub use crate::resource::Resource;
    pub use crate::resource::Resources;
    pub use crate::settings::EcsSettings;
    pub use crate::sparse_set::SparseSet;
    pub use crate::system::EntitySystem;
    pub use crate::system::ForEach;
    pub use crate::system::System;
    pub use crate::world::entities::Entities;
    pub use crate::world::World;
}
