use std::any::TypeId;

use paste::paste;
use smallvec::{smallvec, SmallVec};

use crate::{
    component::{Component, Pooled},
    identity::EntityId,
    world::World,
};

/// Rust type ids of a set of component types.
pub type TypeIds = SmallVec<[TypeId; 8]>;

/// A list of component types, expressed as a tuple. Used to describe what a query requires and
/// which components to remove from an entity.
///
/// The empty tuple is the empty set.
pub trait ComponentSet {
    fn type_ids() -> TypeIds;
}

/// Component instances to attach to one entity, as a tuple of `Pooled` values. Components are
/// attached in tuple order.
pub trait Bundle {
    /// Number of components in the bundle.
    const LEN: usize;

    fn attach_to(self, world: &mut World, entity: EntityId);
}

impl ComponentSet for () {
    #[inline]
    fn type_ids() -> TypeIds {
        SmallVec::new()
    }
}

impl Bundle for () {
    const LEN: usize = 0;

    #[inline]
    fn attach_to(self, _: &mut World, _: EntityId) {}
}

macro_rules! component_set_impl {
    ( $n:expr, $( $name:ident )+ ) => {
        impl<$($name: Component,)*> ComponentSet for ($($name,)*) {
            #[inline]
            fn type_ids() -> TypeIds {
                smallvec![$(TypeId::of::<$name>(),)*]
            }
        }

        impl<$($name: Component,)*> Bundle for ($(Pooled<$name>,)*) {
            const LEN: usize = $n;

            #[inline]
            fn attach_to(self, world: &mut World, entity: EntityId) {
                paste! {
                    #[allow(non_snake_case)]
                    let ($([<$name _component>],)*) = self;
                }

                paste! {$(
                    world.attach(entity, [<$name _component>]);
                )*}
            }
        }
    }
}

component_set_impl! { 1, A }
component_set_impl! { 2, A B }
component_set_impl! { 3, A B C }
component_set_impl! { 4, A B C D }
component_set_impl! { 5, A B C D E }
component_set_impl! { 6, A B C D E F }
component_set_impl! { 7, A B C D E F G }
component_set_impl! { 8, A B C D E F G H }
component_set_impl! { 9, A B C D E F G H I }
component_set_impl! { 10, A B C D E F G H I J }
component_set_impl! { 11, A B C D E F G H I J K }
component_set_impl! { 12, A B C D E F G H I J K L }
