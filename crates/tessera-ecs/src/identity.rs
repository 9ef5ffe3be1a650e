use std::{
    any::{type_name, TypeId},
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{id_map::TypeIdMap, sparse_set::SparseIndex};

/// Ids handed out by a `TypeRegistry`.
pub trait RegistryId: Copy + Eq {
    fn from_raw(raw: u64) -> Self;
}

macro_rules! id_type {
    ( $(#[$meta:meta])* $name:ident ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }

        impl RegistryId for $name {
            #[inline]
            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl SparseIndex for $name {
            #[inline]
            fn sparse_index(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

id_type! {
    /// Identifies an entity for its whole lifetime. Ids are never reused.
    EntityId
}

id_type! {
    /// Sequential id of a component type within one world's registry.
    ComponentTypeId
}

id_type! {
    /// Sequential id of a resource type. Resources use a registry separate from components, so
    /// a type used as both gets one id of each kind.
    ResourceTypeId
}

id_type! {
    /// Identity of a component instance inside its pool. Survives recycling, which is how a
    /// reused instance can be told apart from a fresh allocation.
    InstanceId
}

id_type! {
    /// Process unique id of a component pool. Instances carry the id of the pool that created
    /// them, so a pool can reject instances handed out by a pool of another world.
    PoolId
}

impl PoolId {
    pub(crate) fn next() -> PoolId {
        static LAST: AtomicU64 = AtomicU64::new(0);
        PoolId(LAST.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl EntityId {
    /// Never assigned to a live entity.
    pub const NULL: EntityId = EntityId(0);

    #[inline]
    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

/// Maps Rust types to sequential ids, starting at 1. The first lookup of a type allocates its id
/// and every later lookup returns the same one.
///
/// # Note
/// Not synchronized. Each world owns its registries and is the only writer.
#[derive(Debug)]
pub struct TypeRegistry<Id> {
    last: u64,
    ids: TypeIdMap<(Id, &'static str)>,
}

impl<Id: RegistryId> Default for TypeRegistry<Id> {
    fn default() -> Self {
        Self {
            last: 0,
            ids: TypeIdMap::default(),
        }
    }
}

impl<Id: RegistryId> TypeRegistry<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the id of `T`, registering the type if it has never been seen.
    pub fn get_id<T: 'static>(&mut self) -> Id {
        let last = &mut self.last;
        self.ids
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                *last += 1;
                (Id::from_raw(*last), type_name::<T>())
            })
            .0
    }

    /// Gets the id of `T` without registering it.
    #[inline]
    pub fn lookup<T: 'static>(&self) -> Option<Id> {
        self.lookup_type_id(TypeId::of::<T>())
    }

    #[inline]
    pub fn lookup_type_id(&self, id: TypeId) -> Option<Id> {
        self.ids.get(&id).map(|(id, _)| *id)
    }

    /// Rust type name of a registered id.
    pub fn name_of(&self, id: Id) -> Option<&'static str> {
        self.ids
            .values()
            .find(|(registered, _)| *registered == id)
            .map(|(_, name)| *name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Hands out entity ids. Allocation is a single atomic increment, so one allocator can be shared
/// (behind an `Arc`) by every world of a process to keep ids unique across them.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    last: AtomicU64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn allocate(&self) -> EntityId {
        EntityId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Number of ids handed out so far.
    #[inline]
    pub fn allocated(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}
