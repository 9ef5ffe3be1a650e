use std::any::TypeId;

use rustc_hash::FxHashMap;

/// Hash map keyed by Rust `TypeId`s. Only used at the edges where a Rust type is translated into
/// one of the world's sequential ids.
pub(crate) type TypeIdMap<V> = FxHashMap<TypeId, V>;
