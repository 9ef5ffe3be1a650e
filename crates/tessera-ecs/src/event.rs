use std::any::{Any, TypeId};

pub use tessera_ecs_derive::Event;

use crate::id_map::TypeIdMap;

/// Data passed between systems without going through the component store.
pub trait Event: Send + Sync + 'static {
    /// Name of the event, used for debugging purposes.
    const DEBUG_NAME: &'static str;
}

/// Single slot mailbox. Setting an event overwrites the one already waiting.
#[derive(Debug)]
pub struct EventSlot<E> {
    data: Option<E>,
}

/// Read half of an event slot.
pub struct EventReader<'a, E> {
    slot: Option<&'a EventSlot<E>>,
}

/// Write half of an event slot.
pub struct EventWriter<'a, E> {
    slot: &'a mut EventSlot<E>,
}

/// One mailbox per event type, created on first write.
#[derive(Default)]
pub(crate) struct Events {
    slots: TypeIdMap<Box<dyn Any + Send + Sync>>,
}

impl<E> Default for EventSlot<E> {
    fn default() -> Self {
        Self { data: None }
    }
}

impl<E> EventSlot<E> {
    #[inline]
    pub fn has(&self) -> bool {
        self.data.is_some()
    }

    #[inline]
    pub fn get(&self) -> Option<&E> {
        self.data.as_ref()
    }

    #[inline]
    pub fn set(&mut self, event: E) {
        self.data = Some(event);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data = None;
    }

    #[inline]
    pub fn take(&mut self) -> Option<E> {
        self.data.take()
    }
}

impl<'a, E> EventReader<'a, E> {
    #[inline]
    pub(crate) fn new(slot: Option<&'a EventSlot<E>>) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn has(&self) -> bool {
        self.slot.map_or(false, EventSlot::has)
    }

    #[inline]
    pub fn get(&self) -> Option<&'a E> {
        self.slot?.get()
    }
}

impl<'a, E> EventWriter<'a, E> {
    #[inline]
    pub(crate) fn new(slot: &'a mut EventSlot<E>) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn send(&mut self, event: E) {
        self.slot.set(event);
    }
}

impl Events {
    pub fn slot<E: Event>(&self) -> Option<&EventSlot<E>> {
        self.slots.get(&TypeId::of::<E>())?.downcast_ref()
    }

    pub fn slot_mut<E: Event>(&mut self) -> &mut EventSlot<E> {
        self.slots
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(EventSlot::<E>::default()))
            .downcast_mut()
            .expect("event slot holds the wrong type")
    }

    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
