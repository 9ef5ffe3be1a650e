use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::identity::EntityId;

/// Used to request structural changes to a world without mutating it.
///
/// Requests are queued and only take effect when the world applies them, which `World::update`
/// does after every update system has run. Until then queries keep returning the entities queued
/// for destruction, so a system never observes a half destroyed entity.
///
/// `Commands` is cheap to clone. A system may keep its own copy.
#[derive(Clone)]
pub struct Commands {
    sender: Sender<Command>,
}

pub(crate) enum Command {
    Destroy(EntityId),
}

/// Receiving end of the command buffer, owned by the world.
pub(crate) struct CommandQueue {
    commands: Commands,
    receiver: Receiver<Command>,
}

impl Commands {
    /// Requests that an entity be destroyed.
    ///
    /// # Note
    /// Destroying an entity that no longer exists when the queue is applied is silently skipped.
    #[inline]
    pub fn destroy(&self, entity: EntityId) {
        // The world owns the receiver, so sending only fails once the world is gone
        let _ = self.sender.send(Command::Destroy(entity));
    }

    /// Requests that several entities be destroyed.
    #[inline]
    pub fn destroy_many(&self, entities: &[EntityId]) {
        for entity in entities {
            self.destroy(*entity);
        }
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            commands: Commands { sender },
            receiver,
        }
    }
}

impl CommandQueue {
    #[inline]
    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    #[inline]
    pub fn next(&self) -> Option<Command> {
        self.receiver.try_recv().ok()
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Drops every pending command.
    pub fn clear(&self) {
        while self.next().is_some() {}
    }
}
