//! # Deferred Unregistration
//!
//! Host callbacks fired during a step (death events, despawns) cannot touch
//! the slot table while the step is iterating it. They push the entity's
//! ECS reference here instead; the bridge drains the queue after the step's
//! iteration completes.
//!
//! Entries are validated by generation at drain time, so an entity queued
//! twice, or queued and then unregistered directly, is released once.

use astralis_core::EntityId;
use crossbeam_channel::Sender;

use super::capability::BridgeCapability;

/// Thread-safe handle for queuing unregistrations.
#[derive(Clone, Debug)]
pub struct UnregisterQueue {
    sender: Sender<EntityId>,
}

impl UnregisterQueue {
    pub(crate) fn new(sender: Sender<EntityId>) -> Self {
        Self { sender }
    }

    /// Queues `entity` for release at the end of the current (or next) step.
    ///
    /// Returns `false` for the null entity or once the bridge is dropped.
    pub fn push(&self, entity: EntityId) -> bool {
        if entity.is_null() {
            return false;
        }
        self.sender.send(entity).is_ok()
    }

    /// Queues the entity behind `link` and resets the link right away.
    ///
    /// Returns `false` if the link was not bridged.
    pub fn push_link(&self, link: &mut impl BridgeCapability) -> bool {
        if !link.is_bridged() {
            return false;
        }
        let entity = link.ecs_entity();
        link.reset_link();
        self.push(entity)
    }

    /// Entries waiting for the next drain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::HostLink;
    use astralis_shared::HostId;

    #[test]
    fn test_push_link_resets_and_queues() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let queue = UnregisterQueue::new(tx);

        let mut link = HostLink::new(HostId(5));
        assert!(!queue.push_link(&mut link));

        link.slot = 2;
        link.ecs_entity = EntityId::new(2, 7);
        assert!(queue.push_link(&mut link));
        assert!(!link.is_bridged());
        assert_eq!(queue.len(), 1);
        assert_eq!(rx.try_recv().unwrap(), EntityId::new(2, 7));
    }

    #[test]
    fn test_null_and_disconnected() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let queue = UnregisterQueue::new(tx);
        assert!(!queue.push(EntityId::NULL));

        drop(rx);
        assert!(!queue.push(EntityId::new(0, 0)));
    }
}
