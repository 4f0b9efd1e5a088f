//! # Entity Host
//!
//! The bridge pulls per-tick state from the host through this trait. It is
//! the only direction in which the engine calls into host code.

use std::collections::HashMap;

use astralis_shared::{EntitySnapshot, HostId, Vec3};

/// Host-side state source consulted once per step.
pub trait EntityHost {
    /// Current camera / player position. `None` while unavailable.
    fn viewpoint(&self) -> Option<Vec3>;

    /// Current state of `host_id`. `None` if the host cannot provide it.
    fn snapshot(&self, host_id: HostId) -> Option<EntitySnapshot>;
}

/// In-memory host: a viewpoint plus a snapshot per id.
///
/// Used by the soak driver, tests and benches; real hosts implement
/// [`EntityHost`] over their own world.
#[derive(Clone, Debug, Default)]
pub struct SnapshotHost {
    /// Viewpoint reported to the bridge.
    pub viewpoint: Option<Vec3>,
    /// Latest snapshot per entity.
    pub entities: HashMap<HostId, EntitySnapshot>,
}

impl SnapshotHost {
    /// Host with a viewpoint and no entities.
    #[must_use]
    pub fn with_viewpoint(viewpoint: Vec3) -> Self {
        Self {
            viewpoint: Some(viewpoint),
            entities: HashMap::new(),
        }
    }

    /// Inserts or replaces the snapshot of `host_id`.
    pub fn insert(&mut self, host_id: HostId, snapshot: EntitySnapshot) {
        self.entities.insert(host_id, snapshot);
    }

    /// Moves an existing entity. Returns `false` if unknown.
    pub fn move_to(&mut self, host_id: HostId, position: Vec3) -> bool {
        match self.entities.get_mut(&host_id) {
            Some(snapshot) => {
                snapshot.position = position;
                true
            }
            None => false,
        }
    }

    /// Drops `host_id`, as if it despawned.
    pub fn remove(&mut self, host_id: HostId) -> Option<EntitySnapshot> {
        self.entities.remove(&host_id)
    }
}

impl EntityHost for SnapshotHost {
    fn viewpoint(&self) -> Option<Vec3> {
        self.viewpoint
    }

    fn snapshot(&self, host_id: HostId) -> Option<EntitySnapshot> {
        self.entities.get(&host_id).copied()
    }
}
