//=========================================================================
// Pose Registry
//=========================================================================
//
// Named target poses built at startup and owned by the director.
//
// Architecture:
//   "overview" / "desk_close" / ... → HashMap → Pose
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::math::Pose;

//=== PoseRegistry ========================================================

/// Name → target pose lookup used by `MoveToNamed` commands.
#[derive(Debug, Default)]
pub struct PoseRegistry {
    poses: HashMap<String, Pose>,
}

impl PoseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `pose` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, pose: Pose) -> Option<Pose> {
        let name = name.into();
        let previous = self.poses.insert(name.clone(), pose);
        if previous.is_some() {
            warn!(target: "director", "Pose '{}' registered twice; replacing", name);
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Pose> {
        self.poses.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.poses.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{Quat, Vec3};

    #[test]
    fn lookup_by_name() {
        let mut registry = PoseRegistry::new();
        let desk = Pose::new(Vec3::new(0.0, 1.2, -0.5), Quat::IDENTITY);
        registry.register("desk", desk);

        assert_eq!(registry.get("desk"), Some(desk));
        assert_eq!(registry.get("door"), None);
    }

    #[test]
    fn register_replaces_duplicates() {
        let mut registry = PoseRegistry::new();
        registry.register("desk", Pose::IDENTITY);
        let moved = Pose::new(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);

        assert_eq!(registry.register("desk", moved), Some(Pose::IDENTITY));
        assert_eq!(registry.get("desk"), Some(moved));
        assert_eq!(registry.len(), 1);
    }
}
