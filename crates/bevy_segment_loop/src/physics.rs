//! Physics backing for synthesized ground.
//!
//! With the `rapier3d` feature every ground plane carries a fixed cuboid
//! collider. Without it the ground is a plain [`GroundPlane`] marker that
//! games can back with their own physics.
//!
//! [`GroundPlane`]: crate::world::GroundPlane

use bevy::prelude::*;
#[cfg(feature = "rapier3d")]
use bevy_rapier3d::prelude::{Collider, RigidBody};

/// Physics components for a ground plane with the given half extents.
#[cfg(feature = "rapier3d")]
pub fn ground_physics(half_extents: Vec3) -> impl Bundle {
  (
    RigidBody::Fixed,
    Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
  )
}

#[cfg(not(feature = "rapier3d"))]
pub fn ground_physics(_half_extents: Vec3) -> impl Bundle {}
