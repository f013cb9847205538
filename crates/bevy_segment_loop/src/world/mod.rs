//! ECS integration: segment tracks as entities.
//!
//! A [`SegmentTrack`] entity owns one [`SegmentLoop`] whose instance and
//! ground handles are entities. Pooled segments are tagged with
//! [`LoopSegment`], the landmark with [`SpecialSegment`], and synthesized
//! ground is a child entity carrying [`GroundPlane`].
//!
//! Sub-modules:
//! - [`bundle`] spawns tracks through a command
//! - [`host`] adapts `World` and `Commands` to the loop's collaborator traits
//! - [`systems`] ticks tracks and writes segment placement back

mod bundle;
mod host;
pub mod plugin;
pub(crate) mod systems;

use bevy::prelude::*;
pub use bundle::SpawnSegmentTrack;
pub use host::{CommandsGround, SegmentBuilder, WorldHost};

use crate::controller::TickReport;
use crate::coords::TravelAxis;
use crate::pool::SlotIndex;
use crate::prototype::{PrototypeRegistry, SegmentKind};
use crate::segment_loop::SegmentLoop;

/// Marks the entity whose position drives segment recycling.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct LoopObserver;

/// A pooled segment instance owned by `track`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSegment {
  pub track: Entity,
  pub slot: SlotIndex,
}

/// The landmark instance of `track`. Hidden until the first recycle.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialSegment {
  pub track: Entity,
}

/// Planar ground under a segment, parented to it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(Transform, Visibility)]
pub struct GroundPlane {
  /// Half extents in world axes.
  pub half_extents: Vec3,
}

/// An already-placed segment that a track may adopt as its first instance.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlacedSegment {
  pub kind: SegmentKind,
  pub length: f32,
}

/// One looping track.
#[derive(Component)]
#[require(Transform, Visibility)]
pub struct SegmentTrack {
  segment_loop: SegmentLoop<Entity, Entity>,
  registry: PrototypeRegistry,
  observer: Option<Entity>,
  /// Recycles performed by the most recent tick.
  last_report: TickReport,
}

impl SegmentTrack {
  pub(crate) fn new(
    segment_loop: SegmentLoop<Entity, Entity>,
    registry: PrototypeRegistry,
    observer: Option<Entity>,
  ) -> Self {
    Self {
      segment_loop,
      registry,
      observer,
      last_report: TickReport::default(),
    }
  }

  pub fn segment_loop(&self) -> &SegmentLoop<Entity, Entity> {
    &self.segment_loop
  }

  pub fn registry(&self) -> &PrototypeRegistry {
    &self.registry
  }

  pub fn observer(&self) -> Option<Entity> {
    self.observer
  }

  pub fn axis(&self) -> TravelAxis {
    self.segment_loop.axis()
  }

  pub fn is_enabled(&self) -> bool {
    self.segment_loop.is_enabled()
  }

  /// Leading edge of the track, `None` when disabled.
  pub fn furthest_edge(&self) -> Option<f32> {
    self.segment_loop.furthest_edge()
  }

  pub fn last_report(&self) -> &TickReport {
    &self.last_report
  }

  /// Oriented anchor of the instance in `slot`.
  pub fn anchor_of(&self, slot: SlotIndex) -> Option<f32> {
    self
      .segment_loop
      .pool()
      .and_then(|pool| pool.slot(slot))
      .map(|s| s.anchor())
  }
}
