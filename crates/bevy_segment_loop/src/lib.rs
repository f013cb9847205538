//! Segment Loop - endless-runner track recycling for Bevy.
//!
//! A bounded pool of finite segments is leapfrogged ahead of a moving
//! observer so that the world appears endless. The pool, controller and
//! ground synthesis are plain Rust and can be driven without an ECS (see
//! [`headless`]); the [`world`] module wires them into Bevy.

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod coords;
pub mod error;
pub mod ground;
pub mod headless;
pub mod physics;
pub mod pool;
pub mod prototype;
pub mod schedule;
pub mod segment_loop;
#[cfg(feature = "visual-debug")]
pub mod visual_debug;
pub mod world;

pub use config::{LoopConfig, SpecialSegmentConfig};
pub use controller::{ControllerPhase, RecyclingController, TickReport};
pub use coords::{Axis, Direction, TravelAxis};
pub use error::{AllocationFailure, ConfigurationError, LoopError, MalformedSegment};
pub use ground::{GroundSpan, GroundSupport, GroundSynthesizer};
pub use pool::{
  ClonedSegment, PoolState, SegmentInstance, SegmentPool, SegmentSpawner, SlotIndex,
  SpecialInstance,
};
pub use prototype::{PrototypeRegistry, SegmentKind, SegmentSpec};
pub use schedule::SegmentLoopSet;
pub use segment_loop::SegmentLoop;
pub use world::{
  GroundPlane, LoopObserver, LoopSegment, PlacedSegment, SegmentBuilder, SegmentTrack,
  SpawnSegmentTrack, SpecialSegment,
};

/// Plugin for looping segment tracks.
///
/// This plugin provides:
/// - Per-frame recycling of every [`SegmentTrack`] around its observer
/// - Transform and visibility write-back for pooled and special segments
/// - Track gizmos (with the `visual-debug` feature, when gizmos are available)
///
/// Spawn tracks with [`SpawnSegmentTrack`] and mark the runner with
/// [`LoopObserver`].
#[derive(Default)]
pub struct SegmentLoopPlugin;

impl Plugin for SegmentLoopPlugin {
  fn build(&self, app: &mut App) {
    app.add_plugins(world::plugin::SegmentTrackPlugin);

    #[cfg(feature = "visual-debug")]
    if app.is_plugin_added::<bevy::gizmos::GizmoPlugin>() {
      app.add_plugins(visual_debug::VisualDebugPlugin);
    }
  }
}
