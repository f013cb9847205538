//! Command for spawning segment tracks.

use std::sync::Arc;

use bevy::prelude::*;

use super::host::{SegmentBuilder, WorldHost};
use super::{LoopObserver, SegmentTrack};
use crate::config::LoopConfig;
use crate::error::{ConfigurationError, LoopError};
use crate::prototype::PrototypeRegistry;
use crate::segment_loop::SegmentLoop;

/// Command to spawn a [`SegmentTrack`] and clone its pooled segments.
///
/// The observer is the entity given to [`observed_by`](Self::observed_by),
/// or else the first entity carrying [`LoopObserver`]. The registry is
/// derived from the config unless one is supplied.
///
/// Startup failures do not panic: the track is still spawned, disabled, and
/// the error is logged.
///
/// # Example
/// ```ignore
/// fn setup(mut commands: Commands, config: Res<GameConfig>) {
///     commands.queue(SpawnSegmentTrack::new(config.track.clone(), RailBuilder::default()));
/// }
/// ```
pub struct SpawnSegmentTrack {
  config: LoopConfig,
  builder: Arc<dyn SegmentBuilder>,
  registry: Option<PrototypeRegistry>,
  observer: Option<Entity>,
}

impl SpawnSegmentTrack {
  pub fn new(config: LoopConfig, builder: impl SegmentBuilder) -> Self {
    Self {
      config,
      builder: Arc::new(builder),
      registry: None,
      observer: None,
    }
  }

  /// Uses `observer` instead of searching for a [`LoopObserver`].
  pub fn observed_by(mut self, observer: Entity) -> Self {
    self.observer = Some(observer);
    self
  }

  /// Uses an explicit prototype registry.
  pub fn with_registry(mut self, registry: PrototypeRegistry) -> Self {
    self.registry = Some(registry);
    self
  }
}

impl bevy::ecs::system::Command for SpawnSegmentTrack {
  fn apply(self, world: &mut World) {
    let axis = self.config.travel_axis();
    let track = world.spawn(Name::new("SegmentTrack")).id();

    let observer = self.observer.or_else(|| {
      world
        .query_filtered::<Entity, With<LoopObserver>>()
        .iter(world)
        .next()
    });

    let registry = match self.registry {
      Some(registry) => Ok(registry),
      None => PrototypeRegistry::from_config(&self.config),
    };

    let (segment_loop, registry) = match (registry, observer) {
      (Err(err), _) => (
        SegmentLoop::disabled(axis, err.into()),
        PrototypeRegistry::new(),
      ),
      (Ok(registry), None) => (
        SegmentLoop::disabled(
          axis,
          LoopError::from(ConfigurationError::MissingCollaborator("observer")),
        ),
        registry,
      ),
      (Ok(registry), Some(_)) => {
        let mut host = WorldHost::new(world, self.builder.as_ref(), track, axis);
        (SegmentLoop::start(&self.config, &registry, &mut host), registry)
      }
    };

    if let Some(pool) = segment_loop.pool() {
      info!(
        "Segment track {track} started: {} segments, furthest edge {}",
        pool.len(),
        pool.furthest_edge()
      );
    }

    world
      .entity_mut(track)
      .insert(SegmentTrack::new(segment_loop, registry, observer));
  }
}
