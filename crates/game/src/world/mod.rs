//! Endless rail track and the trains running on it.

pub mod segments;
pub mod trains;

use bevy::prelude::*;
use bevy_segment_loop::{SegmentLoopPlugin, SegmentLoopSet, SpawnSegmentTrack};

use crate::config::ConfigLoaded;
use crate::player::{PlayerSet, spawn_player};
use segments::RailSegmentBuilder;
use trains::TrainHit;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(SegmentLoopPlugin)
      .add_message::<TrainHit>()
      .add_systems(
        Startup,
        (spawn_track.after(spawn_player), trains::init_spawner),
      )
      .add_systems(
        Update,
        (
          trains::detect_train_hits.before(PlayerSet),
          (
            trains::spawn_trains,
            trains::move_trains,
            trains::despawn_passed_trains,
          )
            .chain()
            .after(SegmentLoopSet::Sync),
        ),
      );
  }
}

/// Queues the looping track once the runner exists, so the runner becomes
/// its observer.
fn spawn_track(mut commands: Commands, config: Res<ConfigLoaded>) {
  let builder = RailSegmentBuilder::from_config(&config);
  commands.queue(SpawnSegmentTrack::new(config.track.clone(), builder));
}
