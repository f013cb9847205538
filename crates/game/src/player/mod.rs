pub mod animation;
pub mod components;
mod death;
pub mod movement;
mod spawn;


use bevy::prelude::*;
use bevy_segment_loop::SegmentLoopSet;
pub use spawn::{spawn_player, start_position};

/// Runner systems, ordered before the segment loop reads the observer.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerSet;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, spawn::spawn_player)
      .configure_sets(Update, PlayerSet.before(SegmentLoopSet::Recycle))
      .add_systems(
        Update,
        (
          movement::sync_ground_from_physics,
          death::handle_train_hits,
          movement::handle_runner_input,
          movement::tick_roll,
          movement::apply_runner_physics,
          movement::apply_velocity_to_controller,
          animation::settle_animation,
          animation::log_animation_changes,
        )
          .chain()
          .in_set(PlayerSet),
      );
  }
}
