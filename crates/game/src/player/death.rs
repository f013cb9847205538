use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::animation::PlayerAnimation;
use super::components::{Dead, Player, Rolling};
use crate::world::trains::TrainHit;

/// Kills the runner on the first train hit.
pub fn handle_train_hits(
  mut commands: Commands,
  mut hits: MessageReader<TrainHit>,
  mut players: Query<(&mut PlayerAnimation, &mut Rolling), (With<Player>, Without<Dead>)>,
) {
  for hit in hits.read() {
    let Ok((mut animation, mut rolling)) = players.get_mut(hit.player) else {
      continue;
    };
    info!("Player hit by train {}", hit.train);
    rolling.0 = None;
    animation.transition(PlayerAnimation::Die);
    commands.entity(hit.player).insert(Dead);
  }
}
