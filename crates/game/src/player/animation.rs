//! Runner animation state.
//!
//! Only the state is tracked; there are no animation assets to play.

use bevy::prelude::*;

use super::components::{Dead, Grounded, Player, Rolling};

#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAnimation {
  #[default]
  Run,
  Jump,
  Roll,
  Die,
}

impl PlayerAnimation {
  /// Switches to `next` unless already dead. Returns whether it changed.
  pub fn transition(&mut self, next: PlayerAnimation) -> bool {
    if *self == PlayerAnimation::Die || *self == next {
      return false;
    }
    *self = next;
    true
  }
}

/// Falls back to `Run` once a jump lands or a roll ends.
pub fn settle_animation(
  mut players: Query<(&mut PlayerAnimation, &Grounded, &Rolling), (With<Player>, Without<Dead>)>,
) {
  for (mut animation, grounded, rolling) in &mut players {
    let finished = match *animation {
      PlayerAnimation::Jump => grounded.0,
      PlayerAnimation::Roll => !rolling.is_active(),
      PlayerAnimation::Run | PlayerAnimation::Die => false,
    };
    if finished {
      animation.transition(PlayerAnimation::Run);
    }
  }
}

pub fn log_animation_changes(
  players: Query<&PlayerAnimation, (With<Player>, Changed<PlayerAnimation>)>,
) {
  for animation in &players {
    debug!("Player animation: {:?}", animation);
  }
}
