pub mod actions;
mod bindings;

pub use actions::{Jump, LaneLeft, LaneRight, PlayerInput, Roll};
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
pub use bindings::player_input_actions;

pub struct InputPlugin;

impl Plugin for InputPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(EnhancedInputPlugin)
      .add_input_context::<PlayerInput>();
  }
}

/// Returns true while any `A` action of the context is fired or ongoing.
pub fn is_pressed<A: InputAction>(
  actions: &Actions<PlayerInput>,
  states: &Query<&ActionState, With<Action<A>>>,
) -> bool {
  actions.iter().any(|entity| {
    states
      .get(entity)
      .is_ok_and(|state| matches!(state, ActionState::Fired | ActionState::Ongoing))
  })
}
