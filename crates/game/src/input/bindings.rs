use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_enhanced_input::condition::press::Press;

use super::actions::{Jump, LaneLeft, LaneRight, PlayerInput, Roll};

pub fn player_input_actions() -> impl Bundle {
  actions!(PlayerInput[
      (
          Action::<LaneLeft>::new(),
          Press::default(),
          bindings![KeyCode::ArrowLeft, KeyCode::KeyA],
      ),
      (
          Action::<LaneRight>::new(),
          Press::default(),
          bindings![KeyCode::ArrowRight, KeyCode::KeyD],
      ),
      (
          Action::<Jump>::new(),
          Press::default(),
          bindings![KeyCode::Space, KeyCode::ArrowUp, KeyCode::KeyW],
      ),
      (
          Action::<Roll>::new(),
          Press::default(),
          bindings![KeyCode::ControlLeft, KeyCode::ArrowDown, KeyCode::KeyS],
      ),
  ])
}
