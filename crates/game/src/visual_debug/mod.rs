use bevy::prelude::*;

use crate::player::components::{CharacterVelocity, Lane, Player, Runner};

/// Resource for frame-by-frame debug mode
#[derive(Resource, Default)]
pub struct FrameStepMode {
  pub enabled: bool,
  advance_requested: bool,
}

pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<FrameStepMode>()
      .add_systems(PreUpdate, frame_step_control)
      .add_systems(Update, draw_debug_vectors);
  }
}

/// Controls frame-by-frame stepping mode
/// F5: Toggle frame-step mode
/// Period: Advance one frame (when in frame-step mode)
fn frame_step_control(
  keyboard: Res<ButtonInput<KeyCode>>,
  mut frame_step: ResMut<FrameStepMode>,
  mut time: ResMut<Time<Virtual>>,
) {
  if keyboard.just_pressed(KeyCode::F5) {
    frame_step.enabled = !frame_step.enabled;
    if frame_step.enabled {
      time.pause();
      info!("Frame-step mode ENABLED (press Period to advance, F5 to disable)");
    } else {
      time.unpause();
      info!("Frame-step mode DISABLED");
    }
  }

  if frame_step.enabled {
    if keyboard.just_pressed(KeyCode::Period) {
      frame_step.advance_requested = true;
      time.unpause();
    } else if frame_step.advance_requested {
      frame_step.advance_requested = false;
      time.pause();
    }
  }
}

/// Draws velocity (yellow) and the target lane (green).
fn draw_debug_vectors(
  mut gizmos: Gizmos,
  players: Query<(&Transform, &CharacterVelocity, &Runner, &Lane), With<Player>>,
) {
  const VELOCITY_SCALE: f32 = 0.25;
  const LANE_MARKER_AHEAD: f32 = 6.0;

  for (transform, velocity, runner, lane) in &players {
    let position = transform.translation;

    if velocity.0.length_squared() > 0.01 {
      gizmos.line(
        position,
        position + velocity.0 * VELOCITY_SCALE,
        Color::srgb(1.0, 1.0, 0.0),
      );
    }

    let target = runner
      .axis
      .lateral()
      .with_component(position, runner.lane_position(*lane))
      + runner.axis.forward() * LANE_MARKER_AHEAD;
    gizmos.sphere(
      Isometry3d::from_translation(target),
      0.3,
      Color::srgb(0.0, 1.0, 0.0),
    );
  }
}
