use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_rapier3d::prelude::*;

use super::animation::PlayerAnimation;
use super::components::{
  CharacterVelocity, Dead, Grounded, Lane, Player, Rolling, Runner, RunnerIntent,
};
use crate::core::GravityConfig;
use crate::input::{Jump, LaneLeft, LaneRight, PlayerInput, Roll, is_pressed};

/// Vertical velocity held while grounded so the controller keeps contact.
pub const GROUNDED_VELOCITY: f32 = -1.0;

/// Initial vertical velocity that peaks at `jump_height` under `gravity`.
pub fn jump_velocity(jump_height: f32, gravity: f32) -> f32 {
  (jump_height * -2.0 * gravity).max(0.0).sqrt()
}

/// Lateral velocity steering `current` towards `desired`.
pub fn lane_velocity(desired: f32, current: f32, switch_speed: f32) -> f32 {
  (desired - current) * switch_speed
}

/// Next vertical velocity. While grounded a falling velocity is pinned to
/// [`GROUNDED_VELOCITY`]; an upward one (a fresh jump) is kept.
pub fn vertical_velocity(current: f32, grounded: bool, gravity: f32, dt: f32) -> f32 {
  if grounded {
    if current < 0.0 { GROUNDED_VELOCITY } else { current }
  } else {
    current + gravity * dt
  }
}

/// Reads grounded state written by the controller on the last physics step.
pub fn sync_ground_from_physics(
  mut players: Query<(&mut Grounded, Option<&KinematicCharacterControllerOutput>), With<Player>>,
) {
  for (mut grounded, output) in &mut players {
    let physics_grounded = output.is_some_and(|o| o.grounded);
    if grounded.0 != physics_grounded {
      grounded.0 = physics_grounded;
    }
  }
}

/// Turns fired actions into lane changes, jumps and rolls.
#[allow(clippy::type_complexity)]
pub fn handle_runner_input(
  mut players: Query<
    (
      &Actions<PlayerInput>,
      &Runner,
      &mut Lane,
      &mut Grounded,
      &mut Rolling,
      &mut CharacterVelocity,
      &mut PlayerAnimation,
    ),
    (With<Player>, Without<Dead>),
  >,
  lane_left: Query<&ActionState, With<Action<LaneLeft>>>,
  lane_right: Query<&ActionState, With<Action<LaneRight>>>,
  jump: Query<&ActionState, With<Action<Jump>>>,
  roll: Query<&ActionState, With<Action<Roll>>>,
  gravity: Res<GravityConfig>,
) {
  for (actions, runner, mut lane, mut grounded, mut rolling, mut velocity, mut animation) in
    &mut players
  {
    let intent = RunnerIntent::new(
      is_pressed(actions, &lane_left),
      is_pressed(actions, &lane_right),
      is_pressed(actions, &jump),
      is_pressed(actions, &roll),
    );

    if intent.lane_delta != 0 && lane.shift(intent.lane_delta) {
      trace!("Lane -> {}", lane.0);
    }

    if intent.jump && grounded.0 {
      velocity.0.y = jump_velocity(runner.jump_height, gravity.value);
      grounded.0 = false;
      animation.transition(PlayerAnimation::Jump);
    }

    if intent.roll && grounded.0 && !rolling.is_active() {
      rolling.0 = Some(Timer::from_seconds(runner.roll_duration, TimerMode::Once));
      animation.transition(PlayerAnimation::Roll);
    }
  }
}

pub fn tick_roll(mut players: Query<&mut Rolling, With<Player>>, time: Res<Time>) {
  for mut rolling in &mut players {
    let finished = rolling
      .0
      .as_mut()
      .is_some_and(|timer| timer.tick(time.delta()).is_finished());
    if finished {
      rolling.0 = None;
    }
  }
}

/// Forward run, lane steering and gravity.
pub fn apply_runner_physics(
  mut players: Query<
    (
      &Transform,
      &Runner,
      &Lane,
      &Grounded,
      &mut CharacterVelocity,
      Has<Dead>,
    ),
    With<Player>,
  >,
  gravity: Res<GravityConfig>,
  time: Res<Time>,
) {
  for (transform, runner, lane, grounded, mut velocity, dead) in &mut players {
    let forward_speed = if dead { 0.0 } else { runner.forward_speed };

    let lateral_axis = runner.axis.lateral();
    let lateral = if dead {
      0.0
    } else {
      lane_velocity(
        runner.lane_position(*lane),
        lateral_axis.component(transform.translation),
        runner.lane_switch_speed,
      )
    };

    let vertical = vertical_velocity(velocity.0.y, grounded.0, gravity.value, time.delta_secs());

    velocity.0 =
      runner.axis.forward() * forward_speed + lateral_axis.unit() * lateral + Vec3::Y * vertical;
  }
}

pub fn apply_velocity_to_controller(
  mut players: Query<(&CharacterVelocity, &mut KinematicCharacterController), With<Player>>,
  time: Res<Time>,
) {
  for (velocity, mut controller) in &mut players {
    controller.translation = Some(velocity.0 * time.delta_secs());
  }
}
