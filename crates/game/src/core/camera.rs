use bevy::prelude::*;
use bevy_segment_loop::TravelAxis;

use crate::config::{CameraConfig, ConfigLoaded};
use crate::player::components::{Player, Runner};
use crate::player::start_position;

/// Marker component for the game camera
#[derive(Component)]
pub struct GameCamera;

/// Critically damped follow behind and above the player.
#[derive(Component, Debug, Clone)]
pub struct FollowCamera {
  pub distance: f32,
  pub height: f32,
  pub smooth_time: f32,
  pub look_height: f32,
  /// Smooth-damp state carried between frames.
  pub velocity: Vec3,
}

impl FollowCamera {
  pub fn from_config(config: &CameraConfig) -> Self {
    Self {
      distance: config.follow_distance,
      height: config.follow_height,
      smooth_time: config.smooth_time,
      look_height: config.look_height,
      velocity: Vec3::ZERO,
    }
  }

  pub fn apply_config(&mut self, config: &CameraConfig) {
    self.distance = config.follow_distance;
    self.height = config.follow_height;
    self.smooth_time = config.smooth_time;
    self.look_height = config.look_height;
  }

  /// Where the camera wants to be for a target at `target`.
  pub fn desired_position(&self, target: Vec3, axis: TravelAxis) -> Vec3 {
    target - axis.forward() * self.distance + Vec3::Y * self.height
  }

  pub fn look_target(&self, target: Vec3) -> Vec3 {
    target + Vec3::Y * self.look_height
  }
}

/// Moves `current` towards `target` like a critically damped spring.
///
/// `velocity` is read and updated. Never overshoots the target.
pub fn smooth_damp(
  current: Vec3,
  target: Vec3,
  velocity: &mut Vec3,
  smooth_time: f32,
  dt: f32,
) -> Vec3 {
  if dt <= 0.0 {
    return current;
  }
  let smooth_time = smooth_time.max(1e-4);
  let omega = 2.0 / smooth_time;
  let x = omega * dt;
  let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

  let change = current - target;
  let temp = (*velocity + omega * change) * dt;
  *velocity = (*velocity - omega * temp) * decay;
  let mut output = target + (change + temp) * decay;

  // Clamp per axis when the step crossed the target.
  for i in 0..3 {
    if (target[i] - current[i]) * (output[i] - target[i]) > 0.0 {
      output[i] = target[i];
      velocity[i] = 0.0;
    }
  }
  output
}

pub fn setup_camera(mut commands: Commands, config: Res<ConfigLoaded>) {
  let follow = FollowCamera::from_config(&config.camera);
  let axis = config.track.travel_axis();
  let start = start_position(
    axis,
    config.player.spawn_distance,
    config.player.lane_offset,
    config.player.spawn_height,
  );
  let position = follow.desired_position(start, axis);

  commands.spawn((
    GameCamera,
    Camera3d::default(),
    Projection::Perspective(PerspectiveProjection {
      fov: config.camera.fov_degrees.to_radians(),
      ..default()
    }),
    Transform::from_translation(position).looking_at(follow.look_target(start), Vec3::Y),
    follow,
  ));
}

/// Camera follow - smooth-damps towards the player's follow point, then
/// looks slightly above the player.
pub fn camera_follow(
  player_query: Query<(&Transform, &Runner), (With<Player>, Without<FollowCamera>)>,
  mut camera_query: Query<(&mut Transform, &mut FollowCamera)>,
  time: Res<Time>,
) {
  let Ok((player, runner)) = player_query.single() else {
    return;
  };
  let Ok((mut camera_transform, mut follow)) = camera_query.single_mut() else {
    return;
  };

  let target = player.translation;
  let desired = follow.desired_position(target, runner.axis);
  let smooth_time = follow.smooth_time;
  let position = smooth_damp(
    camera_transform.translation,
    desired,
    &mut follow.velocity,
    smooth_time,
    time.delta_secs(),
  );
  camera_transform.translation = position;
  camera_transform.look_at(follow.look_target(target), Vec3::Y);
}

#[cfg(test)]
mod tests {
  use bevy_segment_loop::{Axis, Direction};

  use super::*;

  #[test]
  fn smooth_damp_converges_without_overshoot() {
    let target = Vec3::new(10.0, 5.0, -3.0);
    let mut current = Vec3::ZERO;
    let mut velocity = Vec3::ZERO;
    let mut previous_distance = current.distance(target);

    for _ in 0..120 {
      current = smooth_damp(current, target, &mut velocity, 0.15, 1.0 / 60.0);
      let distance = current.distance(target);
      assert!(distance <= previous_distance + 1e-5);
      assert!(current.x <= target.x && current.y <= target.y && current.z >= target.z);
      previous_distance = distance;
    }
    assert!(previous_distance < 0.01, "still {previous_distance} away");
  }

  #[test]
  fn smooth_damp_ignores_zero_delta() {
    let mut velocity = Vec3::ONE;
    let current = Vec3::new(1.0, 2.0, 3.0);
    assert_eq!(
      smooth_damp(current, Vec3::ZERO, &mut velocity, 0.15, 0.0),
      current
    );
    assert_eq!(velocity, Vec3::ONE);
  }

  #[test]
  fn camera_sits_behind_the_direction_of_travel() {
    let follow = FollowCamera {
      distance: 10.0,
      height: 6.0,
      smooth_time: 0.15,
      look_height: 1.5,
      velocity: Vec3::ZERO,
    };
    let axis = TravelAxis::new(Axis::X, Direction::Negative);

    assert_eq!(
      follow.desired_position(Vec3::new(-50.0, 1.0, 10.0), axis),
      Vec3::new(-40.0, 7.0, 10.0)
    );
    assert_eq!(
      follow.look_target(Vec3::new(-50.0, 1.0, 10.0)),
      Vec3::new(-50.0, 2.5, 10.0)
    );
  }
}
