use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_segment_loop::{LoopObserver, TravelAxis};

use super::animation::PlayerAnimation;
use super::components::{
  CharacterVelocity, Grounded, Lane, Player, Rolling, Runner,
};
use crate::config::{ConfigLoaded, color};
use crate::input::{PlayerInput, player_input_actions};

/// World position `distance` along the track, `lateral` across it and
/// `height` above it.
pub fn start_position(axis: TravelAxis, distance: f32, lateral: f32, height: f32) -> Vec3 {
  axis.place(
    axis.lateral().with_component(Vec3::Y * height, lateral),
    distance,
  )
}

/// Spawn the runner in the middle lane near the start of the track.
pub fn spawn_player(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<StandardMaterial>>,
) {
  let player = &config.player;
  let runner = Runner {
    axis: config.track.travel_axis(),
    forward_speed: player.forward_speed,
    lane_distance: player.lane_distance,
    lane_offset: player.lane_offset,
    lane_switch_speed: player.lane_switch_speed,
    jump_height: player.jump_height,
    roll_duration: player.roll_duration,
  };
  let lane = Lane::default();
  let start = start_position(
    runner.axis,
    player.spawn_distance,
    runner.lane_position(lane),
    player.spawn_height,
  );

  // Rapier capsule_y uses half_height (cylinder part) and radius
  let half_height = player.collider_length / 2.0;

  info!("Spawning player at {:?}", start);
  commands.spawn((
    Player,
    LoopObserver,
    Name::new("Player"),
    Transform::from_translation(start),
    Visibility::default(),
    Mesh3d(meshes.add(Capsule3d::new(player.collider_radius, player.collider_length))),
    MeshMaterial3d(materials.add(color(player.color))),
    RigidBody::KinematicPositionBased,
    Collider::capsule_y(half_height, player.collider_radius),
    KinematicCharacterController {
      snap_to_ground: Some(CharacterLength::Absolute(player.snap_to_ground)),
      ..default()
    },
    (
      runner,
      lane,
      CharacterVelocity::default(),
      Grounded::default(),
      Rolling::default(),
      PlayerAnimation::default(),
    ),
    PlayerInput,
    player_input_actions(),
  ));
}

#[cfg(test)]
mod tests {
  use bevy_segment_loop::{Axis, Direction};

  use super::*;

  #[test]
  fn start_offsets_across_the_travel_axis() {
    let along_x = TravelAxis::new(Axis::X, Direction::Negative);
    assert_eq!(start_position(along_x, 5.0, 3.0, 2.0), Vec3::new(-5.0, 2.0, 3.0));

    let along_z = TravelAxis::new(Axis::Z, Direction::Positive);
    assert_eq!(start_position(along_z, 5.0, 3.0, 2.0), Vec3::new(3.0, 2.0, 5.0));
  }
}
