//! Oncoming trains. They spawn ahead of the runner in a random lane, drive
//! towards it and are removed once they fall behind.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_segment_loop::TravelAxis;
use rand::Rng;

use super::segments::track_size;
use crate::config::{ConfigLoaded, TrainConfig, color};
use crate::player::components::{Dead, Lane, Player, Runner};

/// A train touched the runner.
#[derive(Message, Debug, Clone, Copy)]
pub struct TrainHit {
  pub train: Entity,
  pub player: Entity,
}

#[derive(Component, Debug)]
pub struct Train {
  /// Speed towards the runner, against the direction of travel.
  pub speed: f32,
}

#[derive(Resource)]
pub struct TrainSpawner {
  timer: Timer,
}

impl TrainSpawner {
  pub fn new(interval: f32) -> Self {
    Self {
      timer: Timer::from_seconds(interval.max(0.1), TimerMode::Repeating),
    }
  }

  pub fn set_interval(&mut self, interval: f32) {
    self
      .timer
      .set_duration(std::time::Duration::from_secs_f32(interval.max(0.1)));
  }
}

/// Oriented position at which a train appears ahead of `observer`.
pub fn spawn_position(observer: f32, spawn_distance: f32) -> f32 {
  observer + spawn_distance
}

/// A train is removed once it is more than `despawn_distance` behind the
/// runner.
pub fn is_behind(train: f32, observer: f32, despawn_distance: f32) -> bool {
  train < observer - despawn_distance
}

pub(super) fn init_spawner(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.insert_resource(TrainSpawner::new(config.trains.spawn_interval));
}

pub(super) fn spawn_trains(
  mut commands: Commands,
  mut spawner: ResMut<TrainSpawner>,
  time: Res<Time>,
  config: Res<ConfigLoaded>,
  players: Query<(&Transform, &Runner), (With<Player>, Without<Dead>)>,
  mut meshes: ResMut<Assets<Mesh>>,
  mut materials: ResMut<Assets<StandardMaterial>>,
) {
  if !spawner.timer.tick(time.delta()).just_finished() {
    return;
  }
  let Ok((transform, runner)) = players.single() else {
    return;
  };

  let trains = &config.trains;
  let lane = Lane(rand::rng().random_range(Lane::MIN..=Lane::MAX));
  let observer = runner.axis.project(transform.translation);
  let oriented = spawn_position(observer, trains.spawn_distance);
  let lateral = runner
    .axis
    .lateral()
    .with_component(Vec3::Y * trains.height / 2.0, runner.lane_position(lane));
  let position = runner.axis.place(lateral, oriented);

  let size = train_size(runner.axis, trains);
  debug!("Spawning train in lane {} at {:?}", lane.0, position);
  commands.spawn((
    Train {
      speed: trains.speed,
    },
    Name::new("Train"),
    Transform::from_translation(position),
    Visibility::default(),
    Mesh3d(meshes.add(Cuboid::from_size(size))),
    MeshMaterial3d(materials.add(color(trains.color))),
    RigidBody::KinematicPositionBased,
    Collider::cuboid(size.x / 2.0, size.y / 2.0, size.z / 2.0),
    Sensor,
    ActiveEvents::COLLISION_EVENTS,
    ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_KINEMATIC,
  ));
}

/// World-space extents of a train whose length runs along the track.
fn train_size(axis: TravelAxis, trains: &TrainConfig) -> Vec3 {
  track_size(axis, trains.length, trains.width, trains.height)
}

pub(super) fn move_trains(
  mut trains: Query<(&mut Transform, &Train)>,
  players: Query<&Runner, With<Player>>,
  time: Res<Time>,
) {
  let Ok(runner) = players.single() else {
    return;
  };
  let step = -runner.axis.forward() * time.delta_secs();
  for (mut transform, train) in &mut trains {
    transform.translation += step * train.speed;
  }
}

pub(super) fn despawn_passed_trains(
  mut commands: Commands,
  trains: Query<(Entity, &Transform), With<Train>>,
  players: Query<(&Transform, &Runner), With<Player>>,
  config: Res<ConfigLoaded>,
) {
  let Ok((player, runner)) = players.single() else {
    return;
  };
  let observer = runner.axis.project(player.translation);
  for (entity, transform) in &trains {
    let oriented = runner.axis.project(transform.translation);
    if is_behind(oriented, observer, config.trains.despawn_distance) {
      trace!("Despawning train {entity}");
      commands.entity(entity).despawn();
    }
  }
}

pub(super) fn detect_train_hits(
  mut collisions: MessageReader<CollisionEvent>,
  mut hits: MessageWriter<TrainHit>,
  trains: Query<(), With<Train>>,
  players: Query<(), With<Player>>,
) {
  for event in collisions.read() {
    let CollisionEvent::Started(a, b, _) = *event else {
      continue;
    };
    let pair = if trains.contains(a) && players.contains(b) {
      Some((a, b))
    } else if trains.contains(b) && players.contains(a) {
      Some((b, a))
    } else {
      None
    };
    if let Some((train, player)) = pair {
      hits.write(TrainHit { train, player });
    }
  }
}
