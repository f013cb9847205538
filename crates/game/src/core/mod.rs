pub(crate) mod camera;
mod physics;

use bevy::prelude::*;
use bevy_segment_loop::SegmentLoopSet;
pub use physics::GravityConfig;

pub struct CorePlugin;

impl Plugin for CorePlugin {
  fn build(&self, app: &mut App) {
    app
      .add_plugins(physics::PhysicsPlugin)
      .insert_resource(ClearColor(Color::srgb(0.55, 0.75, 0.95)))
      .add_systems(Startup, (camera::setup_camera, setup_lighting))
      .add_systems(Update, camera::camera_follow.after(SegmentLoopSet::Sync));
  }
}

fn setup_lighting(mut commands: Commands) {
  commands.spawn((
    DirectionalLight {
      illuminance: 8_000.0,
      shadows_enabled: true,
      ..default()
    },
    Transform::from_xyz(20.0, 40.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
  ));
}
