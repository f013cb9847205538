mod plugin;

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
use bevy_segment_loop::LoopConfig;
pub use plugin::ConfigPlugin;
use serde::{Deserialize, Deserializer, de};

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub track: LoopConfig,
  pub scenery: SceneryConfig,
  pub trains: TrainConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CameraConfig {
  /// Distance behind the player along the track.
  pub follow_distance: f32,
  pub follow_height: f32,
  pub smooth_time: f32,
  /// Height above the player the camera looks at.
  pub look_height: f32,
  pub fov_degrees: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PhysicsConfig {
  /// Signed vertical acceleration (negative pulls down).
  pub gravity: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerConfig {
  /// Oriented distance from the track start at which the runner spawns.
  pub spawn_distance: f32,
  pub spawn_height: f32,
  pub collider_radius: f32,
  pub collider_length: f32,
  pub forward_speed: f32,
  pub lane_distance: f32,
  pub lane_offset: f32,
  pub lane_switch_speed: f32,
  pub jump_height: f32,
  pub roll_duration: f32,
  pub snap_to_ground: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
}

/// Procedural look of track segments.
#[derive(Deserialize, Debug, Clone)]
pub struct SceneryConfig {
  pub bed_width: f32,
  pub rail_width: f32,
  pub block_count: u32,
  pub block_height_min: f32,
  pub block_height_max: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub bed_color: [f32; 3],
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub rail_color: [f32; 3],
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub block_color: [f32; 3],
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub station_color: [f32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct TrainConfig {
  pub speed: f32,
  pub spawn_interval: f32,
  /// How far ahead of the player new trains appear.
  pub spawn_distance: f32,
  /// How far behind the player trains are removed.
  pub despawn_distance: f32,
  pub length: f32,
  pub width: f32,
  pub height: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  parse_hex_color(&s).map_err(de::Error::custom)
}

fn parse_hex_color(s: &str) -> Result<[f32; 3], String> {
  let s = s.trim_start_matches('#');
  if s.len() != 6 {
    return Err(format!("hex color '{s}' must be 6 characters"));
  }
  let channel = |range: std::ops::Range<usize>| {
    u8::from_str_radix(&s[range], 16)
      .map(|v| v as f32 / 255.0)
      .map_err(|e| e.to_string())
  };
  Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

pub fn color(rgb: [f32; 3]) -> Color {
  Color::srgb(rgb[0], rgb[1], rgb[2])
}

#[derive(Resource)]
pub struct ConfigHandle(pub Handle<GameConfig>);

#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub track: LoopConfig,
  pub scenery: SceneryConfig,
  pub trains: TrainConfig,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      window: config.window,
      camera: config.camera,
      physics: config.physics,
      player: config.player,
      track: config.track,
      scenery: config.scenery,
      trains: config.trains,
    }
  }
}
