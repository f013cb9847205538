mod config;
mod core;
mod hud;
mod input;
mod player;
mod visual_debug;
mod world;

use bevy::{
  prelude::*,
  window::{PresentMode, WindowResolution},
};

fn main() {
  // WASM: set up panic hook for better error messages
  #[cfg(target_family = "wasm")]
  console_error_panic_hook::set_once();

  // WASM: embed config at compile time (no filesystem access)
  #[cfg(target_family = "wasm")]
  let config_str = include_str!("../assets/config/game.config.toml");
  #[cfg(not(target_family = "wasm"))]
  let config_str =
    std::fs::read_to_string("assets/config/game.config.toml").expect("Failed to read config file");

  let config: config::GameConfig = toml::from_str(&config_str).expect("Failed to parse config");

  let mut app = App::new();

  app.add_plugins(DefaultPlugins.set(WindowPlugin {
    primary_window: Some(Window {
      resolution: WindowResolution::new(config.window.width, config.window.height),
      title: config.window.title.clone(),
      // WASM: only Fifo (vsync) is supported on WebGL2
      #[cfg(target_family = "wasm")]
      present_mode: PresentMode::Fifo,
      #[cfg(not(target_family = "wasm"))]
      present_mode: PresentMode::AutoVsync,
      #[cfg(target_family = "wasm")]
      canvas: Some("#bevy".to_string()),
      #[cfg(target_family = "wasm")]
      fit_canvas_to_parent: true,
      ..default()
    }),
    ..default()
  }));

  app
    .add_plugins(config::ConfigPlugin)
    .add_plugins(core::CorePlugin)
    .add_plugins(input::InputPlugin)
    .add_plugins(player::PlayerPlugin)
    .add_plugins(world::WorldPlugin)
    .add_plugins(hud::HudPlugin)
    .add_plugins(visual_debug::VisualDebugPlugin);

  app.run();
}
