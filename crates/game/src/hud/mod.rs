//! Run statistics overlay.

use bevy::prelude::*;
use bevy_egui::{EguiContext, egui};
use bevy_segment_loop::{ControllerPhase, SegmentTrack};

use crate::player::components::{Dead, Player, Runner};

pub struct HudPlugin;

/// Counts frames until egui is ready for drawing.
#[derive(Resource, Default)]
struct EguiReady(u32);

impl Plugin for HudPlugin {
  fn build(&self, app: &mut App) {
    if !app.is_plugin_added::<bevy_egui::EguiPlugin>() {
      app.add_plugins(bevy_egui::EguiPlugin::default());
    }
    app.init_resource::<EguiReady>();
    app.add_systems(Update, draw_hud);
  }
}

/// Everything the overlay shows, in display order.
#[derive(Debug, Default, PartialEq)]
pub struct HudStats {
  pub distance: f32,
  pub furthest_edge: Option<f32>,
  pub recycles: u64,
  pub phase: Option<ControllerPhase>,
  pub failure: Option<String>,
  pub crashed: bool,
}

impl HudStats {
  pub fn collect(track: &SegmentTrack, observer: Vec3, crashed: bool) -> Self {
    let segment_loop = track.segment_loop();
    Self {
      distance: track.axis().project(observer),
      furthest_edge: track.furthest_edge(),
      recycles: segment_loop.pool().map_or(0, |pool| pool.recycle_count()),
      phase: segment_loop.phase(),
      failure: segment_loop.failure().map(ToString::to_string),
      crashed,
    }
  }

  fn lines(&self) -> Vec<String> {
    let mut lines = vec![format!("Distance {:.0} m", self.distance.max(0.0))];
    match (self.furthest_edge, self.phase) {
      (Some(edge), Some(ControllerPhase::Idle)) => {
        lines.push(format!("Track ahead to {edge:.0} (waiting)"));
      }
      (Some(edge), _) => lines.push(format!("Track ahead to {edge:.0}")),
      (None, _) => {}
    }
    lines.push(format!("Segments recycled {}", self.recycles));
    if let Some(failure) = &self.failure {
      lines.push(format!("Track disabled: {failure}"));
    }
    lines
  }
}

fn draw_hud(
  mut egui_ctx: Query<&mut EguiContext>,
  tracks: Query<&SegmentTrack>,
  players: Query<(&Transform, Has<Dead>), (With<Player>, With<Runner>)>,
  mut ready: ResMut<EguiReady>,
) {
  // Skip early frames to allow egui to fully initialize
  if ready.0 < 5 {
    ready.0 += 1;
    return;
  }

  let Ok(track) = tracks.single() else { return };
  let Ok((transform, crashed)) = players.single() else {
    return;
  };
  let Ok(ctx) = egui_ctx.single_mut() else {
    return;
  };
  let ctx: &egui::Context = ctx.into_inner().get_mut();
  let stats = HudStats::collect(track, transform.translation, crashed);

  egui::Area::new(egui::Id::new("run_stats"))
    .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
    .interactable(false)
    .show(ctx, |ui| {
      for line in stats.lines() {
        ui.label(egui::RichText::new(line).color(egui::Color32::WHITE).strong());
      }
    });

  if stats.crashed {
    egui::Area::new(egui::Id::new("crash_notice"))
      .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
      .interactable(false)
      .show(ctx, |ui| {
        ui.label(
          egui::RichText::new("CRASHED")
            .size(48.0)
            .color(egui::Color32::from_rgb(230, 60, 40))
            .strong(),
        );
      });
  }
}
