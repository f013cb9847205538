//! Gizmo overlay for segment tracks.
//!
//! Draws each active span, its trigger boundary and the track's furthest
//! edge. Enable with the `visual-debug` feature flag.

use bevy::prelude::*;

use crate::world::SegmentTrack;

const SPAN_COLOR: Color = Color::srgb(0.2, 0.8, 0.3);
const MALFORMED_COLOR: Color = Color::srgb(0.9, 0.6, 0.1);
const TRIGGER_COLOR: Color = Color::srgb(0.9, 0.2, 0.2);
const EDGE_COLOR: Color = Color::srgb(0.2, 0.5, 1.0);

/// Height above the base plane at which overlay lines are drawn.
const OVERLAY_HEIGHT: f32 = 0.1;

/// Plugin that draws track gizmos.
pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    app.add_systems(Update, draw_track_gizmos);
  }
}

fn draw_track_gizmos(mut gizmos: Gizmos, tracks: Query<&SegmentTrack>) {
  for track in &tracks {
    let Some(pool) = track.segment_loop().pool() else {
      continue;
    };
    let Some(controller) = track.segment_loop().controller() else {
      continue;
    };
    let axis = track.axis();
    let lateral = axis.lateral().unit();
    let up = axis.normal().unit() * OVERLAY_HEIGHT;
    let half_width = lateral * 2.0;
    let at = |oriented: f32| axis.forward() * oriented + up;

    for instance in pool.slots() {
      let (start, end) = instance.span(pool.length());
      let color = if instance.is_triggering() {
        SPAN_COLOR
      } else {
        MALFORMED_COLOR
      };
      gizmos.line(at(start) + half_width, at(end) + half_width, color);
      gizmos.line(at(start) - half_width, at(end) - half_width, color);

      if let Some(boundary) = controller.trigger_boundary(instance) {
        gizmos.line(at(boundary) - half_width, at(boundary) + half_width, TRIGGER_COLOR);
      }
    }

    let edge = at(pool.furthest_edge());
    gizmos.line(edge - half_width * 2.0, edge + half_width * 2.0, EDGE_COLOR);
  }
}
