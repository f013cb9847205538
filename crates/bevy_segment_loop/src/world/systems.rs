//! Per-frame track systems.

use bevy::prelude::*;

use super::host::CommandsGround;
use super::{LoopSegment, SegmentTrack, SpecialSegment};

/// Ticks every track with its observer's projected position.
pub(crate) fn advance_segment_tracks(
  mut commands: Commands,
  mut tracks: Query<&mut SegmentTrack>,
  observers: Query<&GlobalTransform>,
) {
  for mut track in &mut tracks {
    if !track.is_enabled() {
      continue;
    }
    let Some(observer) = track.observer else {
      continue;
    };
    let Ok(observer_transform) = observers.get(observer) else {
      continue;
    };

    let axis = track.axis();
    let position = axis.project(observer_transform.translation());
    let mut ground = CommandsGround::new(&mut commands, axis);
    let report = track.segment_loop.tick(position, &mut ground);
    if !report.is_empty() || !track.last_report.is_empty() {
      track.last_report = report;
    }
  }
}

/// Moves pooled segments along the travel axis to their anchors.
///
/// Only the axis coordinate is written, and only when it differs.
pub(crate) fn sync_segment_transforms(
  tracks: Query<&SegmentTrack>,
  mut segments: Query<(&LoopSegment, &mut Transform), Without<SpecialSegment>>,
) {
  for (segment, mut transform) in &mut segments {
    let Ok(track) = tracks.get(segment.track) else {
      continue;
    };
    let Some(anchor) = track.anchor_of(segment.slot) else {
      continue;
    };
    let placed = track.axis().place(transform.translation, anchor);
    if placed != transform.translation {
      transform.translation = placed;
    }
  }
}

/// Keeps the special landmark at its anchor and reveals it once placed.
pub(crate) fn sync_special_segment(
  tracks: Query<&SegmentTrack>,
  mut specials: Query<(&SpecialSegment, &mut Transform, &mut Visibility)>,
) {
  for (special, mut transform, mut visibility) in &mut specials {
    let Ok(track) = tracks.get(special.track) else {
      continue;
    };
    let Some(instance) = track.segment_loop().pool().and_then(|p| p.special()) else {
      continue;
    };
    if !instance.is_visible() {
      continue;
    }
    let placed = track.axis().place(transform.translation, instance.anchor());
    if placed != transform.translation {
      transform.translation = placed;
    }
    if *visibility != Visibility::Inherited {
      *visibility = Visibility::Inherited;
    }
  }
}
