//! ECS plugin for segment tracks.

use bevy::prelude::*;

use super::systems::{advance_segment_tracks, sync_segment_transforms, sync_special_segment};
use crate::schedule::SegmentLoopSet;

/// Internal plugin registering track systems.
///
/// This is added by [`SegmentLoopPlugin`](crate::SegmentLoopPlugin).
pub(crate) struct SegmentTrackPlugin;

impl Plugin for SegmentTrackPlugin {
  fn build(&self, app: &mut App) {
    app
      .configure_sets(
        Update,
        (SegmentLoopSet::Recycle, SegmentLoopSet::Sync).chain(),
      )
      .add_systems(
        Update,
        (
          advance_segment_tracks.in_set(SegmentLoopSet::Recycle),
          (sync_segment_transforms, sync_special_segment).in_set(SegmentLoopSet::Sync),
        ),
      );
  }
}
