//! System ordering for segment loops.

use bevy::prelude::*;

/// Segment loop phases within `Update`, chained in declaration order.
///
/// Systems that move an observer should run before
/// [`SegmentLoopSet::Recycle`].
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentLoopSet {
  /// Controllers evaluate observers and relocate trailing segments.
  Recycle,
  /// Segment transforms and special visibility are written back.
  Sync,
}
