//! Prototype cloning collaborator.

use super::SlotIndex;
use crate::error::LoopError;
use crate::prototype::SegmentKind;

/// A freshly cloned (or adopted) segment and the length it reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClonedSegment<I> {
  pub handle: I,
  pub length: f32,
}

/// Asset-instantiation collaborator used once, at pool initialization.
pub trait SegmentSpawner {
  type Instance: Copy;

  /// Clones the prototype of `kind` for the given pool slot.
  fn clone_prototype(
    &mut self,
    kind: &SegmentKind,
    slot: SlotIndex,
  ) -> Result<ClonedSegment<Self::Instance>, LoopError>;

  /// Clones the special sub-segment prototype. The clone starts hidden.
  fn clone_special(&mut self, kind: &SegmentKind) -> Result<Self::Instance, LoopError>;

  /// Hands over an already-placed instance to be reused as the first clone.
  fn adopt_existing(&mut self, _kind: &SegmentKind) -> Option<ClonedSegment<Self::Instance>> {
    None
  }
}
