//! Pool slots: the segment instances and the special instance.

/// Index into a pool's fixed instance array.
///
/// Stable for the life of the pool; it identifies storage, not a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub usize);

/// One pooled segment.
///
/// Created once when the pool is initialized and never destroyed. Only the
/// anchor, the active flag and the attached ground change afterwards.
#[derive(Clone, Debug)]
pub struct SegmentInstance<I, G> {
  /// Collaborator handle of the cloned prototype.
  pub(crate) handle: I,
  /// Oriented position of the segment's trailing edge.
  pub(crate) anchor: f32,
  /// Length the clone reported for itself.
  pub(crate) reported_length: f32,
  pub(crate) active: bool,
  /// Ground owned by this instance, allocated on first placement.
  pub(crate) ground: Option<G>,
  /// How many times this instance has been moved forward.
  pub(crate) recycled: u32,
}

impl<I: Copy, G: Copy> SegmentInstance<I, G> {
  pub(crate) fn new(handle: I, anchor: f32, reported_length: f32) -> Self {
    Self {
      handle,
      anchor,
      reported_length,
      active: true,
      ground: None,
      recycled: 0,
    }
  }

  pub fn handle(&self) -> I {
    self.handle
  }

  pub fn anchor(&self) -> f32 {
    self.anchor
  }

  pub fn reported_length(&self) -> f32 {
    self.reported_length
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn ground(&self) -> Option<G> {
    self.ground
  }

  pub fn recycled(&self) -> u32 {
    self.recycled
  }

  /// A segment with a non-positive (or NaN) length can never trigger.
  pub fn is_triggering(&self) -> bool {
    self.reported_length.is_finite() && self.reported_length > 0.0
  }

  /// Oriented span `[start, end)` for a segment of `length`.
  pub fn span(&self, length: f32) -> (f32, f32) {
    (self.anchor, self.anchor + length)
  }
}

/// The separately tracked landmark segment kept just ahead of the pool.
#[derive(Clone, Debug)]
pub struct SpecialInstance<I> {
  pub(crate) handle: I,
  pub(crate) anchor: f32,
  pub(crate) visible: bool,
}

impl<I: Copy> SpecialInstance<I> {
  /// Hidden until first placed by a recycle.
  pub(crate) fn new(handle: I) -> Self {
    Self {
      handle,
      anchor: 0.0,
      visible: false,
    }
  }

  pub fn handle(&self) -> I {
    self.handle
  }

  pub fn anchor(&self) -> f32 {
    self.anchor
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }
}
