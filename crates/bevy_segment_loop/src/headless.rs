//! In-memory collaborator for driving a loop without an ECS world.
//!
//! Handles are plain `u32` ids. Every ground call is recorded so tests and
//! tools can inspect what the loop asked for.

use std::collections::HashMap;

use crate::error::{AllocationFailure, LoopError};
use crate::ground::{GroundSpan, GroundSupport};
use crate::pool::{ClonedSegment, SegmentSpawner, SlotIndex};
use crate::prototype::SegmentKind;

/// Ground allocated by [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq)]
pub struct GroundRecord {
  pub owner: u32,
  pub span: GroundSpan,
}

/// Segment spawner and ground support backed by plain maps.
#[derive(Debug, Default)]
pub struct HeadlessHost {
  next_id: u32,
  clones: usize,
  /// Reported lengths that override the registered one, per slot.
  reported_lengths: HashMap<SlotIndex, f32>,
  /// Registered length reported by default.
  default_length: Option<f32>,
  existing: Option<u32>,
  grounds: HashMap<u32, GroundRecord>,
  /// Remaining ground allocations, unlimited when `None`.
  ground_budget: Option<usize>,
  allocations: usize,
  updates: usize,
}

impl HeadlessHost {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes clones report `length` instead of the requested kind's length.
  pub fn with_default_length(mut self, length: f32) -> Self {
    self.default_length = Some(length);
    self
  }

  /// Makes the clone for `slot` report `length`.
  pub fn with_reported_length(mut self, slot: SlotIndex, length: f32) -> Self {
    self.reported_lengths.insert(slot, length);
    self
  }

  /// Offers `handle` as an already-placed instance for adoption.
  pub fn with_existing(mut self, handle: u32) -> Self {
    self.existing = Some(handle);
    self
  }

  /// Fails every ground allocation after the first `budget`.
  pub fn with_ground_budget(mut self, budget: usize) -> Self {
    self.ground_budget = Some(budget);
    self
  }

  /// Number of prototype clones made (special included).
  pub fn clones(&self) -> usize {
    self.clones
  }

  pub fn ground_allocations(&self) -> usize {
    self.allocations
  }

  pub fn ground_updates(&self) -> usize {
    self.updates
  }

  pub fn ground(&self, handle: u32) -> Option<&GroundRecord> {
    self.grounds.get(&handle)
  }

  fn next_handle(&mut self) -> u32 {
    let id = self.next_id;
    self.next_id += 1;
    id
  }
}

impl SegmentSpawner for HeadlessHost {
  type Instance = u32;

  fn clone_prototype(
    &mut self,
    _kind: &SegmentKind,
    slot: SlotIndex,
  ) -> Result<ClonedSegment<u32>, LoopError> {
    self.clones += 1;
    let length = self
      .reported_lengths
      .get(&slot)
      .copied()
      .or(self.default_length)
      .unwrap_or(100.0);
    Ok(ClonedSegment {
      handle: self.next_handle(),
      length,
    })
  }

  fn clone_special(&mut self, _kind: &SegmentKind) -> Result<u32, LoopError> {
    self.clones += 1;
    Ok(self.next_handle())
  }

  fn adopt_existing(&mut self, _kind: &SegmentKind) -> Option<ClonedSegment<u32>> {
    let handle = self.existing.take()?;
    Some(ClonedSegment {
      handle,
      length: self.default_length.unwrap_or(100.0),
    })
  }
}

impl GroundSupport<u32> for HeadlessHost {
  type Handle = u32;

  fn allocate(&mut self, owner: u32, span: &GroundSpan) -> Result<u32, AllocationFailure> {
    if let Some(budget) = self.ground_budget.as_mut() {
      if *budget == 0 {
        return Err(AllocationFailure::new("ground", "headless ground budget exhausted"));
      }
      *budget -= 1;
    }
    self.allocations += 1;
    let handle = self.next_handle();
    self.grounds.insert(handle, GroundRecord { owner, span: *span });
    Ok(handle)
  }

  fn update(&mut self, handle: u32, span: &GroundSpan) {
    self.updates += 1;
    if let Some(record) = self.grounds.get_mut(&handle) {
      record.span = *span;
    }
  }
}
