//! Recycling controller.
//!
//! Decides, once per tick, which pooled segments the observer has left far
//! enough behind and hands them back to the pool for relocation.

use bevy::log::info;

use crate::config::LoopConfig;
use crate::error::AllocationFailure;
use crate::ground::GroundSupport;
use crate::pool::{SegmentInstance, SegmentPool, SlotIndex};

/// Controller state machine. `Idle -> Active` is one-way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerPhase {
  /// Observer has not reached the loop start yet; nothing recycles.
  Idle,
  #[default]
  Active,
}

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
  /// The controller left `Idle` during this tick.
  pub activated: bool,
  /// Recycled slots with their new anchors, in evaluation order.
  pub recycled: Vec<(SlotIndex, f32)>,
}

impl TickReport {
  pub fn is_empty(&self) -> bool {
    !self.activated && self.recycled.is_empty()
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecyclingController {
  phase: ControllerPhase,
  trigger_ratio: f32,
  trigger_offset: f32,
  loop_start: Option<f32>,
}

impl RecyclingController {
  pub fn new(config: &LoopConfig) -> Self {
    let phase = if config.loop_start_position.is_some() {
      ControllerPhase::Idle
    } else {
      ControllerPhase::Active
    };
    Self {
      phase,
      trigger_ratio: config.trigger_ratio,
      trigger_offset: config.trigger_offset,
      loop_start: config.loop_start_position,
    }
  }

  pub fn phase(&self) -> ControllerPhase {
    self.phase
  }

  pub fn loop_start(&self) -> Option<f32> {
    self.loop_start
  }

  /// Oriented position the observer must pass before `instance` recycles.
  ///
  /// Returns `None` for instances that can never trigger.
  pub fn trigger_boundary<I: Copy, G: Copy>(&self, instance: &SegmentInstance<I, G>) -> Option<f32> {
    if !instance.is_active() || !instance.is_triggering() {
      return None;
    }
    Some(instance.anchor() + instance.reported_length() * self.trigger_ratio + self.trigger_offset)
  }

  /// Evaluates every pooled segment against the observer's oriented
  /// position, in slot order, recycling each at most once.
  ///
  /// A slot's boundary is read after earlier slots in the same tick were
  /// recycled, so a large jump can recycle several segments at once.
  pub fn tick<I, G, S>(
    &mut self,
    observer: f32,
    pool: &mut SegmentPool<I, G>,
    support: &mut S,
  ) -> Result<TickReport, AllocationFailure>
  where
    I: Copy,
    G: Copy,
    S: GroundSupport<I, Handle = G>,
  {
    let mut report = TickReport::default();

    if self.phase == ControllerPhase::Idle {
      match self.loop_start {
        Some(start) if observer < start => return Ok(report),
        _ => {
          self.phase = ControllerPhase::Active;
          report.activated = true;
          info!("Segment loop activated at {observer}");
        }
      }
    }

    for i in 0..pool.len() {
      let slot = SlotIndex(i);
      let Some(boundary) = pool.slot(slot).and_then(|s| self.trigger_boundary(s)) else {
        continue;
      };
      if observer > boundary {
        let anchor = pool.recycle(slot, support)?;
        report.recycled.push((slot, anchor));
      }
    }

    Ok(report)
  }
}
