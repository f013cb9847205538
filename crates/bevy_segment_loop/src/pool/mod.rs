//! Segment pool for managing recycled track segments.
//!
//! The pool owns a fixed array of segment instances, the optional special
//! instance and the furthest edge. It is the only writer of all three.

mod slot;
mod spawner;

use bevy::log::{debug, warn};
pub use slot::{SegmentInstance, SlotIndex, SpecialInstance};
pub use spawner::{ClonedSegment, SegmentSpawner};

use crate::config::LoopConfig;
use crate::error::{AllocationFailure, ConfigurationError, LoopError, MalformedSegment};
use crate::ground::{GroundSupport, GroundSynthesizer};
use crate::prototype::PrototypeRegistry;

/// Slack allowed when comparing span edges.
pub const EDGE_TOLERANCE: f32 = 1e-3;

/// Scalar state shared by every pooled segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoolState {
  /// Oriented leading boundary of the most recently placed segment.
  ///
  /// Always equals the maximum `anchor + length` over active instances and
  /// only ever moves forward.
  pub furthest_edge: f32,
}

/// Fixed-size pool of segment instances.
///
/// `I` is the collaborator's instance handle, `G` its ground handle.
pub struct SegmentPool<I, G> {
  slots: Vec<SegmentInstance<I, G>>,
  special: Option<SpecialInstance<I>>,
  /// Offset from the leading edge to the special instance's anchor.
  special_offset: Option<f32>,
  state: PoolState,
  length: f32,
  overlap: f32,
  ground: GroundSynthesizer,
  recycles: u64,
  warnings: Vec<MalformedSegment>,
}

impl<I: Copy, G: Copy> SegmentPool<I, G> {
  /// Clones `pool_size` segments, places them back to back from
  /// `base_position` and synthesizes their ground.
  pub fn initialize<H>(
    config: &LoopConfig,
    registry: &PrototypeRegistry,
    host: &mut H,
  ) -> Result<Self, LoopError>
  where
    H: SegmentSpawner<Instance = I> + GroundSupport<I, Handle = G>,
  {
    config.validate()?;
    let length = registry.length_of(&config.segment_kind)?;
    config.check_length(length)?;

    let special_offset = match &config.special {
      Some(special) => {
        registry.spec(&special.kind)?;
        let offset = registry
          .special_offset_of(&config.segment_kind)?
          .ok_or_else(|| ConfigurationError::MissingSpecialOffset(config.segment_kind.clone()))?;
        if !offset.is_finite() {
          return Err(
            ConfigurationError::NonFiniteOption {
              name: "special offset",
              value: offset,
            }
            .into(),
          );
        }
        Some(offset)
      }
      None => None,
    };

    let ground = GroundSynthesizer::from_config(config);
    let mut slots = Vec::with_capacity(config.pool_size);
    let mut warnings = Vec::new();

    for i in 0..config.pool_size {
      let slot = SlotIndex(i);
      let adopted = if i == 0 && config.adopt_existing {
        host.adopt_existing(&config.segment_kind)
      } else {
        None
      };
      let cloned = match adopted {
        Some(cloned) => cloned,
        None => host.clone_prototype(&config.segment_kind, slot)?,
      };

      let anchor = config.base_position + i as f32 * length;
      let mut instance = SegmentInstance::new(cloned.handle, anchor, cloned.length);
      if instance.is_triggering() {
        ground.ensure_ground(&mut instance, length, host)?;
      } else {
        let warning = MalformedSegment {
          slot,
          reported_length: cloned.length,
        };
        warn!("{warning}");
        warnings.push(warning);
      }
      slots.push(instance);
    }

    let special = match &config.special {
      Some(special) => Some(SpecialInstance::new(host.clone_special(&special.kind)?)),
      None => None,
    };

    let furthest_edge = slots
      .iter()
      .map(|s| s.anchor + length)
      .fold(f32::NEG_INFINITY, f32::max);

    debug!(
      "Segment pool initialized: {} x {} units, furthest edge {}",
      slots.len(),
      length,
      furthest_edge
    );

    Ok(Self {
      slots,
      special,
      special_offset,
      state: PoolState { furthest_edge },
      length,
      overlap: config.overlap,
      ground,
      recycles: 0,
      warnings,
    })
  }

  /// Moves the instance in `slot` to the front of the pool.
  ///
  /// The new anchor sits `overlap` behind the current furthest edge, so the
  /// edge advances by exactly `length - overlap`. Calling this twice for the
  /// same slot recycles it twice.
  ///
  /// # Panics
  /// Panics if `slot` is out of range.
  pub fn recycle<S>(&mut self, slot: SlotIndex, support: &mut S) -> Result<f32, AllocationFailure>
  where
    S: GroundSupport<I, Handle = G>,
  {
    let new_anchor = self.state.furthest_edge - self.overlap;
    let instance = &mut self.slots[slot.0];
    instance.anchor = new_anchor;
    instance.recycled += 1;
    self.state.furthest_edge = new_anchor + self.length;
    self.ground.ensure_ground(instance, self.length, support)?;

    if let (Some(special), Some(offset)) = (self.special.as_mut(), self.special_offset) {
      special.anchor = self.state.furthest_edge + offset;
      special.visible = true;
    }

    self.recycles += 1;
    debug!(
      "Recycled slot {} to {}, furthest edge {}",
      slot.0, new_anchor, self.state.furthest_edge
    );
    Ok(new_anchor)
  }

  pub fn slots(&self) -> &[SegmentInstance<I, G>] {
    &self.slots
  }

  pub fn slot(&self, slot: SlotIndex) -> Option<&SegmentInstance<I, G>> {
    self.slots.get(slot.0)
  }

  pub fn special(&self) -> Option<&SpecialInstance<I>> {
    self.special.as_ref()
  }

  pub fn special_offset(&self) -> Option<f32> {
    self.special_offset
  }

  pub fn state(&self) -> PoolState {
    self.state
  }

  pub fn furthest_edge(&self) -> f32 {
    self.state.furthest_edge
  }

  /// Uniform segment length used for placement.
  pub fn length(&self) -> f32 {
    self.length
  }

  pub fn overlap(&self) -> f32 {
    self.overlap
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn active_count(&self) -> usize {
    self.slots.iter().filter(|s| s.active).count()
  }

  /// Total recycles performed since initialization.
  pub fn recycle_count(&self) -> u64 {
    self.recycles
  }

  /// Malformed instances found while cloning.
  pub fn warnings(&self) -> &[MalformedSegment] {
    &self.warnings
  }

  /// Returns true if any active span contains the oriented `position`.
  pub fn covers(&self, position: f32) -> bool {
    self.slots.iter().filter(|s| s.active).any(|s| {
      let (start, end) = s.span(self.length);
      position >= start - EDGE_TOLERANCE && position < end + EDGE_TOLERANCE
    })
  }

  /// Returns true if the active spans form one gap-free region.
  pub fn is_contiguous(&self) -> bool {
    let mut spans: Vec<_> = self
      .slots
      .iter()
      .filter(|s| s.active)
      .map(|s| s.span(self.length))
      .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));
    spans
      .windows(2)
      .all(|pair| pair[1].0 <= pair[0].1 + EDGE_TOLERANCE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SpecialSegmentConfig;
  use crate::headless::HeadlessHost;
  use crate::prototype::{SegmentKind, SegmentSpec};

  fn scenario_config() -> LoopConfig {
    LoopConfig {
      pool_size: 2,
      segment_length: 100.0,
      overlap: 1.0,
      trigger_ratio: 0.7,
      ..LoopConfig::default()
    }
  }

  fn build(config: &LoopConfig, host: &mut HeadlessHost) -> SegmentPool<u32, u32> {
    let registry = PrototypeRegistry::from_config(config).unwrap();
    SegmentPool::initialize(config, &registry, host).unwrap()
  }

  #[test]
  fn initialize_places_segments_back_to_back() {
    let config = LoopConfig {
      pool_size: 3,
      base_position: 20.0,
      ..scenario_config()
    };
    let mut host = HeadlessHost::new();
    let pool = build(&config, &mut host);

    let anchors: Vec<_> = pool.slots().iter().map(|s| s.anchor()).collect();
    assert_eq!(anchors, vec![20.0, 120.0, 220.0]);
    assert_eq!(pool.furthest_edge(), 320.0);
    assert_eq!(pool.active_count(), 3);
    assert_eq!(host.ground_allocations(), 3);
    assert!(pool.slots().iter().all(|s| s.ground().is_some()));
  }

  #[test]
  fn recycle_moves_trailing_segment_ahead() {
    let mut host = HeadlessHost::new();
    let mut pool = build(&scenario_config(), &mut host);

    let anchor = pool.recycle(SlotIndex(0), &mut host).unwrap();

    assert_eq!(anchor, 199.0);
    assert_eq!(pool.furthest_edge(), 299.0);
    assert_eq!(pool.slot(SlotIndex(0)).unwrap().recycled(), 1);
    // Ground is reused, not reallocated.
    assert_eq!(host.ground_allocations(), 2);
    assert_eq!(host.ground_updates(), 1);
  }

  #[test]
  fn each_recycle_advances_by_length_minus_overlap() {
    let mut host = HeadlessHost::new();
    let mut pool = build(&scenario_config(), &mut host);

    let mut previous = pool.furthest_edge();
    for i in 0..10 {
      pool.recycle(SlotIndex(i % 2), &mut host).unwrap();
      assert_eq!(pool.furthest_edge() - previous, 99.0);
      previous = pool.furthest_edge();
      assert_eq!(pool.active_count(), 2);
    }
    assert_eq!(pool.recycle_count(), 10);
  }

  #[test]
  fn special_follows_leading_edge() {
    let config = LoopConfig {
      special: Some(SpecialSegmentConfig {
        kind: SegmentKind::new("station"),
        offset: 30.0,
        length: 10.0,
      }),
      ..scenario_config()
    };
    let mut host = HeadlessHost::new();
    let mut pool = build(&config, &mut host);

    let special = pool.special().unwrap();
    assert!(!special.is_visible());

    pool.recycle(SlotIndex(0), &mut host).unwrap();
    let special = pool.special().unwrap();
    assert_eq!(special.anchor(), 329.0);
    assert!(special.is_visible());

    pool.recycle(SlotIndex(1), &mut host).unwrap();
    assert_eq!(
      pool.special().unwrap().anchor(),
      pool.furthest_edge() + 30.0
    );
  }

  #[test]
  fn special_requires_registered_offset() {
    let config = LoopConfig {
      special: Some(SpecialSegmentConfig {
        kind: SegmentKind::new("station"),
        offset: 30.0,
        length: 10.0,
      }),
      ..scenario_config()
    };
    let mut registry = PrototypeRegistry::new();
    registry
      .register(SegmentKind::default(), SegmentSpec::new(100.0))
      .unwrap();
    registry
      .register("station", SegmentSpec::new(10.0))
      .unwrap();

    let result = SegmentPool::<u32, u32>::initialize(&config, &registry, &mut HeadlessHost::new());
    assert!(matches!(
      result,
      Err(LoopError::Configuration(
        ConfigurationError::MissingSpecialOffset(_)
      ))
    ));
  }

  #[test]
  fn malformed_clone_is_kept_but_flagged() {
    let mut host = HeadlessHost::new().with_reported_length(SlotIndex(1), 0.0);
    let pool = build(&scenario_config(), &mut host);

    assert_eq!(pool.active_count(), 2);
    assert_eq!(
      pool.warnings(),
      &[MalformedSegment {
        slot: SlotIndex(1),
        reported_length: 0.0,
      }]
    );
    assert!(pool.slots()[0].is_triggering());
    assert!(!pool.slots()[1].is_triggering());
    assert_eq!(pool.slots()[1].ground(), None);
  }

  #[test]
  fn adopt_existing_reuses_first_instance() {
    let config = LoopConfig {
      adopt_existing: true,
      ..scenario_config()
    };
    let mut host = HeadlessHost::new().with_existing(99);
    let pool = build(&config, &mut host);

    assert_eq!(pool.slots()[0].handle(), 99);
    assert_eq!(host.clones(), 1);
  }

  #[test]
  fn unknown_kind_fails_initialization() {
    let config = scenario_config();
    let registry = PrototypeRegistry::new();
    let result = SegmentPool::<u32, u32>::initialize(&config, &registry, &mut HeadlessHost::new());
    assert!(matches!(
      result,
      Err(LoopError::Configuration(ConfigurationError::UnknownKind(_)))
    ));
  }

  #[test]
  fn registry_shorter_than_overlap_is_rejected() {
    let config = LoopConfig {
      overlap: 5.0,
      ..scenario_config()
    };
    let mut registry = PrototypeRegistry::new();
    registry
      .register(SegmentKind::default(), SegmentSpec::new(2.0))
      .unwrap();
    let mut host = HeadlessHost::new().with_default_length(2.0);

    let result = SegmentPool::<u32, u32>::initialize(&config, &registry, &mut host);

    assert_eq!(
      result.err(),
      Some(LoopError::Configuration(ConfigurationError::InvalidOverlap {
        overlap: 5.0,
        length: 2.0
      }))
    );
    assert_eq!(host.clones(), 0);
  }

  #[test]
  fn ground_exhaustion_is_an_allocation_failure() {
    let mut host = HeadlessHost::new().with_ground_budget(1);
    let config = scenario_config();
    let registry = PrototypeRegistry::from_config(&config).unwrap();
    let result = SegmentPool::<u32, u32>::initialize(&config, &registry, &mut host);
    assert!(matches!(result, Err(LoopError::Allocation(_))));
  }
}
