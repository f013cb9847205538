//! Fail-soft owner of one pool and its controller.

use bevy::log::{error, warn};

use crate::config::LoopConfig;
use crate::controller::{ControllerPhase, RecyclingController, TickReport};
use crate::coords::TravelAxis;
use crate::error::{LoopError, MalformedSegment};
use crate::ground::GroundSupport;
use crate::pool::{SegmentPool, SegmentSpawner};
use crate::prototype::PrototypeRegistry;

struct Running<I, G> {
  pool: SegmentPool<I, G>,
  controller: RecyclingController,
}

/// A segment loop that is either running or permanently disabled.
///
/// Startup failures never propagate past this type: they are logged, kept for
/// inspection and turn every later tick into a no-op. The world then simply
/// stops extending past its initial footprint.
pub struct SegmentLoop<I, G> {
  axis: TravelAxis,
  running: Option<Running<I, G>>,
  failure: Option<LoopError>,
}

impl<I: Copy, G: Copy> SegmentLoop<I, G> {
  /// Builds the pool and controller, disabling the loop on any error.
  pub fn start<H>(config: &LoopConfig, registry: &PrototypeRegistry, host: &mut H) -> Self
  where
    H: SegmentSpawner<Instance = I> + GroundSupport<I, Handle = G>,
  {
    match SegmentPool::initialize(config, registry, host) {
      Ok(pool) => Self {
        axis: config.travel_axis(),
        running: Some(Running {
          pool,
          controller: RecyclingController::new(config),
        }),
        failure: None,
      },
      Err(err) => Self::disabled(config.travel_axis(), err),
    }
  }

  /// A loop that never does anything.
  pub fn disabled(axis: TravelAxis, err: LoopError) -> Self {
    error!("Segment loop disabled: {err}");
    Self {
      axis,
      running: None,
      failure: Some(err),
    }
  }

  /// Advances the loop for an observer at oriented position `observer`.
  ///
  /// An allocation failure mid-run disables the loop.
  pub fn tick<S>(&mut self, observer: f32, support: &mut S) -> TickReport
  where
    S: GroundSupport<I, Handle = G>,
  {
    let Some(running) = self.running.as_mut() else {
      return TickReport::default();
    };
    if !observer.is_finite() {
      warn!("Ignoring non-finite observer position {observer}");
      return TickReport::default();
    }
    match running.controller.tick(observer, &mut running.pool, support) {
      Ok(report) => report,
      Err(err) => {
        error!("Segment loop stopped: {err}");
        self.running = None;
        self.failure = Some(err.into());
        TickReport::default()
      }
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.running.is_some()
  }

  pub fn failure(&self) -> Option<&LoopError> {
    self.failure.as_ref()
  }

  pub fn pool(&self) -> Option<&SegmentPool<I, G>> {
    self.running.as_ref().map(|r| &r.pool)
  }

  pub fn controller(&self) -> Option<&RecyclingController> {
    self.running.as_ref().map(|r| &r.controller)
  }

  pub fn phase(&self) -> Option<ControllerPhase> {
    self.controller().map(RecyclingController::phase)
  }

  /// Current leading edge, the only state exposed for diagnostics.
  pub fn furthest_edge(&self) -> Option<f32> {
    self.pool().map(SegmentPool::furthest_edge)
  }

  pub fn warnings(&self) -> &[MalformedSegment] {
    self.pool().map(SegmentPool::warnings).unwrap_or(&[])
  }

  pub fn axis(&self) -> TravelAxis {
    self.axis
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ConfigurationError;
  use crate::headless::HeadlessHost;
  use crate::pool::SlotIndex;

  #[test]
  fn invalid_config_yields_disabled_loop() {
    let config = LoopConfig {
      pool_size: 1,
      ..LoopConfig::default()
    };
    let mut host = HeadlessHost::new();
    let registry = PrototypeRegistry::from_config(&LoopConfig::default()).unwrap();
    let mut segment_loop = SegmentLoop::start(&config, &registry, &mut host);

    assert!(!segment_loop.is_enabled());
    assert_eq!(
      segment_loop.failure(),
      Some(&LoopError::Configuration(ConfigurationError::PoolTooSmall {
        pool_size: 1
      }))
    );
    assert!(segment_loop.tick(1_000.0, &mut host).is_empty());
    assert_eq!(segment_loop.furthest_edge(), None);
    assert_eq!(host.clones(), 0);
  }

  #[test]
  fn nan_trigger_offset_disables_instead_of_stalling() {
    let config = LoopConfig {
      trigger_offset: f32::NAN,
      ..LoopConfig::default()
    };
    let mut host = HeadlessHost::new();
    let registry = PrototypeRegistry::from_config(&config).unwrap();
    let segment_loop = SegmentLoop::start(&config, &registry, &mut host);

    assert!(!segment_loop.is_enabled());
    assert!(matches!(
      segment_loop.failure(),
      Some(LoopError::Configuration(ConfigurationError::NonFiniteOption {
        name: "trigger_offset",
        ..
      }))
    ));
  }

  #[test]
  fn allocation_failure_at_startup_disables() {
    let config = LoopConfig::default();
    let mut host = HeadlessHost::new().with_ground_budget(0);
    let registry = PrototypeRegistry::from_config(&config).unwrap();
    let segment_loop = SegmentLoop::start(&config, &registry, &mut host);

    assert!(matches!(
      segment_loop.failure(),
      Some(LoopError::Allocation(_))
    ));
  }

  #[test]
  fn running_loop_extends_the_world() {
    let config = LoopConfig {
      overlap: 1.0,
      ..LoopConfig::default()
    };
    let mut host = HeadlessHost::new();
    let registry = PrototypeRegistry::from_config(&config).unwrap();
    let mut segment_loop = SegmentLoop::start(&config, &registry, &mut host);

    let report = segment_loop.tick(71.0, &mut host);
    assert_eq!(report.recycled, vec![(SlotIndex(0), 199.0)]);
    assert_eq!(segment_loop.furthest_edge(), Some(299.0));
    assert!(segment_loop.warnings().is_empty());
  }

  #[test]
  fn non_finite_observer_is_ignored() {
    let config = LoopConfig::default();
    let mut host = HeadlessHost::new();
    let registry = PrototypeRegistry::from_config(&config).unwrap();
    let mut segment_loop = SegmentLoop::start(&config, &registry, &mut host);

    assert!(segment_loop.tick(f32::NAN, &mut host).is_empty());
    assert!(segment_loop.tick(f32::INFINITY, &mut host).is_empty());
    assert_eq!(segment_loop.furthest_edge(), Some(200.0));
  }
}
