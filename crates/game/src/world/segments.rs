//! Procedural rail segments and the station landmark.

use bevy::prelude::*;
use bevy_segment_loop::{
  AllocationFailure, ClonedSegment, ConfigurationError, LoopConfig, LoopError, SegmentBuilder,
  SegmentKind, TravelAxis,
};
use rand::Rng;

use crate::config::{ConfigLoaded, SceneryConfig, color};

const RAIL_HEIGHT: f32 = 0.2;
const BED_DEPTH: f32 = 0.2;
const BLOCK_MARGIN: f32 = 3.0;
const STATION_HEIGHT: f32 = 1.2;
const STATION_WIDTH: f32 = 6.0;

/// World-space extents of a box whose sides run along, across and up from
/// the track.
pub fn track_size(axis: TravelAxis, along: f32, across: f32, up: f32) -> Vec3 {
  axis.axis.unit() * along + axis.lateral().unit() * across + axis.normal().unit() * up
}

/// Roadside block height range, tolerating swapped or negative bounds.
fn block_heights(scenery: &SceneryConfig) -> std::ops::RangeInclusive<f32> {
  let a = scenery.block_height_min.max(0.1);
  let b = scenery.block_height_max.max(0.1);
  a.min(b)..=a.max(b)
}

/// Local offset from a segment anchor, in track terms.
fn track_offset(axis: TravelAxis, along: f32, across: f32, up: f32) -> Vec3 {
  axis.forward() * along + axis.lateral().unit() * across + axis.normal().unit() * up
}

/// Builds the rail chunk and station prototypes from scenery config.
#[derive(Clone, Debug)]
pub struct RailSegmentBuilder {
  axis: TravelAxis,
  chunk_kind: SegmentKind,
  chunk_length: f32,
  station: Option<(SegmentKind, f32)>,
  lanes: [f32; 3],
  scenery: SceneryConfig,
}

impl RailSegmentBuilder {
  pub fn new(track: &LoopConfig, scenery: SceneryConfig, lanes: [f32; 3]) -> Self {
    Self {
      axis: track.travel_axis(),
      chunk_kind: track.segment_kind.clone(),
      chunk_length: track.segment_length,
      station: track
        .special
        .as_ref()
        .map(|special| (special.kind.clone(), special.length)),
      lanes,
      scenery,
    }
  }

  pub fn from_config(config: &ConfigLoaded) -> Self {
    let player = &config.player;
    let lanes = [-1.0, 0.0, 1.0].map(|lane| player.lane_offset + lane * player.lane_distance);
    Self::new(&config.track, config.scenery.clone(), lanes)
  }

  /// Pieces of one rail chunk as (local center, size, color).
  fn chunk_parts(&self, rng: &mut impl Rng) -> Vec<(Vec3, Vec3, [f32; 3])> {
    let axis = self.axis;
    let scenery = &self.scenery;
    let length = self.chunk_length;
    let mut parts = vec![(
      track_offset(axis, length / 2.0, 0.0, -BED_DEPTH / 2.0),
      track_size(axis, length, scenery.bed_width, BED_DEPTH),
      scenery.bed_color,
    )];

    for lane in self.lanes {
      parts.push((
        track_offset(axis, length / 2.0, lane, RAIL_HEIGHT / 2.0),
        track_size(axis, length, scenery.rail_width, RAIL_HEIGHT),
        scenery.rail_color,
      ));
    }

    let spacing = length / scenery.block_count.max(1) as f32;
    for i in 0..scenery.block_count {
      let side = if i % 2 == 0 { -1.0 } else { 1.0 };
      let height = rng.random_range(block_heights(scenery));
      let depth = spacing * 0.8;
      let across = side * (scenery.bed_width / 2.0 + BLOCK_MARGIN + rng.random_range(0.0..4.0));
      parts.push((
        track_offset(axis, spacing * (i as f32 + 0.5), across, height / 2.0),
        track_size(axis, depth, 4.0, height),
        scenery.block_color,
      ));
    }
    parts
  }

  fn station_parts(&self, length: f32) -> Vec<(Vec3, Vec3, [f32; 3])> {
    let axis = self.axis;
    let scenery = &self.scenery;
    let edge = scenery.bed_width / 2.0 + STATION_WIDTH / 2.0;
    [-edge, edge]
      .into_iter()
      .map(|across| {
        (
          track_offset(axis, length / 2.0, across, STATION_HEIGHT / 2.0),
          track_size(axis, length, STATION_WIDTH, STATION_HEIGHT),
          scenery.station_color,
        )
      })
      .collect()
  }

  fn spawn_parts(
    world: &mut World,
    name: &'static str,
    parts: Vec<(Vec3, Vec3, [f32; 3])>,
  ) -> Result<Entity, AllocationFailure> {
    let handles = {
      let mut meshes = world
        .get_resource_mut::<Assets<Mesh>>()
        .ok_or_else(|| AllocationFailure::new("segment mesh", "mesh assets are not available"))?;
      parts
        .iter()
        .map(|(_, size, _)| meshes.add(Cuboid::from_size(*size)))
        .collect::<Vec<_>>()
    };
    let materials = {
      let mut materials = world
        .get_resource_mut::<Assets<StandardMaterial>>()
        .ok_or_else(|| {
          AllocationFailure::new("segment material", "material assets are not available")
        })?;
      parts
        .iter()
        .map(|(_, _, rgb)| materials.add(color(*rgb)))
        .collect::<Vec<_>>()
    };

    let root = world
      .spawn((Name::new(name), Transform::default(), Visibility::default()))
      .id();
    for (((center, _, _), mesh), material) in parts.into_iter().zip(handles).zip(materials) {
      world.spawn((
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(center),
        ChildOf(root),
      ));
    }
    Ok(root)
  }
}

impl SegmentBuilder for RailSegmentBuilder {
  fn build(&self, world: &mut World, kind: &SegmentKind) -> Result<ClonedSegment<Entity>, LoopError> {
    if *kind == self.chunk_kind {
      let parts = self.chunk_parts(&mut rand::rng());
      let handle = Self::spawn_parts(world, "RailChunk", parts)?;
      return Ok(ClonedSegment {
        handle,
        length: self.chunk_length,
      });
    }
    match &self.station {
      Some((station, length)) if station == kind => {
        let handle = Self::spawn_parts(world, "Station", self.station_parts(*length))?;
        Ok(ClonedSegment {
          handle,
          length: *length,
        })
      }
      _ => Err(ConfigurationError::UnknownKind(kind.clone()).into()),
    }
  }
}
