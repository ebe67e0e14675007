//! Custom force field: soft centering toward the viewport middle plus
//! size-aware, edge-to-edge repulsion between cards.

use glam::DVec2;

use super::geometry::edge_distance;
use super::physics::{BodyId, World};
use super::registry::NodeRegistry;

/// Forces weaker than this are not applied.
pub const MIN_FORCE: f64 = 0.001;

/// Power of `scale` in the centering strength.
pub const CENTERING_EXPONENT: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
	pub center_radius: f64,
	/// Distance from the center inside which attraction turns into repulsion.
	pub safe_zone: f64,
	pub base_strength: f64,
	pub base_repulsion: f64,
	pub base_range: f64,
}

impl ForceParams {
	pub fn for_scale(scale: f64) -> Self {
		let center_radius = 150.0 * scale;
		Self {
			center_radius,
			safe_zone: center_radius + 250.0 * scale,
			base_strength: 0.3 * scale.powi(CENTERING_EXPONENT),
			base_repulsion: 0.2 * scale,
			base_range: 100.0 * scale,
		}
	}
}

/// Attraction magnitude at `distance` from the center; zero on the safe-zone
/// boundary, approaching `base_strength` far away. Zero inside the zone.
pub fn centering_strength(distance: f64, params: &ForceParams) -> f64 {
	if distance < params.safe_zone || distance <= 0.0 {
		return 0.0;
	}
	params.base_strength * (1.0 - (params.safe_zone / distance).min(1.0))
}

/// Force on a body at `position`, already thresholded.
pub fn centering_force(position: DVec2, center: DVec2, params: &ForceParams) -> DVec2 {
	let to_center = center - position;
	let distance = to_center.length();
	let direction = to_center.normalize_or_zero();
	let force = if distance >= params.safe_zone {
		direction * centering_strength(distance, params)
	} else {
		// Keep cards from collapsing onto the exact center.
		-direction * params.base_strength * 0.5
	};
	threshold(force)
}

/// Range for a pair, proportional to their mean extent relative to the largest node.
pub fn repulsion_range(extent_a: f64, extent_b: f64, max_extent: f64, params: &ForceParams) -> f64 {
	if max_extent <= 0.0 {
		return 0.0;
	}
	params.base_range * (extent_a + extent_b) / (2.0 * max_extent)
}

/// Linear falloff: full strength at contact, zero at `range`.
pub fn repulsion_strength(edge_distance: f64, range: f64, params: &ForceParams) -> f64 {
	if edge_distance >= range {
		return 0.0;
	}
	params.base_repulsion * (1.0 - edge_distance / range)
}

fn threshold(force: DVec2) -> DVec2 {
	if force.length() < MIN_FORCE {
		DVec2::ZERO
	} else {
		force
	}
}

/// Accumulates centering and pairwise repulsion forces for every node. The
/// `held` body (if any) receives no force.
pub fn apply_force_field(
	world: &mut World,
	registry: &NodeRegistry,
	center: DVec2,
	params: &ForceParams,
	held: Option<BodyId>,
) {
	let nodes = registry.nodes();
	let max_extent = registry.max_extent();
	let rects: Vec<_> = nodes
		.iter()
		.map(|n| world.body(n.body).map(|b| b.rect()))
		.collect();

	for (i, a) in nodes.iter().enumerate() {
		let Some(rect_a) = rects[i] else {
			continue;
		};
		let a_free = held != Some(a.body);

		if a_free {
			let force = centering_force(rect_a.center, center, params);
			if force != DVec2::ZERO {
				world.apply_force(a.body, rect_a.center, force);
			}
		}

		for (j, b) in nodes.iter().enumerate().skip(i + 1) {
			let Some(rect_b) = rects[j] else {
				continue;
			};
			let range = repulsion_range(a.extent(), b.extent(), max_extent, params);
			let gap = edge_distance(&rect_a, &rect_b);
			let strength = repulsion_strength(gap, range, params);
			if strength <= MIN_FORCE {
				continue;
			}
			let direction = (rect_b.center - rect_a.center).normalize_or_zero();
			let push = direction * strength;
			if a_free {
				world.apply_force(a.body, rect_a.center, -push);
			}
			if held != Some(b.body) {
				world.apply_force(b.body, rect_b.center, push);
			}
		}
	}
}

/// Clamps every card center back onto the viewport edge it crossed. Velocity is untouched.
pub fn keep_in_bounds(world: &mut World, registry: &NodeRegistry, viewport: DVec2) {
	for node in registry.nodes() {
		let Some(position) = world.body(node.body).map(|b| b.position) else {
			continue;
		};
		let clamped = position.clamp(DVec2::ZERO, viewport.max(DVec2::ZERO));
		if clamped != position {
			world.set_position(node.body, clamped);
		}
	}
}
