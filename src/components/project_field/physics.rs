//! A small rigid-body world for axis-aligned, non-rotating rectangles.
//!
//! Velocities are in pixels per step and forces follow the Verlet convention of
//! `Δv = F / m · Δt²` with `Δt` in milliseconds, so force constants tuned for
//! browser physics engines carry over unchanged.

use glam::DVec2;

use super::geometry::{Rect, point_in_rect};

/// Fixed step, one display frame at 60 Hz.
pub const STEP_MS: f64 = 1000.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
	pub friction: f64,
	pub friction_air: f64,
	pub restitution: f64,
	pub density: f64,
}

/// Floaty and heavily damped.
pub const CARD_MATERIAL: Material = Material {
	friction: 0.2,
	friction_air: 0.5,
	restitution: 0.8,
	density: 0.001,
};

#[derive(Clone, Debug)]
pub struct Body {
	id: BodyId,
	pub position: DVec2,
	pub velocity: DVec2,
	pub size: DVec2,
	pub material: Material,
	pub is_static: bool,
	force: DVec2,
	mass: f64,
}

impl Body {
	pub fn rect(&self) -> Rect {
		Rect::new(self.position, self.size)
	}

	pub fn mass(&self) -> f64 {
		self.mass
	}

	pub fn force(&self) -> DVec2 {
		self.force
	}

	fn inverse_mass(&self) -> f64 {
		if self.is_static || !self.mass.is_finite() || self.mass <= 0.0 {
			0.0
		} else {
			1.0 / self.mass
		}
	}

	fn update_mass(&mut self) {
		self.mass = self.material.density * self.size.x * self.size.y;
	}
}

#[derive(Debug, Default)]
pub struct World {
	bodies: Vec<Body>,
	next_id: u64,
}

impl World {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn create_rectangle(&mut self, center: DVec2, size: DVec2, material: Material) -> BodyId {
		let id = BodyId(self.next_id);
		self.next_id += 1;
		let mut body = Body {
			id,
			position: center,
			velocity: DVec2::ZERO,
			size,
			material,
			is_static: false,
			force: DVec2::ZERO,
			mass: 0.0,
		};
		body.update_mass();
		self.bodies.push(body);
		id
	}

	pub fn remove(&mut self, id: BodyId) -> bool {
		let before = self.bodies.len();
		self.bodies.retain(|b| b.id != id);
		self.bodies.len() != before
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn body(&self, id: BodyId) -> Option<&Body> {
		self.bodies.iter().find(|b| b.id == id)
	}

	fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
		self.bodies.iter_mut().find(|b| b.id == id)
	}

	/// Accumulates `force` until the next step. Rotation is locked, so the
	/// application point contributes no torque and is ignored.
	pub fn apply_force(&mut self, id: BodyId, _at: DVec2, force: DVec2) {
		if let Some(body) = self.body_mut(id) {
			body.force += force;
		}
	}

	pub fn set_position(&mut self, id: BodyId, position: DVec2) {
		if let Some(body) = self.body_mut(id) {
			body.position = position;
		}
	}

	pub fn set_velocity(&mut self, id: BodyId, velocity: DVec2) {
		if let Some(body) = self.body_mut(id) {
			body.velocity = velocity;
		}
	}

	pub fn set_static(&mut self, id: BodyId, is_static: bool) {
		if let Some(body) = self.body_mut(id) {
			body.is_static = is_static;
			body.force = DVec2::ZERO;
			if is_static {
				body.velocity = DVec2::ZERO;
			}
		}
	}

	/// Resizes the body around its center. Degenerate sizes collapse to zero
	/// and leave the body massless until it gets a real size again.
	pub fn set_size(&mut self, id: BodyId, size: DVec2) {
		if let Some(body) = self.body_mut(id) {
			body.size = if size.is_finite() { size.max(DVec2::ZERO) } else { DVec2::ZERO };
			body.update_mass();
		}
	}

	pub fn query_point(&self, point: DVec2) -> Option<BodyId> {
		self.bodies
			.iter()
			.find(|b| point_in_rect(point, &b.rect()))
			.map(|b| b.id)
	}

	/// Integrates one fixed step, then separates overlapping bodies.
	pub fn step(&mut self) {
		let dt2 = STEP_MS * STEP_MS;
		for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
			let damping = 1.0 - body.material.friction_air;
			body.velocity = body.velocity * damping + body.force() * body.inverse_mass() * dt2;
			body.position += body.velocity;
		}
		for body in &mut self.bodies {
			body.force = DVec2::ZERO;
		}
		self.resolve_contacts();
	}

	fn resolve_contacts(&mut self) {
		let n = self.bodies.len();
		for i in 0..n {
			let (head, tail) = self.bodies.split_at_mut(i + 1);
			let a = &mut head[i];
			for b in tail.iter_mut() {
				resolve_pair(a, b);
			}
		}
	}
}

fn resolve_pair(a: &mut Body, b: &mut Body) {
	let (inv_a, inv_b) = (a.inverse_mass(), b.inverse_mass());
	let inv_sum = inv_a + inv_b;
	if inv_sum == 0.0 {
		return;
	}

	let delta = b.position - a.position;
	let overlap = (a.size + b.size) * 0.5 - delta.abs();
	if overlap.x <= 0.0 || overlap.y <= 0.0 {
		return;
	}

	// Push out along the axis of least penetration.
	let (normal, depth) = if overlap.x < overlap.y {
		(DVec2::new(sign(delta.x), 0.0), overlap.x)
	} else {
		(DVec2::new(0.0, sign(delta.y)), overlap.y)
	};
	a.position -= normal * depth * (inv_a / inv_sum);
	b.position += normal * depth * (inv_b / inv_sum);

	let approach = (b.velocity - a.velocity).dot(normal);
	if approach >= 0.0 {
		return;
	}
	let restitution = a.material.restitution.min(b.material.restitution);
	let impulse = -(1.0 + restitution) * approach / inv_sum;
	a.velocity -= normal * impulse * inv_a;
	b.velocity += normal * impulse * inv_b;

	// Coulomb-style damping of the sliding component.
	let tangent = DVec2::new(-normal.y, normal.x);
	let slide = (b.velocity - a.velocity).dot(tangent);
	let friction = a.material.friction.min(b.material.friction);
	let limit = friction * impulse;
	let tangent_impulse = (-slide / inv_sum).clamp(-limit, limit);
	a.velocity -= tangent * tangent_impulse * inv_a;
	b.velocity += tangent * tangent_impulse * inv_b;
}

fn sign(v: f64) -> f64 {
	if v < 0.0 { -1.0 } else { 1.0 }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn world_with_box(center: DVec2) -> (World, BodyId) {
		let mut world = World::new();
		let id = world.create_rectangle(center, DVec2::new(100.0, 50.0), CARD_MATERIAL);
		(world, id)
	}

	#[test]
	fn mass_follows_area() {
		let (world, id) = world_with_box(DVec2::ZERO);
		assert!((world.body(id).unwrap().mass() - 5.0).abs() < 1e-12);
	}

	#[test]
	fn force_accelerates_then_clears() {
		let (mut world, id) = world_with_box(DVec2::ZERO);
		world.apply_force(id, DVec2::ZERO, DVec2::new(0.01, 0.0));
		world.step();
		let body = world.body(id).unwrap();
		let expected = 0.01 / 5.0 * STEP_MS * STEP_MS;
		assert!((body.velocity.x - expected).abs() < 1e-9);
		assert!((body.position.x - expected).abs() < 1e-9);
		assert_eq!(body.force(), DVec2::ZERO);
	}

	#[test]
	fn air_friction_damps_velocity() {
		let (mut world, id) = world_with_box(DVec2::ZERO);
		world.set_velocity(id, DVec2::new(10.0, -4.0));
		world.step();
		assert_eq!(world.body(id).unwrap().velocity, DVec2::new(5.0, -2.0));
	}

	#[test]
	fn static_bodies_do_not_integrate() {
		let (mut world, id) = world_with_box(DVec2::new(3.0, 4.0));
		world.set_velocity(id, DVec2::new(10.0, 0.0));
		world.set_static(id, true);
		world.apply_force(id, DVec2::ZERO, DVec2::new(1.0, 1.0));
		world.step();
		let body = world.body(id).unwrap();
		assert_eq!(body.position, DVec2::new(3.0, 4.0));
		assert_eq!(body.velocity, DVec2::ZERO);
	}

	#[test]
	fn set_size_preserves_center() {
		let (mut world, id) = world_with_box(DVec2::new(10.0, 10.0));
		world.set_size(id, DVec2::new(200.0, 25.0));
		let body = world.body(id).unwrap();
		assert_eq!(body.size, DVec2::new(200.0, 25.0));
		assert_eq!(body.position, DVec2::new(10.0, 10.0));
		assert!((body.mass() - 5.0).abs() < 1e-12);
	}

	#[test]
	fn query_point_hits_inclusive_bounds() {
		let (world, id) = world_with_box(DVec2::ZERO);
		assert_eq!(world.query_point(DVec2::new(50.0, 25.0)), Some(id));
		assert_eq!(world.query_point(DVec2::new(51.0, 0.0)), None);
	}

	#[test]
	fn ids_are_not_reused() {
		let (mut world, first) = world_with_box(DVec2::ZERO);
		assert!(world.remove(first));
		assert_eq!(world.len(), 0);
		let second = world.create_rectangle(DVec2::ZERO, DVec2::ONE, CARD_MATERIAL);
		assert_ne!(first, second);
		assert!(world.body(first).is_none());
		assert!(world.remove(second));
		assert!(!world.remove(second));
	}

	#[test]
	fn overlapping_bodies_are_separated() {
		let mut world = World::new();
		let a = world.create_rectangle(DVec2::new(0.0, 0.0), DVec2::new(100.0, 100.0), CARD_MATERIAL);
		let b = world.create_rectangle(DVec2::new(80.0, 10.0), DVec2::new(100.0, 100.0), CARD_MATERIAL);
		world.set_velocity(a, DVec2::new(4.0, 0.0));
		world.step();
		let (ra, rb) = (world.body(a).unwrap().rect(), world.body(b).unwrap().rect());
		assert!(rb.center.x - ra.center.x >= 100.0 - 1e-9);
		// b was at rest and got knocked along +x
		assert!(world.body(b).unwrap().velocity.x > 0.0);
	}

	#[test]
	fn static_bodies_are_immovable_in_contacts() {
		let mut world = World::new();
		let wall = world.create_rectangle(DVec2::ZERO, DVec2::new(100.0, 100.0), CARD_MATERIAL);
		let ball = world.create_rectangle(DVec2::new(90.0, 0.0), DVec2::new(100.0, 100.0), CARD_MATERIAL);
		world.set_static(wall, true);
		world.step();
		assert_eq!(world.body(wall).unwrap().position, DVec2::ZERO);
		assert!((world.body(ball).unwrap().position.x - 100.0).abs() < 1e-9);
	}

	#[test]
	fn zero_sized_bodies_stay_finite_and_recover() {
		let mut world = World::new();
		let a = world.create_rectangle(DVec2::ZERO, DVec2::new(100.0, 100.0), CARD_MATERIAL);
		let b = world.create_rectangle(DVec2::new(10.0, 0.0), DVec2::new(100.0, 100.0), CARD_MATERIAL);
		world.set_size(a, DVec2::ZERO);
		world.set_size(b, DVec2::new(f64::NAN, 5.0));
		world.apply_force(a, DVec2::ZERO, DVec2::new(1.0, 0.0));
		world.step();
		for id in [a, b] {
			let body = world.body(id).unwrap();
			assert_eq!(body.size, DVec2::ZERO);
			assert_eq!(body.mass(), 0.0);
			assert!(body.position.is_finite() && body.velocity.is_finite());
		}

		world.set_size(a, DVec2::new(100.0, 100.0));
		world.set_size(b, DVec2::new(100.0, 100.0));
		world.step();
		let (ra, rb) = (world.body(a).unwrap().rect(), world.body(b).unwrap().rect());
		assert!(ra.center.is_finite() && rb.center.is_finite());
		assert!(rb.center.x - ra.center.x >= 100.0 - 1e-9);
	}
}
