use glam::DVec2;
use log::{debug, warn};

use super::forces::{ForceParams, apply_force_field, keep_in_bounds};
use super::geometry::Rect;
use super::interaction::{
	EMULATED_MOUSE_MS, HoverTracker, PointerMachine, PointerOutcome, TouchTracker,
};
use super::physics::World;
use super::registry::{Node, NodeRegistry};
use super::scale::{
	ACCENT_COLOR, GlowStyle, HeaderStyle, compute_glow_style, compute_header_style, compute_scale,
};
use super::types::DeviceClass;

/// What the cursor glow is currently tinted for.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GlowTarget {
	#[default]
	Empty,
	Node(usize),
	/// Page title or social link.
	Accent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
	Rebuilt,
	Rescaled,
}

/// Everything the landing page simulates, owned by the component and handed
/// to each subsystem by reference.
pub struct SimulationContext {
	pub world: World,
	registry: Option<NodeRegistry>,
	viewport: DVec2,
	scale: f64,
	pointer: PointerMachine,
	hover: HoverTracker,
	touch: TouchTracker,
	/// Timestamp of the last touch end, to drop the mouse events browsers emulate after it.
	last_touch_end: Option<f64>,
	glow: GlowTarget,
	accent_hovered: bool,
	random: Box<dyn FnMut() -> f64>,
	generation: u64,
	style_revision: u64,
}

impl SimulationContext {
	pub fn new(viewport: DVec2, random: impl FnMut() -> f64 + 'static) -> Self {
		let mut ctx = Self {
			world: World::new(),
			registry: None,
			viewport,
			scale: 1.0,
			pointer: PointerMachine::default(),
			hover: HoverTracker::default(),
			touch: TouchTracker::default(),
			last_touch_end: None,
			glow: GlowTarget::Empty,
			accent_hovered: false,
			random: Box::new(random),
			generation: 0,
			style_revision: 0,
		};
		ctx.resize(viewport);
		ctx
	}

	pub fn viewport(&self) -> DVec2 {
		self.viewport
	}

	pub fn scale(&self) -> f64 {
		self.scale
	}

	pub fn center(&self) -> DVec2 {
		self.viewport / 2.0
	}

	pub fn device(&self) -> DeviceClass {
		self.registry
			.as_ref()
			.map(NodeRegistry::device)
			.unwrap_or_else(|| DeviceClass::from_width(self.viewport.x))
	}

	pub fn nodes(&self) -> &[Node] {
		self.registry.as_ref().map(NodeRegistry::nodes).unwrap_or(&[])
	}

	/// Bumped whenever the node set is rebuilt; elements must be recreated.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Bumped whenever node styles change without a rebuild.
	pub fn style_revision(&self) -> u64 {
		self.style_revision
	}

	/// Recomputes scale and device class. Crossing the breakpoint (or having no
	/// layout at all) rebuilds every node; otherwise nodes are rescaled in place.
	pub fn resize(&mut self, viewport: DVec2) -> ResizeOutcome {
		let device = DeviceClass::from_width(viewport.x);
		let scale = compute_scale(viewport, device);
		let (old_scale, old_center) = (self.scale, self.center());
		self.viewport = viewport;
		self.scale = scale;

		match self.registry.take() {
			Some(registry) if registry.device() == device => {
				self.registry = Some(registry);
				self.rescale(old_center, scale / old_scale);
				ResizeOutcome::Rescaled
			}
			previous => {
				match previous {
					Some(registry) => {
						debug!("device class changed to {:?}, rebuilding", device);
						registry.teardown(&mut self.world);
					}
					None => warn!("resize without a layout, initialising {:?}", device),
				}
				self.rebuild(device);
				ResizeOutcome::Rebuilt
			}
		}
	}

	fn rebuild(&mut self, device: DeviceClass) {
		self.pointer = PointerMachine::default();
		self.hover = HoverTracker::default();
		self.touch = TouchTracker::default();
		self.glow = if self.accent_hovered {
			GlowTarget::Accent
		} else {
			GlowTarget::Empty
		};
		self.registry = Some(NodeRegistry::build(
			&mut self.world,
			device,
			self.scale,
			self.viewport,
			&mut self.random,
		));
		self.generation += 1;
		self.style_revision += 1;
	}

	fn rescale(&mut self, old_center: DVec2, factor: f64) {
		let Some(registry) = self.registry.as_mut() else {
			return;
		};
		if !registry.device().is_mobile() && factor.is_finite() && factor > 0.0 {
			let center = self.viewport / 2.0;
			for node in registry.nodes() {
				let Some(body) = self.world.body(node.body) else {
					continue;
				};
				let position = center + (body.position - old_center) * factor;
				let velocity = body.velocity * factor;
				self.world.set_position(node.body, position);
				self.world.set_velocity(node.body, velocity);
			}
		}
		registry.resize_in_place(&mut self.world, self.scale, self.viewport);
		registry.mirror(&self.world);
		self.style_revision += 1;
		debug!("rescaled nodes by {factor:.3}");
	}

	/// One physics tick: force field, integration, then the bounds keeper.
	/// Mobile layouts are static and skip the simulation.
	pub fn tick(&mut self) {
		// A collapsed viewport has nothing to simulate.
		if !self.scale.is_finite() || self.scale <= 0.0 {
			return;
		}
		let Some(registry) = self.registry.as_ref() else {
			return;
		};
		if registry.device().is_mobile() {
			return;
		}
		let held = self
			.pointer
			.held()
			.and_then(|i| registry.get(i))
			.map(|n| n.body);
		let (center, params) = (self.center(), ForceParams::for_scale(self.scale));
		apply_force_field(&mut self.world, registry, center, &params, held);
		self.world.step();
		keep_in_bounds(&mut self.world, registry, self.viewport);
	}

	/// Copies body positions into the on-screen boxes, after they were drawn.
	pub fn mirror(&mut self) {
		if let Some(registry) = self.registry.as_mut() {
			registry.mirror(&self.world);
		}
	}

	/// Runs the single hover hit test queued since the last frame, if any.
	pub fn run_hover_check(&mut self) {
		let Some(point) = self.hover.take_pending() else {
			return;
		};
		let hit = self.registry.as_ref().and_then(|r| r.hit_test(point));
		if self.hover.update(hit) {
			self.refresh_glow();
		}
	}

	fn refresh_glow(&mut self) {
		self.glow = match (self.accent_hovered, self.hover.hovered()) {
			(true, _) => GlowTarget::Accent,
			(false, Some(node)) => GlowTarget::Node(node),
			(false, None) => GlowTarget::Empty,
		};
	}

	fn node_center(&self, index: usize) -> Option<DVec2> {
		self.nodes().get(index).map(|n| n.rendered.center)
	}

	fn link(&self, index: usize) -> Option<&'static str> {
		self.nodes().get(index).map(|n| n.project.link)
	}

	pub fn pointer_down(&mut self, point: DVec2, at_ms: f64) {
		if self
			.last_touch_end
			.is_some_and(|ended| at_ms - ended < EMULATED_MOUSE_MS)
		{
			return;
		}
		// Grabs go through the bodies, like the physics mouse constraint.
		let hit = self
			.world
			.query_point(point)
			.and_then(|body| self.registry.as_ref()?.index_of(body))
			.and_then(|i| self.node_center(i).map(|c| (i, c)));
		self.pointer.press(point, at_ms, hit);
	}

	pub fn pointer_move(&mut self, point: DVec2) {
		if self.pointer.is_idle() {
			self.hover.queue(point);
			return;
		}
		let outcome = self.pointer.move_to(point);
		self.apply_pointer(outcome);
	}

	/// Returns the link to open when the release resolved as a click.
	pub fn pointer_up(&mut self, point: DVec2, at_ms: f64) -> Option<&'static str> {
		let outcome = self.pointer.release(point, at_ms);
		self.hover.queue(point);
		self.apply_pointer(outcome)
	}

	pub fn pointer_leave(&mut self) {
		let outcome = self.pointer.cancel();
		self.apply_pointer(outcome);
		if self.hover.clear() {
			self.refresh_glow();
		}
	}

	fn apply_pointer(&mut self, outcome: PointerOutcome) -> Option<&'static str> {
		let movable = !self.device().is_mobile();
		match outcome {
			PointerOutcome::Nothing => None,
			PointerOutcome::Click { node } => self.link(node),
			PointerOutcome::Drag {
				node,
				position,
				started,
			} => {
				let body = self.nodes().get(node).map(|n| n.body)?;
				if movable {
					if started {
						self.world.set_static(body, true);
					}
					self.world.set_position(body, position);
					self.world.set_velocity(body, DVec2::ZERO);
				}
				None
			}
			PointerOutcome::DragEnded { node } => {
				let body = self.nodes().get(node).map(|n| n.body)?;
				if movable {
					self.world.set_static(body, false);
					self.world.set_velocity(body, DVec2::ZERO);
				}
				None
			}
		}
	}

	pub fn touch_start(&mut self, point: DVec2) {
		let hit = self.registry.as_ref().and_then(|r| r.hit_test(point));
		self.touch.start(point, hit);
	}

	pub fn touch_move(&mut self, point: DVec2) {
		self.touch.move_to(point);
	}

	/// Returns the link to open when the touch resolved as a tap.
	pub fn touch_end(&mut self, point: Option<DVec2>, at_ms: f64) -> Option<&'static str> {
		self.last_touch_end = Some(at_ms);
		self.touch.end(point).and_then(|node| self.link(node))
	}

	pub fn touch_cancel(&mut self, at_ms: f64) {
		self.last_touch_end = Some(at_ms);
		self.touch.cancel();
	}

	/// Pointer entered or left the page title / social links.
	pub fn set_accent_hover(&mut self, hovered: bool) {
		self.accent_hovered = hovered;
		self.refresh_glow();
	}

	pub fn is_hovered(&self, index: usize) -> bool {
		self.hover.hovered() == Some(index)
	}

	pub fn is_touched(&self, index: usize) -> bool {
		self.touch.active() == Some(index)
	}

	pub fn glow_style(&self) -> GlowStyle {
		let color = match self.glow {
			GlowTarget::Empty => None,
			GlowTarget::Node(i) => self.nodes().get(i).map(|n| n.color.as_str()),
			GlowTarget::Accent => Some(ACCENT_COLOR),
		};
		compute_glow_style(color, self.scale)
	}

	pub fn header_style(&self) -> HeaderStyle {
		compute_header_style(self.scale)
	}

	/// The custom cursor only makes sense with a mouse.
	pub fn cursor_glow_visible(&self) -> bool {
		!self.device().is_mobile()
	}

	/// Box to draw node `index` at, read straight from its body.
	pub fn node_box(&self, index: usize) -> Option<Rect> {
		let node = self.nodes().get(index)?;
		let body = self.world.body(node.body)?;
		Some(Rect::new(body.position, node.size))
	}

	/// Feeds back the laid-out height of a fluid card.
	pub fn report_measured_height(&mut self, index: usize, height: f64) {
		let (scale, viewport) = (self.scale, self.viewport);
		let Some(registry) = self.registry.as_mut() else {
			return;
		};
		if registry.set_measured_height(&mut self.world, index, height, scale, viewport) {
			self.style_revision += 1;
		}
	}
}
