use std::f64::consts::PI;

use glam::DVec2;
use log::debug;

use super::color::distinct_hues;
use super::forces::ForceParams;
use super::geometry::{Rect, point_in_rect};
use super::physics::{BodyId, CARD_MATERIAL, World};
use super::scale::{StyleSnapshot, compute_node_style};
use super::types::{DeviceClass, Project};

/// Extra distance beyond the safe zone at which desktop cards are spawned.
const SPAWN_MARGIN: f64 = 200.0;

#[derive(Clone, Debug)]
pub struct Node {
	pub project: &'static Project,
	pub body: BodyId,
	/// Palette entry, fixed for the node's lifetime.
	pub color: String,
	pub style: StyleSnapshot,
	/// Border-box size, identical to the body extent.
	pub size: DVec2,
	/// Box last written to the screen.
	pub rendered: Rect,
}

impl Node {
	/// Mean of width and height, used to weigh repulsion ranges.
	pub fn extent(&self) -> f64 {
		(self.size.x + self.size.y) / 2.0
	}
}

#[derive(Debug)]
pub struct NodeRegistry {
	device: DeviceClass,
	nodes: Vec<Node>,
}

impl NodeRegistry {
	/// Creates one body per project of `device`, tinted by an evenly spaced palette.
	pub fn build<R: FnMut() -> f64>(
		world: &mut World,
		device: DeviceClass,
		scale: f64,
		viewport: DVec2,
		random: &mut R,
	) -> Self {
		let projects = device.projects();
		let palette = distinct_hues(projects.len());
		let center = viewport / 2.0;
		let spawn_radius = ForceParams::for_scale(scale).safe_zone + SPAWN_MARGIN;
		let count = projects.len() as f64;

		let nodes = projects
			.iter()
			.zip(palette)
			.enumerate()
			.map(|(i, (project, hue))| {
				let color = hue.to_string();
				let style = compute_node_style(project, &color, scale, device);
				let size = card_size(&style, scale, viewport, device);
				let angle = 2.0 * PI * i as f64 / count;
				let position = center + DVec2::new(angle.cos(), angle.sin()) * spawn_radius;
				let body = world.create_rectangle(position, size, CARD_MATERIAL);
				match device {
					DeviceClass::Desktop => {
						// Biased up and to the left so the cards drift apart immediately.
						let velocity = DVec2::new((random() - 0.8) * 25.0, (random() - 0.8) * 10.0);
						world.set_velocity(body, velocity);
					}
					DeviceClass::Mobile => world.set_static(body, true),
				}
				Node {
					project,
					body,
					color,
					style,
					size,
					rendered: Rect::new(position, size),
				}
			})
			.collect();

		let mut registry = Self { device, nodes };
		if device.is_mobile() {
			registry.restack(world, scale, viewport);
		}
		debug!("built {:?} layout with {} nodes", device, registry.nodes.len());
		registry
	}

	pub fn device(&self) -> DeviceClass {
		self.device
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn get(&self, index: usize) -> Option<&Node> {
		self.nodes.get(index)
	}

	pub fn index_of(&self, body: BodyId) -> Option<usize> {
		self.nodes.iter().position(|n| n.body == body)
	}

	/// Largest node extent, the reference size for repulsion ranges.
	pub fn max_extent(&self) -> f64 {
		self.nodes.iter().map(Node::extent).fold(0.0, f64::max)
	}

	/// Recomputes sizes for a new scale, resizing each body about its center.
	pub fn resize_in_place(&mut self, world: &mut World, scale: f64, viewport: DVec2) {
		for node in &mut self.nodes {
			node.style = compute_node_style(node.project, &node.color, scale, self.device);
			node.size = card_size(&node.style, scale, viewport, self.device);
			world.set_size(node.body, node.size);
		}
		if self.device.is_mobile() {
			self.restack(world, scale, viewport);
		}
	}

	/// Records a content-measured card height. Only fluid (mobile) cards
	/// follow their content; returns whether the layout changed.
	pub fn set_measured_height(
		&mut self,
		world: &mut World,
		index: usize,
		height: f64,
		scale: f64,
		viewport: DVec2,
	) -> bool {
		if !self.device.is_mobile() {
			return false;
		}
		let Some(node) = self.nodes.get_mut(index) else {
			return false;
		};
		if (node.size.y - height).abs() < 0.5 || height <= 0.0 {
			return false;
		}
		node.size.y = height;
		world.set_size(node.body, node.size);
		self.restack(world, scale, viewport);
		true
	}

	/// Stacks cards in a centered column below the page header.
	fn restack(&mut self, world: &mut World, scale: f64, viewport: DVec2) {
		let layout = self.device.layout();
		let mut top = layout.header_offset * scale;
		for node in &mut self.nodes {
			let center = DVec2::new(viewport.x / 2.0, top + node.size.y / 2.0);
			world.set_position(node.body, center);
			node.rendered = Rect::new(center, node.size);
			top += node.size.y + layout.gap * scale;
		}
	}

	/// Copies body boxes into the on-screen rectangles used for hit testing.
	pub fn mirror(&mut self, world: &World) {
		for node in &mut self.nodes {
			if let Some(body) = world.body(node.body) {
				node.rendered = body.rect();
			}
		}
	}

	/// First node whose on-screen box contains `point`.
	pub fn hit_test(&self, point: DVec2) -> Option<usize> {
		self.nodes
			.iter()
			.position(|n| point_in_rect(point, &n.rendered))
	}

	/// Removes every body this registry owns from `world`.
	pub fn teardown(self, world: &mut World) {
		for node in &self.nodes {
			world.remove(node.body);
		}
		debug!("tore down {:?} layout, {} bodies left", self.device, world.len());
	}
}

fn card_size(style: &StyleSnapshot, scale: f64, viewport: DVec2, device: DeviceClass) -> DVec2 {
	style.outer_size().unwrap_or_else(|| {
		let margin = device.layout().margin * scale;
		DVec2::new((viewport.x - 2.0 * margin).max(0.0), style.estimated_height())
	})
}
