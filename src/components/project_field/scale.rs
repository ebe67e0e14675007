//! Viewport → scale mapping and the style table every card metric is derived from.

use glam::DVec2;

use super::color::{darken, lighten, with_opacity};
use super::types::{DeviceClass, Project};

/// Base metrics, in pixels at `scale == 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
	pub base_width: f64,
	pub base_height: f64,
	pub border: f64,
	pub radius: f64,
	pub padding: f64,
	pub font: f64,
	pub title_font: f64,
	pub description_font: f64,
	pub glow_blur: f64,
	pub hover_glow_blur: f64,
	/// Horizontal page margin around fluid cards.
	pub margin: f64,
	/// Vertical gap between stacked cards.
	pub gap: f64,
	/// Space reserved above the first stacked card for the page header.
	pub header_offset: f64,
}

pub const DESKTOP_LAYOUT: LayoutParams = LayoutParams {
	base_width: 2200.0,
	base_height: 1200.0,
	border: 2.0,
	radius: 32.0,
	padding: 12.0,
	font: 16.0,
	title_font: 24.0,
	description_font: 16.0,
	glow_blur: 20.0,
	hover_glow_blur: 30.0,
	margin: 0.0,
	gap: 0.0,
	header_offset: 0.0,
};

pub const MOBILE_LAYOUT: LayoutParams = LayoutParams {
	base_width: 480.0,
	base_height: 900.0,
	margin: 24.0,
	gap: 16.0,
	header_offset: 220.0,
	..DESKTOP_LAYOUT
};

impl DeviceClass {
	pub fn layout(self) -> &'static LayoutParams {
		match self {
			Self::Desktop => &DESKTOP_LAYOUT,
			Self::Mobile => &MOBILE_LAYOUT,
		}
	}
}

/// `min(w / base_w, h / base_h)`. Deliberately unclamped.
pub fn compute_scale(viewport: DVec2, device: DeviceClass) -> f64 {
	let layout = device.layout();
	(viewport.x / layout.base_width).min(viewport.y / layout.base_height)
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleSnapshot {
	/// `None` when the card is fluid and sized by its container.
	pub inner_width: Option<f64>,
	/// `None` when the height follows the content.
	pub inner_height: Option<f64>,
	pub border: f64,
	pub radius: f64,
	pub padding: f64,
	pub font: f64,
	pub title_font: f64,
	pub description_font: f64,
	pub glow_blur: f64,
	pub hover_glow_blur: f64,
	pub border_color: String,
	pub background: String,
	/// Fill of the "Team" badge.
	pub badge: String,
	pub opacity: f64,
}

impl StyleSnapshot {
	/// Border plus padding on one side.
	pub fn frame(&self) -> f64 {
		self.border + self.padding
	}

	/// Border-box size, known only for fixed-size cards.
	pub fn outer_size(&self) -> Option<DVec2> {
		let frame = 2.0 * self.frame();
		Some(DVec2::new(
			self.inner_width? + frame,
			self.inner_height? + frame,
		))
	}

	pub fn box_shadow(&self, hovered: bool) -> String {
		let blur = if hovered {
			self.hover_glow_blur
		} else {
			self.glow_blur
		};
		format!("0 0 {blur}px {}", self.border_color)
	}

	pub fn filter(&self, hovered: bool) -> &'static str {
		if hovered {
			"brightness(1.2)"
		} else {
			"brightness(1)"
		}
	}

	/// Height guess for fluid cards before the browser has laid them out:
	/// one title line and two description lines.
	pub fn estimated_height(&self) -> f64 {
		2.0 * self.frame() + self.title_font * 1.25 + self.description_font * 1.4 * 2.0
	}
}

pub fn compute_node_style(
	project: &Project,
	border_color: &str,
	scale: f64,
	device: DeviceClass,
) -> StyleSnapshot {
	let layout = device.layout();
	let fixed = |v: f64| (!device.is_mobile()).then_some(v * scale);
	StyleSnapshot {
		inner_width: fixed(project.width),
		inner_height: fixed(project.height),
		border: layout.border * scale,
		radius: layout.radius * scale,
		padding: layout.padding * scale,
		font: layout.font * scale,
		title_font: layout.title_font * scale,
		description_font: layout.description_font * scale,
		glow_blur: layout.glow_blur * scale,
		hover_glow_blur: layout.hover_glow_blur * scale,
		border_color: border_color.to_string(),
		background: darken(border_color, 40.0),
		badge: lighten(border_color, 20.0),
		opacity: 0.9,
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderStyle {
	pub title_font: f64,
	pub subtitle_font: f64,
	pub icon_size: f64,
	pub title_glow: f64,
	pub icon_glow: f64,
}

impl HeaderStyle {
	/// Text shadow for the title link; empty clears it.
	pub fn title_shadow(&self, lit: bool) -> String {
		if lit {
			format!("0 0 {}px rgba(255, 255, 255, 0.8)", self.title_glow)
		} else {
			String::new()
		}
	}

	pub fn icon_filter(&self, lit: bool) -> String {
		if lit {
			format!("drop-shadow(0 0 {}px rgba(255, 255, 255, 0.8))", self.icon_glow)
		} else {
			String::new()
		}
	}
}

pub fn compute_header_style(scale: f64) -> HeaderStyle {
	HeaderStyle {
		title_font: 48.0 * scale,
		subtitle_font: 16.0 * scale,
		icon_size: 28.0 * scale,
		title_glow: 30.0 * scale,
		icon_glow: 5.0 * scale,
	}
}

/// Accent used when the pointer is over the page title or social links.
pub const ACCENT_COLOR: &str = "#268bd9";

#[derive(Clone, Debug, PartialEq)]
pub struct GlowStyle {
	pub size: f64,
	pub background: String,
	pub box_shadow: String,
	pub hovered: bool,
}

/// Cursor-follower styling: tinted by `color` when over something, white otherwise.
pub fn compute_glow_style(color: Option<&str>, scale: f64) -> GlowStyle {
	let (blur, spread) = (30.0 * scale, 15.0 * scale);
	let (background, shadow) = match color {
		Some(color) => (color.to_string(), with_opacity(color, 0.4)),
		None => (
			"rgba(255, 255, 255, 1)".to_string(),
			"rgba(255, 255, 255, 0.3)".to_string(),
		),
	};
	GlowStyle {
		size: 15.0 * scale,
		background,
		box_shadow: format!("0 0 {blur}px {spread}px {shadow}"),
		hovered: color.is_some(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::project_field::types::{DESKTOP_PROJECTS, MOBILE_PROJECTS};

	#[test]
	fn header_glows_scale_and_clear() {
		let h = compute_header_style(0.5);
		assert_eq!(h.title_font, 24.0);
		assert_eq!(h.title_shadow(true), "0 0 15px rgba(255, 255, 255, 0.8)");
		assert_eq!(h.icon_filter(true), "drop-shadow(0 0 2.5px rgba(255, 255, 255, 0.8))");
		assert!(h.title_shadow(false).is_empty());
		assert!(h.icon_filter(false).is_empty());
	}

	#[test]
	fn scale_is_min_of_axis_ratios() {
		let s = compute_scale(DVec2::new(1100.0, 1200.0), DeviceClass::Desktop);
		assert_eq!(s, 0.5);
		let s = compute_scale(DVec2::new(2200.0, 600.0), DeviceClass::Desktop);
		assert_eq!(s, 0.5);
	}

	#[test]
	fn doubling_viewport_doubles_scale() {
		for (w, h) in [(1280.0, 720.0), (1920.0, 1080.0), (375.0, 812.0)] {
			let device = DeviceClass::from_width(w);
			let a = compute_scale(DVec2::new(w, h), device);
			let b = compute_scale(DVec2::new(w * 2.0, h * 2.0), device);
			assert!((b - 2.0 * a).abs() < 1e-12);
		}
	}

	#[test]
	fn scale_is_uncapped() {
		let s = compute_scale(DVec2::new(8800.0, 4800.0), DeviceClass::Desktop);
		assert_eq!(s, 4.0);
	}

	#[test]
	fn linear_metrics_scale_proportionally() {
		let project = &DESKTOP_PROJECTS[0];
		let a = compute_node_style(project, "hsl(0, 70%, 50%)", 0.5, DeviceClass::Desktop);
		let b = compute_node_style(project, "hsl(0, 70%, 50%)", 1.0, DeviceClass::Desktop);
		assert_eq!(a.inner_width.unwrap() * 2.0, b.inner_width.unwrap());
		assert_eq!(a.border * 2.0, b.border);
		assert_eq!(a.radius * 2.0, b.radius);
		assert_eq!(a.title_font * 2.0, b.title_font);
		assert_eq!(a.outer_size().unwrap() * 2.0, b.outer_size().unwrap());
	}

	#[test]
	fn desktop_outer_size_includes_frame() {
		let style = compute_node_style(
			&DESKTOP_PROJECTS[0],
			"hsl(0, 70%, 50%)",
			1.0,
			DeviceClass::Desktop,
		);
		assert_eq!(style.outer_size(), Some(DVec2::new(280.0 + 28.0, 150.0 + 28.0)));
		assert_eq!(style.background, "hsl(0, 70%, 10%)");
		assert_eq!(style.badge, "hsl(0, 70%, 70%)");
		assert_eq!(style.box_shadow(false), "0 0 20px hsl(0, 70%, 50%)");
		assert_eq!(style.box_shadow(true), "0 0 30px hsl(0, 70%, 50%)");
	}

	#[test]
	fn mobile_cards_are_fluid() {
		let style = compute_node_style(
			&MOBILE_PROJECTS[0],
			"hsl(0, 70%, 50%)",
			1.0,
			DeviceClass::Mobile,
		);
		assert_eq!(style.inner_width, None);
		assert_eq!(style.outer_size(), None);
		assert!(style.estimated_height() > 2.0 * style.frame());
	}

	#[test]
	fn glow_follows_hover_color() {
		let neutral = compute_glow_style(None, 1.0);
		assert_eq!(neutral.box_shadow, "0 0 30px 15px rgba(255, 255, 255, 0.3)");
		assert!(!neutral.hovered);
		let tinted = compute_glow_style(Some("hsl(51, 70%, 50%)"), 2.0);
		assert_eq!(tinted.background, "hsl(51, 70%, 50%)");
		assert_eq!(tinted.box_shadow, "0 0 60px 30px hsla(51, 70%, 50%, 0.4)");
		assert_eq!(tinted.size, 30.0);
	}
}
