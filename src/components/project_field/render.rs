use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use super::registry::Node;
use super::scale::{GlowStyle, HeaderStyle, StyleSnapshot};
use super::state::SimulationContext;

fn px(v: f64) -> String {
	format!("{v}px")
}

fn create(document: &Document, tag: &str, class: &str) -> Result<HtmlElement, JsValue> {
	let el: HtmlElement = document.create_element(tag)?.dyn_into()?;
	el.set_class_name(class);
	Ok(el)
}

struct NodeElement {
	root: HtmlElement,
	title: HtmlElement,
	description: HtmlElement,
	/// Last (hovered, touched) pair written, to skip redundant style writes.
	highlight: Option<(bool, bool)>,
}

impl NodeElement {
	fn create(document: &Document, node: &Node) -> Result<Self, JsValue> {
		let root = create(document, "div", "node")?;
		// Out of flow: the translate transform alone places the card.
		let css = root.style();
		css.set_property("position", "absolute")?;
		css.set_property("left", "0")?;
		css.set_property("top", "0")?;
		css.set_property("box-sizing", "content-box")?;
		let title = create(document, "h2", "node-title")?;
		title.set_text_content(Some(node.project.title));
		let description = create(document, "p", "node-description")?;
		description.set_text_content(Some(node.project.description));
		root.append_child(&title)?;
		root.append_child(&description)?;
		if node.project.team {
			let badge = create(document, "span", "node-badge")?;
			badge.set_text_content(Some("Team"));
			badge
				.style()
				.set_property("background-color", &node.style.badge)?;
			root.append_child(&badge)?;
		}
		Ok(Self {
			root,
			title,
			description,
			highlight: None,
		})
	}

	fn apply_style(&mut self, style: &StyleSnapshot, fluid_width: f64) -> Result<(), JsValue> {
		let css = self.root.style();
		let width = style
			.inner_width
			.unwrap_or(fluid_width - 2.0 * style.frame());
		css.set_property("width", &px(width))?;
		match style.inner_height {
			Some(h) => css.set_property("height", &px(h))?,
			None => css.set_property("height", "auto")?,
		}
		css.set_property(
			"border",
			&format!("{}px solid {}", style.border, style.border_color),
		)?;
		css.set_property("border-radius", &px(style.radius))?;
		css.set_property("padding", &px(style.padding))?;
		css.set_property("background-color", &style.background)?;
		css.set_property("opacity", &style.opacity.to_string())?;
		css.set_property("font-size", &px(style.font))?;
		self.title
			.style()
			.set_property("font-size", &px(style.title_font))?;
		self.description
			.style()
			.set_property("font-size", &px(style.description_font))?;
		// Forces the glow to be rewritten at the new scale.
		self.highlight = None;
		Ok(())
	}

	fn apply_highlight(
		&mut self,
		style: &StyleSnapshot,
		hovered: bool,
		touched: bool,
	) -> Result<(), JsValue> {
		if self.highlight == Some((hovered, touched)) {
			return Ok(());
		}
		let lit = hovered || touched;
		let css = self.root.style();
		css.set_property("filter", style.filter(lit))?;
		css.set_property("box-shadow", &style.box_shadow(lit))?;
		self.root.class_list().toggle_with_force("touch-active", touched)?;
		self.highlight = Some((hovered, touched));
		Ok(())
	}
}

/// Header elements scaled alongside the cards.
pub struct HeaderElements {
	pub title: HtmlElement,
	pub subtitle: HtmlElement,
	pub icon: HtmlElement,
}

/// Mirrors a [`SimulationContext`] into DOM elements once per frame.
pub struct DomPresenter {
	container: HtmlElement,
	glow: HtmlElement,
	header: HeaderElements,
	elements: Vec<NodeElement>,
	generation: u64,
	style_revision: u64,
	glow_style: Option<GlowStyle>,
}

impl DomPresenter {
	pub fn new(container: HtmlElement, glow: HtmlElement, header: HeaderElements) -> Self {
		Self {
			container,
			glow,
			header,
			elements: Vec::new(),
			generation: 0,
			style_revision: 0,
			glow_style: None,
		}
	}

	pub fn sync(&mut self, ctx: &mut SimulationContext) -> Result<(), JsValue> {
		if self.generation != ctx.generation() {
			self.rebuild(ctx)?;
		}
		if self.style_revision != ctx.style_revision() {
			self.restyle(ctx)?;
		}

		for (i, (el, node)) in self.elements.iter_mut().zip(ctx.nodes()).enumerate() {
			let Some(rect) = ctx.node_box(i) else {
				continue;
			};
			let corner = rect.min();
			el.root.style().set_property(
				"transform",
				&format!("translate({}px, {}px)", corner.x, corner.y),
			)?;
			el.apply_highlight(&node.style, ctx.is_hovered(i), ctx.is_touched(i))?;
		}

		let glow = ctx.glow_style();
		if self.glow_style.as_ref() != Some(&glow) {
			let css = self.glow.style();
			css.set_property("width", &px(glow.size))?;
			css.set_property("height", &px(glow.size))?;
			css.set_property("background", &glow.background)?;
			css.set_property("box-shadow", &glow.box_shadow)?;
			self.glow.class_list().toggle_with_force("hovered", glow.hovered)?;
			self.glow_style = Some(glow);
		}

		if ctx.device().is_mobile() {
			self.measure(ctx);
		}
		ctx.mirror();
		Ok(())
	}

	fn rebuild(&mut self, ctx: &SimulationContext) -> Result<(), JsValue> {
		for el in self.elements.drain(..) {
			el.root.remove();
		}
		let document = self
			.container
			.owner_document()
			.ok_or_else(|| JsValue::from_str("container is detached"))?;
		for node in ctx.nodes() {
			let el = NodeElement::create(&document, node)?;
			self.container.append_child(&el.root)?;
			self.elements.push(el);
		}

		let visible = ctx.cursor_glow_visible();
		self.glow
			.style()
			.set_property("display", if visible { "block" } else { "none" })?;
		self.container
			.style()
			.set_property("cursor", if visible { "none" } else { "default" })?;
		self.generation = ctx.generation();
		self.style_revision = 0;
		Ok(())
	}

	fn restyle(&mut self, ctx: &SimulationContext) -> Result<(), JsValue> {
		for (el, node) in self.elements.iter_mut().zip(ctx.nodes()) {
			el.apply_style(&node.style, node.size.x)?;
		}

		let header = ctx.header_style();
		self.header
			.title
			.style()
			.set_property("font-size", &px(header.title_font))?;
		self.header
			.subtitle
			.style()
			.set_property("font-size", &px(header.subtitle_font))?;
		let icon = self.header.icon.style();
		icon.set_property("width", &px(header.icon_size))?;
		icon.set_property("height", &px(header.icon_size))?;

		// Stacked cards scroll, so the container grows with them.
		let bottom = ctx
			.nodes()
			.iter()
			.map(|n| n.rendered.max().y)
			.fold(ctx.viewport().y, f64::max);
		self.container
			.style()
			.set_property("min-height", &px(bottom))?;

		self.style_revision = ctx.style_revision();
		Ok(())
	}

	fn measure(&self, ctx: &mut SimulationContext) {
		let heights: Vec<f64> = self
			.elements
			.iter()
			.map(|el| el.root.offset_height() as f64)
			.collect();
		for (i, height) in heights.into_iter().enumerate() {
			ctx.report_measured_height(i, height);
		}
	}
}

pub fn highlight_title(title: &HtmlElement, style: &HeaderStyle, lit: bool) -> Result<(), JsValue> {
	let css = title.style();
	css.set_property("filter", if lit { "brightness(1.2)" } else { "" })?;
	css.set_property("text-shadow", &style.title_shadow(lit))?;
	Ok(())
}

pub fn highlight_icon(icon: &HtmlElement, style: &HeaderStyle, lit: bool) -> Result<(), JsValue> {
	icon.style().set_property("filter", &style.icon_filter(lit))
}

/// Moves the cursor glow to the pointer.
pub fn place_glow(glow: &HtmlElement, x: f64, y: f64) -> Result<(), JsValue> {
	let css = glow.style();
	css.set_property("left", &px(x))?;
	css.set_property("top", &px(y))?;
	Ok(())
}
