use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, MouseEvent, TouchEvent, Window};

use super::render::{self, DomPresenter, HeaderElements};
use super::state::SimulationContext;

type SharedState = Rc<RefCell<Option<SimulationContext>>>;

#[derive(Clone, Copy)]
enum HeaderLink {
	Title,
	Icon,
}

fn viewport_size(window: &Window) -> Option<DVec2> {
	Some(DVec2::new(
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn open_link(link: &str) {
	if let Some(window) = web_sys::window() {
		if window.open_with_url_and_target(link, "_blank").is_err() {
			error!("failed to open {link}");
		}
	}
}

/// Pointer position relative to the network element.
fn local_point(target: &NodeRef<leptos::html::Div>, client_x: i32, client_y: i32) -> DVec2 {
	let client = DVec2::new(client_x as f64, client_y as f64);
	match target.get() {
		Some(el) => {
			let rect = el.get_bounding_client_rect();
			client - DVec2::new(rect.left(), rect.top())
		}
		None => client,
	}
}

fn with_state<R>(state: &SharedState, f: impl FnOnce(&mut SimulationContext) -> R) -> Option<R> {
	state.borrow_mut().as_mut().map(f)
}

/// Full-screen field of floating project cards with its page header.
#[component]
pub fn ProjectField(
	#[prop(into)] title: String,
	#[prop(into)] subtitle: String,
	#[prop(into)] title_link: String,
	#[prop(into)] social_link: String,
) -> impl IntoView {
	let network_ref = NodeRef::<leptos::html::Div>::new();
	let glow_ref = NodeRef::<leptos::html::Div>::new();
	let title_ref = NodeRef::<leptos::html::H1>::new();
	let subtitle_ref = NodeRef::<leptos::html::P>::new();
	let icon_ref = NodeRef::<leptos::html::Span>::new();

	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let glow_cb: Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init, glow_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone(), glow_cb.clone());

	Effect::new(move |_| {
		let (Some(network), Some(glow), Some(title), Some(subtitle), Some(icon)) = (
			network_ref.get(),
			glow_ref.get(),
			title_ref.get(),
			subtitle_ref.get(),
			icon_ref.get(),
		) else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(viewport) = viewport_size(&window) else {
			error!("viewport size unavailable");
			return;
		};

		let glow: HtmlElement = glow.into();
		*state_init.borrow_mut() = Some(SimulationContext::new(viewport, js_sys::Math::random));
		let presenter = Rc::new(RefCell::new(DomPresenter::new(
			network.into(),
			glow.clone(),
			HeaderElements {
				title: title.into(),
				subtitle: subtitle.into(),
				icon: icon.into(),
			},
		)));
		info!("project field started at {}x{}", viewport.x, viewport.y);

		let state_resize = state_init.clone();
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(viewport) = web_sys::window().as_ref().and_then(viewport_size) else {
				return;
			};
			let mut guard = state_resize.borrow_mut();
			if let Some(s) = guard.as_mut() {
				s.resize(viewport);
				return;
			}
			// Torn down before the resize arrived: start over.
			*guard = Some(SimulationContext::new(viewport, js_sys::Math::random));
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let glow_follow = glow.clone();
		*glow_cb_init.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			let _ = render::place_glow(&glow_follow, ev.client_x() as f64, ev.client_y() as f64);
		}));
		if let Some(ref cb) = *glow_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				if let Err(err) = presenter.borrow_mut().sync(s) {
					error!("frame sync failed: {err:?}");
				}
				s.run_hover_check();
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let point = local_point(&network_ref, ev.client_x(), ev.client_y());
		with_state(&state_md, |s| s.pointer_down(point, ev.time_stamp()));
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let point = local_point(&network_ref, ev.client_x(), ev.client_y());
		with_state(&state_mm, |s| s.pointer_move(point));
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let point = local_point(&network_ref, ev.client_x(), ev.client_y());
		// Open outside the borrow: the new tab can steal focus synchronously.
		let link = with_state(&state_mu, |s| s.pointer_up(point, ev.time_stamp())).flatten();
		if let Some(link) = link {
			open_link(link);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&state_ml, |s| s.pointer_leave());
	};

	let state_ts = state.clone();
	let on_touchstart = move |ev: TouchEvent| {
		if let Some(touch) = ev.touches().get(0) {
			let point = local_point(&network_ref, touch.client_x(), touch.client_y());
			with_state(&state_ts, |s| s.touch_start(point));
		}
	};

	let state_tm = state.clone();
	let on_touchmove = move |ev: TouchEvent| {
		if let Some(touch) = ev.touches().get(0) {
			let point = local_point(&network_ref, touch.client_x(), touch.client_y());
			with_state(&state_tm, |s| s.touch_move(point));
		}
	};

	let state_te = state.clone();
	let on_touchend = move |ev: TouchEvent| {
		let point = ev
			.changed_touches()
			.get(0)
			.map(|t| local_point(&network_ref, t.client_x(), t.client_y()));
		let link = with_state(&state_te, |s| s.touch_end(point, ev.time_stamp())).flatten();
		if let Some(link) = link {
			// Suppresses the emulated mouse events and click.
			ev.prevent_default();
			open_link(link);
		}
	};

	let state_tc = state.clone();
	let on_touchcancel = move |ev: TouchEvent| {
		with_state(&state_tc, |s| s.touch_cancel(ev.time_stamp()));
	};

	let accent = move |link: HeaderLink, lit: bool| {
		let state = state.clone();
		move |_: MouseEvent| {
			let Some(header) = with_state(&state, |s| {
				s.set_accent_hover(lit);
				s.header_style()
			}) else {
				return;
			};
			let result = match link {
				HeaderLink::Title => title_ref
					.get()
					.map(|el| render::highlight_title(&el, &header, lit)),
				HeaderLink::Icon => icon_ref
					.get()
					.map(|el| render::highlight_icon(&el, &header, lit)),
			};
			if let Some(Err(err)) = result {
				error!("header highlight failed: {err:?}");
			}
		}
	};

	view! {
		// Overlays the field so both share the viewport's coordinate space.
		<header
			class="page-header"
			style="position: absolute; top: 0; left: 0; width: 100%; z-index: 2; text-align: center; pointer-events: none;"
		>
			<a
				href=title_link
				class="main-title-link"
				style="pointer-events: auto; text-decoration: none; color: inherit;"
				on:mouseenter=accent(HeaderLink::Title, true)
				on:mouseleave=accent(HeaderLink::Title, false)
			>
				<h1 node_ref=title_ref class="main-title">{title}</h1>
			</a>
			<p node_ref=subtitle_ref class="main-subtitle">{subtitle}</p>
			<a
				href=social_link
				target="_blank"
				class="x-icon-link"
				style="pointer-events: auto; display: inline-block;"
				on:mouseenter=accent(HeaderLink::Icon, true)
				on:mouseleave=accent(HeaderLink::Icon, false)
			>
				<span node_ref=icon_ref class="x-icon-container" style="display: inline-block;" />
			</a>
		</header>
		<div
			node_ref=network_ref
			class="network"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:touchstart=on_touchstart
			on:touchmove=on_touchmove
			on:touchend=on_touchend
			on:touchcancel=on_touchcancel
			style="position: relative; width: 100vw; min-height: 100vh; overflow: hidden;"
		/>
		<div
			node_ref=glow_ref
			class="cursor-glow"
			style="position: fixed; left: 0; top: 0; border-radius: 50%; transform: translate(-50%, -50%); pointer-events: none; z-index: 3;"
		/>
	}
}
