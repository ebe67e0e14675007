//! Pointer, hover and touch state machines. They only see hit-test results
//! and report what happened; applying outcomes to bodies and elements is the
//! caller's job.

use glam::DVec2;

/// Pointer travel (px) that turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;
/// Longest press (ms) that still counts as a click.
pub const CLICK_MAX_MS: f64 = 300.0;
/// Finger travel (px) beyond which a touch is a scroll rather than a tap.
pub const TAP_THRESHOLD: f64 = 10.0;
/// After a touch ends, mouse presses this soon (ms) are the browser's
/// emulated compatibility events and are ignored.
pub const EMULATED_MOUSE_MS: f64 = 800.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerState {
	#[default]
	Idle,
	Pressed {
		node: usize,
		start: DVec2,
		/// Pointer minus node center at grab time.
		offset: DVec2,
		at_ms: f64,
	},
	Dragging {
		node: usize,
		offset: DVec2,
	},
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerOutcome {
	Nothing,
	/// The node should be pinned at `position`; `started` marks the promotion move.
	Drag {
		node: usize,
		position: DVec2,
		started: bool,
	},
	DragEnded {
		node: usize,
	},
	Click {
		node: usize,
	},
}

#[derive(Clone, Debug, Default)]
pub struct PointerMachine {
	state: PointerState,
}

impl PointerMachine {
	pub fn is_idle(&self) -> bool {
		self.state == PointerState::Idle
	}

	/// Node currently being dragged.
	pub fn held(&self) -> Option<usize> {
		match self.state {
			PointerState::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}

	/// `hit` is the node under the pointer and its center. A press while
	/// another press is in progress is ignored.
	pub fn press(&mut self, point: DVec2, at_ms: f64, hit: Option<(usize, DVec2)>) {
		if !self.is_idle() {
			return;
		}
		if let Some((node, center)) = hit {
			self.state = PointerState::Pressed {
				node,
				start: point,
				offset: point - center,
				at_ms,
			};
		}
	}

	pub fn move_to(&mut self, point: DVec2) -> PointerOutcome {
		match self.state {
			PointerState::Idle => PointerOutcome::Nothing,
			PointerState::Pressed {
				node,
				start,
				offset,
				..
			} => {
				if point.distance(start) < DRAG_THRESHOLD {
					return PointerOutcome::Nothing;
				}
				self.state = PointerState::Dragging { node, offset };
				PointerOutcome::Drag {
					node,
					position: point - offset,
					started: true,
				}
			}
			PointerState::Dragging { node, offset } => PointerOutcome::Drag {
				node,
				position: point - offset,
				started: false,
			},
		}
	}

	pub fn release(&mut self, point: DVec2, at_ms: f64) -> PointerOutcome {
		let outcome = match self.state {
			PointerState::Idle => PointerOutcome::Nothing,
			PointerState::Pressed {
				node,
				start,
				at_ms: pressed_at,
				..
			} => {
				let still = point.distance(start) < DRAG_THRESHOLD;
				let quick = at_ms - pressed_at < CLICK_MAX_MS;
				if still && quick {
					PointerOutcome::Click { node }
				} else {
					PointerOutcome::Nothing
				}
			}
			PointerState::Dragging { node, .. } => PointerOutcome::DragEnded { node },
		};
		self.state = PointerState::Idle;
		outcome
	}

	/// Pointer left the surface: end any drag, never click.
	pub fn cancel(&mut self) -> PointerOutcome {
		let outcome = match self.state {
			PointerState::Dragging { node, .. } => PointerOutcome::DragEnded { node },
			_ => PointerOutcome::Nothing,
		};
		self.state = PointerState::Idle;
		outcome
	}
}

/// Coalesces pointer moves into at most one hit test per frame.
#[derive(Clone, Debug, Default)]
pub struct HoverTracker {
	hovered: Option<usize>,
	pending: Option<DVec2>,
}

impl HoverTracker {
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Records a pointer position for the next frame. Returns `false` when a
	/// check was already pending; the newer position replaces it.
	pub fn queue(&mut self, point: DVec2) -> bool {
		self.pending.replace(point).is_none()
	}

	pub fn take_pending(&mut self) -> Option<DVec2> {
		self.pending.take()
	}

	/// Returns whether the hovered node changed.
	pub fn update(&mut self, hit: Option<usize>) -> bool {
		if hit == self.hovered {
			return false;
		}
		self.hovered = hit;
		true
	}

	pub fn clear(&mut self) -> bool {
		self.pending = None;
		self.update(None)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TouchContact {
	node: Option<usize>,
	start: DVec2,
	last: DVec2,
}

/// Tap-versus-scroll detection for touch screens. Touches never drag.
#[derive(Clone, Debug, Default)]
pub struct TouchTracker {
	contact: Option<TouchContact>,
}

impl TouchTracker {
	pub fn active(&self) -> Option<usize> {
		self.contact.and_then(|c| c.node)
	}

	/// Starts a contact; returns the node that should glow while touched.
	pub fn start(&mut self, point: DVec2, hit: Option<usize>) -> Option<usize> {
		self.contact = Some(TouchContact {
			node: hit,
			start: point,
			last: point,
		});
		hit
	}

	pub fn move_to(&mut self, point: DVec2) {
		if let Some(contact) = &mut self.contact {
			contact.last = point;
		}
	}

	/// Ends the contact and returns the tapped node, if the finger stayed put.
	/// `point` is the lift-off position when known, otherwise the last move.
	pub fn end(&mut self, point: Option<DVec2>) -> Option<usize> {
		let contact = self.contact.take()?;
		let end = point.unwrap_or(contact.last);
		contact
			.node
			.filter(|_| end.distance(contact.start) < TAP_THRESHOLD)
	}

	pub fn cancel(&mut self) {
		self.contact = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn p(x: f64, y: f64) -> DVec2 {
		DVec2::new(x, y)
	}

	#[test]
	fn quick_still_press_is_a_click() {
		let mut m = PointerMachine::default();
		m.press(p(100.0, 100.0), 0.0, Some((3, p(90.0, 95.0))));
		assert_eq!(m.move_to(p(102.0, 101.0)), PointerOutcome::Nothing);
		assert_eq!(m.held(), None);
		assert_eq!(
			m.release(p(103.0, 102.0), 120.0),
			PointerOutcome::Click { node: 3 }
		);
		assert!(m.is_idle());
	}

	#[test]
	fn slow_press_is_not_a_click() {
		let mut m = PointerMachine::default();
		m.press(p(0.0, 0.0), 0.0, Some((1, p(0.0, 0.0))));
		assert_eq!(m.release(p(0.0, 0.0), 800.0), PointerOutcome::Nothing);
	}

	#[test]
	fn movement_past_threshold_promotes_before_release() {
		let mut m = PointerMachine::default();
		m.press(p(100.0, 100.0), 0.0, Some((2, p(90.0, 80.0))));
		assert_eq!(
			m.move_to(p(105.0, 100.0)),
			PointerOutcome::Drag {
				node: 2,
				position: p(95.0, 80.0),
				started: true
			}
		);
		assert_eq!(m.held(), Some(2));
		assert_eq!(
			m.move_to(p(200.0, 300.0)),
			PointerOutcome::Drag {
				node: 2,
				position: p(190.0, 280.0),
				started: false
			}
		);
		// Returning to the start point within the click window is still a drag end.
		assert_eq!(
			m.release(p(100.0, 100.0), 50.0),
			PointerOutcome::DragEnded { node: 2 }
		);
		assert!(m.is_idle());
	}

	#[test]
	fn release_far_away_without_moves_is_not_a_click() {
		let mut m = PointerMachine::default();
		m.press(p(0.0, 0.0), 0.0, Some((0, p(0.0, 0.0))));
		assert_eq!(m.release(p(40.0, 0.0), 10.0), PointerOutcome::Nothing);
	}

	#[test]
	fn press_on_empty_space_stays_idle() {
		let mut m = PointerMachine::default();
		m.press(p(0.0, 0.0), 0.0, None);
		assert!(m.is_idle());
		assert_eq!(m.move_to(p(50.0, 50.0)), PointerOutcome::Nothing);
		assert_eq!(m.release(p(50.0, 50.0), 10.0), PointerOutcome::Nothing);
	}

	#[test]
	fn second_press_does_not_replace_the_first() {
		let mut m = PointerMachine::default();
		m.press(p(0.0, 0.0), 0.0, Some((0, p(0.0, 0.0))));
		m.press(p(500.0, 500.0), 10.0, Some((4, p(500.0, 500.0))));
		assert_eq!(m.release(p(0.0, 0.0), 20.0), PointerOutcome::Click { node: 0 });
	}

	#[test]
	fn cancel_ends_drag_without_click() {
		let mut m = PointerMachine::default();
		m.press(p(0.0, 0.0), 0.0, Some((5, p(0.0, 0.0))));
		assert_eq!(m.cancel(), PointerOutcome::Nothing);
		m.press(p(0.0, 0.0), 0.0, Some((5, p(0.0, 0.0))));
		m.move_to(p(20.0, 0.0));
		assert_eq!(m.cancel(), PointerOutcome::DragEnded { node: 5 });
		assert!(m.is_idle());
	}

	#[test]
	fn hover_checks_are_coalesced() {
		let mut h = HoverTracker::default();
		assert!(h.queue(p(1.0, 1.0)));
		assert!(!h.queue(p(2.0, 2.0)));
		assert!(!h.queue(p(3.0, 3.0)));
		assert_eq!(h.take_pending(), Some(p(3.0, 3.0)));
		assert_eq!(h.take_pending(), None);
		assert!(h.queue(p(4.0, 4.0)));
	}

	#[test]
	fn hover_reports_only_changes() {
		let mut h = HoverTracker::default();
		assert!(h.update(Some(1)));
		assert!(!h.update(Some(1)));
		assert!(h.update(Some(2)));
		assert_eq!(h.hovered(), Some(2));
		assert!(h.clear());
		assert!(!h.clear());
		assert_eq!(h.hovered(), None);
	}

	#[test]
	fn short_touch_is_a_tap() {
		let mut t = TouchTracker::default();
		assert_eq!(t.start(p(10.0, 10.0), Some(4)), Some(4));
		assert_eq!(t.active(), Some(4));
		t.move_to(p(14.0, 13.0));
		assert_eq!(t.end(None), Some(4));
		assert_eq!(t.active(), None);
	}

	#[test]
	fn scrolling_touch_is_not_a_tap() {
		let mut t = TouchTracker::default();
		t.start(p(10.0, 10.0), Some(1));
		t.move_to(p(10.0, 60.0));
		assert_eq!(t.end(None), None);
		assert_eq!(t.active(), None);
	}

	#[test]
	fn touch_cancel_releases_glow() {
		let mut t = TouchTracker::default();
		t.start(p(0.0, 0.0), Some(2));
		t.cancel();
		assert_eq!(t.active(), None);
		assert_eq!(t.end(Some(p(0.0, 0.0))), None);
	}
}
