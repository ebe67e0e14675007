use glam::DVec2;

/// Axis-aligned rectangle described by its center and full size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub center: DVec2,
	pub size: DVec2,
}

impl Rect {
	pub fn new(center: DVec2, size: DVec2) -> Self {
		Self { center, size }
	}

	pub fn half(&self) -> DVec2 {
		self.size * 0.5
	}

	pub fn min(&self) -> DVec2 {
		self.center - self.half()
	}

	pub fn max(&self) -> DVec2 {
		self.center + self.half()
	}
}

/// Gap between the nearest edges of two rectangles, zero when they touch or overlap.
pub fn edge_distance(a: &Rect, b: &Rect) -> f64 {
	let gap = (a.center - b.center).abs() - (a.half() + b.half());
	gap.max(DVec2::ZERO).length()
}

/// Inclusive on every edge.
pub fn point_in_rect(point: DVec2, rect: &Rect) -> bool {
	let (min, max) = (rect.min(), rect.max());
	point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
		Rect::new(DVec2::new(x, y), DVec2::new(w, h))
	}

	#[test]
	fn disjoint_on_x_axis() {
		let d = edge_distance(&rect(0.0, 0.0, 10.0, 10.0), &rect(100.0, 0.0, 10.0, 10.0));
		assert_eq!(d, 90.0);
	}

	#[test]
	fn diagonal_gap_uses_both_axes() {
		let d = edge_distance(&rect(0.0, 0.0, 10.0, 10.0), &rect(13.0, 9.0, 10.0, 10.0));
		assert_eq!(d, 3.0);
		// 3-4-5 gap between nearest corners
		let d = edge_distance(&rect(0.0, 0.0, 10.0, 10.0), &rect(13.0, 14.0, 10.0, 10.0));
		assert_eq!(d, 5.0);
	}

	#[test]
	fn overlapping_and_touching_are_zero() {
		let a = rect(0.0, 0.0, 20.0, 20.0);
		assert_eq!(edge_distance(&a, &rect(5.0, 5.0, 20.0, 20.0)), 0.0);
		assert_eq!(edge_distance(&a, &rect(20.0, 0.0, 20.0, 20.0)), 0.0);
		assert_eq!(edge_distance(&a, &a), 0.0);
	}

	#[test]
	fn edge_distance_is_not_center_distance() {
		let a = rect(0.0, 0.0, 100.0, 10.0);
		let b = rect(120.0, 0.0, 100.0, 10.0);
		assert_eq!(edge_distance(&a, &b), 20.0);
		assert_eq!(edge_distance(&a, &b), edge_distance(&b, &a));
	}

	#[test]
	fn point_in_rect_includes_edges() {
		let r = rect(50.0, 50.0, 20.0, 10.0);
		assert!(point_in_rect(DVec2::new(50.0, 50.0), &r));
		assert!(point_in_rect(DVec2::new(40.0, 45.0), &r));
		assert!(point_in_rect(DVec2::new(60.0, 55.0), &r));
		assert!(!point_in_rect(DVec2::new(60.1, 50.0), &r));
		assert!(!point_in_rect(DVec2::new(50.0, 44.9), &r));
	}
}
