use std::fmt;

use log::error;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
	#[error("unsupported color format: {0}")]
	Unsupported(String),
	#[error("invalid hex color: {0}")]
	MalformedHex(String),
	#[error("invalid HSL color string: {0}")]
	MalformedHsl(String),
	#[error("invalid RGB color string: {0}")]
	MalformedRgb(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
	pub h: f64,
	pub s: f64,
	pub l: f64,
}

impl Hsl {
	pub const BLACK: Self = Self {
		h: 0.0,
		s: 0.0,
		l: 0.0,
	};
}

impl fmt::Display for Hsl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
	}
}

pub const PALETTE_SATURATION: f64 = 70.0;
pub const PALETTE_LIGHTNESS: f64 = 50.0;

/// `n` hues evenly spaced around the circle starting at 0, rounded to whole degrees.
pub fn distinct_hues(n: usize) -> Vec<Hsl> {
	let step = 360.0 / n.max(1) as f64;
	(0..n)
		.map(|i| Hsl {
			h: (step * i as f64).round(),
			s: PALETTE_SATURATION,
			l: PALETTE_LIGHTNESS,
		})
		.collect()
}

pub fn parse_hsl(color: &str) -> Result<Hsl, ColorError> {
	let malformed = || ColorError::MalformedHsl(color.to_string());
	let trimmed = color.trim();
	let body = trimmed
		.get(..4)
		.filter(|prefix| prefix.eq_ignore_ascii_case("hsl("))
		.and_then(|_| trimmed[4..].strip_suffix(')'))
		.ok_or_else(malformed)?;

	let parts: Vec<f64> = body
		.split(',')
		.map(|part| part.trim().trim_end_matches('%').parse::<f64>())
		.collect::<Result<_, _>>()
		.map_err(|_| malformed())?;
	match parts[..] {
		[h, s, l] => Ok(Hsl { h, s, l }),
		_ => Err(malformed()),
	}
}

fn parse_hex_rgb(color: &str) -> Result<[u8; 3], ColorError> {
	let malformed = || ColorError::MalformedHex(color.to_string());
	let digits = color.strip_prefix('#').ok_or_else(malformed)?;
	if !digits.is_ascii() {
		return Err(malformed());
	}
	let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| malformed());
	match digits.len() {
		6 => Ok([
			channel(&digits[0..2])?,
			channel(&digits[2..4])?,
			channel(&digits[4..6])?,
		]),
		3 => {
			let mut rgb = [0u8; 3];
			for (slot, i) in rgb.iter_mut().zip(0..3) {
				*slot = channel(&digits[i..i + 1])? * 17;
			}
			Ok(rgb)
		}
		_ => Err(malformed()),
	}
}

pub fn hex_to_hsl(color: &str) -> Result<Hsl, ColorError> {
	let [r, g, b] = parse_hex_rgb(color)?.map(|c| c as f64 / 255.0);
	let (max, min) = (r.max(g).max(b), r.min(g).min(b));
	let l = (max + min) / 2.0;

	let (h, s) = if max == min {
		(0.0, 0.0)
	} else {
		let d = max - min;
		let s = if l > 0.5 {
			d / (2.0 - max - min)
		} else {
			d / (max + min)
		};
		let h = if max == r {
			(g - b) / d + if g < b { 6.0 } else { 0.0 }
		} else if max == g {
			(b - r) / d + 2.0
		} else {
			(r - g) / d + 4.0
		};
		(h / 6.0, s)
	};

	Ok(Hsl {
		h: (360.0 * h).round(),
		s: (100.0 * s).round(),
		l: (100.0 * l).round(),
	})
}

fn to_hsl(color: &str) -> Result<Hsl, ColorError> {
	if color.starts_with("hsl") {
		// A broken hsl() string degrades to black rather than passing through.
		Ok(parse_hsl(color).unwrap_or_else(|err| {
			error!("{err}");
			Hsl::BLACK
		}))
	} else if color.starts_with('#') {
		hex_to_hsl(color)
	} else {
		Err(ColorError::Unsupported(color.to_string()))
	}
}

fn shift_lightness(color: &str, delta: f64) -> String {
	match to_hsl(color) {
		Ok(mut hsl) => {
			hsl.l = (hsl.l + delta).clamp(0.0, 100.0);
			hsl.to_string()
		}
		Err(err) => {
			error!("cannot adjust lightness: {err}");
			color.to_string()
		}
	}
}

/// Lowers lightness by `percent` points, floored at 0. Unsupported inputs pass through.
pub fn darken(color: &str, percent: f64) -> String {
	shift_lightness(color, -percent)
}

pub fn lighten(color: &str, percent: f64) -> String {
	shift_lightness(color, percent)
}

fn rgb_channels(color: &str) -> Result<[u32; 3], ColorError> {
	let numbers: Vec<u32> = color
		.split(|c: char| !c.is_ascii_digit())
		.filter(|s| !s.is_empty())
		.take(3)
		.filter_map(|s| s.parse().ok())
		.collect();
	match numbers[..] {
		[r, g, b] => Ok([r, g, b]),
		_ => Err(ColorError::MalformedRgb(color.to_string())),
	}
}

fn try_with_opacity(color: &str, alpha: f64) -> Result<String, ColorError> {
	if color.starts_with('#') {
		let [r, g, b] = parse_hex_rgb(color)?;
		Ok(format!("rgba({r}, {g}, {b}, {alpha})"))
	} else if color.starts_with("rgb") {
		let [r, g, b] = rgb_channels(color)?;
		Ok(format!("rgba({r}, {g}, {b}, {alpha})"))
	} else if color.starts_with("hsl") {
		let body = color
			.strip_prefix("hsl")
			.and_then(|rest| rest.trim_end().strip_suffix(')'))
			.ok_or_else(|| ColorError::MalformedHsl(color.to_string()))?;
		Ok(format!("hsla{body}, {alpha})"))
	} else {
		Err(ColorError::Unsupported(color.to_string()))
	}
}

/// Re-emits `color` with an alpha channel: hex and rgb become rgba, hsl becomes hsla.
pub fn with_opacity(color: &str, alpha: f64) -> String {
	match try_with_opacity(color, alpha) {
		Ok(out) => out,
		Err(ColorError::Unsupported(_)) => color.to_string(),
		Err(err) => {
			error!("cannot apply opacity: {err}");
			color.to_string()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hues_are_evenly_spaced_from_zero() {
		for n in 1..=12 {
			let hues = distinct_hues(n);
			assert_eq!(hues.len(), n);
			for (i, hsl) in hues.iter().enumerate() {
				assert_eq!(hsl.h, (360.0 / n as f64 * i as f64).round());
				assert_eq!(hsl.s, 70.0);
				assert_eq!(hsl.l, 50.0);
			}
		}
		assert!(distinct_hues(0).is_empty());
	}

	#[test]
	fn palette_is_deterministic() {
		assert_eq!(distinct_hues(7), distinct_hues(7));
		assert_eq!(distinct_hues(4)[1].to_string(), "hsl(90, 70%, 50%)");
	}

	#[test]
	fn darken_hsl_floors_at_zero() {
		assert_eq!(darken("hsl(120, 70%, 50%)", 40.0), "hsl(120, 70%, 10%)");
		assert_eq!(darken("hsl(120, 70%, 30%)", 40.0), "hsl(120, 70%, 0%)");
	}

	#[test]
	fn darken_hex_goes_through_hsl() {
		assert_eq!(darken("#ff0000", 20.0), "hsl(0, 100%, 30%)");
		assert_eq!(darken("#fff", 10.0), "hsl(0, 0%, 90%)");
	}

	#[test]
	fn lighten_caps_at_hundred() {
		assert_eq!(lighten("hsl(10, 50%, 80%)", 40.0), "hsl(10, 50%, 100%)");
	}

	#[test]
	fn darken_passes_unsupported_through() {
		assert_eq!(darken("rebeccapurple", 10.0), "rebeccapurple");
		assert_eq!(darken("#zzzzzz", 10.0), "#zzzzzz");
	}

	#[test]
	fn malformed_hsl_falls_back_to_black() {
		assert!(parse_hsl("hsl(oops)").is_err());
		assert_eq!(darken("hsl(oops)", 10.0), "hsl(0, 0%, 0%)");
	}

	#[test]
	fn hex_conversion_matches_known_values() {
		assert_eq!(
			hex_to_hsl("#268bd9").unwrap(),
			Hsl {
				h: 206.0,
				s: 70.0,
				l: 50.0
			}
		);
		assert_eq!(hex_to_hsl("#808080").unwrap().s, 0.0);
	}

	#[test]
	fn opacity_formats() {
		assert_eq!(with_opacity("#268bd9", 0.4), "rgba(38, 139, 217, 0.4)");
		assert_eq!(
			with_opacity("rgb(1, 2, 3)", 0.5),
			"rgba(1, 2, 3, 0.5)"
		);
		assert_eq!(
			with_opacity("hsl(51, 70%, 50%)", 0.4),
			"hsla(51, 70%, 50%, 0.4)"
		);
		assert_eq!(with_opacity("white", 0.4), "white");
	}
}
