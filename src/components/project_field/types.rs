/// Viewport width (inclusive) at or below which the mobile layout is used.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Project {
	pub title: &'static str,
	pub description: &'static str,
	pub link: &'static str,
	/// Nominal desktop width in pixels, zero on mobile where the card is fluid.
	pub width: f64,
	pub height: f64,
	pub team: bool,
}

impl Project {
	const fn desktop(
		title: &'static str,
		description: &'static str,
		link: &'static str,
		width: f64,
		height: f64,
		team: bool,
	) -> Self {
		Self {
			title,
			description,
			link,
			width,
			height,
			team,
		}
	}

	const fn mobile(
		title: &'static str,
		description: &'static str,
		link: &'static str,
		team: bool,
	) -> Self {
		Self::desktop(title, description, link, 0.0, 0.0, team)
	}
}

pub const DESKTOP_PROJECTS: &[Project] = &[
	Project::desktop(
		"PaintSwap",
		"The ultimate open NFT marketplace",
		"https://paintswap.finance",
		280.0,
		150.0,
		true,
	),
	Project::desktop(
		"TinySwap",
		"Simple crypto swap and bridge",
		"https://tinyswap.app",
		160.0,
		180.0,
		false,
	),
	Project::desktop(
		"Sonic Music",
		"Music visualizer of the Sonic network",
		"https://music.paintoshi.dev",
		210.0,
		110.0,
		false,
	),
	Project::desktop(
		"Estfor Kingdom",
		"A play-to-earn medieval fantasy idle game",
		"https://estfor.com",
		280.0,
		150.0,
		true,
	),
	Project::desktop(
		"Auth.Cash",
		"Web3 Account validator",
		"https://auth.cash",
		170.0,
		170.0,
		false,
	),
	Project::desktop(
		"Speed Checker",
		"Compare the finality of different EVM networks",
		"https://speedchecker.paintswap.io",
		260.0,
		130.0,
		true,
	),
	Project::desktop(
		"$BRUSH",
		"Latest price",
		"https://brush.paintoshi.dev",
		140.0,
		120.0,
		false,
	),
];

// Team projects lead on phones, where only the first few cards are above the fold.
pub const MOBILE_PROJECTS: &[Project] = &[
	Project::mobile(
		"PaintSwap",
		"The ultimate open NFT marketplace",
		"https://paintswap.finance",
		true,
	),
	Project::mobile(
		"Estfor Kingdom",
		"A play-to-earn medieval fantasy idle game",
		"https://estfor.com",
		true,
	),
	Project::mobile(
		"Speed Checker",
		"Compare the finality of different EVM networks",
		"https://speedchecker.paintswap.io",
		true,
	),
	Project::mobile(
		"TinySwap",
		"Simple crypto swap and bridge",
		"https://tinyswap.app",
		false,
	),
	Project::mobile(
		"Sonic Music",
		"Music visualizer of the Sonic network",
		"https://music.paintoshi.dev",
		false,
	),
	Project::mobile(
		"Auth.Cash",
		"Web3 Account validator",
		"https://auth.cash",
		false,
	),
	Project::mobile(
		"$BRUSH",
		"Latest price",
		"https://brush.paintoshi.dev",
		false,
	),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
	Desktop,
	Mobile,
}

impl DeviceClass {
	pub fn from_width(viewport_width: f64) -> Self {
		if viewport_width <= MOBILE_BREAKPOINT {
			Self::Mobile
		} else {
			Self::Desktop
		}
	}

	pub fn projects(self) -> &'static [Project] {
		match self {
			Self::Desktop => DESKTOP_PROJECTS,
			Self::Mobile => MOBILE_PROJECTS,
		}
	}

	pub fn is_mobile(self) -> bool {
		self == Self::Mobile
	}
}
