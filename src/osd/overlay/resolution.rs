use strum::{Display, EnumIter, EnumString};

use crate::{
	dimensions::Dimensions as GenericDimensions,
	font::GlyphKind,
	osd::{kind, Dimensions},
};


pub type Resolution = GenericDimensions<u32>;

/// OSD rendering mode, each mode has its own display grid and glyph kind
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ResolutionMode {
	SD,
	HD,
	#[strum(to_string = "FakeHD", serialize = "fake-hd")]
	FakeHD,
	#[strum(to_string = "FullHD", serialize = "full-hd")]
	FullHD,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString)]
pub enum AspectRatio {
	#[strum(to_string = "4:3")]
	Standard,
	#[default]
	#[strum(to_string = "16:9")]
	Wide,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementStrategy {
	/// glyphs are resized to the cell size and placed directly on the canvas
	Direct,
	/// the grid is composed at the native glyph size then the whole image is resized to the canvas
	NativeThenRescale,
}

/// Geometry of the rendered overlay for a resolution mode and aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
	pub display_grid: Dimensions,
	pub glyph_kind: GlyphKind,
	pub canvas: Resolution,
	pub strategy: PlacementStrategy,
}

impl Layout {
	pub const fn new(mode: ResolutionMode, aspect_ratio: AspectRatio) -> Self {
		use AspectRatio::*;
		use ResolutionMode::*;
		let (display_grid, glyph_kind, strategy) = match mode {
			SD => (kind::dimensions::DJI_SD, GlyphKind::SD, PlacementStrategy::Direct),
			HD => (kind::dimensions::DJI_HD, GlyphKind::HD, PlacementStrategy::Direct),
			FakeHD => (kind::dimensions::DJI_FAKE_HD, GlyphKind::HD, PlacementStrategy::NativeThenRescale),
			FullHD => (kind::dimensions::WSA, GlyphKind::SD, PlacementStrategy::Direct),
		};
		let canvas = match (mode, aspect_ratio) {
			(SD | HD | FakeHD, Standard) => Resolution::new(960, 720),
			(SD | HD | FakeHD, Wide) => Resolution::new(1280, 720),
			(FullHD, Standard) => Resolution::new(1440, 1080),
			(FullHD, Wide) => Resolution::new(1920, 1080),
		};
		Self {
			display_grid,
			glyph_kind,
			canvas,
			strategy,
		}
	}

	/// Size every glyph is resized to for direct placement
	pub const fn cell_dimensions(&self) -> Resolution {
		Resolution::new(
			self.canvas.width / self.display_grid.width as u32,
			self.canvas.height / self.display_grid.height as u32,
		)
	}

	/// Pixel rectangle of a cell on the canvas as `(left, top, right, bottom)`, right and bottom excluded
	pub const fn cell_rect(&self, x: u32, y: u32) -> (u32, u32, u32, u32) {
		let (columns, rows) = (self.display_grid.width as u32, self.display_grid.height as u32);
		(
			x * self.canvas.width / columns,
			y * self.canvas.height / rows,
			(x + 1) * self.canvas.width / columns,
			(y + 1) * self.canvas.height / rows,
		)
	}
}
