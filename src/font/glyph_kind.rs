use strum::{Display, EnumIter};

use crate::dimensions::Dimensions;


/// Size class of a font: the SD fonts are drawn for the 30x15 DJI grid, the HD fonts for the denser HD grids
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum GlyphKind {
	SD,
	HD,
}

impl GlyphKind {
	/// dimensions of the glyphs in the raw `.bin` font files
	pub const fn native_dimensions(&self) -> Dimensions<u32> {
		match self {
			GlyphKind::SD => Dimensions::new(36, 54),
			GlyphKind::HD => Dimensions::new(24, 36),
		}
	}

	/// suffix appended to the font basename to find the files of this kind
	pub const fn basename_suffix(&self) -> &'static str {
		match self {
			GlyphKind::SD => "",
			GlyphKind::HD => "_hd",
		}
	}
}
