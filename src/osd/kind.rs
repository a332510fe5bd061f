use thiserror::Error;

use super::Dimensions;
use crate::{font::GlyphKind, osd::overlay::ResolutionMode};


pub mod dimensions {
	use crate::osd::Dimensions;

	pub const DJI_SD: Dimensions = Dimensions::new(30, 15);
	pub const DJI_HD: Dimensions = Dimensions::new(50, 18);
	pub const DJI_FAKE_HD: Dimensions = Dimensions::new(60, 22);
	pub const WSA: Dimensions = Dimensions::new(53, 20);
}

/// OSD layout announced by a dump header
#[derive(Debug, strum::Display, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Kind {
	DJI_SD,
	DJI_HD,
	DJI_FakeHD,
	WSA,
}

impl Kind {
	pub const fn dimensions_tiles(&self) -> Dimensions {
		use Kind::*;
		match self {
			DJI_SD => dimensions::DJI_SD,
			DJI_HD => dimensions::DJI_HD,
			DJI_FakeHD => dimensions::DJI_FAKE_HD,
			WSA => dimensions::WSA,
		}
	}

	pub const fn glyph_kind(&self) -> GlyphKind {
		use Kind::*;
		match self {
			DJI_SD | WSA => GlyphKind::SD,
			DJI_HD | DJI_FakeHD => GlyphKind::HD,
		}
	}

	pub const fn resolution_mode(&self) -> ResolutionMode {
		use Kind::*;
		match self {
			DJI_SD => ResolutionMode::SD,
			DJI_HD => ResolutionMode::HD,
			DJI_FakeHD => ResolutionMode::FakeHD,
			WSA => ResolutionMode::FullHD,
		}
	}
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid OSD dimensions: {0}")]
pub struct InvalidDimensionsError(pub Dimensions);

impl TryFrom<Dimensions> for Kind {
	type Error = InvalidDimensionsError;

	/// Only the DJI layouts can be inferred from dimensions, Walksnail dumps are identified by their header
	fn try_from(dimensions_tiles: Dimensions) -> Result<Self, Self::Error> {
		match dimensions_tiles {
			dimensions::DJI_SD => Ok(Self::DJI_SD),
			dimensions::DJI_HD => Ok(Self::DJI_HD),
			dimensions::DJI_FAKE_HD => Ok(Self::DJI_FakeHD),
			_ => Err(InvalidDimensionsError(dimensions_tiles)),
		}
	}
}
