use std::{ops::Range, str::FromStr};

use getset::CopyGetters;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::{
	coordinates::{Coordinates, FormatError as CoordinatesFormatError, SignedCoordinate, SignedCoordinates},
	Dimensions,
};
use crate::dimensions::FormatError as DimensionsFormatError;


/// Rectangle of OSD grid cells, left/top inclusive and right/bottom exclusive
///
/// Corners may lie outside of the grid, they are clamped to the grid when the region is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Region {
	left: SignedCoordinate,
	top: SignedCoordinate,
	right: SignedCoordinate,
	bottom: SignedCoordinate,
}

/// Cells of a region which are inside of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSpan {
	pub columns: Range<u32>,
	pub rows: Range<u32>,
}

impl Region {
	pub const fn new(left: SignedCoordinate, top: SignedCoordinate, right: SignedCoordinate, bottom: SignedCoordinate) -> Self {
		Self { left, top, right, bottom }
	}

	pub fn from_origin(top_left_corner: SignedCoordinates, dimensions: Dimensions) -> Self {
		Self::new(
			top_left_corner.x,
			top_left_corner.y,
			top_left_corner.x.saturating_add(dimensions.width as SignedCoordinate),
			top_left_corner.y.saturating_add(dimensions.height as SignedCoordinate),
		)
	}

	pub fn top_left_corner(&self) -> SignedCoordinates {
		SignedCoordinates::new(self.left, self.top)
	}

	pub fn is_empty(&self) -> bool {
		self.left >= self.right || self.top >= self.bottom
	}

	pub fn contains(&self, coordinates: Coordinates) -> bool {
		let (x, y) = (coordinates.x as SignedCoordinate, coordinates.y as SignedCoordinate);
		(self.left..self.right).contains(&x) && (self.top..self.bottom).contains(&y)
	}

	/// Returns the cells of the region inside of a grid of the given dimensions, `None` if there are none
	pub fn clamp_to(&self, grid: Dimensions) -> Option<CellSpan> {
		let clamp = |value: SignedCoordinate, max: u8| value.clamp(0, max as SignedCoordinate) as u32;
		let columns = clamp(self.left, grid.width)..clamp(self.right, grid.width);
		let rows = clamp(self.top, grid.height)..clamp(self.bottom, grid.height);
		if columns.is_empty() || rows.is_empty() {
			None
		} else {
			Some(CellSpan { columns, rows })
		}
	}
}

#[derive(Debug, Error)]
pub enum InvalidRegionString {
	#[error("invalid OSD region `{value}`: {error}")]
	Origin { value: String, error: CoordinatesFormatError },
	#[error("invalid OSD region `{value}`: {error}")]
	Dimensions { value: String, error: DimensionsFormatError },
	#[error("invalid OSD region `{0}`: dimension component cannot be 0")]
	NullDimension(String),
	#[error("invalid OSD region `{0}`: right/bottom edges must be greater than left/top edges")]
	InvertedCorners(String),
	#[error("invalid OSD region format: `{0}`, expected <left>,<top>,<right>,<bottom> or <x>,<y>[:<width>x<height>]")]
	Format(String),
}

impl FromStr for Region {
	type Err = InvalidRegionString;

	/// Accepts `left,top,right,bottom`, `x,y:<width>x<height>` or `x,y` for a single cell
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		lazy_static! {
			static ref EDGES_RE: Regex = Regex::new(r"\A\s*(-?\d{1,3})\s*,\s*(-?\d{1,3})\s*,\s*(-?\d{1,3})\s*,\s*(-?\d{1,3})\s*\z").unwrap();
		}

		if let Some(captures) = EDGES_RE.captures(s) {
			let mut edges = [0 as SignedCoordinate; 4];
			for (edge, capture) in edges.iter_mut().zip(captures.iter().skip(1)) {
				*edge = capture
					.map(|capture| capture.as_str())
					.ok_or_else(|| InvalidRegionString::Format(s.to_owned()))?
					.parse()
					.map_err(|_| InvalidRegionString::Format(s.to_owned()))?;
			}
			let [left, top, right, bottom] = edges;
			let region = Region::new(left, top, right, bottom);
			if region.is_empty() {
				return Err(InvalidRegionString::InvertedCorners(s.to_owned()));
			}
			return Ok(region);
		}

		let (origin_s, dimensions) = match s.split_once(':') {
			Some((origin_s, dimensions_s)) => {
				let dimensions = Dimensions::from_str(dimensions_s.trim()).map_err(|error| InvalidRegionString::Dimensions {
					value: s.to_owned(),
					error,
				})?;
				if dimensions.width == 0 || dimensions.height == 0 {
					return Err(InvalidRegionString::NullDimension(s.to_owned()));
				}
				(origin_s, dimensions)
			},
			None => (s, Dimensions::new(1, 1)),
		};
		let origin = Coordinates::from_str(origin_s).map_err(|error| InvalidRegionString::Origin {
			value: s.to_owned(),
			error,
		})?;
		Ok(Region::from_origin(origin.into(), dimensions))
	}
}
