use getset::{CopyGetters, Getters};
use thiserror::Error;

use super::{Coordinates, Dimensions, Region};
use crate::font::CharacterCode;


#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("a {dimensions} character grid needs {} codes, got {actual}", dimensions.area())]
pub struct InvalidGridSize {
	pub dimensions: Dimensions,
	pub actual: usize,
}

/// Character codes of an OSD screen stored row-major, code 0 being an empty cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, CopyGetters)]
pub struct CharacterGrid {
	#[getset(get_copy = "pub")]
	dimensions: Dimensions,
	#[getset(get = "pub")]
	codes: Vec<CharacterCode>,
}

impl CharacterGrid {
	pub fn new(dimensions: Dimensions, codes: Vec<CharacterCode>) -> Result<Self, InvalidGridSize> {
		if codes.len() as u64 != dimensions.area() {
			return Err(InvalidGridSize {
				dimensions,
				actual: codes.len(),
			});
		}
		Ok(Self { dimensions, codes })
	}

	/// Builds a grid from codes stored column by column
	pub fn from_column_major(dimensions: Dimensions, codes: &[CharacterCode]) -> Result<Self, InvalidGridSize> {
		if codes.len() as u64 != dimensions.area() {
			return Err(InvalidGridSize {
				dimensions,
				actual: codes.len(),
			});
		}
		let (width, height) = (dimensions.width as usize, dimensions.height as usize);
		let mut row_major = Vec::with_capacity(codes.len());
		for y in 0..height {
			row_major.extend((0..width).map(|x| codes[y + x * height]));
		}
		Ok(Self { dimensions, codes: row_major })
	}

	/// Size in bytes of a grid stored as little endian `u16` codes
	pub const fn payload_len(dimensions: Dimensions) -> usize {
		dimensions.width as usize * dimensions.height as usize * 2
	}

	pub fn blank(dimensions: Dimensions) -> Self {
		Self {
			dimensions,
			codes: vec![0; dimensions.area() as usize],
		}
	}

	fn offset(&self, coordinates: Coordinates) -> Option<usize> {
		(coordinates.x < self.dimensions.width && coordinates.y < self.dimensions.height)
			.then(|| coordinates.y as usize * self.dimensions.width as usize + coordinates.x as usize)
	}

	/// Returns the code at the coordinates, `None` outside of the grid
	pub fn get(&self, coordinates: Coordinates) -> Option<CharacterCode> {
		self.offset(coordinates).map(|offset| self.codes[offset])
	}

	/// Sets the code of a cell, writes outside of the grid are ignored
	pub fn set(&mut self, coordinates: Coordinates, code: CharacterCode) {
		if let Some(offset) = self.offset(coordinates) {
			self.codes[offset] = code;
		}
	}

	/// Iterates over the non-empty cells in row-major order
	pub fn enumerate(&self) -> impl Iterator<Item = (Coordinates, CharacterCode)> + '_ {
		let width = self.dimensions.width as usize;
		self.codes
			.iter()
			.enumerate()
			.filter(|(_, code)| **code != 0)
			.map(move |(offset, code)| (Coordinates::new((offset % width) as u8, (offset / width) as u8), *code))
	}

	/// Coordinates of the cells holding one of the given codes
	pub fn find_codes<'a>(&'a self, codes: &'a [CharacterCode]) -> impl Iterator<Item = Coordinates> + 'a {
		self.enumerate().filter(|(_, code)| codes.contains(code)).map(|(coordinates, _)| coordinates)
	}

	pub fn highest_code(&self) -> CharacterCode {
		self.codes.iter().copied().max().unwrap_or(0)
	}

	pub fn is_blank(&self) -> bool {
		self.codes.iter().all(|code| *code == 0)
	}

	pub fn erase_region(&mut self, region: &Region) {
		let Some(span) = region.clamp_to(self.dimensions) else { return };
		let width = self.dimensions.width as usize;
		for y in span.rows {
			let row_offset = y as usize * width;
			self.codes[row_offset + span.columns.start as usize..row_offset + span.columns.end as usize].fill(0);
		}
	}

	pub fn erase_regions(&mut self, regions: &[Region]) {
		for region in regions {
			self.erase_region(region);
		}
	}
}
