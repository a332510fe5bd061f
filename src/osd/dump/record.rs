use derive_more::Deref;
use getset::{CopyGetters, Getters};

use crate::osd::{item::HiddenItems, CharacterGrid, Region};


pub type RecordIndex = u32;
pub type Timestamp = u32;

/// One OSD screen snapshot of a dump
#[derive(Debug, Clone, PartialEq, Eq, Deref, Getters, CopyGetters)]
pub struct OsdRecord {
	/// position of the record in the dump
	#[getset(get_copy = "pub")]
	index: RecordIndex,
	/// telemetry clock ticks, see the dump header clock
	#[getset(get_copy = "pub")]
	timestamp: Timestamp,
	#[deref]
	#[getset(get = "pub")]
	grid: CharacterGrid,
}

impl OsdRecord {
	pub fn new(index: RecordIndex, timestamp: Timestamp, grid: CharacterGrid) -> Self {
		Self { index, timestamp, grid }
	}

	pub fn into_grid(self) -> CharacterGrid {
		self.grid
	}

	pub fn with_erased_regions(mut self, regions: &[Region]) -> Self {
		self.grid.erase_regions(regions);
		self
	}

	pub fn with_hidden_items(mut self, hidden_items: &mut HiddenItems) -> Self {
		hidden_items.erase_from(&mut self.grid);
		self
	}
}

/// Decodes little endian `u16` codes
pub(super) fn decode_codes(bytes: &[u8]) -> Vec<u16> {
	bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect()
}

#[cfg(test)]
mod tests {
	use super::{decode_codes, OsdRecord};
	use crate::osd::{CharacterGrid, Coordinates, Dimensions, Region};

	#[test]
	fn little_endian_codes() {
		assert_eq!(decode_codes(&[0x01, 0x00, 0x34, 0x12, 0xff]), vec![1, 0x1234]);
	}

	#[test]
	fn erasing_keeps_index_and_timestamp() {
		let grid = CharacterGrid::new(Dimensions::new(2, 2), vec![5, 6, 7, 8]).unwrap();
		let record = OsdRecord::new(3, 120, grid).with_erased_regions(&[Region::new(0, 0, 1, 2)]);
		assert_eq!((record.index(), record.timestamp()), (3, 120));
		assert_eq!(record.get(Coordinates::new(0, 1)), Some(0));
		assert_eq!(record.get(Coordinates::new(1, 1)), Some(8));
	}
}
