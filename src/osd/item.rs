use std::collections::HashMap;

use getset::CopyGetters;
use strum::IntoEnumIterator;
use thiserror::Error;

use super::{CharacterGrid, Dimensions, FontVariant, Region, SignedCoordinate, SignedCoordinates};
use crate::font::CharacterCode;


#[derive(Debug, Error)]
#[error("unknown OSD item `{name}` for {font_variant} font variant")]
pub struct UnknownOSDItem {
	pub name: String,
	pub font_variant: FontVariant,
}

/// Where an OSD item sits relative to its marker glyph
#[derive(Debug, Clone, Copy, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LocationData {
	name: &'static str,
	marker_codes: &'static [CharacterCode],
	top_left_offset: SignedCoordinates,
	dimensions: Dimensions,
}

impl LocationData {
	pub const fn new(name: &'static str, marker_codes: &'static [CharacterCode], top_left_offset_x: SignedCoordinate, width: u8) -> Self {
		Self {
			name,
			marker_codes,
			top_left_offset: SignedCoordinates::new(top_left_offset_x, 0),
			dimensions: Dimensions::new(width, 1),
		}
	}

	pub fn region(&self, marker: SignedCoordinates) -> Region {
		let top_left_corner = SignedCoordinates::new(
			marker.x.saturating_add(self.top_left_offset.x),
			marker.y.saturating_add(self.top_left_offset.y),
		);
		Region::from_origin(top_left_corner, self.dimensions)
	}

	/// Regions covered by every occurrence of the item in the grid
	pub fn locate(&self, grid: &CharacterGrid) -> Vec<Region> {
		grid.find_codes(self.marker_codes).map(|marker| self.region(marker.into())).collect()
	}
}

const fn ld(name: &'static str, marker_codes: &'static [CharacterCode], width: u8) -> LocationData {
	LocationData::new(name, marker_codes, 0, width)
}

const fn ldo(name: &'static str, marker_codes: &'static [CharacterCode], top_left_offset_x: SignedCoordinate, width: u8) -> LocationData {
	LocationData::new(name, marker_codes, top_left_offset_x, width)
}

mod location_data {
	use super::{ld, ldo, LocationData};

	pub const INAV: [LocationData; 4] = [
		ld("gpslat", &[3], 10),
		ld("gpslon", &[4], 10),
		ldo("alt", &[0x76, 0x77, 0x78, 0x79], -4, 5),
		ld("dist", &[16], 6),
	];

	pub const ARDUPILOT: [LocationData; 6] = [
		ld("gpslat", &[0xA6], 10),
		ld("gpslon", &[0xA7], 11),
		ldo("alt", &[0xB1, 0xB3], -4, 5),
		ld("dist", &[0xBF], 7),
		ldo("short+code", &[0x2B], -4, 8),
		ldo("long+code", &[0x2B], -8, 12),
	];
}

impl FontVariant {
	pub const fn osd_items_location_data(&self) -> &'static [LocationData] {
		match self {
			FontVariant::Ardupilot => &location_data::ARDUPILOT,
			FontVariant::INAV => &location_data::INAV,
			FontVariant::Generic | FontVariant::Betaflight | FontVariant::KISSUltra | FontVariant::Unknown => &[],
		}
	}

	pub fn find_osd_item_location_data(&self, item_name: &str) -> Result<&'static LocationData, UnknownOSDItem> {
		self.osd_items_location_data()
			.iter()
			.find(|location_data| location_data.name == item_name)
			.ok_or_else(|| UnknownOSDItem {
				name: item_name.to_owned(),
				font_variant: *self,
			})
	}

	pub fn osd_item_names() -> HashMap<FontVariant, Vec<&'static str>> {
		Self::iter()
			.map(|font_variant| (font_variant, font_variant.osd_items_location_data().iter().map(LocationData::name).collect()))
			.collect()
	}
}

/// Resolves item names for a font variant, failing on the first unknown name
pub fn resolve_items<S: AsRef<str>>(font_variant: FontVariant, item_names: &[S]) -> Result<Vec<&'static LocationData>, UnknownOSDItem> {
	item_names
		.iter()
		.map(|name| font_variant.find_osd_item_location_data(name.as_ref()))
		.collect()
}

impl CharacterGrid {
	pub fn erase_osd_items(&mut self, items: &[&LocationData]) {
		let regions: Vec<Region> = items.iter().flat_map(|item| item.locate(self)).collect();
		self.erase_regions(&regions);
	}
}

/// Erases OSD items from consecutive grids
///
/// Markers blink, so the last place each item was seen is remembered. Whenever at least one hidden item is
/// located in a grid, the remembered places of all the items are erased too.
#[derive(Debug, Clone)]
pub struct HiddenItems {
	items: Vec<&'static LocationData>,
	last_seen: Vec<Vec<Region>>,
}

impl HiddenItems {
	pub fn new(items: Vec<&'static LocationData>) -> Self {
		let last_seen = vec![vec![]; items.len()];
		Self { items, last_seen }
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn erase_from(&mut self, grid: &mut CharacterGrid) {
		let mut located = false;
		for (item, last_seen) in self.items.iter().zip(self.last_seen.iter_mut()) {
			let regions = item.locate(grid);
			if !regions.is_empty() {
				*last_seen = regions;
				located = true;
			}
		}
		if located {
			grid.erase_regions(&self.last_seen.concat());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{resolve_items, HiddenItems};
	use crate::osd::{CharacterGrid, Coordinates, Dimensions, FontVariant, Region};

	#[test]
	fn item_names_per_variant() {
		let names = FontVariant::osd_item_names();
		assert_eq!(names[&FontVariant::INAV], vec!["gpslat", "gpslon", "alt", "dist"]);
		assert!(names[&FontVariant::Ardupilot].contains(&"dist"));
		assert!(names[&FontVariant::Betaflight].is_empty());
		assert!(resolve_items(FontVariant::Betaflight, &["gpslat"]).is_err());
	}

	#[test]
	fn region_relative_to_marker() {
		let alt = FontVariant::INAV.find_osd_item_location_data("alt").unwrap();
		assert_eq!(alt.region(Coordinates::new(10, 3).into()), Region::new(6, 3, 11, 4));
		assert_eq!(alt.region(Coordinates::new(1, 0).into()), Region::new(-3, 0, 2, 1));
	}

	#[test]
	fn erase_located_items() {
		let mut grid = CharacterGrid::blank(Dimensions::new(30, 15));
		grid.set(Coordinates::new(2, 5), 3);
		for x in 3..12 {
			grid.set(Coordinates::new(x, 5), 0x30);
		}
		grid.set(Coordinates::new(12, 5), 0x31);
		grid.set(Coordinates::new(2, 6), 0x30);

		let items = resolve_items(FontVariant::INAV, &["gpslat"]).unwrap();
		grid.erase_osd_items(&items);
		assert_eq!(grid.get(Coordinates::new(2, 5)), Some(0));
		assert_eq!(grid.get(Coordinates::new(11, 5)), Some(0));
		assert_eq!(grid.get(Coordinates::new(12, 5)), Some(0x31));
		assert_eq!(grid.get(Coordinates::new(2, 6)), Some(0x30));
	}

	#[test]
	fn erase_home_distance() {
		let mut grid = CharacterGrid::blank(Dimensions::new(30, 15));
		grid.set(Coordinates::new(20, 1), 16);
		for x in 21..26 {
			grid.set(Coordinates::new(x, 1), 0x31);
		}
		grid.set(Coordinates::new(26, 1), 0x32);
		grid.erase_osd_items(&resolve_items(FontVariant::INAV, &["dist"]).unwrap());
		assert!((20..26).all(|x| grid.get(Coordinates::new(x, 1)) == Some(0)));
		assert_eq!(grid.get(Coordinates::new(26, 1)), Some(0x32));

		let mut grid = CharacterGrid::blank(Dimensions::new(30, 15));
		for x in 3..11 {
			grid.set(Coordinates::new(x, 2), 0x31);
		}
		grid.set(Coordinates::new(3, 2), 0xBF);
		grid.erase_osd_items(&resolve_items(FontVariant::Ardupilot, &["dist"]).unwrap());
		assert!((3..10).all(|x| grid.get(Coordinates::new(x, 2)) == Some(0)));
		assert_eq!(grid.get(Coordinates::new(10, 2)), Some(0x31));
	}

	#[test]
	fn hidden_items_remember_last_location() {
		let mut hidden_items = HiddenItems::new(resolve_items(FontVariant::INAV, &["gpslat", "gpslon"]).unwrap());
		let gps_grid = |with_lat_marker: bool| {
			let mut grid = CharacterGrid::blank(Dimensions::new(30, 15));
			if with_lat_marker {
				grid.set(Coordinates::new(2, 5), 3);
			}
			grid.set(Coordinates::new(2, 6), 4);
			for x in 3..12 {
				grid.set(Coordinates::new(x, 5), 0x30);
				grid.set(Coordinates::new(x, 6), 0x30);
			}
			grid
		};

		let mut first = gps_grid(true);
		hidden_items.erase_from(&mut first);
		assert!(first.is_blank());

		let mut second = gps_grid(false);
		hidden_items.erase_from(&mut second);
		assert_eq!(second.get(Coordinates::new(5, 5)), Some(0));
		assert!(second.is_blank());

		let mut without_items = CharacterGrid::blank(Dimensions::new(30, 15));
		without_items.set(Coordinates::new(5, 5), 0x30);
		hidden_items.erase_from(&mut without_items);
		assert_eq!(without_items.get(Coordinates::new(5, 5)), Some(0x30));
	}
}
