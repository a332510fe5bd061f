//! Synthetic fonts and dumps shared by the unit tests

use std::sync::Mutex;

use image::{Rgba, RgbaImage};
use lazy_static::lazy_static;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{
	dimensions::Dimensions,
	font::{FontAtlas, GlyphKind, PAGE_GRID},
	osd::dump::header::{DJI_RECORD_GRID, DJI_SIGNATURE, WALKSNAIL_RECORD_GRID},
};


pub const INK: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Forwards to `env_logger` and keeps the warnings so that tests can check them
struct TestLogger {
	output: env_logger::Logger,
	warnings: Mutex<Vec<String>>,
}

impl Log for TestLogger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= Level::Warn || self.output.enabled(metadata)
	}

	fn log(&self, record: &Record) {
		if record.level() <= Level::Warn {
			if let Ok(mut warnings) = self.warnings.lock() {
				warnings.push(record.args().to_string());
			}
		}
		if self.output.matches(record) {
			self.output.log(record);
		}
	}

	fn flush(&self) {
		self.output.flush();
	}
}

lazy_static! {
	static ref LOGGER: TestLogger = TestLogger {
		output: env_logger::builder().is_test(true).build(),
		warnings: Mutex::new(vec![]),
	};
}

pub fn init_logger() {
	if log::set_logger(&*LOGGER).is_ok() {
		log::set_max_level(LevelFilter::Trace);
	}
}

/// Warnings logged so far by every test of the process
pub fn logged_warnings() -> Vec<String> {
	LOGGER.warnings.lock().map(|warnings| warnings.clone()).unwrap_or_default()
}

/// Position of the only opaque pixel of a glyph of the identity font
pub fn identity_marker(code: u16, glyph: Dimensions<u32>) -> (u32, u32) {
	let code = code as u32;
	(code % glyph.width, (code / glyph.width) % glyph.height)
}

fn font_image(glyph: Dimensions<u32>, mut draw_glyph: impl FnMut(u16, &mut RgbaImage, u32, u32)) -> RgbaImage {
	let mut image = RgbaImage::new(glyph.width * PAGE_GRID.width, glyph.height * PAGE_GRID.height);
	for row in 0..PAGE_GRID.height {
		for column in 0..PAGE_GRID.width {
			let code = (row * PAGE_GRID.width + column) as u16;
			draw_glyph(code, &mut image, column * glyph.width, row * glyph.height);
		}
	}
	image
}

/// Font page where every glyph is transparent except for one pixel whose position encodes the code
pub fn identity_font_image(glyph: Dimensions<u32>) -> RgbaImage {
	font_image(glyph, |code, image, left, top| {
		let (x, y) = identity_marker(code, glyph);
		image.put_pixel(left + x, top + y, INK);
	})
}

pub fn identity_font(glyph: Dimensions<u32>, glyph_kind: GlyphKind) -> FontAtlas {
	FontAtlas::from_image(&identity_font_image(glyph), glyph_kind).unwrap()
}

/// Font page where every glyph is fully opaque
pub fn solid_font_image(glyph: Dimensions<u32>) -> RgbaImage {
	font_image(glyph, |_, image, left, top| {
		for y in top..top + glyph.height {
			for x in left..left + glyph.width {
				image.put_pixel(x, y, INK);
			}
		}
	})
}

pub fn solid_font(glyph: Dimensions<u32>, glyph_kind: GlyphKind) -> FontAtlas {
	FontAtlas::from_image(&solid_font_image(glyph), glyph_kind).unwrap()
}

pub fn dji_header_bytes(version: u16, width_tiles: u8, height_tiles: u8, font_variant: u8) -> Vec<u8> {
	let mut bytes = DJI_SIGNATURE.to_vec();
	bytes.extend_from_slice(&version.to_le_bytes());
	bytes.extend_from_slice(&[width_tiles, height_tiles, 24, 36]);
	bytes.extend_from_slice(&0u16.to_le_bytes());
	bytes.extend_from_slice(&0u16.to_le_bytes());
	bytes.push(font_variant);
	bytes
}

pub fn walksnail_header_bytes(font_variant_id: &[u8; 4], width_tiles: u16, height_tiles: u16) -> Vec<u8> {
	let mut bytes = font_variant_id.to_vec();
	bytes.extend_from_slice(&[0; 32]);
	bytes.extend_from_slice(&width_tiles.to_le_bytes());
	bytes.extend_from_slice(&height_tiles.to_le_bytes());
	bytes
}

/// Record to encode: a timestamp and the non-blank cells as `(x, y, code)`
pub struct DumpRecord {
	timestamp: u32,
	cells: Vec<(u8, u8, u16)>,
}

impl DumpRecord {
	pub fn new(timestamp: u32, cells: &[(u8, u8, u16)]) -> Self {
		Self {
			timestamp,
			cells: cells.to_vec(),
		}
	}

	fn encode_codes(&self, len: usize, position: impl Fn(usize, usize) -> usize) -> Vec<u8> {
		let mut codes = vec![0u16; len];
		for &(x, y, code) in &self.cells {
			codes[position(x as usize, y as usize)] = code;
		}
		codes.iter().flat_map(|code| code.to_le_bytes()).collect()
	}
}

pub fn dji_dump_bytes_with_font_variant(width_tiles: u8, height_tiles: u8, font_variant: u8, records: &[DumpRecord]) -> Vec<u8> {
	let mut bytes = dji_header_bytes(1, width_tiles, height_tiles, font_variant);
	let grid = DJI_RECORD_GRID;
	let len = grid.area() as usize;
	for record in records {
		bytes.extend_from_slice(&record.timestamp.to_le_bytes());
		bytes.extend_from_slice(&(len as u32).to_le_bytes());
		bytes.extend(record.encode_codes(len, |x, y| y + x * grid.height as usize));
	}
	bytes
}

pub fn dji_dump_bytes(width_tiles: u8, height_tiles: u8, records: &[DumpRecord]) -> Vec<u8> {
	dji_dump_bytes_with_font_variant(width_tiles, height_tiles, 0, records)
}

pub fn walksnail_dump_bytes(records: &[DumpRecord]) -> Vec<u8> {
	let grid = WALKSNAIL_RECORD_GRID;
	let mut bytes = walksnail_header_bytes(b"BTFL", grid.width as u16, grid.height as u16);
	for record in records {
		bytes.extend_from_slice(&record.timestamp.to_le_bytes());
		bytes.extend(record.encode_codes(grid.area() as usize, |x, y| x + y * grid.width as usize));
	}
	bytes
}
