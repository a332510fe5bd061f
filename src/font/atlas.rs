use std::{
	io::Error as IOError,
	path::{Path, PathBuf},
};

use getset::CopyGetters;
use image::{
	imageops::{self, FilterType},
	RgbaImage,
};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use thiserror::Error;

use super::{CharacterCode, GlyphKind};
use crate::{
	dimensions::Dimensions,
	image::{read_image_file, ReadError as ImageReadError},
};


pub type Glyph = RgbaImage;

/// A font image page is a 16x16 grid of glyph cells, glyph codes running left to right then top to bottom
pub const PAGE_GRID: Dimensions<u32> = Dimensions::new(16, 16);
pub const GLYPHS_PER_PAGE: usize = (PAGE_GRID.width * PAGE_GRID.height) as usize;

/// raw `.bin` font files store the glyphs of a page as a vertical strip
const RAW_PAGE_GRID: Dimensions<u32> = Dimensions::new(1, GLYPHS_PER_PAGE as u32);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
	#[error("image dimensions {image} cannot be divided evenly into a {grid} grid of glyphs")]
	NotDivisible { image: Dimensions<u32>, grid: Dimensions<u32> },
	#[error("raw font data is {actual} bytes, expected {expected} bytes for a page of {glyph_kind} glyphs")]
	InvalidRawSize { glyph_kind: GlyphKind, expected: u64, actual: u64 },
	#[error("extension page glyphs are {extension}, base page glyphs are {base}")]
	MismatchedPageGlyphDimensions { base: Dimensions<u32>, extension: Dimensions<u32> },
	#[error("extension page is a {extension} font, base page is a {base} font")]
	MismatchedPageGlyphKinds { base: GlyphKind, extension: GlyphKind },
}

#[derive(Debug, Error)]
pub enum FontLoadError {
	#[error("malformed font file {}: {error}", file_path.to_string_lossy())]
	MalformedLayout { file_path: PathBuf, error: LayoutError },
	#[error(transparent)]
	ReadImage(#[from] ImageReadError),
	#[error(transparent)]
	Io(#[from] IOError),
	#[error("no {glyph_kind} font file found for page {page} of font {}", basename.to_string_lossy())]
	NotFound { basename: PathBuf, glyph_kind: GlyphKind, page: u8 },
}

impl FontLoadError {
	pub fn malformed_layout<P: AsRef<Path>>(file_path: P, error: LayoutError) -> Self {
		Self::MalformedLayout {
			file_path: file_path.as_ref().to_path_buf(),
			error,
		}
	}

	pub fn because_file_is_missing(&self) -> bool {
		match self {
			Self::NotFound { .. } => true,
			Self::ReadImage(error) => error.because_file_is_missing(),
			Self::Io(error) => error.kind() == std::io::ErrorKind::NotFound,
			Self::MalformedLayout { .. } => false,
		}
	}
}

/// Glyph bitmaps indexed by character code, all of the same dimensions
#[derive(Debug, Clone, CopyGetters)]
pub struct FontAtlas {
	#[getset(get_copy = "pub")]
	glyph_kind: GlyphKind,

	#[getset(get_copy = "pub")]
	glyph_dimensions: Dimensions<u32>,

	glyphs: Vec<Glyph>,

	blank: Glyph,
}

fn split_cells(image: &RgbaImage, grid: Dimensions<u32>) -> Result<(Dimensions<u32>, Vec<Glyph>), LayoutError> {
	let (width, height) = image.dimensions();
	let not_divisible = || LayoutError::NotDivisible {
		image: Dimensions::new(width, height),
		grid,
	};
	if width == 0 || height == 0 || width % grid.width != 0 || height % grid.height != 0 {
		return Err(not_divisible());
	}
	let cell = Dimensions::new(width / grid.width, height / grid.height);
	let mut glyphs = Vec::with_capacity((grid.width * grid.height) as usize);
	for row in 0..grid.height {
		for column in 0..grid.width {
			glyphs.push(imageops::crop_imm(image, column * cell.width, row * cell.height, cell.width, cell.height).to_image());
		}
	}
	Ok((cell, glyphs))
}

impl FontAtlas {
	fn from_glyphs(glyph_kind: GlyphKind, glyph_dimensions: Dimensions<u32>, glyphs: Vec<Glyph>) -> Self {
		let blank = Glyph::new(glyph_dimensions.width, glyph_dimensions.height);
		Self {
			glyph_kind,
			glyph_dimensions,
			glyphs,
			blank,
		}
	}

	/// Splits a font image page into its 256 glyphs
	pub fn from_image(image: &RgbaImage, glyph_kind: GlyphKind) -> Result<Self, LayoutError> {
		let (glyph_dimensions, glyphs) = split_cells(image, PAGE_GRID)?;
		Ok(Self::from_glyphs(glyph_kind, glyph_dimensions, glyphs))
	}

	/// Builds a page from raw RGBA data laid out as in the `.bin` font files
	pub fn from_raw(data: Vec<u8>, glyph_kind: GlyphKind) -> Result<Self, LayoutError> {
		let glyph_dimensions = glyph_kind.native_dimensions();
		let expected = glyph_dimensions.area() * GLYPHS_PER_PAGE as u64 * 4;
		let invalid_size = LayoutError::InvalidRawSize {
			glyph_kind,
			expected,
			actual: data.len() as u64,
		};
		if data.len() as u64 != expected {
			return Err(invalid_size);
		}
		let strip = RgbaImage::from_raw(glyph_dimensions.width, glyph_dimensions.height * RAW_PAGE_GRID.height, data).ok_or(invalid_size)?;
		let (glyph_dimensions, glyphs) = split_cells(&strip, RAW_PAGE_GRID)?;
		Ok(Self::from_glyphs(glyph_kind, glyph_dimensions, glyphs))
	}

	pub fn load<P: AsRef<Path>>(path: P, glyph_kind: GlyphKind) -> Result<Self, FontLoadError> {
		let image = read_image_file(&path)?.to_rgba8();
		let atlas = Self::from_image(&image, glyph_kind).map_err(|error| FontLoadError::malformed_layout(&path, error))?;
		log::debug!("loaded {} {glyph_kind} glyphs of {} from {}", atlas.len(), atlas.glyph_dimensions, path.as_ref().to_string_lossy());
		Ok(atlas)
	}

	pub fn load_bin<P: AsRef<Path>>(path: P, glyph_kind: GlyphKind) -> Result<Self, FontLoadError> {
		let data = fs_err::read(path.as_ref())?;
		let atlas = Self::from_raw(data, glyph_kind).map_err(|error| FontLoadError::malformed_layout(&path, error))?;
		log::debug!("loaded {} raw {glyph_kind} glyphs from {}", atlas.len(), path.as_ref().to_string_lossy());
		Ok(atlas)
	}

	/// Appends the glyphs of an extension page, codes 256 and up
	pub fn with_extension(mut self, extension: FontAtlas) -> Result<Self, LayoutError> {
		if extension.glyph_kind != self.glyph_kind {
			return Err(LayoutError::MismatchedPageGlyphKinds {
				base: self.glyph_kind,
				extension: extension.glyph_kind,
			});
		}
		if extension.glyph_dimensions != self.glyph_dimensions {
			return Err(LayoutError::MismatchedPageGlyphDimensions {
				base: self.glyph_dimensions,
				extension: extension.glyph_dimensions,
			});
		}
		self.glyphs.extend(extension.glyphs);
		Ok(self)
	}

	/// Returns the glyph for the code or the blank glyph when the font does not define it
	pub fn glyph(&self, code: CharacterCode) -> &Glyph {
		self.glyphs.get(code as usize).unwrap_or(&self.blank)
	}

	pub fn blank_glyph(&self) -> &Glyph {
		&self.blank
	}

	pub fn len(&self) -> usize {
		self.glyphs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.glyphs.is_empty()
	}

	pub fn page_count(&self) -> usize {
		self.glyphs.len().div_ceil(GLYPHS_PER_PAGE)
	}

	/// Returns a copy of the atlas with every glyph resized to the new dimensions
	pub fn resized(&self, glyph_dimensions: Dimensions<u32>) -> Self {
		if glyph_dimensions == self.glyph_dimensions {
			return self.clone();
		}
		let glyphs = self
			.glyphs
			.par_iter()
			.map(|glyph| imageops::resize(glyph, glyph_dimensions.width, glyph_dimensions.height, FilterType::Lanczos3))
			.collect();
		Self::from_glyphs(self.glyph_kind, glyph_dimensions, glyphs)
	}
}

#[cfg(test)]
mod tests {
	use image::{Rgba, RgbaImage};

	use super::{FontAtlas, LayoutError, GLYPHS_PER_PAGE};
	use crate::{dimensions::Dimensions, font::GlyphKind, test_utils};

	#[test]
	fn page_split_in_code_order() {
		let atlas = test_utils::identity_font(Dimensions::new(8, 8), GlyphKind::SD);
		assert_eq!(atlas.len(), GLYPHS_PER_PAGE);
		assert_eq!(atlas.glyph_dimensions(), Dimensions::new(8, 8));
		for code in [1, 7, 8, 17, 63] {
			let glyph = atlas.glyph(code);
			let marker = test_utils::identity_marker(code, atlas.glyph_dimensions());
			assert_eq!(*glyph.get_pixel(marker.0, marker.1), test_utils::INK);
			assert_eq!(glyph.pixels().filter(|pixel| pixel[3] != 0).count(), 1);
		}
	}

	#[test]
	fn undefined_codes_are_blank() {
		let atlas = test_utils::solid_font(Dimensions::new(4, 6), GlyphKind::HD);
		let glyph = atlas.glyph(300);
		assert_eq!(glyph.dimensions(), (4, 6));
		assert!(glyph.pixels().all(|pixel| pixel[3] == 0));
		assert_eq!(glyph, atlas.blank_glyph());
	}

	#[test]
	fn image_not_divisible_into_page_grid() {
		let image = RgbaImage::new(16 * 5 + 3, 16 * 5);
		let error = FontAtlas::from_image(&image, GlyphKind::SD).unwrap_err();
		assert_eq!(
			error,
			LayoutError::NotDivisible {
				image: Dimensions::new(83, 80),
				grid: Dimensions::new(16, 16)
			}
		);
		assert!(FontAtlas::from_image(&RgbaImage::new(0, 0), GlyphKind::SD).is_err());
	}

	#[test]
	fn raw_page_size_must_match_glyph_kind() {
		let glyph = GlyphKind::HD.native_dimensions();
		let size = (glyph.width * glyph.height * 4) as usize * GLYPHS_PER_PAGE;
		let mut data = vec![0; size];
		// opaque first pixel of glyph 1
		let glyph_1_offset = (glyph.width * glyph.height * 4) as usize;
		data[glyph_1_offset..glyph_1_offset + 4].copy_from_slice(&[255, 255, 255, 255]);
		let atlas = FontAtlas::from_raw(data, GlyphKind::HD).unwrap();
		assert_eq!(atlas.glyph_dimensions(), glyph);
		assert_eq!(*atlas.glyph(1).get_pixel(0, 0), Rgba([255, 255, 255, 255]));
		assert_eq!(atlas.glyph(0).get_pixel(0, 0)[3], 0);

		let error = FontAtlas::from_raw(vec![0; size - 1], GlyphKind::HD).unwrap_err();
		assert!(matches!(error, LayoutError::InvalidRawSize { actual, .. } if actual == size as u64 - 1));
	}

	#[test]
	fn extension_page_adds_codes() {
		let base = test_utils::identity_font(Dimensions::new(20, 20), GlyphKind::SD);
		let extension = test_utils::solid_font(Dimensions::new(20, 20), GlyphKind::SD);
		let atlas = base.with_extension(extension).unwrap();
		assert_eq!(atlas.len(), 2 * GLYPHS_PER_PAGE);
		assert_eq!(atlas.page_count(), 2);
		assert!(atlas.glyph(300).pixels().all(|pixel| *pixel == test_utils::INK));

		let base = test_utils::identity_font(Dimensions::new(20, 20), GlyphKind::SD);
		let smaller = test_utils::solid_font(Dimensions::new(10, 20), GlyphKind::SD);
		assert!(matches!(base.with_extension(smaller), Err(LayoutError::MismatchedPageGlyphDimensions { .. })));
	}

	#[test]
	fn resized_keeps_codes_and_kind() {
		let atlas = test_utils::solid_font(Dimensions::new(24, 36), GlyphKind::HD);
		let resized = atlas.resized(Dimensions::new(12, 18));
		assert_eq!(resized.glyph_kind(), GlyphKind::HD);
		assert_eq!(resized.len(), atlas.len());
		assert_eq!(resized.glyph(5).dimensions(), (12, 18));
		assert_eq!(resized.blank_glyph().dimensions(), (12, 18));
		assert!(resized.glyph(5).get_pixel(6, 9)[3] >= 250);
	}

	#[test]
	fn load_reports_malformed_layout_with_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("font.png");
		RgbaImage::new(30, 32).save(&path).unwrap();
		let error = FontAtlas::load(&path, GlyphKind::SD).unwrap_err();
		assert!(matches!(error, super::FontLoadError::MalformedLayout { ref file_path, .. } if *file_path == path));
	}
}
