use std::{
	ffi::OsString,
	path::{Path, PathBuf},
};

use super::{CharacterCode, FontAtlas, FontLoadError, GlyphKind, GLYPHS_PER_PAGE};
use crate::osd::FontVariant;


const FILE_EXTENSIONS: [&str; 2] = ["png", "bin"];

/// Builds the path of a font page file following the `<base>[_<ident>][_hd][_2].<ext>` convention
pub fn page_file_path<P: AsRef<Path>>(basename: P, ident: Option<&str>, glyph_kind: GlyphKind, page: u8, extension: &str) -> PathBuf {
	let mut file_path = OsString::from(basename.as_ref().as_os_str());
	if let Some(ident) = ident {
		file_path.push(format!("_{ident}"));
	}
	file_path.push(glyph_kind.basename_suffix());
	if page > 1 {
		file_path.push(format!("_{page}"));
	}
	file_path.push(format!(".{extension}"));
	PathBuf::from(file_path)
}

fn load_page(basename: &Path, ident: Option<&str>, glyph_kind: GlyphKind, page: u8) -> Result<(PathBuf, FontAtlas), FontLoadError> {
	for extension in FILE_EXTENSIONS {
		let path = page_file_path(basename, ident, glyph_kind, page, extension);
		if path.is_file() {
			let atlas = match extension {
				"bin" => FontAtlas::load_bin(&path, glyph_kind)?,
				_ => FontAtlas::load(&path, glyph_kind)?,
			};
			return Ok((path, atlas));
		}
	}
	Err(FontLoadError::NotFound {
		basename: basename.to_path_buf(),
		glyph_kind,
		page,
	})
}

/// At most one atlas per glyph kind; the renderer picks the one its resolution mode needs
#[derive(Debug, Clone, Default)]
pub struct FontSet {
	sd: Option<FontAtlas>,
	hd: Option<FontAtlas>,
}

impl FontSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, atlas: FontAtlas) -> Self {
		self.insert(atlas);
		self
	}

	/// Stores the atlas, replacing the one of the same glyph kind if any
	pub fn insert(&mut self, atlas: FontAtlas) {
		match atlas.glyph_kind() {
			GlyphKind::SD => self.sd = Some(atlas),
			GlyphKind::HD => self.hd = Some(atlas),
		}
	}

	pub fn get(&self, glyph_kind: GlyphKind) -> Option<&FontAtlas> {
		match glyph_kind {
			GlyphKind::SD => self.sd.as_ref(),
			GlyphKind::HD => self.hd.as_ref(),
		}
	}

	/// Loads the base page and, when codes above the first page are used, the extension page
	pub fn load_atlas<P: AsRef<Path>>(basename: P, ident: Option<&str>, glyph_kind: GlyphKind, max_used_code: CharacterCode) -> Result<FontAtlas, FontLoadError> {
		let basename = basename.as_ref();
		let (_, atlas) = load_page(basename, ident, glyph_kind, 1)?;
		if (max_used_code as usize) < GLYPHS_PER_PAGE {
			return Ok(atlas);
		}
		match load_page(basename, ident, glyph_kind, 2) {
			Ok((extension_path, extension)) => atlas
				.with_extension(extension)
				.map_err(|error| FontLoadError::malformed_layout(extension_path, error)),
			Err(error) if error.because_file_is_missing() => {
				log::warn!("OSD uses codes up to {max_used_code} but no extension page was found for the {glyph_kind} font, these codes will be blank");
				Ok(atlas)
			},
			Err(error) => Err(error),
		}
	}

	pub fn load<P: AsRef<Path>>(basename: P, glyph_kinds: &[GlyphKind], max_used_code: CharacterCode) -> Result<Self, FontLoadError> {
		let mut set = Self::new();
		for glyph_kind in glyph_kinds {
			set.insert(Self::load_atlas(&basename, None, *glyph_kind, max_used_code)?);
		}
		Ok(set)
	}

	/// Tries the font made for the firmware variant first and falls back to the generic font when it does not exist
	pub fn load_variant_with_fallback<P: AsRef<Path>>(basename: P, glyph_kinds: &[GlyphKind], font_variant: FontVariant, max_used_code: CharacterCode) -> Result<Self, FontLoadError> {
		let mut set = Self::new();
		for glyph_kind in glyph_kinds {
			let atlas = match font_variant.font_set_ident() {
				Some(ident) => match Self::load_atlas(&basename, Some(ident), *glyph_kind, max_used_code) {
					Ok(atlas) => atlas,
					Err(error) if error.because_file_is_missing() => {
						log::warn!("{glyph_kind} font for {font_variant} ({ident} ident) not found, falling back to generic font");
						Self::load_atlas(&basename, None, *glyph_kind, max_used_code)?
					},
					Err(error) => return Err(error),
				},
				None => Self::load_atlas(&basename, None, *glyph_kind, max_used_code)?,
			};
			set.insert(atlas);
		}
		Ok(set)
	}
}
