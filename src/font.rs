pub mod atlas;
pub mod glyph_kind;
pub mod set;

/// Character code as stored in the OSD dump cells and used to index font glyphs
pub type CharacterCode = u16;

pub use self::{
	atlas::{FontAtlas, FontLoadError, Glyph, LayoutError, GLYPHS_PER_PAGE, PAGE_GRID},
	glyph_kind::GlyphKind,
	set::FontSet,
};
