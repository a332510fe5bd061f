
#![forbid(unsafe_code)]

mod create_path;
pub mod dimensions;
pub mod file;
pub mod font;
pub mod image;
pub mod osd;
pub mod prelude;
pub mod video;

#[cfg(test)]
mod test_utils;

pub use crate::{
	font::{FontAtlas, FontSet, GlyphKind},
	osd::{
		dump::{Dump, DumpReader, OpenError as OSDDumpOpenError, OsdRecord},
		overlay::{AspectRatio, Generator as OverlayGenerator, GeneratorSettings as OverlayGeneratorSettings, ResolutionMode},
		CharacterGrid, Region,
	},
	video::{FrameRate, Timeline},
};
