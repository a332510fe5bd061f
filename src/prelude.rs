pub use crate::{
	dimensions::Dimensions,
	file::LinkMode,
	font::{FontAtlas, FontLoadError, FontSet, GlyphKind},
	osd::{
		dump::{DecodeError as OSDDumpDecodeError, Dump, DumpHeader, DumpReader, OpenError as OSDDumpOpenError, OsdRecord},
		overlay::{
			AspectRatio, Canvas, Generator as OverlayGenerator, GeneratorError as OverlayGeneratorError,
			GeneratorSettings as OverlayGeneratorSettings, GeneratorSettingsBuilder as OverlayGeneratorSettingsBuilder,
			MaskStyle, RenderSettings, Renderer, ResolutionMode, SaveFramesToDirError,
		},
		CharacterGrid, Coordinates, FontVariant, Kind as OSDKind, Region,
	},
	video::{FrameRate, TelemetryClock, Timeline},
};
