//! OSD overlay generation
//!
//! [`Generator`] ties a decoded dump, a font and the video frame timeline together and renders the
//! overlay image of every video frame.

use std::{path::Path, rc::Rc};

use derive_builder::Builder;
use derive_more::From;
use getset::{CopyGetters, Getters};
use image::RgbaImage;
use thiserror::Error;

pub mod emit;
pub mod mask;
pub mod renderer;
pub mod resolution;

pub use emit::{format_overlay_frame_file_index, make_overlay_frame_file_path, SaveFramesToDirError, SaveTestFrameError, WriteRawFramesError};
pub use mask::{apply_masks, MaskStyle};
pub use renderer::{render, RenderError, RenderSettings, RenderSettingsBuilder, Renderer};
pub use resolution::{AspectRatio, Layout, PlacementStrategy, Resolution, ResolutionMode};

use super::{
	dump::{Dump, DumpHeader, OsdRecord, RecordIndex},
	item::{resolve_items, HiddenItems, UnknownOSDItem},
	Kind, Region,
};
use crate::{
	font::FontSet,
	video::{FrameIndex, FrameRate, Timeline, VideoFrames},
};


/// Transparent RGBA image the OSD is drawn on
pub type Canvas = RgbaImage;

#[derive(Debug, Clone, Builder, Getters, CopyGetters)]
#[builder(default, setter(into))]
pub struct GeneratorSettings {
	/// defaults to the mode matching the dump layout
	#[builder(setter(into, strip_option))]
	#[getset(get_copy = "pub")]
	resolution_mode: Option<ResolutionMode>,
	#[getset(get_copy = "pub")]
	aspect_ratio: AspectRatio,
	#[getset(get = "pub")]
	masks: Vec<Region>,
	#[getset(get_copy = "pub")]
	frame_rate: FrameRate,
	/// number of video frames, defaults to the frame showing the last record
	#[builder(setter(into, strip_option))]
	#[getset(get_copy = "pub")]
	frame_count: Option<FrameIndex>,
	/// video frames the OSD is moved by, negative values make it appear earlier
	#[getset(get_copy = "pub")]
	frame_shift: i32,
	/// OSD items erased from the records, see [`crate::osd::FontVariant::osd_item_names`]
	#[getset(get = "pub")]
	hidden_items: Vec<String>,
}

impl Default for GeneratorSettings {
	fn default() -> Self {
		Self {
			resolution_mode: None,
			aspect_ratio: AspectRatio::default(),
			masks: vec![],
			frame_rate: FrameRate::FPS_60,
			frame_count: None,
			frame_shift: 0,
			hidden_items: vec![],
		}
	}
}

impl GeneratorSettings {
	pub fn render_settings(&self, osd_kind: Kind) -> RenderSettings {
		RenderSettings::new(self.resolution_mode.unwrap_or(osd_kind.resolution_mode()), self.aspect_ratio).with_masks(self.masks.clone())
	}
}

#[derive(Debug, Error, From)]
pub enum GeneratorError {
	#[error(transparent)]
	Render(RenderError),
	#[error(transparent)]
	UnknownOSDItem(UnknownOSDItem),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TestFrameError {
	#[error("OSD dump has no record")]
	NoRecord,
	#[error("test frame {index} out of range, the OSD dump has {record_count} records")]
	OutOfRange { index: i64, record_count: usize },
}

#[derive(Getters)]
#[getset(get = "pub")]
pub struct Generator {
	header: DumpHeader,
	renderer: Renderer,
	timeline: Timeline,
}

impl Generator {
	pub fn new(dump: Dump, fonts: &FontSet, settings: &GeneratorSettings) -> Result<Self, GeneratorError> {
		let header = dump.header().clone();
		let renderer = Renderer::new(fonts, settings.render_settings(header.kind()))?;

		let mut hidden_items = HiddenItems::new(resolve_items(header.font_variant(), settings.hidden_items.as_slice())?);
		let mut records = dump.into_records();
		if !hidden_items.is_empty() {
			log::info!("hiding OSD items: {}", settings.hidden_items.join(", "));
			records = records.into_iter().map(|record| record.with_hidden_items(&mut hidden_items)).collect();
		}

		let clock = header.clock();
		let frame_count = settings
			.frame_count
			.unwrap_or_else(|| Timeline::span(&records, clock, settings.frame_rate, settings.frame_shift));
		let timeline = Timeline::build_with_shift(records, clock, settings.frame_rate, frame_count, settings.frame_shift);
		log::info!("{frame_count} overlay frames at {} fps", settings.frame_rate);

		Ok(Self { header, renderer, timeline })
	}

	/// Opens the dump and loads the font matching its firmware, falling back to the generic font
	pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(dump_path: P, font_basename: Q, settings: &GeneratorSettings) -> anyhow::Result<Self> {
		let dump = Dump::open(dump_path)?;
		let glyph_kind = settings.render_settings(dump.header().kind()).layout().glyph_kind;
		let fonts = FontSet::load_variant_with_fallback(font_basename, &[glyph_kind], dump.header().font_variant(), dump.highest_code())?;
		Ok(Self::new(dump, &fonts, settings)?)
	}

	pub fn frame_count(&self) -> FrameIndex {
		self.timeline.frame_count()
	}

	pub fn resolution(&self) -> Resolution {
		self.renderer.resolution()
	}

	fn render_record(&self, record: Option<&OsdRecord>) -> Canvas {
		match record {
			Some(record) => self.renderer.render(record),
			None => self.renderer.blank_canvas(),
		}
	}

	/// Overlay of a single video frame, `None` past the end of the video
	pub fn frame(&self, frame_index: FrameIndex) -> Option<Canvas> {
		if frame_index >= self.frame_count() {
			return None;
		}
		Some(self.render_record(self.timeline.frame_at(frame_index)))
	}

	/// Overlays of every video frame in order, a frame showing the same record as the previous one is not
	/// rendered again
	pub fn frames(&self) -> Frames<'_> {
		Frames {
			generator: self,
			video_frames: self.timeline.iter(),
			previous: None,
		}
	}

	/// Renders a record with the masked areas highlighted, `None` selects the last record and negative
	/// indices count from the end
	pub fn render_test_frame(&self, record_index: Option<i64>) -> Result<Canvas, TestFrameError> {
		let records = self.timeline.records();
		if records.is_empty() {
			return Err(TestFrameError::NoRecord);
		}
		let index = record_index.unwrap_or(-1);
		let position = if index < 0 { records.len() as i64 + index } else { index };
		let record = usize::try_from(position)
			.ok()
			.and_then(|position| records.get(position))
			.ok_or(TestFrameError::OutOfRange {
				index,
				record_count: records.len(),
			})?;
		log::info!("rendering test frame from OSD record {} (timestamp {})", record.index(), record.timestamp());
		Ok(self.renderer.render_with_mask_style(record, MaskStyle::marker()))
	}
}

pub struct Frames<'a> {
	generator: &'a Generator,
	video_frames: VideoFrames<'a>,
	previous: Option<(Option<RecordIndex>, Rc<Canvas>)>,
}

impl Iterator for Frames<'_> {
	type Item = (FrameIndex, Rc<Canvas>);

	fn next(&mut self) -> Option<Self::Item> {
		let (frame_index, record) = self.video_frames.next()?;
		let record_index = record.map(OsdRecord::index);
		let canvas = match &self.previous {
			Some((previous_record_index, canvas)) if *previous_record_index == record_index => Rc::clone(canvas),
			_ => {
				log::debug!("rendering overlay frame {frame_index} from OSD record {record_index:?}");
				let canvas = Rc::new(self.generator.render_record(record));
				self.previous = Some((record_index, Rc::clone(&canvas)));
				canvas
			},
		};
		Some((frame_index, canvas))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.video_frames.size_hint()
	}
}

impl ExactSizeIterator for Frames<'_> {}
