use derive_builder::Builder;
use getset::{CopyGetters, Getters};
use image::imageops::{self, FilterType};
use thiserror::Error;

use super::{
	mask::{apply_masks, MaskStyle},
	resolution::{AspectRatio, Layout, PlacementStrategy, Resolution, ResolutionMode},
	Canvas,
};
use crate::{
	font::{FontAtlas, FontSet, GlyphKind},
	osd::{CharacterGrid, Region},
};


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
	#[error("no {glyph_kind} font loaded, needed to render in {mode} mode")]
	MissingFont { mode: ResolutionMode, glyph_kind: GlyphKind },
	#[error("{mode} mode needs a {expected} font, got a {actual} font")]
	InvalidGlyphKind {
		mode: ResolutionMode,
		expected: GlyphKind,
		actual: GlyphKind,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters, CopyGetters)]
#[builder(setter(into))]
pub struct RenderSettings {
	#[getset(get_copy = "pub")]
	resolution_mode: ResolutionMode,
	#[builder(default)]
	#[getset(get_copy = "pub")]
	aspect_ratio: AspectRatio,
	/// grid regions hidden from the output
	#[builder(default)]
	#[getset(get = "pub")]
	masks: Vec<Region>,
	#[builder(default)]
	#[getset(get_copy = "pub")]
	mask_style: MaskStyle,
}

impl RenderSettings {
	pub fn new(resolution_mode: ResolutionMode, aspect_ratio: AspectRatio) -> Self {
		Self {
			resolution_mode,
			aspect_ratio,
			masks: vec![],
			mask_style: MaskStyle::default(),
		}
	}

	pub fn with_masks(mut self, masks: Vec<Region>) -> Self {
		self.masks = masks;
		self
	}

	pub fn layout(&self) -> Layout {
		Layout::new(self.resolution_mode, self.aspect_ratio)
	}
}

/// Draws OSD grids as transparent overlay images
///
/// Glyphs are prepared once for the layout so that rendering a grid only composes images.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Renderer {
	#[getset(get = "pub")]
	settings: RenderSettings,
	#[getset(get_copy = "pub")]
	layout: Layout,
	atlas: FontAtlas,
}

impl Renderer {
	/// Picks the font of the glyph kind the resolution mode needs
	pub fn new(fonts: &FontSet, settings: RenderSettings) -> Result<Self, RenderError> {
		let layout = settings.layout();
		let atlas = fonts.get(layout.glyph_kind).ok_or(RenderError::MissingFont {
			mode: settings.resolution_mode,
			glyph_kind: layout.glyph_kind,
		})?;
		Self::with_atlas(atlas, settings)
	}

	pub fn with_atlas(atlas: &FontAtlas, settings: RenderSettings) -> Result<Self, RenderError> {
		let layout = settings.layout();
		if atlas.glyph_kind() != layout.glyph_kind {
			return Err(RenderError::InvalidGlyphKind {
				mode: settings.resolution_mode,
				expected: layout.glyph_kind,
				actual: atlas.glyph_kind(),
			});
		}
		let atlas = match layout.strategy {
			PlacementStrategy::Direct => {
				let cell_dimensions = layout.cell_dimensions();
				if atlas.glyph_dimensions() != cell_dimensions {
					log::debug!("resizing {} glyphs from {} to {cell_dimensions}", atlas.len(), atlas.glyph_dimensions());
				}
				atlas.resized(cell_dimensions)
			},
			PlacementStrategy::NativeThenRescale => atlas.clone(),
		};
		log::info!(
			"rendering {} OSD at {} ({}) with {} glyphs",
			settings.resolution_mode,
			layout.canvas,
			settings.aspect_ratio,
			atlas.glyph_dimensions()
		);
		Ok(Self { settings, layout, atlas })
	}

	pub fn resolution(&self) -> Resolution {
		self.layout.canvas
	}

	pub fn blank_canvas(&self) -> Canvas {
		Canvas::new(self.layout.canvas.width, self.layout.canvas.height)
	}

	/// Composes the glyphs of the cells inside of the display grid at the origins given by `cell_origin`
	fn compose(&self, grid: &CharacterGrid, canvas: &mut Canvas, cell_origin: impl Fn(u32, u32) -> (u32, u32)) {
		let display_grid = self.layout.display_grid;
		for (coordinates, code) in grid.enumerate() {
			if coordinates.x >= display_grid.width || coordinates.y >= display_grid.height {
				continue;
			}
			let (x, y) = cell_origin(coordinates.x as u32, coordinates.y as u32);
			imageops::overlay(canvas, self.atlas.glyph(code), x as i64, y as i64);
		}
	}

	pub fn render_with_mask_style(&self, grid: &CharacterGrid, mask_style: MaskStyle) -> Canvas {
		let mut canvas = match self.layout.strategy {
			PlacementStrategy::Direct => {
				let mut canvas = self.blank_canvas();
				self.compose(grid, &mut canvas, |x, y| {
					let (left, top, _, _) = self.layout.cell_rect(x, y);
					(left, top)
				});
				canvas
			},
			PlacementStrategy::NativeThenRescale => {
				let glyph = self.atlas.glyph_dimensions();
				let native = self.layout.display_grid * glyph;
				let mut composed = Canvas::new(native.width, native.height);
				self.compose(grid, &mut composed, |x, y| (x * glyph.width, y * glyph.height));
				let canvas = self.layout.canvas;
				imageops::resize(&composed, canvas.width, canvas.height, FilterType::CatmullRom)
			},
		};
		apply_masks(&mut canvas, &self.layout, &self.settings.masks, mask_style);
		canvas
	}

	pub fn render(&self, grid: &CharacterGrid) -> Canvas {
		self.render_with_mask_style(grid, self.settings.mask_style)
	}
}

/// Renders a single grid, see [`Renderer`] to render several grids with the same settings
pub fn render(grid: &CharacterGrid, atlas: &FontAtlas, resolution_mode: ResolutionMode, aspect_ratio: AspectRatio, masks: &[Region]) -> Result<Canvas, RenderError> {
	let settings = RenderSettings::new(resolution_mode, aspect_ratio).with_masks(masks.to_vec());
	Ok(Renderer::with_atlas(atlas, settings)?.render(grid))
}
