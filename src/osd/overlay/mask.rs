use image::{Pixel, Rgba};

use super::{resolution::Layout, Canvas};
use crate::osd::Region;


/// How masked cells are drawn on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskStyle {
	/// masked cells are cleared
	#[default]
	Transparent,
	/// masked cells are tinted so that the masked area can be checked on a preview
	Marker(Rgba<u8>),
}

impl MaskStyle {
	pub const MARKER_COLOR: Rgba<u8> = Rgba([255, 0, 255, 160]);

	pub const fn marker() -> Self {
		Self::Marker(Self::MARKER_COLOR)
	}
}

/// Cells of the display grid covered by at least one region, row-major
fn masked_cells(layout: &Layout, regions: &[Region]) -> Vec<bool> {
	let width = layout.display_grid.width as usize;
	let mut cells = vec![false; layout.display_grid.area() as usize];
	for span in regions.iter().filter_map(|region| region.clamp_to(layout.display_grid)) {
		for y in span.rows {
			for x in span.columns.clone() {
				cells[y as usize * width + x as usize] = true;
			}
		}
	}
	cells
}

/// Applies the union of the regions to the canvas, regions outside of the grid have no effect
pub fn apply_masks(canvas: &mut Canvas, layout: &Layout, regions: &[Region], style: MaskStyle) {
	if regions.is_empty() {
		return;
	}
	let width = layout.display_grid.width as u32;
	for (cell, _) in masked_cells(layout, regions).into_iter().enumerate().filter(|(_, masked)| *masked) {
		let (left, top, right, bottom) = layout.cell_rect(cell as u32 % width, cell as u32 / width);
		for y in top..bottom.min(canvas.height()) {
			for x in left..right.min(canvas.width()) {
				let pixel = canvas.get_pixel_mut(x, y);
				match style {
					MaskStyle::Transparent => *pixel = Rgba([0, 0, 0, 0]),
					MaskStyle::Marker(color) => pixel.blend(&color),
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use image::Rgba;

	use super::{apply_masks, MaskStyle};
	use crate::osd::{
		overlay::{AspectRatio, Canvas, Layout, ResolutionMode},
		Region,
	};

	fn opaque_canvas(layout: &Layout) -> Canvas {
		Canvas::from_pixel(layout.canvas.width, layout.canvas.height, Rgba([255, 255, 255, 255]))
	}

	#[test]
	fn regions_outside_of_the_grid_are_ignored() {
		let layout = Layout::new(ResolutionMode::SD, AspectRatio::Standard);
		let mut canvas = opaque_canvas(&layout);
		apply_masks(&mut canvas, &layout, &[Region::new(30, 0, 40, 15), Region::new(-5, -5, 0, 0)], MaskStyle::Transparent);
		assert_eq!(canvas, opaque_canvas(&layout));
	}

	#[test]
	fn transparent_mask_clears_cells() {
		let layout = Layout::new(ResolutionMode::SD, AspectRatio::Standard);
		let mut canvas = opaque_canvas(&layout);
		apply_masks(&mut canvas, &layout, &[Region::new(28, 13, 35, 20)], MaskStyle::Transparent);
		// cell (28, 13) starts at 896x624
		assert_eq!(canvas.get_pixel(896, 624)[3], 0);
		assert_eq!(canvas.get_pixel(959, 719)[3], 0);
		assert_eq!(canvas.get_pixel(895, 719)[3], 255);
		assert_eq!(canvas.get_pixel(959, 623)[3], 255);
	}

	#[test]
	fn overlapping_markers_tint_once() {
		let layout = Layout::new(ResolutionMode::SD, AspectRatio::Standard);
		let mut once = Canvas::new(layout.canvas.width, layout.canvas.height);
		apply_masks(&mut once, &layout, &[Region::new(0, 0, 2, 2)], MaskStyle::marker());
		let mut overlapping = Canvas::new(layout.canvas.width, layout.canvas.height);
		apply_masks(&mut overlapping, &layout, &[Region::new(0, 0, 2, 2), Region::new(1, 1, 2, 2)], MaskStyle::marker());
		assert_eq!(once, overlapping);
		assert_eq!(*once.get_pixel(40, 60), MaskStyle::MARKER_COLOR);
	}
}
