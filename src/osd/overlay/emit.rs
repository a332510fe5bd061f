use std::{
	io::{Error as IOError, Write},
	path::{Path, PathBuf},
};

use derive_more::From;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use thiserror::Error;

use super::{Generator, TestFrameError};
use crate::{
	create_path::{create_path, CreatePathError},
	file::{self, DuplicateError, LinkMode},
	image::{WriteError as ImageWriteError, WriteImageFile},
	video::FrameIndex,
};


pub fn format_overlay_frame_file_index(frame_index: FrameIndex) -> String {
	format!("{:010}.png", frame_index)
}

pub fn make_overlay_frame_file_path<P: AsRef<Path>>(dir_path: P, frame_index: FrameIndex) -> PathBuf {
	dir_path.as_ref().join(format_overlay_frame_file_index(frame_index))
}

fn progress_style(template: &str) -> ProgressStyle {
	ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar())
}

#[derive(Debug, Error, From)]
pub enum SaveFramesToDirError {
	#[error("target directory {} exists", .0.to_string_lossy())]
	#[from(ignore)]
	TargetDirectoryExists(PathBuf),
	#[error(transparent)]
	CreatePath(CreatePathError),
	#[error(transparent)]
	ImageWrite(ImageWriteError),
	#[error(transparent)]
	Duplicate(DuplicateError),
}

#[derive(Debug, Error)]
#[error("failed writing overlay frame {frame_index}: {error}")]
pub struct WriteRawFramesError {
	frame_index: FrameIndex,
	#[source]
	error: IOError,
}

#[derive(Debug, Error, From)]
pub enum SaveTestFrameError {
	#[error(transparent)]
	TestFrame(TestFrameError),
	#[error(transparent)]
	ImageWrite(ImageWriteError),
}

impl Generator {
	/// Writes one PNG file per video frame into a new directory
	///
	/// Only the first frame showing a record is rendered, the following frames showing the same record are
	/// duplicated from it with `link_mode`. Symbolic links are relative so that the directory can be moved.
	pub fn save_frames_to_dir<P: AsRef<Path>>(&self, path: P, link_mode: LinkMode) -> Result<FrameIndex, SaveFramesToDirError> {
		let path = path.as_ref();
		if path.exists() {
			return Err(SaveFramesToDirError::TargetDirectoryExists(path.to_path_buf()));
		}
		create_path(path)?;
		log::info!("generating overlay frames and saving into directory: {}", path.to_string_lossy());

		let runs = self.timeline().runs();
		runs.par_iter()
			.progress_with_style(progress_style("{wide_bar} {pos:>6}/{len}"))
			.try_for_each(|run| {
				log::debug!("rendering overlay frame {} for frames {:?}", run.first_frame(), run.frames());
				self.render_record(run.record())
					.write_image_file(make_overlay_frame_file_path(path, run.first_frame()))
			})?;

		log::info!("{} repeated overlay frames", file::Action::from(link_mode));
		for run in &runs {
			let original_path = match link_mode {
				LinkMode::Symlink => PathBuf::from(format_overlay_frame_file_index(run.first_frame())),
				LinkMode::HardLink | LinkMode::Copy => make_overlay_frame_file_path(path, run.first_frame()),
			};
			for frame_index in run.frames().skip(1) {
				file::duplicate(link_mode, &original_path, make_overlay_frame_file_path(path, frame_index))?;
			}
		}

		let frame_count = self.frame_count();
		log::info!("overlay frames generation completed: {frame_count} frames");
		Ok(frame_count)
	}

	/// Streams the raw RGBA data of every frame, for example to the input of a video encoder
	pub fn write_raw_frames<W: Write>(&self, mut writer: W) -> Result<FrameIndex, WriteRawFramesError> {
		let frame_count = self.frame_count();
		let progress_bar = ProgressBar::new(frame_count as u64).with_style(progress_style("{wide_bar} {percent:>3}% [ETA {eta:>3}]"));
		for (frame_index, canvas) in self.frames() {
			writer
				.write_all(canvas.as_raw())
				.map_err(|error| WriteRawFramesError { frame_index, error })?;
			progress_bar.inc(1);
		}
		writer.flush().map_err(|error| WriteRawFramesError {
			frame_index: frame_count,
			error,
		})?;
		progress_bar.finish_and_clear();
		log::info!("overlay stream completed: {frame_count} frames of {}", self.resolution());
		Ok(frame_count)
	}

	pub fn save_test_frame<P: AsRef<Path>>(&self, path: P, record_index: Option<i64>) -> Result<(), SaveTestFrameError> {
		self.render_test_frame(record_index)?.write_image_file(&path)?;
		log::info!("test frame saved to {}", path.as_ref().to_string_lossy());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::{format_overlay_frame_file_index, make_overlay_frame_file_path, SaveFramesToDirError};
	use crate::{
		dimensions::Dimensions as GenericDimensions,
		file::LinkMode,
		font::{FontSet, GlyphKind},
		image::read_image_file,
		osd::{
			dump::DumpReader,
			overlay::{AspectRatio, Generator, GeneratorSettingsBuilder, MaskStyle},
			Region,
		},
		test_utils::{self, DumpRecord},
		video::FrameRate,
	};

	/// SD generator at 30 fps showing a record on frames 0..2 and another one on frames 2..5
	fn generator(masks: Vec<Region>) -> Generator {
		let records = vec![DumpRecord::new(0, &[(0, 0, 1)]), DumpRecord::new(4, &[(1, 0, 1)])];
		let dump = DumpReader::new(Cursor::new(test_utils::dji_dump_bytes(30, 15, &records)))
			.unwrap()
			.read_all()
			.unwrap();
		let fonts = FontSet::new().with(test_utils::solid_font(GenericDimensions::new(32, 48), GlyphKind::SD));
		let settings = GeneratorSettingsBuilder::default()
			.aspect_ratio(AspectRatio::Standard)
			.frame_rate(FrameRate::FPS_30)
			.frame_count(5u32)
			.masks(masks)
			.build()
			.unwrap();
		Generator::new(dump, &fonts, &settings).unwrap()
	}

	#[test]
	fn frame_file_names() {
		assert_eq!(format_overlay_frame_file_index(42), "0000000042.png");
		assert_eq!(make_overlay_frame_file_path("frames", 7).to_string_lossy(), "frames/0000000007.png");
	}

	#[test]
	fn save_frames_with_hard_links() {
		test_utils::init_logger();
		let dir = tempfile::tempdir().unwrap();
		let frames_dir = dir.path().join("frames");
		let generator = generator(vec![]);
		assert_eq!(generator.save_frames_to_dir(&frames_dir, LinkMode::HardLink).unwrap(), 5);
		assert_eq!(std::fs::read_dir(&frames_dir).unwrap().count(), 5);
		for frame_index in 0..5 {
			let image = read_image_file(make_overlay_frame_file_path(&frames_dir, frame_index)).unwrap().to_rgba8();
			assert_eq!(image, generator.frame(frame_index).unwrap(), "frame {frame_index}");
		}
		assert!(matches!(
			generator.save_frames_to_dir(&frames_dir, LinkMode::HardLink),
			Err(SaveFramesToDirError::TargetDirectoryExists(_))
		));
	}

	#[cfg(unix)]
	#[test]
	fn symlinks_are_relative() {
		let dir = tempfile::tempdir().unwrap();
		let frames_dir = dir.path().join("frames");
		generator(vec![]).save_frames_to_dir(&frames_dir, LinkMode::Symlink).unwrap();
		let target = std::fs::read_link(make_overlay_frame_file_path(&frames_dir, 4)).unwrap();
		assert_eq!(target.to_string_lossy(), "0000000002.png");

		let moved_dir = dir.path().join("moved");
		std::fs::rename(&frames_dir, &moved_dir).unwrap();
		assert!(read_image_file(make_overlay_frame_file_path(&moved_dir, 4)).is_ok());
	}

	#[test]
	fn raw_frames_stream() {
		let generator = generator(vec![]);
		let mut stream = vec![];
		assert_eq!(generator.write_raw_frames(&mut stream).unwrap(), 5);
		let frame_len = 960 * 720 * 4;
		assert_eq!(stream.len(), 5 * frame_len);
		for frame_index in 0..5 {
			let start = frame_index as usize * frame_len;
			assert_eq!(&stream[start..start + frame_len], generator.frame(frame_index).unwrap().as_raw().as_slice());
		}
	}

	#[test]
	fn test_frame_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("test.png");
		let generator = generator(vec![Region::new(0, 0, 1, 1)]);
		generator.save_test_frame(&path, None).unwrap();
		let image = read_image_file(&path).unwrap().to_rgba8();
		assert_eq!(*image.get_pixel(0, 0), MaskStyle::MARKER_COLOR);
		assert_eq!(image.get_pixel(32, 0)[3], 255);
		assert!(generator.save_test_frame(dir.path().join("out_of_range.png"), Some(5)).is_err());
	}
}
