use std::{
	io::Error as IOError,
	ops::Deref,
	path::{Path, PathBuf},
};

use image::{io::Reader as ImageReader, DynamicImage, EncodableLayout, ImageBuffer, ImageError, PixelWithColorType};
use thiserror::Error;


#[derive(Debug, Error)]
pub enum ReadError {
	#[error("failed opening image file `{}`: {error}", file_path.to_string_lossy())]
	OpenError { file_path: PathBuf, error: IOError },
	#[error("failed decoding image file `{}`: {error}", file_path.to_string_lossy())]
	DecodeError { file_path: PathBuf, error: ImageError },
}

impl ReadError {
	pub fn open_error<P: AsRef<Path>>(path: P, error: IOError) -> Self {
		Self::OpenError {
			file_path: path.as_ref().to_path_buf(),
			error,
		}
	}

	pub fn decode_error<P: AsRef<Path>>(path: P, error: ImageError) -> Self {
		Self::DecodeError {
			file_path: path.as_ref().to_path_buf(),
			error,
		}
	}

	pub fn because_file_is_missing(&self) -> bool {
		matches!(self, Self::OpenError { error, .. } if error.kind() == std::io::ErrorKind::NotFound)
	}
}

pub fn read_image_file<P: AsRef<Path>>(path: P) -> Result<DynamicImage, ReadError> {
	let reader = ImageReader::open(&path).map_err(|error| ReadError::open_error(&path, error))?;
	let reader = reader.with_guessed_format().map_err(|error| ReadError::open_error(&path, error))?;
	reader.decode().map_err(|error| ReadError::decode_error(&path, error))
}

#[derive(Debug, Error)]
#[error("failed to write image file `{}`: {error}", file_path.to_string_lossy())]
pub struct WriteError {
	file_path: PathBuf,
	error: ImageError,
}

impl WriteError {
	pub fn new<P: AsRef<Path>>(path: P, error: ImageError) -> Self {
		Self {
			file_path: path.as_ref().to_path_buf(),
			error,
		}
	}
}

pub trait WriteImageFile {
	fn write_image_file<Q: AsRef<Path>>(&self, path: Q) -> Result<(), WriteError>;
}

impl<P, Container> WriteImageFile for ImageBuffer<P, Container>
where
	P: PixelWithColorType,
	[P::Subpixel]: EncodableLayout,
	Container: Deref<Target = [P::Subpixel]>,
{
	fn write_image_file<Q: AsRef<Path>>(&self, path: Q) -> Result<(), WriteError> {
		self.save(&path).map_err(|error| WriteError::new(&path, error))
	}
}

#[cfg(test)]
mod tests {
	use image::{Rgba, RgbaImage};

	use super::{read_image_file, WriteImageFile};

	#[test]
	fn png_written_then_read_back() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("pixel.png");
		let image = RgbaImage::from_pixel(3, 2, Rgba([255, 0, 255, 255]));
		image.write_image_file(&path).unwrap();
		assert_eq!(read_image_file(&path).unwrap().to_rgba8(), image);
	}

	#[test]
	fn missing_file_is_reported_as_such() {
		let dir = tempfile::tempdir().unwrap();
		let error = read_image_file(dir.path().join("nope.png")).unwrap_err();
		assert!(error.because_file_is_missing());
	}
}
