use std::{
	io::Error as IOError,
	path::{Path, PathBuf},
};

use thiserror::Error;


#[derive(Debug, Error)]
#[error("failed to create path {}: {error}", path.to_string_lossy())]
pub struct CreatePathError {
	path: PathBuf,
	#[source]
	error: IOError,
}

impl CreatePathError {
	pub fn new<P: AsRef<Path>>(path: P, error: IOError) -> Self {
		Self { path: path.as_ref().to_path_buf(), error }
	}
}

pub fn create_path<P: AsRef<Path>>(path: P) -> Result<(), CreatePathError> {
	std::fs::create_dir_all(&path).map_err(|error| CreatePathError::new(&path, error))
}
