use std::{
	fmt::Display,
	io::Error as IOError,
	path::{Path, PathBuf},
};

use getset::Getters;
use strum::{EnumIter, EnumString};
use thiserror::Error;


/// How an overlay frame identical to an already written one is materialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LinkMode {
	#[default]
	HardLink,
	Symlink,
	Copy,
}

#[derive(Debug)]
pub enum Action {
	HardLink,
	Symlink,
	Copy,
}

impl Display for Action {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use Action::*;
		let action_str = match self {
			HardLink => "hard linking",
			Symlink => "symlinking",
			Copy => "copying",
		};
		f.write_str(action_str)
	}
}

impl From<LinkMode> for Action {
	fn from(mode: LinkMode) -> Self {
		match mode {
			LinkMode::HardLink => Self::HardLink,
			LinkMode::Symlink => Self::Symlink,
			LinkMode::Copy => Self::Copy,
		}
	}
}

#[derive(Debug, Error, Getters)]
#[getset(get = "pub")]
#[error("failed {action} {} -> {}: {error}", original_path.to_string_lossy(), link_path.to_string_lossy())]
pub struct DuplicateError {
	action: Action,
	original_path: PathBuf,
	link_path: PathBuf,
	#[source]
	error: IOError,
}

impl DuplicateError {
	pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(action: Action, original_path: P, link_path: Q, error: IOError) -> Self {
		Self {
			action,
			original_path: original_path.as_ref().to_path_buf(),
			link_path: link_path.as_ref().to_path_buf(),
			error,
		}
	}
}

pub fn hard_link<P: AsRef<Path>, Q: AsRef<Path>>(original_path: P, link_path: Q) -> Result<(), DuplicateError> {
	std::fs::hard_link(&original_path, &link_path)
		.map_err(|error| DuplicateError::new(Action::HardLink, original_path, link_path, error))
}

#[cfg(unix)]
pub fn symlink<P: AsRef<Path>, Q: AsRef<Path>>(original_path: P, link_path: Q) -> Result<(), DuplicateError> {
	std::os::unix::fs::symlink(&original_path, &link_path)
		.map_err(|error| DuplicateError::new(Action::Symlink, original_path, link_path, error))
}

#[cfg(windows)]
pub fn symlink<P: AsRef<Path>, Q: AsRef<Path>>(original_path: P, link_path: Q) -> Result<(), DuplicateError> {
	std::os::windows::fs::symlink_file(&original_path, &link_path)
		.map_err(|error| DuplicateError::new(Action::Symlink, original_path, link_path, error))
}

pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(original_path: P, link_path: Q) -> Result<(), DuplicateError> {
	std::fs::copy(&original_path, &link_path)
		.map(|_| ())
		.map_err(|error| DuplicateError::new(Action::Copy, original_path, link_path, error))
}

pub fn duplicate<P: AsRef<Path>, Q: AsRef<Path>>(mode: LinkMode, original_path: P, link_path: Q) -> Result<(), DuplicateError> {
	match mode {
		LinkMode::HardLink => hard_link(original_path, link_path),
		LinkMode::Symlink => symlink(original_path, link_path),
		LinkMode::Copy => copy(original_path, link_path),
	}
}
