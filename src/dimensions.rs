use std::{
	fmt::Display,
	ops::Mul,
	str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions<T> {
	pub width: T,
	pub height: T,
}

impl<T> Dimensions<T> {
	pub const fn new(width: T, height: T) -> Self {
		Self { width, height }
	}
}

impl<T: Copy + Into<u64>> Dimensions<T> {
	pub fn area(&self) -> u64 {
		self.width.into() * self.height.into()
	}
}

impl<T: Display> Display for Dimensions<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}

/// grid dimensions in tiles multiplied by tile dimensions in pixels
impl Mul<Dimensions<u32>> for Dimensions<u8> {
	type Output = Dimensions<u32>;

	fn mul(self, rhs: Dimensions<u32>) -> Self::Output {
		Dimensions::new(self.width as u32 * rhs.width, self.height as u32 * rhs.height)
	}
}

#[derive(Debug, Error)]
#[error("invalid dimensions format: {0}")]
pub struct FormatError(String);

impl<T: FromStr> FromStr for Dimensions<T> {
	type Err = FormatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		lazy_static! {
			static ref DIMENSIONS_RE: Regex = Regex::new(r"\A(?P<width>\d{1,5})x(?P<height>\d{1,5})\z").unwrap();
		}
		let captures = DIMENSIONS_RE.captures(s).ok_or_else(|| FormatError(s.to_owned()))?;
		let width = captures["width"].parse().map_err(|_| FormatError(s.to_owned()))?;
		let height = captures["height"].parse().map_err(|_| FormatError(s.to_owned()))?;
		Ok(Self { width, height })
	}
}
