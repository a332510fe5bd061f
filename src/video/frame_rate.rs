use std::{fmt::Display, str::FromStr};

use getset::CopyGetters;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;


/// Video frame rate as a fraction of frames per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct FrameRate {
	numerator: u32,
	denominator: u32,
}

impl FrameRate {
	pub const FPS_30: Self = Self { numerator: 30, denominator: 1 };
	pub const FPS_60: Self = Self { numerator: 60, denominator: 1 };

	/// `None` when one of the terms is 0
	pub const fn new(numerator: u32, denominator: u32) -> Option<Self> {
		if numerator == 0 || denominator == 0 {
			return None;
		}
		Some(Self { numerator, denominator })
	}

	pub fn as_f64(&self) -> f64 {
		self.numerator as f64 / self.denominator as f64
	}
}

impl Display for FrameRate {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.denominator == 1 {
			write!(f, "{}", self.numerator)
		} else {
			write!(f, "{}/{}", self.numerator, self.denominator)
		}
	}
}

#[derive(Debug, Error)]
#[error("invalid frame rate: `{0}`, expected <fps>, <fps>.<decimals> or <numerator>/<denominator>")]
pub struct FrameRateFormatError(String);

impl FromStr for FrameRate {
	type Err = FrameRateFormatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		lazy_static! {
			static ref FRACTION_RE: Regex = Regex::new(r"\A(?P<numerator>\d{1,9})(?:/(?P<denominator>\d{1,9}))?\z").unwrap();
			static ref DECIMAL_RE: Regex = Regex::new(r"\A(?P<integer>\d{1,6})\.(?P<decimals>\d{1,3})\z").unwrap();
		}
		let error = || FrameRateFormatError(s.to_owned());
		let s = s.trim();
		let (numerator, denominator) = if let Some(captures) = FRACTION_RE.captures(s) {
			let numerator = captures["numerator"].parse().map_err(|_| error())?;
			let denominator = match captures.name("denominator") {
				Some(denominator) => denominator.as_str().parse().map_err(|_| error())?,
				None => 1,
			};
			(numerator, denominator)
		} else if let Some(captures) = DECIMAL_RE.captures(s) {
			let decimals = &captures["decimals"];
			let denominator = 10u32.pow(decimals.len() as u32);
			let integer: u32 = captures["integer"].parse().map_err(|_| error())?;
			let fraction: u32 = decimals.parse().map_err(|_| error())?;
			(integer * denominator + fraction, denominator)
		} else {
			return Err(error());
		};
		Self::new(numerator, denominator).ok_or_else(error)
	}
}
