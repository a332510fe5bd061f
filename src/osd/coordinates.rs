use std::str::FromStr;

use derive_more::From;
use getset::CopyGetters;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;


pub type Coordinate = u8;
pub type SignedCoordinate = i16;

#[derive(Debug, Error)]
#[error("invalid screen coordinates format: {0}")]
pub struct FormatError(String);

/// Position of a cell in the OSD grid, `x` being the column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, CopyGetters, From)]
#[getset(get_copy = "pub")]
pub struct Coordinates {
	pub x: Coordinate,
	pub y: Coordinate,
}

impl Coordinates {
	pub const fn new(x: Coordinate, y: Coordinate) -> Self {
		Self { x, y }
	}
}

impl FromStr for Coordinates {
	type Err = FormatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		lazy_static! {
			static ref COORDINATES_RE: Regex = Regex::new(r"\A\s*(?P<x>\d{1,3})\s*,\s*(?P<y>\d{1,3})\s*\z").unwrap();
		}
		let captures = COORDINATES_RE.captures(s).ok_or_else(|| FormatError(s.to_owned()))?;
		let x = captures["x"].parse().map_err(|_| FormatError(s.to_owned()))?;
		let y = captures["y"].parse().map_err(|_| FormatError(s.to_owned()))?;
		Ok(Self { x, y })
	}
}

/// Cell position which may lie outside of the grid, used while computing regions relative to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, CopyGetters, From)]
#[getset(get_copy = "pub")]
pub struct SignedCoordinates {
	pub x: SignedCoordinate,
	pub y: SignedCoordinate,
}

impl SignedCoordinates {
	pub const fn new(x: SignedCoordinate, y: SignedCoordinate) -> Self {
		Self { x, y }
	}
}

impl From<Coordinates> for SignedCoordinates {
	fn from(coordinates: Coordinates) -> Self {
		Self::new(coordinates.x as SignedCoordinate, coordinates.y as SignedCoordinate)
	}
}

#[cfg(test)]
mod tests {
	use super::Coordinates;

	#[test]
	fn parse() {
		assert_eq!("3,14".parse::<Coordinates>().unwrap(), Coordinates::new(3, 14));
		assert_eq!(" 3, 14 ".parse::<Coordinates>().unwrap(), Coordinates::new(3, 14));
		assert!("3;14".parse::<Coordinates>().is_err());
		assert!("300,1".parse::<Coordinates>().is_err());
	}
}
