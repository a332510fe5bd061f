//! OSD data model: character grids, dump decoding and overlay rendering

pub mod coordinates;
pub mod dump;
pub mod font_variant;
pub mod grid;
pub mod item;
pub mod kind;
pub mod overlay;
pub mod region;

use crate::dimensions::Dimensions as GenericDimensions;

/// Grid dimensions in cells
pub type Dimensions = GenericDimensions<u8>;

pub use coordinates::{Coordinate, Coordinates, FormatError as CoordinatesFormatError, SignedCoordinate, SignedCoordinates};
pub use font_variant::FontVariant;
pub use grid::{CharacterGrid, InvalidGridSize};
pub use item::{LocationData, UnknownOSDItem};
pub use kind::Kind;
pub use region::{InvalidRegionString, Region};
