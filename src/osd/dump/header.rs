use std::{fmt::Display, io::Read};

use byte_struct::*;
use getset::CopyGetters;

use super::{read_fully, DecodeError, UnsupportedFormat};
use crate::{
	dimensions::Dimensions as GenericDimensions,
	osd::{kind, CharacterGrid, Dimensions, FontVariant, Kind},
	video::TelemetryClock,
};


pub const DJI_SIGNATURE: &[u8] = b"MSPOSD\x00";
pub const DJI_SUPPORTED_VERSIONS: std::ops::RangeInclusive<u16> = 1..=3;

/// DJI record payloads always describe the full 60x22 grid, whatever layout the header announces
pub const DJI_RECORD_GRID: Dimensions = kind::dimensions::DJI_FAKE_HD;
pub const WALKSNAIL_RECORD_GRID: Dimensions = kind::dimensions::WSA;

#[derive(ByteStruct, Debug)]
#[byte_struct_le]
pub(super) struct DjiHeaderRaw {
	format_version: u16,
	width_tiles: u8,
	height_tiles: u8,
	tile_width: u8,
	tile_height: u8,
	x_offset: u16,
	y_offset: u16,
	font_variant: u8,
}

#[derive(ByteStruct, Debug)]
#[byte_struct_le]
pub(super) struct WalksnailHeaderRaw {
	font_variant_id: [u8; 4],
	unused: [u8; 32],
	width_tiles: u16,
	height_tiles: u16,
}

#[derive(ByteStruct, Debug)]
#[byte_struct_le]
pub(super) struct DjiRecordHeaderRaw {
	pub frame_index: u32,
	pub data_len: u32,
}

#[derive(ByteStruct, Debug)]
#[byte_struct_le]
pub(super) struct WalksnailRecordHeaderRaw {
	pub timestamp: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Offset {
	x: u16,
	y: u16,
}

impl Display for Offset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "x: {}, y: {}", self.x, self.y)
	}
}

/// Dump format, selected once when the header is parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpFormat {
	Dji {
		version: u16,
		tile_dimensions: GenericDimensions<u32>,
		offset: Offset,
	},
	Walksnail {
		font_variant_id: [u8; 4],
	},
}

impl DumpFormat {
	pub fn name(&self) -> &'static str {
		match self {
			DumpFormat::Dji { .. } => "DJI",
			DumpFormat::Walksnail { .. } => "Walksnail",
		}
	}

	pub const fn header_len(&self) -> usize {
		match self {
			DumpFormat::Dji { .. } => DJI_SIGNATURE.len() + DjiHeaderRaw::BYTE_LEN,
			DumpFormat::Walksnail { .. } => WalksnailHeaderRaw::BYTE_LEN,
		}
	}

	pub const fn record_grid_dimensions(&self) -> Dimensions {
		match self {
			DumpFormat::Dji { .. } => DJI_RECORD_GRID,
			DumpFormat::Walksnail { .. } => WALKSNAIL_RECORD_GRID,
		}
	}

	pub const fn record_len(&self) -> usize {
		let payload_len = CharacterGrid::payload_len(self.record_grid_dimensions());
		match self {
			DumpFormat::Dji { .. } => DjiRecordHeaderRaw::BYTE_LEN + payload_len,
			DumpFormat::Walksnail { .. } => WalksnailRecordHeaderRaw::BYTE_LEN + payload_len,
		}
	}

	/// DJI records are stamped with the air unit frame counter, Walksnail records with milliseconds
	pub const fn clock(&self) -> TelemetryClock {
		match self {
			DumpFormat::Dji { .. } => TelemetryClock::DJI,
			DumpFormat::Walksnail { .. } => TelemetryClock::WALKSNAIL,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, CopyGetters)]
pub struct DumpHeader {
	format: DumpFormat,
	#[getset(get_copy = "pub")]
	kind: Kind,
	#[getset(get_copy = "pub")]
	font_variant: FontVariant,
}

impl DumpHeader {
	pub fn format(&self) -> &DumpFormat {
		&self.format
	}

	pub fn clock(&self) -> TelemetryClock {
		self.format.clock()
	}

	pub fn record_grid_dimensions(&self) -> Dimensions {
		self.format.record_grid_dimensions()
	}

	fn read_bytes<R: Read>(reader: &mut R, buffer: &mut [u8], offset: usize) -> Result<(), DecodeError> {
		let read = read_fully(reader, buffer).map_err(|error| DecodeError::Io {
			offset: offset as u64,
			error,
		})?;
		if read < buffer.len() {
			return Err(DecodeError::MalformedHeader {
				offset: (offset + read) as u64,
				reason: format!("header is truncated, {} bytes missing", buffer.len() - read),
			});
		}
		Ok(())
	}

	fn read_dji<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
		let mut header_bytes = [0; DjiHeaderRaw::BYTE_LEN];
		Self::read_bytes(reader, &mut header_bytes, DJI_SIGNATURE.len())?;
		let raw = DjiHeaderRaw::read_bytes(&header_bytes);
		if !DJI_SUPPORTED_VERSIONS.contains(&raw.format_version) {
			return Err(DecodeError::UnsupportedVersion(UnsupportedFormat::DjiVersion(raw.format_version)));
		}
		let dimensions = Dimensions::new(raw.width_tiles, raw.height_tiles);
		let kind = Kind::try_from(dimensions).map_err(|error| DecodeError::MalformedHeader {
			offset: (DJI_SIGNATURE.len() + u16::BYTE_LEN) as u64,
			reason: error.to_string(),
		})?;
		Ok(Self {
			format: DumpFormat::Dji {
				version: raw.format_version,
				tile_dimensions: GenericDimensions::new(raw.tile_width as u32, raw.tile_height as u32),
				offset: Offset {
					x: raw.x_offset,
					y: raw.y_offset,
				},
			},
			kind,
			font_variant: FontVariant::from(raw.font_variant),
		})
	}

	fn read_walksnail<R: Read>(reader: &mut R, signature: [u8; DJI_SIGNATURE.len()]) -> Result<Self, DecodeError> {
		let mut header_bytes = [0; WalksnailHeaderRaw::BYTE_LEN];
		header_bytes[..signature.len()].copy_from_slice(&signature);
		Self::read_bytes(reader, &mut header_bytes[signature.len()..], signature.len())?;
		let raw = WalksnailHeaderRaw::read_bytes(&header_bytes);
		let expected = WALKSNAIL_RECORD_GRID;
		if (raw.width_tiles, raw.height_tiles) != (expected.width as u16, expected.height as u16) {
			return Err(DecodeError::UnsupportedVersion(UnsupportedFormat::UnknownSignature));
		}
		Ok(Self {
			format: DumpFormat::Walksnail {
				font_variant_id: raw.font_variant_id,
			},
			kind: Kind::WSA,
			font_variant: FontVariant::from_walksnail_ident(&raw.font_variant_id),
		})
	}

	/// Reads the header and detects the format: DJI dumps start with a signature, Walksnail dumps are
	/// recognized by their grid dimensions
	pub fn read<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
		let mut signature = [0; DJI_SIGNATURE.len()];
		Self::read_bytes(reader, &mut signature, 0)?;
		let header = if signature[..] == *DJI_SIGNATURE {
			Self::read_dji(reader)?
		} else {
			Self::read_walksnail(reader, signature)?
		};
		log::info!("detected {} OSD dump with {} layout and {} font variant", header.format.name(), header.kind, header.font_variant);
		Ok(header)
	}
}
