//! OSD dump decoding
//!
//! Two dump formats are supported:
//! - DJI FPV (`MSPOSD` signature): records stamped with the air unit frame counter holding the 60x22 grid column by column
//! - Walksnail Avatar: records stamped in milliseconds holding the 53x20 grid row by row

use std::{
	fmt::Display,
	io::{BufReader, Error as IOError, ErrorKind as IOErrorKind, Read, Seek, SeekFrom},
	path::{Path, PathBuf},
	time::Duration,
};

use byte_struct::*;
use getset::Getters;
use thiserror::Error;

pub mod header;
pub mod record;

pub use header::{DumpFormat, DumpHeader, Offset};
pub use record::{OsdRecord, RecordIndex, Timestamp};

use header::{DjiRecordHeaderRaw, WalksnailRecordHeaderRaw, DJI_RECORD_GRID, WALKSNAIL_RECORD_GRID};
use record::decode_codes;

use super::CharacterGrid;
use crate::{font::CharacterCode, video::TelemetryClock};


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnsupportedFormat {
	#[error("DJI format version {0}")]
	DjiVersion(u16),
	#[error("unrecognized file signature")]
	UnknownSignature,
}

#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("unsupported OSD dump: {0}")]
	UnsupportedVersion(UnsupportedFormat),
	#[error("malformed OSD dump header at byte {offset}: {reason}")]
	MalformedHeader { offset: u64, reason: String },
	#[error("malformed OSD record {index} at byte {offset}: {reason}")]
	MalformedRecord { index: RecordIndex, offset: u64, reason: String },
	#[error("failed reading OSD dump at byte {offset}: {error}")]
	Io { offset: u64, error: IOError },
}

#[derive(Debug, Error)]
pub enum OpenError {
	#[error(transparent)]
	Io(#[from] IOError),
	#[error("{}: {error}", file_path.to_string_lossy())]
	Decode { file_path: PathBuf, error: DecodeError },
}

impl OpenError {
	fn decode<P: AsRef<Path>>(file_path: P, error: DecodeError) -> Self {
		Self::Decode {
			file_path: file_path.as_ref().to_path_buf(),
			error,
		}
	}
}

/// Reads until the buffer is full or the end of the input is reached, returns the number of bytes read
pub(crate) fn read_fully<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<usize, IOError> {
	let mut filled = 0;
	while filled < buffer.len() {
		match reader.read(&mut buffer[filled..]) {
			Ok(0) => break,
			Ok(count) => filled += count,
			Err(error) if error.kind() == IOErrorKind::Interrupted => continue,
			Err(error) => return Err(error),
		}
	}
	Ok(filled)
}

/// Lazy, forward only OSD record reader
///
/// Yields the records in dump order. A truncated trailing record ends the sequence with a warning, any
/// other error is yielded once and ends the sequence.
#[derive(Getters)]
pub struct DumpReader<R> {
	reader: R,
	#[getset(get = "pub")]
	header: DumpHeader,
	offset: u64,
	next_index: RecordIndex,
	done: bool,
}

impl<R: Read> DumpReader<R> {
	pub fn new(mut reader: R) -> Result<Self, DecodeError> {
		let header = DumpHeader::read(&mut reader)?;
		let offset = header.format().header_len() as u64;
		Ok(Self {
			reader,
			header,
			offset,
			next_index: 0,
			done: false,
		})
	}

	/// Fills the buffer, returns `false` when the input ended before
	fn fill(&mut self, buffer: &mut [u8], record_start: u64) -> Result<bool, DecodeError> {
		let read = read_fully(&mut self.reader, buffer).map_err(|error| DecodeError::Io { offset: self.offset, error })?;
		self.offset += read as u64;
		if read == buffer.len() {
			return Ok(true);
		}
		if self.offset > record_start {
			log::warn!(
				"dropping truncated OSD record {} at byte {record_start}: {} of {} bytes",
				self.next_index,
				self.offset - record_start,
				self.header.format().record_len()
			);
		}
		Ok(false)
	}

	fn read_payload(&mut self, record_start: u64) -> Result<Option<Vec<CharacterCode>>, DecodeError> {
		let mut payload = vec![0; CharacterGrid::payload_len(self.header.record_grid_dimensions())];
		if !self.fill(&mut payload, record_start)? {
			return Ok(None);
		}
		Ok(Some(decode_codes(&payload)))
	}

	fn malformed_record(&self, offset: u64, reason: String) -> DecodeError {
		DecodeError::MalformedRecord {
			index: self.next_index,
			offset,
			reason,
		}
	}

	fn read_dji_record(&mut self, record_start: u64) -> Result<Option<OsdRecord>, DecodeError> {
		let mut header_bytes = [0; DjiRecordHeaderRaw::BYTE_LEN];
		if !self.fill(&mut header_bytes, record_start)? {
			return Ok(None);
		}
		let header = DjiRecordHeaderRaw::read_bytes(&header_bytes);
		if header.data_len as u64 != DJI_RECORD_GRID.area() {
			return Err(self.malformed_record(
				record_start,
				format!("payload holds {} codes, expected {}", header.data_len, DJI_RECORD_GRID.area()),
			));
		}
		let Some(codes) = self.read_payload(record_start)? else { return Ok(None) };
		let grid = CharacterGrid::from_column_major(DJI_RECORD_GRID, &codes).map_err(|error| self.malformed_record(record_start, error.to_string()))?;
		Ok(Some(OsdRecord::new(self.next_index, header.frame_index, grid)))
	}

	fn read_walksnail_record(&mut self, record_start: u64) -> Result<Option<OsdRecord>, DecodeError> {
		let mut header_bytes = [0; WalksnailRecordHeaderRaw::BYTE_LEN];
		if !self.fill(&mut header_bytes, record_start)? {
			return Ok(None);
		}
		let header = WalksnailRecordHeaderRaw::read_bytes(&header_bytes);
		let Some(codes) = self.read_payload(record_start)? else { return Ok(None) };
		let grid = CharacterGrid::new(WALKSNAIL_RECORD_GRID, codes).map_err(|error| self.malformed_record(record_start, error.to_string()))?;
		Ok(Some(OsdRecord::new(self.next_index, header.timestamp, grid)))
	}

	/// Reads the next record, `Ok(None)` at the end of the dump
	pub fn read_record(&mut self) -> Result<Option<OsdRecord>, DecodeError> {
		if self.done {
			return Ok(None);
		}
		let record_start = self.offset;
		let result = if matches!(self.header.format(), DumpFormat::Dji { .. }) {
			self.read_dji_record(record_start)
		} else {
			self.read_walksnail_record(record_start)
		};
		match &result {
			Ok(Some(_)) => self.next_index += 1,
			Ok(None) | Err(_) => self.done = true,
		}
		result
	}

	/// Reads the remaining records
	pub fn read_all(&mut self) -> Result<Dump, DecodeError> {
		let records = self.iter().collect::<Result<Vec<_>, _>>()?;
		log::info!("read {} OSD records", records.len());
		Ok(Dump {
			header: self.header.clone(),
			records,
		})
	}

	pub fn iter(&mut self) -> Iter<'_, R> {
		self.into_iter()
	}

	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl<R: Read + Seek> DumpReader<R> {
	/// Restarts reading from the first record
	pub fn rewind(&mut self) -> Result<(), DecodeError> {
		let first_record_offset = self.header.format().header_len() as u64;
		self.reader.seek(SeekFrom::Start(first_record_offset)).map_err(|error| DecodeError::Io {
			offset: first_record_offset,
			error,
		})?;
		self.offset = first_record_offset;
		self.next_index = 0;
		self.done = false;
		Ok(())
	}

	/// Summary of the whole dump, the reader is rewound afterwards
	pub fn summary(&mut self) -> Result<Summary, DecodeError> {
		self.rewind()?;
		let summary = self.read_all()?.summary();
		self.rewind()?;
		Ok(summary)
	}
}

impl DumpReader<BufReader<fs_err::File>> {
	pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self, OpenError> {
		let file = fs_err::File::open(file_path.as_ref())?;
		Self::new(BufReader::new(file)).map_err(|error| OpenError::decode(&file_path, error))
	}
}

pub struct Iter<'a, R> {
	reader: &'a mut DumpReader<R>,
}

impl<R: Read> Iterator for Iter<'_, R> {
	type Item = Result<OsdRecord, DecodeError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.reader.read_record().transpose()
	}
}

impl<'a, R: Read> IntoIterator for &'a mut DumpReader<R> {
	type Item = Result<OsdRecord, DecodeError>;

	type IntoIter = Iter<'a, R>;

	fn into_iter(self) -> Self::IntoIter {
		Iter { reader: self }
	}
}

pub struct IntoIter<R> {
	reader: DumpReader<R>,
}

impl<R: Read> Iterator for IntoIter<R> {
	type Item = Result<OsdRecord, DecodeError>;

	fn next(&mut self) -> Option<Self::Item> {
		self.reader.read_record().transpose()
	}
}

impl<R: Read> IntoIterator for DumpReader<R> {
	type Item = Result<OsdRecord, DecodeError>;

	type IntoIter = IntoIter<R>;

	fn into_iter(self) -> Self::IntoIter {
		IntoIter { reader: self }
	}
}

/// Fully decoded dump
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Dump {
	header: DumpHeader,
	records: Vec<OsdRecord>,
}

impl Dump {
	pub fn new(header: DumpHeader, records: Vec<OsdRecord>) -> Self {
		Self { header, records }
	}

	pub fn open<P: AsRef<Path>>(file_path: P) -> Result<Self, OpenError> {
		let mut reader = DumpReader::open(&file_path)?;
		reader.read_all().map_err(|error| OpenError::decode(&file_path, error))
	}

	pub fn into_records(self) -> Vec<OsdRecord> {
		self.records
	}

	pub fn highest_code(&self) -> CharacterCode {
		self.records.iter().map(|record| record.highest_code()).max().unwrap_or(0)
	}

	pub fn summary(&self) -> Summary {
		let timestamps = self.records.first().zip(self.records.last()).map(|(first, last)| (first.timestamp(), last.timestamp()));
		Summary {
			record_count: self.records.len(),
			timestamps,
			clock: self.header.clock(),
			highest_code: self.highest_code(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
	pub record_count: usize,
	/// first and last record timestamps
	pub timestamps: Option<(Timestamp, Timestamp)>,
	pub clock: TelemetryClock,
	pub highest_code: CharacterCode,
}

impl Summary {
	pub fn duration(&self) -> Duration {
		match self.timestamps {
			Some((first, last)) => self.clock.duration(last.saturating_sub(first)),
			None => Duration::ZERO,
		}
	}

	/// Mean number of records per second
	pub fn refresh_rate(&self) -> Option<f64> {
		let seconds = self.duration().as_secs_f64();
		(self.record_count > 1 && seconds > 0.0).then(|| (self.record_count - 1) as f64 / seconds)
	}
}

impl Display for Summary {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} records over {:.3}s", self.record_count, self.duration().as_secs_f64())?;
		if let Some(refresh_rate) = self.refresh_rate() {
			write!(f, " ({refresh_rate:.1} Hz)")?;
		}
		write!(f, ", highest character code {}", self.highest_code)
	}
}
