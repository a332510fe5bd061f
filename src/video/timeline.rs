use std::time::Duration;

use getset::{CopyGetters, Getters};
use itertools::Itertools;

use super::{FrameIndex, FrameRate};
use crate::osd::dump::{OsdRecord, Timestamp};


/// Rate at which the telemetry timestamps of a dump tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct TelemetryClock {
	ticks_per_second: u32,
}

impl TelemetryClock {
	/// DJI records carry the air unit 60 fps frame counter
	pub const DJI: Self = Self { ticks_per_second: 60 };
	/// Walksnail records carry milliseconds
	pub const WALKSNAIL: Self = Self { ticks_per_second: 1000 };

	pub const fn new(ticks_per_second: u32) -> Option<Self> {
		if ticks_per_second == 0 {
			return None;
		}
		Some(Self { ticks_per_second })
	}

	pub fn duration(&self, ticks: Timestamp) -> Duration {
		Duration::from_nanos(ticks as u64 * 1_000_000_000 / self.ticks_per_second as u64)
	}

	/// Video frame at which a timestamp falls, rounded to the nearest frame
	pub fn video_frame_index(&self, timestamp: Timestamp, frame_rate: FrameRate) -> i64 {
		let numerator = timestamp as u128 * frame_rate.numerator() as u128;
		let denominator = self.ticks_per_second as u128 * frame_rate.denominator() as u128;
		((2 * numerator + denominator) / (2 * denominator)) as i64
	}
}

#[derive(Debug, Clone, Copy)]
struct Entry {
	frame_index: i64,
	record: usize,
}

/// Selected record for a range of consecutive video frames
#[derive(Debug, Clone, Copy, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Run<'a> {
	first_frame: FrameIndex,
	/// exclusive
	end_frame: FrameIndex,
	record: Option<&'a OsdRecord>,
}

impl Run<'_> {
	pub fn frame_count(&self) -> FrameIndex {
		self.end_frame - self.first_frame
	}

	pub fn frames(&self) -> std::ops::Range<FrameIndex> {
		self.first_frame..self.end_frame
	}
}

/// Maps video frames to the OSD record shown on them
///
/// A record is shown from the video frame matching its timestamp until the next record replaces it, the
/// last record stays until the end of the video. Frames before the first record show nothing.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Timeline {
	#[getset(get = "pub")]
	records: Vec<OsdRecord>,
	entries: Vec<Entry>,
	#[getset(get_copy = "pub")]
	frame_count: FrameIndex,
}

impl Timeline {
	pub fn build(records: Vec<OsdRecord>, clock: TelemetryClock, frame_rate: FrameRate, frame_count: FrameIndex) -> Self {
		Self::build_with_shift(records, clock, frame_rate, frame_count, 0)
	}

	/// Same as [`Timeline::build`] with every record moved by `frame_shift` video frames
	pub fn build_with_shift(records: Vec<OsdRecord>, clock: TelemetryClock, frame_rate: FrameRate, frame_count: FrameIndex, frame_shift: i32) -> Self {
		let entries = records
			.iter()
			.enumerate()
			.map(|(record, osd_record)| Entry {
				frame_index: clock.video_frame_index(osd_record.timestamp(), frame_rate) + frame_shift as i64,
				record,
			})
			// stable: records sharing a frame keep their dump order and the last one wins
			.sorted_by_key(|entry| entry.frame_index)
			.coalesce(|previous, current| {
				if previous.frame_index == current.frame_index {
					Ok(current)
				} else {
					Err((previous, current))
				}
			})
			.collect_vec();
		let dropped = records.len() - entries.len();
		if dropped > 0 {
			log::debug!("{dropped} OSD records replaced by a later record on the same video frame");
		}
		Self { records, entries, frame_count }
	}

	/// Number of video frames needed to show every record, the last one included
	pub fn span(records: &[OsdRecord], clock: TelemetryClock, frame_rate: FrameRate, frame_shift: i32) -> FrameIndex {
		records
			.iter()
			.map(|record| clock.video_frame_index(record.timestamp(), frame_rate) + frame_shift as i64 + 1)
			.max()
			.map(|span| span.clamp(0, FrameIndex::MAX as i64) as FrameIndex)
			.unwrap_or(0)
	}

	fn entry_position_at(&self, frame_index: FrameIndex) -> Option<usize> {
		self.entries.partition_point(|entry| entry.frame_index <= frame_index as i64).checked_sub(1)
	}

	/// Record shown on the video frame, `None` before the first record and past the end of the video
	pub fn frame_at(&self, frame_index: FrameIndex) -> Option<&OsdRecord> {
		if frame_index >= self.frame_count {
			return None;
		}
		self.entry_position_at(frame_index).map(|position| &self.records[self.entries[position].record])
	}

	pub fn iter(&self) -> VideoFrames<'_> {
		VideoFrames {
			timeline: self,
			next_frame: 0,
			next_entry: self.entries.partition_point(|entry| entry.frame_index <= 0),
		}
	}

	/// Ranges of consecutive video frames showing the same record, covering the whole video
	pub fn runs(&self) -> Vec<Run<'_>> {
		let mut runs = vec![];
		let mut first_frame = 0;
		let mut record = self.frame_at(0);
		let first_later_entry = self.entries.partition_point(|entry| entry.frame_index <= 0);
		for entry in &self.entries[first_later_entry..] {
			if entry.frame_index >= self.frame_count as i64 {
				break;
			}
			let end_frame = entry.frame_index as FrameIndex;
			runs.push(Run { first_frame, end_frame, record });
			first_frame = end_frame;
			record = Some(&self.records[entry.record]);
		}
		if first_frame < self.frame_count {
			runs.push(Run {
				first_frame,
				end_frame: self.frame_count,
				record,
			});
		}
		runs
	}

	/// First video frame of every run, frame 0 included
	pub fn changes(&self) -> impl Iterator<Item = FrameIndex> + '_ {
		self.runs().into_iter().map(|run| run.first_frame)
	}
}

/// Every video frame of a timeline in order with the record it shows
pub struct VideoFrames<'a> {
	timeline: &'a Timeline,
	next_frame: FrameIndex,
	next_entry: usize,
}

impl<'a> Iterator for VideoFrames<'a> {
	type Item = (FrameIndex, Option<&'a OsdRecord>);

	fn next(&mut self) -> Option<Self::Item> {
		let timeline = self.timeline;
		if self.next_frame >= timeline.frame_count {
			return None;
		}
		let frame_index = self.next_frame;
		while self.next_entry < timeline.entries.len() && timeline.entries[self.next_entry].frame_index <= frame_index as i64 {
			self.next_entry += 1;
		}
		let record = self
			.next_entry
			.checked_sub(1)
			.map(|position| &timeline.records[timeline.entries[position].record]);
		self.next_frame += 1;
		Some((frame_index, record))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.timeline.frame_count.saturating_sub(self.next_frame) as usize;
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for VideoFrames<'_> {}

impl<'a> IntoIterator for &'a Timeline {
	type Item = (FrameIndex, Option<&'a OsdRecord>);

	type IntoIter = VideoFrames<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
