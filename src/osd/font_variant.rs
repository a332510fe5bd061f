use strum::{Display, EnumIter};


/// Flight controller firmware which produced the OSD, selects the font variant and the known OSD item layouts
#[derive(Debug, Display, Clone, Copy, EnumIter, PartialEq, Eq, Hash, Default)]
pub enum FontVariant {
	#[default]
	Generic,
	Ardupilot,
	Betaflight,
	INAV,
	KISSUltra,
	Unknown,
}

impl FontVariant {
	/// Identifier inserted in font file names, `None` for the generic font
	pub fn font_set_ident(&self) -> Option<&'static str> {
		use FontVariant::*;
		match self {
			Ardupilot => Some("ardu"),
			INAV => Some("inav"),
			Betaflight => Some("bf"),
			KISSUltra => Some("ultra"),
			Generic | Unknown => None,
		}
	}

	/// Maps the 4 byte firmware identifier found in Walksnail dump headers
	pub fn from_walksnail_ident(ident: &[u8]) -> Self {
		use FontVariant::*;
		match ident {
			b"INAV" => INAV,
			b"ARDU" => Ardupilot,
			b"BTFL" => Betaflight,
			b"ULTR" | b"KISS" => KISSUltra,
			_ => Unknown,
		}
	}
}

impl From<u8> for FontVariant {
	fn from(value: u8) -> Self {
		use FontVariant::*;
		match value {
			0 => Generic,
			1 => Betaflight,
			2 => INAV,
			3 => Ardupilot,
			4 => KISSUltra,
			_ => Unknown,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::FontVariant;

	#[test]
	fn dji_header_ids() {
		assert_eq!(FontVariant::from(0), FontVariant::Generic);
		assert_eq!(FontVariant::from(3), FontVariant::Ardupilot);
		assert_eq!(FontVariant::from(42), FontVariant::Unknown);
	}

	#[test]
	fn walksnail_idents() {
		assert_eq!(FontVariant::from_walksnail_ident(b"INAV"), FontVariant::INAV);
		assert_eq!(FontVariant::from_walksnail_ident(b"BTFL"), FontVariant::Betaflight);
		assert_eq!(FontVariant::from_walksnail_ident(b"\0\0\0\0"), FontVariant::Unknown);
	}
}
