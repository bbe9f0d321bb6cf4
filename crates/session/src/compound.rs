//! Tire compound label mapping.

use std::fmt;

/// Tire compound as carried in the playback stream.
///
/// Recorded sessions label stints with free-form strings; frames carry a
/// compact numeric code instead. Unrecognized labels map to `Unknown` rather
/// than failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TyreCompound {
    Unknown,
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
}

impl TyreCompound {
    /// Parse a stint label, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Self::Soft,
            "MEDIUM" => Self::Medium,
            "HARD" => Self::Hard,
            "INTERMEDIATE" => Self::Intermediate,
            "WET" => Self::Wet,
            _ => Self::Unknown,
        }
    }

    /// Numeric code emitted in frames.
    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Soft => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::Intermediate => 4,
            Self::Wet => 5,
        }
    }
}

impl fmt::Display for TyreCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Soft => "SOFT",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
            Self::Intermediate => "INTERMEDIATE",
            Self::Wet => "WET",
        };
        f.write_str(name)
    }
}

impl From<&str> for TyreCompound {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_map_to_codes() {
        assert_eq!(TyreCompound::from_label("SOFT").code(), 1);
        assert_eq!(TyreCompound::from_label("MEDIUM").code(), 2);
        assert_eq!(TyreCompound::from_label("HARD").code(), 3);
        assert_eq!(TyreCompound::from_label("INTERMEDIATE").code(), 4);
        assert_eq!(TyreCompound::from_label("WET").code(), 5);
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        assert_eq!(TyreCompound::from_label("soft"), TyreCompound::Soft);
        assert_eq!(TyreCompound::from_label("Medium"), TyreCompound::Medium);
        assert_eq!(TyreCompound::from_label(" wet "), TyreCompound::Wet);
    }

    #[test]
    fn test_unrecognized_labels_are_unknown() {
        assert_eq!(TyreCompound::from_label("SUPERSOFT").code(), 0);
        assert_eq!(TyreCompound::from_label("").code(), 0);
    }
}
