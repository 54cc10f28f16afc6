//! Filter configuration.

use crate::error::{DetelecineError, Result};
use std::fmt;
use std::str::FromStr;

/// Which field of a frame is temporally first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    /// Top field first (TFF) - even lines come first temporally.
    #[default]
    TopFieldFirst,
    /// Bottom field first (BFF) - odd lines come first temporally.
    BottomFieldFirst,
}

impl FieldOrder {
    /// Row offset of the earlier field within a plane.
    pub fn first_row(&self) -> usize {
        match self {
            FieldOrder::TopFieldFirst => 0,
            FieldOrder::BottomFieldFirst => 1,
        }
    }

    /// Row offset of the later field within a plane.
    pub fn second_row(&self) -> usize {
        1 - self.first_row()
    }
}

impl FromStr for FieldOrder {
    type Err = DetelecineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "top" | "t" => Ok(FieldOrder::TopFieldFirst),
            "bottom" | "b" => Ok(FieldOrder::BottomFieldFirst),
            other => Err(DetelecineError::Core(
                detelecine_core::Error::invalid_param(format!("unknown first field '{}'", other)),
            )),
        }
    }
}

impl fmt::Display for FieldOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOrder::TopFieldFirst => f.write_str("top"),
            FieldOrder::BottomFieldFirst => f.write_str("bottom"),
        }
    }
}

/// Detelecine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetelecineConfig {
    /// Which field is temporally first within a frame.
    pub first_field: FieldOrder,
    /// Cadence string: for how many fields each original frame is displayed.
    pub pattern: String,
    /// Position of the first input frame within the pattern if the stream is cut.
    pub start_frame: usize,
}

impl Default for DetelecineConfig {
    fn default() -> Self {
        Self {
            first_field: FieldOrder::TopFieldFirst,
            pattern: "23".to_string(),
            start_frame: 0,
        }
    }
}

impl DetelecineConfig {
    /// Create a configuration for the given cadence with default field order.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    /// Set the first field.
    pub fn with_first_field(mut self, first_field: FieldOrder) -> Self {
        self.first_field = first_field;
        self
    }

    /// Set the start frame.
    pub fn with_start_frame(mut self, start_frame: usize) -> Self {
        self.start_frame = start_frame;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetelecineConfig::default();
        assert_eq!(config.first_field, FieldOrder::TopFieldFirst);
        assert_eq!(config.pattern, "23");
        assert_eq!(config.start_frame, 0);
    }

    #[test]
    fn test_builder() {
        let config = DetelecineConfig::new("2332")
            .with_first_field(FieldOrder::BottomFieldFirst)
            .with_start_frame(1);
        assert_eq!(config.pattern, "2332");
        assert_eq!(config.first_field, FieldOrder::BottomFieldFirst);
        assert_eq!(config.start_frame, 1);
    }

    #[test]
    fn test_field_order_parse() {
        assert_eq!("top".parse::<FieldOrder>().unwrap(), FieldOrder::TopFieldFirst);
        assert_eq!("T".parse::<FieldOrder>().unwrap(), FieldOrder::TopFieldFirst);
        assert_eq!(
            "bottom".parse::<FieldOrder>().unwrap(),
            FieldOrder::BottomFieldFirst
        );
        assert_eq!("b".parse::<FieldOrder>().unwrap(), FieldOrder::BottomFieldFirst);
        assert!("middle".parse::<FieldOrder>().is_err());
    }

    #[test]
    fn test_field_rows() {
        assert_eq!(FieldOrder::TopFieldFirst.first_row(), 0);
        assert_eq!(FieldOrder::TopFieldFirst.second_row(), 1);
        assert_eq!(FieldOrder::BottomFieldFirst.first_row(), 1);
        assert_eq!(FieldOrder::BottomFieldFirst.second_row(), 0);
        assert_eq!(FieldOrder::BottomFieldFirst.to_string(), "bottom");
    }
}
