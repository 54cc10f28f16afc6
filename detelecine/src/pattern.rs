//! Cadence pattern compilation.
//!
//! A cadence string lists, for each original frame, how many fields it was
//! displayed for during telecine. `"23"` is classic 3:2 pulldown: one film
//! frame spans two fields, the next spans three, and the cycle repeats.

use crate::error::{DetelecineError, Result};
use detelecine_core::Rational;
use tracing::info;

/// A validated cadence pattern together with its start position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadencePattern {
    source: String,
    fields: Vec<u8>,
    max_fields: u8,
    field_sum: usize,
    start_pos: usize,
    init_len: usize,
}

impl CadencePattern {
    /// Compile a cadence string.
    ///
    /// `start_frame` is the position of the first input frame within one
    /// pattern cycle, for streams cut in the middle of a cycle.
    pub fn compile(pattern: &str, start_frame: usize) -> Result<Self> {
        if pattern.is_empty() {
            return Err(DetelecineError::invalid_pattern("no pattern provided"));
        }

        let fields = pattern
            .bytes()
            .map(|b| {
                if b.is_ascii_digit() {
                    Ok(b - b'0')
                } else {
                    Err(DetelecineError::invalid_pattern(format!(
                        "'{}' includes non-numeric characters",
                        pattern
                    )))
                }
            })
            .collect::<Result<Vec<u8>>>()?;

        let field_sum: usize = fields.iter().map(|&f| f as usize).sum();
        let max_fields = fields.iter().copied().max().unwrap_or(0);

        if field_sum == 0 {
            return Err(DetelecineError::invalid_pattern(format!(
                "'{}' never completes a frame",
                pattern
            )));
        }

        let frames_per_cycle = field_sum / 2;
        if start_frame > 0 && start_frame >= frames_per_cycle {
            return Err(DetelecineError::InvalidPhase {
                start_frame,
                frames_per_cycle,
            });
        }

        let (start_pos, init_len) = phase_position(&fields, start_frame);

        let compiled = Self {
            source: pattern.to_string(),
            fields,
            max_fields,
            field_sum,
            start_pos,
            init_len,
        };

        info!(
            "Detelecine pattern {} removes up to {} frames per frame, pts advance factor: {}",
            compiled.source,
            compiled.max_removed_per_frame(),
            compiled.field_ratio()
        );

        Ok(compiled)
    }

    /// The cadence string this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Per-frame field counts.
    pub fn fields(&self) -> &[u8] {
        &self.fields
    }

    /// Number of entries in the pattern.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: compilation rejects empty patterns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field count at `pos`, or `None` past the end of the pattern.
    pub fn get(&self, pos: usize) -> Option<usize> {
        self.fields.get(pos).map(|&f| f as usize)
    }

    /// Largest single field count in the pattern.
    pub fn max_fields(&self) -> u8 {
        self.max_fields
    }

    /// Total number of fields in one cycle.
    pub fn field_sum(&self) -> usize {
        self.field_sum
    }

    /// Number of output frames one full cycle produces.
    pub fn frames_per_cycle(&self) -> usize {
        self.field_sum / 2
    }

    /// Upper bound on input frames removed per output frame. Informational.
    pub fn max_removed_per_frame(&self) -> usize {
        (self.max_fields as usize + 1) / 2
    }

    /// Fields per output frame against fields per input frame.
    ///
    /// Kept unreduced: `sum of field counts : 2 * pattern length`.
    pub fn field_ratio(&self) -> Rational {
        Rational::new(self.field_sum as i64, 2 * self.fields.len() as i64)
    }

    /// Pattern index the stream starts at.
    pub fn start_pos(&self) -> usize {
        self.start_pos
    }

    /// Stray fields left over from a truncated first cycle.
    pub fn init_len(&self) -> usize {
        self.init_len
    }
}

/// Walk the pattern until `2 * start_frame` fields are covered.
///
/// Returns the index just past the entry that reached the target and the
/// number of fields of that entry still outstanding.
fn phase_position(fields: &[u8], start_frame: usize) -> (usize, usize) {
    if start_frame == 0 {
        return (0, 0);
    }
    let target = 2 * start_frame;
    let mut nfields = 0;
    for (i, &f) in fields.iter().enumerate() {
        nfields += f as usize;
        if nfields >= target {
            return (i + 1, nfields - target);
        }
    }
    (fields.len(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_23() {
        let p = CadencePattern::compile("23", 0).unwrap();
        assert_eq!(p.fields(), &[2, 3]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.max_fields(), 3);
        assert_eq!(p.field_sum(), 5);
        assert_eq!(p.frames_per_cycle(), 2);
        assert_eq!(p.max_removed_per_frame(), 2);
        assert_eq!(p.start_pos(), 0);
        assert_eq!(p.init_len(), 0);
        assert_eq!(p.as_str(), "23");
    }

    #[test]
    fn test_field_ratio_is_unreduced() {
        let p = CadencePattern::compile("2323", 0).unwrap();
        let ratio = p.field_ratio();
        assert_eq!((ratio.num, ratio.den), (10, 8));

        let p = CadencePattern::compile("22", 0).unwrap();
        let ratio = p.field_ratio();
        assert_eq!((ratio.num, ratio.den), (4, 4));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            CadencePattern::compile("", 0),
            Err(DetelecineError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_rejects_non_digit() {
        assert!(matches!(
            CadencePattern::compile("2a3", 0),
            Err(DetelecineError::InvalidPattern(_))
        ));
        assert!(matches!(
            CadencePattern::compile("2 3", 0),
            Err(DetelecineError::InvalidPattern(_))
        ));
        assert!(matches!(
            CadencePattern::compile("-2", 0),
            Err(DetelecineError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_rejects_all_zero() {
        assert!(matches!(
            CadencePattern::compile("0", 0),
            Err(DetelecineError::InvalidPattern(_))
        ));
        assert!(matches!(
            CadencePattern::compile("00", 0),
            Err(DetelecineError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_phase_boundary() {
        // "2332" produces 5 frames per cycle.
        assert!(CadencePattern::compile("2332", 4).is_ok());
        assert_eq!(
            CadencePattern::compile("2332", 5),
            Err(DetelecineError::InvalidPhase {
                start_frame: 5,
                frames_per_cycle: 5
            })
        );
    }

    #[test]
    fn test_zero_phase_always_accepted() {
        let p = CadencePattern::compile("1", 0).unwrap();
        assert_eq!(p.frames_per_cycle(), 0);
        assert!(CadencePattern::compile("1", 1).is_err());
    }

    #[test]
    fn test_phase_position() {
        // 2 fields cover start frame 1 exactly.
        let p = CadencePattern::compile("23", 1).unwrap();
        assert_eq!(p.start_pos(), 1);
        assert_eq!(p.init_len(), 0);

        // "3232": 3 + 2 = 5 fields cover 4 (start frame 2), one stray field.
        let p = CadencePattern::compile("3232", 2).unwrap();
        assert_eq!(p.start_pos(), 2);
        assert_eq!(p.init_len(), 1);

        // "3232", start frame 1: 3 fields cover 2, one stray field.
        let p = CadencePattern::compile("3232", 1).unwrap();
        assert_eq!(p.start_pos(), 1);
        assert_eq!(p.init_len(), 1);
    }

    #[test]
    fn test_phase_reaching_last_entry() {
        // "2223": 9 fields, 4 frames. Start frame 3 needs 6 fields -> index 3.
        let p = CadencePattern::compile("2223", 3).unwrap();
        assert_eq!(p.start_pos(), 3);
        assert_eq!(p.init_len(), 0);

        // "225": start frame 2 needs 4 fields, reached after "22".
        let p = CadencePattern::compile("225", 2).unwrap();
        assert_eq!(p.start_pos(), 2);
        assert_eq!(p.init_len(), 0);

        // "252": start frame 3 needs 6 fields, reached inside the 5.
        let p = CadencePattern::compile("252", 3).unwrap();
        assert_eq!(p.start_pos(), 2);
        assert_eq!(p.init_len(), 1);

        // "1113": start frame 2 needs 4 fields, only reached by the final 3.
        let p = CadencePattern::compile("1113", 2).unwrap();
        assert_eq!(p.start_pos(), 4);
        assert_eq!(p.init_len(), 2);
    }
}
