//! Output frame rate and time base negotiation.

use crate::error::{DetelecineError, Result};
use detelecine_core::{Rational, TimeBase};
use tracing::debug;

/// Output timing derived from the input rate and the pattern's field ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTiming {
    /// Output frame rate.
    pub frame_rate: Rational,
    /// Output time base.
    pub time_base: TimeBase,
    /// Duration of one output frame, in output time base units.
    pub ts_unit: Rational,
}

impl OutputTiming {
    /// Negotiate the output timing.
    ///
    /// The output rate is the input rate divided by `field_ratio` and the
    /// output time base is the input time base multiplied by it, so that
    /// 30000/1001 fps with pattern `"23"` (ratio 5/4) becomes 24000/1001 fps.
    pub fn negotiate(
        input_rate: Rational,
        input_time_base: TimeBase,
        field_ratio: Rational,
    ) -> Result<Self> {
        if !input_rate.is_positive() {
            return Err(DetelecineError::UnsupportedRate(input_rate));
        }
        if !input_time_base.0.is_positive() {
            return Err(DetelecineError::Core(detelecine_core::Error::invalid_param(
                format!("time base {} is not positive", input_time_base),
            )));
        }
        let inv_ratio = field_ratio.checked_recip().ok_or_else(|| {
            DetelecineError::invalid_pattern("pattern has no fields to advance timestamps")
        })?;

        let frame_rate = input_rate
            .checked_mul(inv_ratio)
            .ok_or(DetelecineError::UnsupportedRate(input_rate))?;
        debug!("FPS: {} -> {}", input_rate, frame_rate);

        let time_base = input_time_base
            .0
            .checked_mul(field_ratio)
            .map(TimeBase)
            .ok_or_else(|| unrepresentable("time base", input_time_base))?;
        debug!("TB: {} -> {}", input_time_base, time_base);

        let ts_unit = frame_rate
            .checked_mul(time_base.0)
            .and_then(|r| r.checked_recip())
            .ok_or_else(|| unrepresentable("timestamp unit", input_time_base))?;

        Ok(Self {
            frame_rate,
            time_base,
            ts_unit,
        })
    }

    /// Timestamp of the `n`th emitted frame (0-based).
    ///
    /// `start` is the timestamp of the first input frame, treated as 0 when
    /// the stream has not provided one yet.
    pub fn pts_for(&self, start: Option<i64>, n: u64) -> i64 {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        start.unwrap_or(0).saturating_add(self.ts_unit.mul_round(n))
    }
}

fn unrepresentable(what: &str, input_time_base: TimeBase) -> DetelecineError {
    DetelecineError::Core(detelecine_core::Error::invalid_param(format!(
        "output {} for input time base {} does not fit in 64 bits",
        what, input_time_base
    )))
}
