//! Pattern cursor and the per-frame field reassembly state machine.
//!
//! Each input frame carries two fields. The cursor decides, for one input
//! frame, whether it is skipped, parked in the carry-over buffer, emitted
//! as-is, or woven together with the buffered frame. The decision is returned
//! as a [`Schedule`] of buffer operations; no pixel data is touched here.

use crate::pattern::CadencePattern;

/// Maximum number of buffer operations one input frame can trigger.
pub const MAX_OPS: usize = 3;

/// Maximum number of output frames one input frame can complete.
pub const MAX_OUTPUTS: usize = 2;

/// A buffer operation the engine performs for the current input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Copy the whole input frame into the carry-over buffer.
    Buffer,
    /// Emit the carry-over buffer verbatim as the next output frame.
    EmitBuffered,
    /// Emit a frame taking the earlier field from the input and the later
    /// field from the carry-over buffer.
    Weave,
    /// Emit the input frame verbatim.
    EmitInput,
}

impl FieldOp {
    /// Whether this operation fills an output slot.
    pub fn produces_output(&self) -> bool {
        !matches!(self, FieldOp::Buffer)
    }
}

/// Which transition the cursor took for an input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Both fields duplicate an emitted frame; the input is dropped.
    SkipMany,
    /// One field is still needed; the input is parked.
    SkipOne,
    /// The pattern advanced and produced buffer operations.
    Consume,
    /// The pattern search hit only zero entries; the input is dropped.
    Stall,
}

/// Ordered buffer operations for one input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    kind: StepKind,
    ops: [Option<FieldOp>; MAX_OPS],
    len: usize,
}

impl Schedule {
    fn new(kind: StepKind) -> Self {
        Self {
            kind,
            ops: [None; MAX_OPS],
            len: 0,
        }
    }

    fn push(&mut self, op: FieldOp) {
        debug_assert!(self.len < MAX_OPS);
        if let Some(slot) = self.ops.get_mut(self.len) {
            *slot = Some(op);
            self.len += 1;
        }
    }

    /// The transition taken.
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Operations in execution order.
    pub fn ops(&self) -> impl Iterator<Item = FieldOp> + '_ {
        self.ops[..self.len].iter().flatten().copied()
    }

    /// Number of output frames the schedule produces.
    pub fn outputs(&self) -> usize {
        self.ops().filter(FieldOp::produces_output).count()
    }
}

/// Cursor state carried from one input frame to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    /// Current position within the pattern.
    pub pattern_pos: usize,
    /// Number of input fields to skip before the next output frame.
    pub skip_fields: usize,
    /// Whether the carry-over buffer holds a field of an unfinished frame.
    pub occupied: bool,
    /// Stray fields from a cut stream, consumed by the first productive frame.
    pub init_len: usize,
}

impl CursorState {
    /// Initial cursor for a compiled pattern.
    pub fn new(pattern: &CadencePattern) -> Self {
        Self {
            pattern_pos: pattern.start_pos(),
            skip_fields: 0,
            occupied: false,
            init_len: pattern.init_len(),
        }
    }

    /// Advance the cursor by one input frame.
    pub fn step(&mut self, pattern: &CadencePattern) -> Schedule {
        if self.skip_fields >= 2 {
            self.skip_fields -= 2;
            return Schedule::new(StepKind::SkipMany);
        }

        if self.skip_fields == 1 {
            // One of the fields of this frame is still needed.
            let mut schedule = Schedule::new(StepKind::SkipOne);
            schedule.push(FieldOp::Buffer);
            self.occupied = true;
            self.skip_fields = 0;
            return schedule;
        }

        let init_len = std::mem::take(&mut self.init_len);
        let mut len = self.next_span(pattern, init_len);
        if len == 0 {
            return Schedule::new(StepKind::Stall);
        }

        let mut schedule = Schedule::new(StepKind::Consume);

        if len == 1 && self.occupied {
            // A one-field frame while a frame is buffered: flush the buffer
            // whole to keep a consistent frame size, then move on to the
            // entry the second field of this input belongs to.
            schedule.push(FieldOp::EmitBuffered);
            self.occupied = false;
            len = self.next_span(pattern, 0);
        }

        if self.occupied {
            schedule.push(FieldOp::Weave);
            self.occupied = false;
            if len <= 2 {
                // The second field of this input starts the next frame.
                schedule.push(FieldOp::Buffer);
                self.occupied = true;
            }
            // Beyond three fields, further inputs repeat fields already emitted.
            len = len.saturating_sub(3);
        } else if len >= 2 {
            schedule.push(FieldOp::EmitInput);
            len -= 2;
        } else if len == 1 {
            schedule.push(FieldOp::EmitInput);
            schedule.push(FieldOp::Buffer);
            self.occupied = true;
            len = 0;
        }

        if len == 1 && self.occupied {
            len = 0;
            self.occupied = false;
        }

        self.skip_fields = len;
        schedule
    }

    /// Return `len` if non-zero, otherwise read entries forward until a
    /// non-zero one is found or the end of the pattern is reached. The
    /// position wraps to the start once the end is reached.
    fn next_span(&mut self, pattern: &CadencePattern, mut len: usize) -> usize {
        while len == 0 {
            match pattern.get(self.pattern_pos) {
                Some(fields) => {
                    len = fields;
                    self.pattern_pos += 1;
                }
                None => break,
            }
        }
        if self.pattern_pos >= pattern.len() {
            self.pattern_pos = 0;
        }
        len
    }
}
