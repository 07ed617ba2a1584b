use super::*;
use log::trace;

/// Comparison between the masked reference value and the masked stencil buffer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StencilComparison {
    /// Pass if reference > buffer
    Greater = 0,

    /// Pass if reference >= buffer
    GreaterEqual = 1,

    /// Pass if reference < buffer
    Less = 2,

    /// Pass if reference <= buffer
    LessEqual = 3,

    /// Pass if reference == buffer
    Equal = 4,

    /// Pass if reference != buffer
    NotEqual = 5,

    /// Always pass
    Always = 6,

    /// Never pass
    Never = 7,
}

impl StencilComparison {
    /// Evaluates the comparison on already masked values.
    pub const fn evaluate(self, reference: u8, buffer: u8) -> bool {
        match self {
            StencilComparison::Greater => reference > buffer,
            StencilComparison::GreaterEqual => reference >= buffer,
            StencilComparison::Less => reference < buffer,
            StencilComparison::LessEqual => reference <= buffer,
            StencilComparison::Equal => reference == buffer,
            StencilComparison::NotEqual => reference != buffer,
            StencilComparison::Always => true,
            StencilComparison::Never => false,
        }
    }
}

impl TryFrom<u8> for StencilComparison {
    type Error = FragmentTestError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => StencilComparison::Greater,
            1 => StencilComparison::GreaterEqual,
            2 => StencilComparison::Less,
            3 => StencilComparison::LessEqual,
            4 => StencilComparison::Equal,
            5 => StencilComparison::NotEqual,
            6 => StencilComparison::Always,
            7 => StencilComparison::Never,
            _ => return Err(FragmentTestError::InvalidEnumValue { kind: "stencil comparison", value }),
        })
    }
}

/// Update applied to a stencil buffer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum StencilOp {
    /// Keep the current value
    #[default]
    Keep = 0,

    /// Set to zero
    Zero = 1,

    /// Replace with the masked reference value
    Replace = 2,

    /// Increment, clamping at 255
    IncrementSaturate = 3,

    /// Decrement, clamping at 0
    DecrementSaturate = 4,

    /// Bitwise invert
    Invert = 5,

    /// Increment, 255 wraps to 0
    IncrementWrap = 6,

    /// Decrement, 0 wraps to 255
    DecrementWrap = 7,
}

impl StencilOp {
    /// New buffer value given the `current` one and the masked reference `value`.
    pub const fn apply(self, current: u8, value: u8) -> u8 {
        match self {
            StencilOp::Keep => current,
            StencilOp::Zero => 0,
            StencilOp::Replace => value,
            StencilOp::IncrementSaturate => current.saturating_add(1),
            StencilOp::DecrementSaturate => current.saturating_sub(1),
            StencilOp::Invert => !current,
            StencilOp::IncrementWrap => current.wrapping_add(1),
            StencilOp::DecrementWrap => current.wrapping_sub(1),
        }
    }
}

impl TryFrom<u8> for StencilOp {
    type Error = FragmentTestError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => StencilOp::Keep,
            1 => StencilOp::Zero,
            2 => StencilOp::Replace,
            3 => StencilOp::IncrementSaturate,
            4 => StencilOp::DecrementSaturate,
            5 => StencilOp::Invert,
            6 => StencilOp::IncrementWrap,
            7 => StencilOp::DecrementWrap,
            _ => return Err(FragmentTestError::InvalidEnumValue { kind: "stencil operation", value }),
        })
    }
}

/// Stencil test over a borrowed stencil buffer.
pub struct StencilTestUnit<'a> {
    stencil: BufferViewMut<'a, u8>,
}

impl<'a> StencilTestUnit<'a> {
    pub fn new(stencil: BufferViewMut<'a, u8>) -> Self {
        Self { stencil }
    }

    /// Compares `ref_value` against the buffer at `coord`, both masked with `read_mask`.
    /// Never writes.
    pub fn compare(&self, coord: Coordinate, ref_value: u8, read_mask: u8, comparison: StencilComparison) -> bool {
        let masked_ref = ref_value & read_mask;
        let masked_buf = self.stencil.get(coord) & read_mask;
        comparison.evaluate(masked_ref, masked_buf)
    }

    /// Runs the comparison and applies `pass_op` or `fail_op` depending on its outcome.
    /// `_zfail_op` belongs to the depth stage, see `DepthTestUnit::test`.
    #[allow(clippy::too_many_arguments)]
    pub fn test(
        &mut self,
        coord: Coordinate,
        ref_value: u8,
        read_mask: u8,
        write_mask: u8,
        comparison: StencilComparison,
        pass_op: StencilOp,
        fail_op: StencilOp,
        _zfail_op: StencilOp,
    ) -> bool {
        let passed = self.compare(coord, ref_value, read_mask, comparison);
        let op = if passed { pass_op } else { fail_op };
        self.apply_op(coord, ref_value, write_mask, op);
        passed
    }

    /// Same as `test`, with the parameters taken from `state`.
    pub fn test_state(&mut self, coord: Coordinate, state: &StencilState) -> bool {
        self.test(
            coord,
            state.reference,
            state.read_mask,
            state.write_mask,
            state.comparison,
            state.pass_op,
            state.fail_op,
            state.zfail_op,
        )
    }

    /// Applies `op` to the buffer at `coord`. A zero `write_mask` disables the write entirely.
    pub fn apply_op(&mut self, coord: Coordinate, ref_value: u8, write_mask: u8, op: StencilOp) {
        if write_mask == 0 {
            return;
        }
        let current = self.stencil.get(coord);
        let updated = op.apply(current, ref_value & write_mask);
        if updated != current {
            trace!("stencil ({}, {}): {:?} {} -> {}", coord.x, coord.y, op, current, updated);
            self.stencil.set(coord, updated);
        }
    }

    pub fn read(&self, coord: Coordinate) -> u8 {
        self.stencil.get(coord)
    }
}
