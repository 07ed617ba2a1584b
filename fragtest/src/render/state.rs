use super::*;

/// Stencil parameters of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilState {
    /// Reference value, compared against the buffer and used by `StencilOp::Replace`
    pub reference: u8,

    /// Bits of the reference and buffer values that take part in the comparison
    pub read_mask: u8,

    /// Bits of the reference value written by `Replace`, zero disables stencil writes
    pub write_mask: u8,

    pub comparison: StencilComparison,

    /// Applied when both stencil and depth pass
    pub pass_op: StencilOp,

    /// Applied when stencil fails
    pub fail_op: StencilOp,

    /// Applied when stencil passes but depth fails
    pub zfail_op: StencilOp,
}

impl Default for StencilState {
    fn default() -> Self {
        Self::disabled()
    }
}

impl StencilState {
    /// Always passes and keeps every value. The write mask stays open so presets built on top
    /// of it only need to pick their ops.
    pub const fn disabled() -> Self {
        Self {
            reference: 0,
            read_mask: 0xFF,
            write_mask: 0xFF,
            comparison: StencilComparison::Always,
            pass_op: StencilOp::Keep,
            fail_op: StencilOp::Keep,
            zfail_op: StencilOp::Keep,
        }
    }

    /// Writes `reference` wherever the fragment survives depth.
    pub const fn write(reference: u8) -> Self {
        Self { reference, pass_op: StencilOp::Replace, ..Self::disabled() }
    }

    /// Passes where the buffer equals `reference`, read-only.
    pub const fn test_equal(reference: u8) -> Self {
        Self { reference, comparison: StencilComparison::Equal, write_mask: 0x00, ..Self::disabled() }
    }

    /// Passes where the buffer differs from `reference`, read-only.
    pub const fn test_not_equal(reference: u8) -> Self {
        Self { reference, comparison: StencilComparison::NotEqual, write_mask: 0x00, ..Self::disabled() }
    }
}

/// Depth parameters of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthState {
    /// Store the incoming depth when the test passes
    pub write: bool,

    pub comparison: DepthComparison,
}

impl Default for DepthState {
    fn default() -> Self {
        Self::less()
    }
}

impl DepthState {
    /// Always passes and never writes.
    pub const fn disabled() -> Self {
        Self { write: false, comparison: DepthComparison::Always }
    }

    /// Classic nearest-wins depth buffering.
    pub const fn less() -> Self {
        Self { write: true, comparison: DepthComparison::Less }
    }
}

/// Combined per-draw configuration of the fragment tests. `None` turns a test off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DepthStencilState {
    pub stencil: Option<StencilState>,
    pub depth: Option<DepthState>,
}

impl DepthStencilState {
    pub const fn new(stencil: Option<StencilState>, depth: Option<DepthState>) -> Self {
        Self { stencil, depth }
    }

    pub const fn depth_only(depth: DepthState) -> Self {
        Self { stencil: None, depth: Some(depth) }
    }

    pub const fn stencil_only(stencil: StencilState) -> Self {
        Self { stencil: Some(stencil), depth: None }
    }
}
