use super::*;
use log::trace;

/// Comparison between the incoming depth and the depth stored in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DepthComparison {
    Less = 0,
    Greater = 1,
    LessEqual = 2,
    GreaterEqual = 3,
    Equal = 4,
    NotEqual = 5,
    Always = 6,
}

impl DepthComparison {
    /// IEEE comparison of the incoming `z` against the `stored` one, so NaN only passes
    /// NotEqual and Always.
    pub fn evaluate(self, z: f32, stored: f32) -> bool {
        match self {
            DepthComparison::Less => z < stored,
            DepthComparison::Greater => z > stored,
            DepthComparison::LessEqual => z <= stored,
            DepthComparison::GreaterEqual => z >= stored,
            DepthComparison::Equal => z == stored,
            DepthComparison::NotEqual => z != stored,
            DepthComparison::Always => true,
        }
    }
}

impl TryFrom<u8> for DepthComparison {
    type Error = FragmentTestError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => DepthComparison::Less,
            1 => DepthComparison::Greater,
            2 => DepthComparison::LessEqual,
            3 => DepthComparison::GreaterEqual,
            4 => DepthComparison::Equal,
            5 => DepthComparison::NotEqual,
            6 => DepthComparison::Always,
            _ => return Err(FragmentTestError::InvalidEnumValue { kind: "depth comparison", value }),
        })
    }
}

/// Depth test over a borrowed depth buffer. Depth failures are forwarded to the held
/// stencil unit as the z-fail stencil operation.
pub struct DepthTestUnit<'a> {
    depth: BufferViewMut<'a, f32>,
    stencil: StencilTestUnit<'a>,
}

impl<'a> DepthTestUnit<'a> {
    pub fn new(depth: BufferViewMut<'a, f32>, stencil: StencilTestUnit<'a>) -> Self {
        Self { depth, stencil }
    }

    /// Returns whether `z` passed against the stored depth at `coord`.
    /// On pass, `z` is stored if `zwrite` is set. On fail, `zfail_op` is applied to the stencil
    /// buffer with `stencil_ref_value` and `stencil_write_mask`.
    #[allow(clippy::too_many_arguments)]
    pub fn test(
        &mut self,
        zwrite: bool,
        coord: Coordinate,
        z: f32,
        comparison: DepthComparison,
        zfail_op: StencilOp,
        stencil_ref_value: u8,
        stencil_write_mask: u8,
    ) -> bool {
        let stored = self.depth.get(coord);
        let passed = comparison.evaluate(z, stored);
        if passed {
            if zwrite {
                self.depth.set(coord, z);
            }
        } else {
            trace!("depth ({}, {}): {} failed {:?} {}, applying {:?}", coord.x, coord.y, z, comparison, stored, zfail_op);
            self.stencil.apply_op(coord, stencil_ref_value, stencil_write_mask, zfail_op);
        }
        passed
    }

    pub fn read(&self, coord: Coordinate) -> f32 {
        self.depth.get(coord)
    }

    pub fn stencil_unit(&mut self) -> &mut StencilTestUnit<'a> {
        &mut self.stencil
    }
}
