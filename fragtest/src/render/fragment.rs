use super::*;

/// A covered pixel as handed over by the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fragment {
    pub coord: Coordinate,
    pub depth: f32,
}

impl Fragment {
    pub const fn new(x: u16, y: u16, depth: f32) -> Self {
        Self { coord: Coordinate::new(x, y), depth }
    }
}

/// Runs fragments through the stencil and depth tests in GPU order:
/// stencil compare, then depth, then the pass/fail/zfail stencil update.
pub struct FragmentTester<'a> {
    depth: DepthTestUnit<'a>,
    state: DepthStencilState,
}

impl<'a> FragmentTester<'a> {
    pub fn new(depth: DepthTestUnit<'a>, state: DepthStencilState) -> Self {
        Self { depth, state }
    }

    /// Returns whether the fragment survived both tests, i.e. whether its color should be written.
    pub fn test(&mut self, fragment: &Fragment) -> bool {
        let coord = fragment.coord;
        let state = self.state;

        if let Some(stencil) = &state.stencil {
            let unit = self.depth.stencil_unit();
            if !unit.compare(coord, stencil.reference, stencil.read_mask, stencil.comparison) {
                unit.apply_op(coord, stencil.reference, stencil.write_mask, stencil.fail_op);
                return false;
            }
        }

        if let Some(depth) = &state.depth {
            let (zfail_op, reference, write_mask) = match &state.stencil {
                Some(stencil) => (stencil.zfail_op, stencil.reference, stencil.write_mask),
                None => (StencilOp::Keep, 0, 0),
            };
            if !self.depth.test(depth.write, coord, fragment.depth, depth.comparison, zfail_op, reference, write_mask) {
                return false;
            }
        }

        if let Some(stencil) = &state.stencil {
            self.depth.stencil_unit().apply_op(coord, stencil.reference, stencil.write_mask, stencil.pass_op);
        }
        true
    }

    /// Tests `fragments` one after another, in order.
    pub fn test_all(&mut self, fragments: &[Fragment]) -> Vec<bool> {
        fragments.iter().map(|fragment| self.test(fragment)).collect()
    }
}
