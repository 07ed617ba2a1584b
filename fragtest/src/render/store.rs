use super::*;
use log::debug;

/// Owns the stencil and depth buffers of one render target.
pub struct BufferStore {
    stencil: Buffer<u8>,
    depth: Buffer<f32>,
}

/// Mutable access to a horizontal band of both buffers of a `BufferStore`.
/// Bands handed out together never overlap, so they can be processed concurrently.
pub struct StoreBand<'a> {
    stencil: BufferViewMut<'a, u8>,
    depth: BufferViewMut<'a, f32>,
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

impl BufferStore {
    pub const DEFAULT_WIDTH: u16 = 72;
    pub const DEFAULT_HEIGHT: u16 = 128;

    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "empty buffer store: {}x{}", width, height);
        debug!("buffer store {}x{}", width, height);
        Self { stencil: Buffer::new(width as usize, height as usize), depth: Buffer::new(width as usize, height as usize) }
    }

    pub fn width(&self) -> u16 {
        self.stencil.width as u16
    }

    pub fn height(&self) -> u16 {
        self.stencil.height as u16
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.x < self.width() && coord.y < self.height()
    }

    /// Resets every stencil value to zero. Depth is left as is.
    pub fn clear_stencil(&mut self) {
        debug!("clear stencil");
        self.stencil.fill(0);
    }

    pub fn clear_depth(&mut self, value: f32) {
        debug!("clear depth to {}", value);
        self.depth.fill(value);
    }

    pub fn read_stencil(&self, coord: Coordinate) -> u8 {
        self.stencil.as_slice()[self.index_of(coord)]
    }

    pub fn write_stencil(&mut self, coord: Coordinate, value: u8) {
        let index = self.index_of(coord);
        self.stencil.elems[index] = value;
    }

    pub fn read_depth(&self, coord: Coordinate) -> f32 {
        self.depth.as_slice()[self.index_of(coord)]
    }

    pub fn write_depth(&mut self, coord: Coordinate, value: f32) {
        let index = self.index_of(coord);
        self.depth.elems[index] = value;
    }

    pub fn try_read_stencil(&self, coord: Coordinate) -> Result<u8, FragmentTestError> {
        self.check(coord)?;
        Ok(self.read_stencil(coord))
    }

    pub fn try_write_stencil(&mut self, coord: Coordinate, value: u8) -> Result<(), FragmentTestError> {
        self.check(coord)?;
        self.write_stencil(coord, value);
        Ok(())
    }

    pub fn try_read_depth(&self, coord: Coordinate) -> Result<f32, FragmentTestError> {
        self.check(coord)?;
        Ok(self.read_depth(coord))
    }

    pub fn try_write_depth(&mut self, coord: Coordinate, value: f32) -> Result<(), FragmentTestError> {
        self.check(coord)?;
        self.write_depth(coord, value);
        Ok(())
    }

    pub fn stencil(&self) -> &Buffer<u8> {
        &self.stencil
    }

    pub fn stencil_mut(&mut self) -> &mut Buffer<u8> {
        &mut self.stencil
    }

    pub fn depth(&self) -> &Buffer<f32> {
        &self.depth
    }

    /// The whole store as a single band.
    pub fn band_mut(&mut self) -> StoreBand<'_> {
        StoreBand { stencil: self.stencil.view_mut(), depth: self.depth.view_mut() }
    }

    pub fn stencil_unit(&mut self) -> StencilTestUnit<'_> {
        StencilTestUnit::new(self.stencil.view_mut())
    }

    pub fn depth_unit(&mut self) -> DepthTestUnit<'_> {
        DepthTestUnit::new(self.depth.view_mut(), StencilTestUnit::new(self.stencil.view_mut()))
    }

    pub fn fragment_tester(&mut self, state: DepthStencilState) -> FragmentTester<'_> {
        FragmentTester::new(self.depth_unit(), state)
    }

    /// Splits the store into bands of `rows` rows each, top to bottom.
    pub fn bands_mut(&mut self, rows: u16) -> Vec<StoreBand<'_>> {
        assert!(rows > 0, "band must have at least one row");
        let stencil = self.stencil.bands_mut(rows as usize);
        let depth = self.depth.bands_mut(rows as usize);
        stencil.zip(depth).map(|(stencil, depth)| StoreBand { stencil, depth }).collect()
    }

    /// Calls `f` on every band of `rows` rows, in parallel when there is more than one band.
    pub fn for_each_band_parallel<F>(&mut self, rows: u16, f: F)
    where
        F: Fn(&mut StoreBand) + Send + Sync,
    {
        let mut bands = self.bands_mut(rows);
        debug!("processing {} bands of {} rows", bands.len(), rows);
        if bands.len() > 1 {
            use rayon::prelude::*;
            bands.par_iter_mut().for_each(|band| {
                f(band);
            });
        } else if let Some(band) = bands.first_mut() {
            f(band);
        }
    }

    /// Tests `fragments` with bands of `rows` rows processed in parallel.
    /// Fragments within a band keep their submission order, so the outcome equals a serial run.
    /// Results are in submission order.
    pub fn test_fragments_parallel(&mut self, state: DepthStencilState, fragments: &[Fragment], rows: u16) -> Vec<bool> {
        assert!(rows > 0, "band must have at least one row");
        let mut bands = self.bands_mut(rows);
        let mut scheduled: Vec<Vec<usize>> = vec![Vec::new(); bands.len()];
        for (index, fragment) in fragments.iter().enumerate() {
            let band = fragment.coord.y as usize / rows as usize;
            assert!(band < scheduled.len(), "fragment y out of bounds: {}", fragment.coord.y);
            scheduled[band].push(index);
        }
        debug!("testing {} fragments over {} bands", fragments.len(), bands.len());

        use rayon::prelude::*;
        let outcomes: Vec<Vec<(usize, bool)>> = bands
            .par_iter_mut()
            .zip(scheduled.par_iter())
            .map(|(band, indices)| {
                let mut tester = band.fragment_tester(state);
                indices.iter().map(|&index| (index, tester.test(&fragments[index]))).collect()
            })
            .collect();

        let mut results = vec![false; fragments.len()];
        for (index, passed) in outcomes.into_iter().flatten() {
            results[index] = passed;
        }
        results
    }

    fn check(&self, coord: Coordinate) -> Result<(), FragmentTestError> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(FragmentTestError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.stencil.width,
                height: self.stencil.height,
            })
        }
    }

    // Debug-only validation, release builds index straight into the storage.
    fn index_of(&self, coord: Coordinate) -> usize {
        debug_assert!(self.contains(coord), "({}, {}) out of bounds", coord.x, coord.y);
        coord.y as usize * self.stencil.stride + coord.x as usize
    }
}

impl<'a> StoreBand<'a> {
    /// Rows covered by the band.
    pub fn rows(&self) -> std::ops::Range<u16> {
        let start = self.stencil.origin_y as u16;
        start..start + self.stencil.height as u16
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.stencil.contains(coord)
    }

    pub fn stencil_unit(&mut self) -> StencilTestUnit<'_> {
        StencilTestUnit::new(self.stencil.reborrow())
    }

    pub fn depth_unit(&mut self) -> DepthTestUnit<'_> {
        DepthTestUnit::new(self.depth.reborrow(), StencilTestUnit::new(self.stencil.reborrow()))
    }

    pub fn fragment_tester(&mut self, state: DepthStencilState) -> FragmentTester<'_> {
        FragmentTester::new(self.depth_unit(), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_dimensions() {
        let store = BufferStore::default();
        assert_eq!(store.width(), 72);
        assert_eq!(store.height(), 128);
        assert_eq!(store.read_stencil(Coordinate::new(71, 127)), 0);
        assert_eq!(store.read_depth(Coordinate::new(71, 127)), 0.0);
    }

    #[test]
    #[should_panic]
    fn empty_store_panics() {
        BufferStore::new(0, 4);
    }

    #[test]
    fn read_write_roundtrip_per_coordinate() {
        let mut store = BufferStore::new(5, 3);
        store.write_stencil(Coordinate::new(4, 2), 200);
        store.write_depth(Coordinate::new(4, 2), 0.75);
        assert_eq!(store.read_stencil(Coordinate::new(4, 2)), 200);
        assert_eq!(store.read_depth(Coordinate::new(4, 2)), 0.75);
        assert_eq!(store.read_stencil(Coordinate::new(3, 2)), 0);
        assert_eq!(store.stencil().at(4, 2), 200);
    }

    #[test]
    fn clear_stencil_zeroes_every_element_and_keeps_depth() {
        let mut store = BufferStore::new(6, 4);
        store.stencil_mut().fill(0xAA);
        store.clear_depth(1.0);
        store.clear_stencil();
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(store.read_stencil(Coordinate::new(x, y)), 0);
                assert_eq!(store.read_depth(Coordinate::new(x, y)), 1.0);
            }
        }
    }

    #[rstest]
    #[case(Coordinate::new(6, 0))]
    #[case(Coordinate::new(0, 4))]
    #[case(Coordinate::new(u16::MAX, u16::MAX))]
    fn checked_access_out_of_bounds(#[case] coord: Coordinate) {
        let mut store = BufferStore::new(6, 4);
        let expected = Err(FragmentTestError::OutOfBounds { x: coord.x, y: coord.y, width: 6, height: 4 });
        assert_eq!(store.try_read_stencil(coord), expected.clone().map(|()| 0));
        assert_eq!(store.try_write_stencil(coord, 1), expected.clone());
        assert_eq!(store.try_read_depth(coord), expected.clone().map(|()| 0.0));
        assert_eq!(store.try_write_depth(coord, 1.0), expected);
    }

    #[test]
    fn checked_access_in_bounds() {
        let mut store = BufferStore::new(6, 4);
        assert_eq!(store.try_write_stencil(Coordinate::new(5, 3), 3), Ok(()));
        assert_eq!(store.try_read_stencil(Coordinate::new(5, 3)), Ok(3));
        assert_eq!(store.try_write_depth(Coordinate::new(5, 3), 0.5), Ok(()));
        assert_eq!(store.try_read_depth(Coordinate::new(5, 3)), Ok(0.5));
    }

    #[test]
    fn units_share_store_buffers() {
        let mut store = BufferStore::new(2, 2);
        let at = Coordinate::new(1, 1);
        store.stencil_unit().apply_op(at, 0x11, 0xFF, StencilOp::Replace);
        assert_eq!(store.read_stencil(at), 0x11);
        assert!(!store.depth_unit().test(false, at, 1.0, DepthComparison::Less, StencilOp::Zero, 0, 0xFF));
        assert_eq!(store.read_stencil(at), 0);
    }

    #[test]
    fn whole_store_band() {
        let mut store = BufferStore::new(4, 3);
        let mut band = store.band_mut();
        assert_eq!(band.rows(), 0..3);
        assert!(band.contains((3, 2).into()));
        assert!(!band.contains((4, 2).into()));
        band.fragment_tester(DepthStencilState::stencil_only(StencilState::write(6))).test(&Fragment::new(3, 2, 0.0));
        assert_eq!(store.read_stencil(Coordinate::new(3, 2)), 6);
    }

    #[test]
    fn bands_report_rows() {
        let mut store = BufferStore::new(3, 10);
        let rows: Vec<std::ops::Range<u16>> = store.bands_mut(4).iter().map(|band| band.rows()).collect();
        assert_eq!(rows, vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn for_each_band_parallel_touches_every_row_once() {
        let mut store = BufferStore::new(3, 10);
        store.for_each_band_parallel(3, |band| {
            for y in band.rows() {
                for x in 0..3 {
                    band.stencil_unit().apply_op(Coordinate::new(x, y), 0, 0xFF, StencilOp::IncrementWrap);
                }
            }
        });
        assert!(store.stencil().as_slice().iter().all(|&v| v == 1));
    }

    #[test]
    fn single_band_runs_inline() {
        let mut store = BufferStore::new(3, 2);
        store.for_each_band_parallel(8, |band| {
            assert_eq!(band.rows(), 0..2);
            band.stencil_unit().apply_op(Coordinate::new(2, 1), 5, 0xFF, StencilOp::Replace);
        });
        assert_eq!(store.read_stencil(Coordinate::new(2, 1)), 5);
    }

    #[test]
    fn parallel_fragments_match_serial() {
        let fragments: Vec<Fragment> = (0..400u32)
            .map(|i| Fragment::new((i * 7 % 9) as u16, (i * 13 % 16) as u16, (i % 11) as f32 / 11.0))
            .collect();
        let stencil = StencilState {
            zfail_op: StencilOp::IncrementWrap,
            pass_op: StencilOp::DecrementWrap,
            ..StencilState::disabled()
        };
        let state = DepthStencilState::new(Some(stencil), Some(DepthState::less()));

        let mut serial = BufferStore::new(9, 16);
        serial.clear_depth(1.0);
        let serial_results = serial.fragment_tester(state).test_all(&fragments);

        let mut parallel = BufferStore::new(9, 16);
        parallel.clear_depth(1.0);
        let parallel_results = parallel.test_fragments_parallel(state, &fragments, 3);

        assert_eq!(serial_results, parallel_results);
        assert_eq!(serial.stencil().as_slice(), parallel.stencil().as_slice());
        assert_eq!(serial.depth().as_slice(), parallel.depth().as_slice());
    }
}
