use super::*;
use bytemuck::{Pod, Zeroable};

pub struct Buffer<T> {
    /// Width of usable elements in the buffer
    pub width: usize,

    /// Height of usable elements in the buffer
    pub height: usize,

    /// Number of elements between the rows
    pub stride: usize,

    /// The actual elements in the buffer
    pub elems: Vec<T>,
}

impl<T: Copy + Zeroable + Pod> Buffer<T> {
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width;
        let elems = vec![T::zeroed(); stride * height];
        Self { width, height, stride, elems }
    }

    pub fn at(&self, x: usize, y: usize) -> T {
        assert!(x < self.width, "x out of bounds: {} >= {}", x, self.width);
        assert!(y < self.height, "y out of bounds: {} >= {}", y, self.height);
        self.elems[y * self.stride + x]
    }

    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut T {
        assert!(x < self.width, "x out of bounds: {} >= {}", x, self.width);
        assert!(y < self.height, "y out of bounds: {} >= {}", y, self.height);
        &mut self.elems[y * self.stride + x]
    }

    pub fn as_u8_slice(&self) -> &[u8] {
        bytemuck::cast_slice(&self.elems)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elems
    }

    pub fn fill(&mut self, with: T) {
        for elem in self.elems.iter_mut() {
            *elem = with;
        }
    }

    /// Mutable view over the whole buffer.
    pub fn view_mut(&mut self) -> BufferViewMut<'_, T> {
        BufferViewMut {
            origin_y: 0,
            width: self.width,
            height: self.height,
            stride: self.stride,
            elems: &mut self.elems,
        }
    }

    /// Splits the buffer into non-overlapping views of `rows` rows each, top to bottom.
    /// The last view may be shorter.
    pub fn bands_mut(&mut self, rows: usize) -> impl Iterator<Item = BufferViewMut<'_, T>> {
        assert!(rows > 0, "band must have at least one row");
        let (width, height, stride) = (self.width, self.height, self.stride);
        self.elems.chunks_mut(rows * stride).enumerate().map(move |(i, elems)| {
            let origin_y = i * rows;
            BufferViewMut { origin_y, width, height: (height - origin_y).min(rows), stride, elems }
        })
    }
}

/// A mutable window over a horizontal band of a `Buffer`, addressed with absolute coordinates.
pub struct BufferViewMut<'a, T> {
    /// First buffer row covered by the view
    pub origin_y: usize,

    /// Width of usable elements in a row
    pub width: usize,

    /// Number of rows covered by the view
    pub height: usize,

    /// Number of elements between the rows
    pub stride: usize,

    elems: &'a mut [T],
}

impl<'a, T: Copy> BufferViewMut<'a, T> {
    /// Whether `coord` falls inside the view.
    pub fn contains(&self, coord: Coordinate) -> bool {
        let (x, y) = (coord.x as usize, coord.y as usize);
        x < self.width && y >= self.origin_y && y < self.origin_y + self.height
    }

    /// Reads without validating `coord` in release builds.
    /// An x past the row width aliases into the next row; a row outside the view panics.
    pub fn get(&self, coord: Coordinate) -> T {
        self.elems[self.index_of(coord)]
    }

    /// Writes without validating `coord` in release builds, see `get`.
    pub fn set(&mut self, coord: Coordinate, value: T) {
        let index = self.index_of(coord);
        self.elems[index] = value;
    }

    pub fn try_get(&self, coord: Coordinate) -> Result<T, FragmentTestError> {
        self.check(coord)?;
        Ok(self.get(coord))
    }

    pub fn try_set(&mut self, coord: Coordinate, value: T) -> Result<(), FragmentTestError> {
        self.check(coord)?;
        self.set(coord, value);
        Ok(())
    }

    /// Shorter-lived view over the same elements.
    pub fn reborrow(&mut self) -> BufferViewMut<'_, T> {
        BufferViewMut {
            origin_y: self.origin_y,
            width: self.width,
            height: self.height,
            stride: self.stride,
            elems: &mut *self.elems,
        }
    }

    fn check(&self, coord: Coordinate) -> Result<(), FragmentTestError> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(FragmentTestError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.origin_y + self.height,
            })
        }
    }

    fn index_of(&self, coord: Coordinate) -> usize {
        let (x, y) = (coord.x as usize, coord.y as usize);
        debug_assert!(x < self.width, "x out of bounds: {} >= {}", x, self.width);
        debug_assert!(
            y >= self.origin_y && y < self.origin_y + self.height,
            "y out of bounds: {} not in {}..{}",
            y,
            self.origin_y,
            self.origin_y + self.height
        );
        // saturating so that a row outside the view always lands past the end of `elems`
        let row = y.checked_sub(self.origin_y).unwrap_or(usize::MAX);
        row.saturating_mul(self.stride).saturating_add(x)
    }
}
