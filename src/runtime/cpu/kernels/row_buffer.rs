//! Local row buffers for streaming rows out of the input matrix.
//!
//! Every buffer is `aligned_row_len` elements long. Loading a row copies its
//! `m` elements and zero-fills the tail, so padding never carries data from
//! the next row of the source matrix.

use crate::dtype::Element;

/// One zero-padded local copy of an input row.
#[derive(Debug, Clone)]
pub struct RowBuffer<T> {
    data: Box<[T]>,
    len: usize,
    row: Option<usize>,
}

impl<T: Element> RowBuffer<T> {
    /// Allocate a zeroed buffer of `aligned_len` elements.
    pub fn new(aligned_len: usize) -> Self {
        Self {
            data: vec![T::zero(); aligned_len].into_boxed_slice(),
            len: 0,
            row: None,
        }
    }

    /// Copy `src` into the front of the buffer and zero the rest.
    ///
    /// # Panics
    ///
    /// Panics if `src` is longer than the buffer.
    #[inline]
    pub fn load(&mut self, row: usize, src: &[T]) {
        let (head, tail) = self.data.split_at_mut(src.len());
        head.copy_from_slice(src);
        tail.fill(T::zero());
        self.len = src.len();
        self.row = Some(row);
    }

    /// The loaded row's `m` elements (padding excluded)
    #[inline]
    pub fn row(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// The whole buffer including zero padding
    #[inline]
    pub fn padded(&self) -> &[T] {
        &self.data
    }

    /// Index of the loaded row, if any
    #[inline]
    pub fn row_index(&self) -> Option<usize> {
        self.row
    }

    /// Mark the buffer free. Contents are left in place.
    #[inline]
    pub fn release(&mut self) {
        self.row = None;
    }

    /// Buffer capacity in elements
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Two-slot rotation for the outer row.
///
/// While the front slot is read by the inner loop, the next owned row is
/// loaded into the back slot; [`DoubleBuffer::advance`] swaps them. A single
/// slot would give the same results, only without the overlap.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    slots: [RowBuffer<T>; 2],
    front: usize,
}

impl<T: Element> DoubleBuffer<T> {
    /// Allocate both slots at `aligned_len` elements.
    pub fn new(aligned_len: usize) -> Self {
        Self {
            slots: [RowBuffer::new(aligned_len), RowBuffer::new(aligned_len)],
            front: 0,
        }
    }

    /// The slot currently being computed against
    #[inline]
    pub fn front(&self) -> &RowBuffer<T> {
        &self.slots[self.front]
    }

    /// Load into the current slot
    #[inline]
    pub fn load_front(&mut self, row: usize, src: &[T]) {
        self.slots[self.front].load(row, src);
    }

    /// Load the next row into the idle slot
    #[inline]
    pub fn prefetch(&mut self, row: usize, src: &[T]) {
        self.slots[1 - self.front].load(row, src);
    }

    /// Release the front slot and promote the prefetched one.
    ///
    /// Returns the promoted row index, or `None` if nothing was prefetched.
    #[inline]
    pub fn advance(&mut self) -> Option<usize> {
        self.slots[self.front].release();
        self.front = 1 - self.front;
        self.slots[self.front].row_index()
    }
}
