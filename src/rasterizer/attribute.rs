//! Strided, non-owning views over vertex attribute storage
//!
//! A view borrows raw bytes and reads element `i` at `offset + i * stride`,
//! so packed arrays and interleaved vertex structs go through the same path.

use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;

/// Read-only view of `T` values laid out every `stride` bytes
#[derive(Debug)]
pub struct AttributeView<'a, T> {
    bytes: &'a [u8],
    offset: usize,
    stride: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// Manual impls: the view is always copyable, whatever `T` is.
impl<T> Clone for AttributeView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AttributeView<'_, T> {}

impl<'a, T: Pod> AttributeView<'a, T> {
    /// View over a tightly packed slice
    pub fn new(data: &'a [T]) -> Self {
        Self {
            bytes: bytemuck::cast_slice(data),
            offset: 0,
            stride: size_of::<T>(),
            len: data.len(),
            _marker: PhantomData,
        }
    }

    /// View over interleaved storage. Element `i` starts at `offset + i * stride`.
    ///
    /// Panics if `stride` is smaller than one element.
    pub fn strided(bytes: &'a [u8], offset: usize, stride: usize) -> Self {
        let elem = size_of::<T>();
        assert!(stride >= elem, "stride {} is smaller than element size {}", stride, elem);

        let available = bytes.len().saturating_sub(offset);
        let len = if available >= elem { (available - elem) / stride + 1 } else { 0 };

        Self {
            bytes,
            offset,
            stride,
            len,
            _marker: PhantomData,
        }
    }

    /// Number of addressable elements
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Read element `index`.
    ///
    /// Indexing past `len()` is a caller error.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        debug_assert!(
            index < self.len,
            "attribute index {} out of bounds (len {})",
            index,
            self.len
        );
        let start = self.offset + index * self.stride;
        bytemuck::pod_read_unaligned(&self.bytes[start..start + size_of::<T>()])
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}
