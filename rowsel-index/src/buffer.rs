//! Owned index storage backing the array variants of a row index.
//!
//! [`IndexBuf`] adopts a `Vec<i32>` or `Vec<i64>` without copying and keeps a
//! single data pointer regardless of element width. Narrowing a 64-bit buffer
//! to 32 bits rewrites the same allocation front-to-back and then shrinks it
//! with `realloc`, so the storage is reused rather than reallocated. The
//! 32-bit and 64-bit views alias only inside [`IndexBuf::narrow_in_place`];
//! everywhere else the width tag decides which view is live.
//!
//! This is the only module in the workspace that uses `unsafe`.

use std::alloc::{self, Layout};
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

/// Element width of an [`IndexBuf`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IndexWidth {
    W32,
    W64,
}

/// Width-tagged owned buffer of row numbers.
///
/// Invariants:
/// - `ptr` points to an allocation of `cap_bytes` bytes made with alignment
///   `align` by the global allocator, except when `cap_bytes == 0`, in which
///   case `ptr` is a dangling but well-aligned pointer and nothing is freed.
/// - `align` is the alignment of the `Vec` the buffer was adopted from
///   (4 or 8) and never changes, even after narrowing.
/// - `len * width-in-bytes <= cap_bytes`.
pub(crate) struct IndexBuf {
    ptr: NonNull<u8>,
    len: usize,
    cap_bytes: usize,
    align: usize,
    width: IndexWidth,
}

// SAFETY: IndexBuf exclusively owns its heap allocation; no interior
// mutability, no thread affinity.
unsafe impl Send for IndexBuf {}
unsafe impl Sync for IndexBuf {}

impl IndexBuf {
    /// Adopt a 32-bit index vector without copying.
    pub(crate) fn from_vec32(v: Vec<i32>) -> Self {
        let mut v = ManuallyDrop::new(v);
        let len = v.len();
        let cap_bytes = v.capacity() * size_of::<i32>();
        // Vec::as_mut_ptr is never null, even for capacity 0.
        let ptr = NonNull::new(v.as_mut_ptr().cast::<u8>()).expect("vec pointer");
        Self {
            ptr,
            len,
            cap_bytes,
            align: align_of::<i32>(),
            width: IndexWidth::W32,
        }
    }

    /// Adopt a 64-bit index vector without copying.
    pub(crate) fn from_vec64(v: Vec<i64>) -> Self {
        let mut v = ManuallyDrop::new(v);
        let len = v.len();
        let cap_bytes = v.capacity() * size_of::<i64>();
        let ptr = NonNull::new(v.as_mut_ptr().cast::<u8>()).expect("vec pointer");
        Self {
            ptr,
            len,
            cap_bytes,
            align: align_of::<i64>(),
            width: IndexWidth::W64,
        }
    }

    #[inline]
    pub(crate) fn width(&self) -> IndexWidth {
        self.width
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// View the buffer as 32-bit indices. Callers must have checked the tag.
    #[inline]
    pub(crate) fn as_i32(&self) -> &[i32] {
        debug_assert_eq!(self.width, IndexWidth::W32);
        // SAFETY: width is W32, so `len` i32 elements are initialized at
        // `ptr`. The pointer is 4-aligned: it came from a Vec<i32> or from a
        // Vec<i64> allocation (align 8), and dangling pointers of either
        // origin are at least 4-aligned.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().cast::<i32>(), self.len) }
    }

    /// View the buffer as 64-bit indices. Callers must have checked the tag.
    #[inline]
    pub(crate) fn as_i64(&self) -> &[i64] {
        debug_assert_eq!(self.width, IndexWidth::W64);
        // SAFETY: width is W64 only for buffers adopted from a Vec<i64>, so
        // the pointer is 8-aligned and `len` i64 elements are initialized.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().cast::<i64>(), self.len) }
    }

    /// Narrow a 64-bit buffer to 32 bits inside the same allocation.
    ///
    /// Callers guarantee every stored value fits in `i32`. The 32-bit write
    /// cursor trails the 64-bit read cursor (4·i <= 8·i), so a single forward
    /// pass never clobbers an unread element. Afterwards the allocation is
    /// shrunk to `len` 32-bit slots; if the shrink fails the wide capacity is
    /// simply kept, which only wastes space.
    pub(crate) fn narrow_in_place(&mut self) {
        debug_assert_eq!(self.width, IndexWidth::W64);
        let n = self.len;
        let src = self.ptr.as_ptr().cast::<i64>();
        let dst = self.ptr.as_ptr().cast::<i32>();
        for i in 0..n {
            // SAFETY: i < len, so the read is inside the live i64 region; the
            // write lands in bytes [4i, 4i+4), all of which have already been
            // read (they precede byte 8i). Both pointers are sufficiently
            // aligned (allocation align is 8).
            unsafe {
                let x = *src.add(i);
                debug_assert!(x >= 0 && x <= i64::from(i32::MAX));
                *dst.add(i) = x as i32;
            }
        }

        let new_size = n * size_of::<i32>();
        if new_size > 0 && new_size < self.cap_bytes {
            let layout = Layout::from_size_align(self.cap_bytes, self.align)
                .expect("layout of live allocation");
            // SAFETY: `ptr` was allocated by the global allocator with
            // exactly `layout`, and `new_size` is nonzero and smaller than
            // the current size.
            let shrunk = unsafe { alloc::realloc(self.ptr.as_ptr(), layout, new_size) };
            if let Some(shrunk) = NonNull::new(shrunk) {
                self.ptr = shrunk;
                self.cap_bytes = new_size;
            }
        }
        self.width = IndexWidth::W32;
    }
}

impl Clone for IndexBuf {
    fn clone(&self) -> Self {
        match self.width {
            IndexWidth::W32 => Self::from_vec32(self.as_i32().to_vec()),
            IndexWidth::W64 => Self::from_vec64(self.as_i64().to_vec()),
        }
    }
}

impl Drop for IndexBuf {
    fn drop(&mut self) {
        if self.cap_bytes != 0 {
            let layout = Layout::from_size_align(self.cap_bytes, self.align)
                .expect("layout of live allocation");
            // SAFETY: `ptr`/`layout` describe the live allocation; after this
            // the buffer is never touched again.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) }
        }
    }
}

impl fmt::Debug for IndexBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width {
            IndexWidth::W32 => f.debug_tuple("IndexBuf32").field(&self.as_i32()).finish(),
            IndexWidth::W64 => f.debug_tuple("IndexBuf64").field(&self.as_i64()).finish(),
        }
    }
}
