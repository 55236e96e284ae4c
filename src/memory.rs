//! Pluggable aligned allocation for padded working buffers.
//!
//! There is no process-wide allocator slot: an allocator value is passed to
//! [`crate::Ssim::with_allocator`] and from there to every
//! [`crate::PaddedImage`] it builds. Memory obtained from an allocator must be
//! released through the same allocator, with the same layout.

use crate::util::{SsimError, SsimResult};
use std::alloc::Layout;
use std::ptr::NonNull;

/// Alignment of padded rows and tile buffers, in bytes.
pub const CACHE_ALIGNMENT: usize = 64;

/// Aligned allocate/deallocate pair.
///
/// # Safety
///
/// Implementors must return either `None` or a pointer to at least
/// `layout.size()` writable bytes aligned to `layout.align()`, valid until it
/// is passed back to `deallocate` with the same layout.
pub unsafe trait SsimAllocator {
    /// Allocates a block for `layout`, returning `None` on failure.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Releases a block previously returned by `allocate`.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `self.allocate(layout)` and must not be used
    /// afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: SsimAllocator + ?Sized> SsimAllocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

/// Allocator backed by the global Rust allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultAllocator;

unsafe impl SsimAllocator for DefaultAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            return None;
        }
        // SAFETY: the layout has a non-zero size.
        NonNull::new(unsafe { std::alloc::alloc(layout) })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout)
    }
}

/// Builds the layout for `size` bytes, raising `alignment` to at least the
/// pointer size.
pub(crate) fn aligned_layout(size: usize, alignment: usize) -> SsimResult<Layout> {
    debug_assert!(alignment == 0 || alignment.is_power_of_two());
    let alignment = alignment.max(std::mem::size_of::<usize>());
    Layout::from_size_align(size, alignment).map_err(|_| SsimError::OutOfMemory { bytes: size })
}
