//! Device-owned aligned storage buffers.
//!
//! Unlike the byte-addressed DMA buffers a GPU device would expose,
//! these are plain heap allocations — `copy_in`/`copy_out` are in-process
//! memory copies, not transfers.

use std::alloc::{self, Layout};

use tensorpool_core::constants::STORAGE_ALIGNMENT;
use tensorpool_core::error::{PoolError, PoolResult};

/// A 16-byte-aligned heap buffer owned by a compute device.
pub struct AlignedStorage {
    base: *mut u8,
    size: usize,
    layout: Layout,
}

// Safety: the buffer is plain heap memory; callers are responsible for
// not handing out overlapping mutable accesses (mirrors the bounds-only
// contract `set`/`copy_in`/`copy_out` document below).
unsafe impl Send for AlignedStorage {}
unsafe impl Sync for AlignedStorage {}

impl AlignedStorage {
    /// Allocate `size` bytes aligned to [`STORAGE_ALIGNMENT`].
    pub fn alloc(size: usize) -> PoolResult<Self> {
        let layout = Layout::from_size_align(size.max(1), STORAGE_ALIGNMENT)
            .map_err(|_| PoolError::AllocationFailed { size, align: STORAGE_ALIGNMENT })?;
        let base = unsafe { alloc::alloc_zeroed(layout) };
        if base.is_null() {
            return Err(PoolError::AllocationFailed { size, align: STORAGE_ALIGNMENT });
        }
        Ok(Self { base, size, layout })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alignment(&self) -> usize {
        STORAGE_ALIGNMENT
    }

    pub fn base_ptr(&self) -> *const u8 {
        self.base
    }

    pub fn base_mut_ptr(&mut self) -> *mut u8 {
        self.base
    }

    /// Host-visible address of the buffer. On the CPU device `host` and
    /// `base` are the same address; other device types would give this a
    /// distinct host-side mapping of device-resident memory.
    pub fn host(&self) -> *const u8 {
        self.base
    }

    fn check_bounds(&self, offset: usize, len: usize) -> PoolResult<()> {
        if offset.checked_add(len).map_or(true, |end| end > self.size) {
            return Err(PoolError::OutOfBounds { offset, len, size: self.size });
        }
        Ok(())
    }

    /// Fill `[offset, size)` with `byte`.
    pub fn set(&mut self, offset: usize, byte: u8) -> PoolResult<()> {
        self.check_bounds(offset, self.size.saturating_sub(offset))?;
        unsafe {
            std::ptr::write_bytes(self.base.add(offset), byte, self.size - offset);
        }
        Ok(())
    }

    /// Copy `src` into the buffer starting at `offset`.
    pub fn copy_in(&mut self, offset: usize, src: &[u8]) -> PoolResult<()> {
        self.check_bounds(offset, src.len())?;
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), self.base.add(offset), src.len());
        }
        Ok(())
    }

    /// Copy `n` bytes starting at `offset` into `dst`.
    pub fn copy_out(&self, offset: usize, dst: &mut [u8], n: usize) -> PoolResult<()> {
        self.check_bounds(offset, n)?;
        assert!(dst.len() >= n, "destination slice shorter than requested copy length");
        unsafe {
            std::ptr::copy_nonoverlapping(self.base.add(offset), dst.as_mut_ptr(), n);
        }
        Ok(())
    }
}

impl Drop for AlignedStorage {
    fn drop(&mut self) {
        if !self.base.is_null() {
            unsafe {
                alloc::dealloc(self.base, self.layout);
            }
        }
    }
}
