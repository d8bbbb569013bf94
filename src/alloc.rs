use std::alloc::Layout;
use std::error::Error;
use std::fmt;
use std::ptr::NonNull;

/// The `AllocError` error indicates an allocation failure
/// that may be due to resource exhaustion or to
/// something wrong when combining the given input arguments with this
/// allocator.
///
/// Returned by the `try_` insertion methods of the containers, in which case the
/// container is left exactly as it was before the call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AllocError;

impl Error for AllocError {}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

/// Memory allocation.
///
/// Tree nodes are allocated one at a time through this trait, so an allocator
/// sees one `allocate` per inserted element and one `deallocate` per removed element.
///
/// # Safety
///
/// Memory returned by `allocate` must stay valid, and must not be handed out again,
/// until it is passed to `deallocate` with the same layout.
pub unsafe trait Allocator {
    /// Attempts to allocate a block of memory.
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

    /// Deallocates the memory referenced by `ptr`.
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator (or a clone of it)
    /// with the same `layout`, and must not have been deallocated already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Creates a "by reference" adapter for this instance of `Allocator`.
    #[inline(always)]
    fn by_ref(&self) -> &Self
    where
        Self: Sized,
    {
        self
    }
}

unsafe impl<A> Allocator for &A
where
    A: Allocator + ?Sized,
{
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the safety contract must be upheld by the caller
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// Default implementation of Allocator.
#[derive(Clone, Copy, Debug, Default)]
pub struct Global;

unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        match layout.size() {
            0 => Ok(NonNull::slice_from_raw_parts(NonNull::dangling(), 0)),
            size => unsafe {
                let raw_ptr = std::alloc::alloc(layout);
                let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;
                Ok(NonNull::slice_from_raw_parts(ptr, size))
            },
        }
    }
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            std::alloc::dealloc(ptr.as_ptr(), layout);
        }
    }
}

#[test]
fn global_round_trip() {
    let layout = Layout::new::<[u64; 4]>();
    let p = Global.allocate(layout).unwrap();
    assert_eq!(p.len(), layout.size());
    unsafe { Global.by_ref().deallocate(p.cast(), layout) };
    assert_eq!(AllocError.to_string(), "memory allocation failed");
}
