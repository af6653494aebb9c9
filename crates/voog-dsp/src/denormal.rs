//! Flush-to-zero scope for render paths.
//!
//! A decaying ladder tail sinks into subnormal range long before it reaches
//! zero. With the `no-denormals` feature on x86_64, renders run with the
//! MXCSR denormals-are-zero and flush-to-zero bits set, so the tail snaps to
//! 0.0 instead of crawling through slow subnormal arithmetic.

#[cfg(all(feature = "no-denormals", target_arch = "x86_64"))]
mod mxcsr {
    #![allow(deprecated)]

    use core::arch::x86_64::{_mm_getcsr, _mm_setcsr};

    /// DAZ (bit 6) and FTZ (bit 15).
    pub const DAZ_FTZ: u32 = (1 << 6) | (1 << 15);

    #[inline]
    pub fn read() -> u32 {
        unsafe { _mm_getcsr() }
    }

    #[inline]
    pub fn write(value: u32) {
        unsafe { _mm_setcsr(value) }
    }

    /// Puts the saved control word back, also when the render unwinds.
    pub struct Restore(pub u32);

    impl Drop for Restore {
        fn drop(&mut self) {
            write(self.0);
        }
    }
}

/// Runs `render` with subnormal inputs and results treated as zero.
///
/// The previous floating-point mode is restored afterwards. Without the
/// `no-denormals` feature, or off x86_64, `render` runs unchanged.
#[inline]
pub fn with_flush_to_zero<R>(render: impl FnOnce() -> R) -> R {
    #[cfg(all(feature = "no-denormals", target_arch = "x86_64"))]
    let _restore = {
        let saved = mxcsr::read();
        mxcsr::write(saved | mxcsr::DAZ_FTZ);
        mxcsr::Restore(saved)
    };
    render()
}

/// The current MXCSR value when flushing is compiled in.
#[inline]
pub fn control_word() -> Option<u32> {
    #[cfg(all(feature = "no-denormals", target_arch = "x86_64"))]
    {
        Some(mxcsr::read())
    }
    #[cfg(not(all(feature = "no-denormals", target_arch = "x86_64")))]
    {
        None
    }
}
