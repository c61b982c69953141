//! CPU feature probing for the accelerated compression path.

bitflags::bitflags! {
    /// Instruction set extensions relevant to SHA-2.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CpuFeatures: u32 {
        /// SSE2
        const SSE2 = 1 << 0;
        /// Supplemental SSE3 (byte shuffles)
        const SSSE3 = 1 << 1;
        /// SSE4.1 (blends)
        const SSE41 = 1 << 2;
        /// SHA extensions (sha256rnds2, sha256msg1/2)
        const SHA = 1 << 3;

        /// Everything the SHA-NI compression path needs
        const SHA_NI = Self::SSE2.bits() | Self::SSSE3.bits() | Self::SSE41.bits() | Self::SHA.bits();
    }
}

/// Probes the running CPU.
#[cfg(target_arch = "x86_64")]
pub fn features() -> CpuFeatures {
    use core::arch::x86_64::{__cpuid, __cpuid_count};

    let mut features = CpuFeatures::empty();

    // SAFETY: cpuid is available on every x86_64 CPU.
    #[allow(unused_unsafe)]
    let max_leaf = unsafe { __cpuid(0) }.eax;
    #[allow(unused_unsafe)]
    let leaf1 = unsafe { __cpuid(1) };

    if leaf1.edx & (1 << 26) != 0 {
        features |= CpuFeatures::SSE2;
    }
    if leaf1.ecx & (1 << 9) != 0 {
        features |= CpuFeatures::SSSE3;
    }
    if leaf1.ecx & (1 << 19) != 0 {
        features |= CpuFeatures::SSE41;
    }
    if max_leaf >= 7 {
        // Leaf 7, sub-leaf 0: EBX bit 29
        #[allow(unused_unsafe)]
        let leaf7 = unsafe { __cpuid_count(7, 0) };
        if leaf7.ebx & (1 << 29) != 0 {
            features |= CpuFeatures::SHA;
        }
    }

    features
}

/// Probes the running CPU.
#[cfg(not(target_arch = "x86_64"))]
pub fn features() -> CpuFeatures {
    CpuFeatures::empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha_ni_mask() {
        assert!(CpuFeatures::SHA_NI.contains(CpuFeatures::SHA));
        assert!(!CpuFeatures::SHA.contains(CpuFeatures::SHA_NI));
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_x86_64_has_sse2() {
        // Part of the x86_64 baseline
        assert!(features().contains(CpuFeatures::SSE2));
    }
}
