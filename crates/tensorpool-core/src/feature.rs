//! Runtime CPU feature probing.
//!
//! Specializations (see `tensorpool-runtime`) name the features they
//! require using [`CpuFeature`]; [`has_feature`] is the one place that
//! actually asks the host CPU. Keeping the check behind a free function
//! (rather than inlining `is_x86_feature_detected!` at each call site)
//! lets tests mock the answer. [`cpu_model_string`] is a separate,
//! unrelated probe (the `cpuid` brand string) used only for the device's
//! display name, not for specialization selection.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuFeature {
    Sse41,
    Avx,
    Avx2,
    Avx512F,
}

/// Ask the host CPU whether it supports `feature`.
///
/// On non-x86_64 targets this always returns `false`, which forces
/// specialization selection down to the scalar fallback.
#[cfg(target_arch = "x86_64")]
pub fn has_feature(feature: CpuFeature) -> bool {
    match feature {
        CpuFeature::Sse41 => is_x86_feature_detected!("sse4.1"),
        CpuFeature::Avx => is_x86_feature_detected!("avx"),
        CpuFeature::Avx2 => is_x86_feature_detected!("avx2"),
        CpuFeature::Avx512F => is_x86_feature_detected!("avx512f"),
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn has_feature(_feature: CpuFeature) -> bool {
    false
}

/// Host CPU brand string (e.g. `"AMD Ryzen 9 5900X 12-Core Processor"`),
/// read via the `cpuid` extended brand-string leaves. Falls back to
/// `"unknown"` on non-x86_64 targets or if the host doesn't report one.
#[cfg(target_arch = "x86_64")]
pub fn cpu_model_string() -> String {
    use std::arch::x86_64::__cpuid;

    let max_extended = unsafe { __cpuid(0x8000_0000) }.eax;
    if max_extended < 0x8000_0004 {
        return "unknown".to_string();
    }

    let mut bytes = Vec::with_capacity(48);
    for leaf in 0x8000_0002u32..=0x8000_0004u32 {
        let regs = unsafe { __cpuid(leaf) };
        for reg in [regs.eax, regs.ebx, regs.ecx, regs.edx] {
            bytes.extend_from_slice(&reg.to_le_bytes());
        }
    }

    let raw = String::from_utf8_lossy(&bytes);
    let trimmed = raw.trim_matches('\0').trim();
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(not(target_arch = "x86_64"))]
pub fn cpu_model_string() -> String {
    "unknown".to_string()
}

/// Returns true iff every feature in `required` is present on the host.
///
/// An empty slice is treated as malformed and never satisfied — a
/// specialization with no stated requirements would otherwise win
/// selection unconditionally regardless of capability ordering.
pub fn all_supported<F>(required: &[CpuFeature], probe: F) -> bool
where
    F: Fn(CpuFeature) -> bool,
{
    if required.is_empty() {
        return false;
    }
    required.iter().all(|&f| probe(f))
}
