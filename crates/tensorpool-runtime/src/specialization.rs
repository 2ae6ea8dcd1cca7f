//! Runtime kernel-specialization selection.
//!
//! Specializations are tried in a fixed best-to-worst order; the first
//! one whose entire required-feature list is satisfied wins and injects
//! its kernels into the registry. A specialization with an empty feature
//! list is malformed and is never a candidate. If nothing matches, the
//! scalar fallback (not itself a candidate in the ordered list) injects
//! its kernels and selection reports `false`.

use tensorpool_core::feature::{all_supported, has_feature, CpuFeature};
use tensorpool_core::op::Op;

use crate::kernels::{avx2, scalar, sse41};
use crate::registry::KernelRegistry;

pub struct Specialization {
    pub name: &'static str,
    pub required: &'static [CpuFeature],
    inject: fn(&mut KernelRegistry),
}

fn inject_avx2(reg: &mut KernelRegistry) {
    reg.set(Op::Add, avx2::add);
    reg.set(Op::Mul, avx2::mul);
    reg.set(Op::Relu, avx2::relu);
    reg.set(Op::MatMul, avx2::matmul);
}

fn inject_sse41(reg: &mut KernelRegistry) {
    reg.set(Op::Add, sse41::add);
    reg.set(Op::Mul, sse41::mul);
    reg.set(Op::Relu, sse41::relu);
    reg.set(Op::MatMul, sse41::matmul);
}

fn inject_scalar(reg: &mut KernelRegistry) {
    reg.set(Op::Add, scalar::add);
    reg.set(Op::Mul, scalar::mul);
    reg.set(Op::Relu, scalar::relu);
    reg.set(Op::MatMul, scalar::matmul);
}

/// Specializations in best-to-worst order. Do not reorder: selection
/// picks the first whose features are all satisfied.
pub const SPECIALIZATIONS: &[Specialization] = &[
    Specialization { name: "avx2", required: &[CpuFeature::Avx2], inject: inject_avx2 },
    Specialization { name: "sse4.1", required: &[CpuFeature::Sse41], inject: inject_sse41 },
];

/// Result of running [`select`]: which specialization (if any) was
/// chosen, for the single info-level log line at device init.
pub struct Selection {
    pub name: &'static str,
    pub matched: bool,
}

/// Populate `registry` with the best specialization the host supports,
/// probing with `probe` (normally [`has_feature`]). Falls back to the
/// scalar kernel set if nothing matches.
pub fn select_with_probe<F>(registry: &mut KernelRegistry, probe: F) -> Selection
where
    F: Fn(CpuFeature) -> bool,
{
    for spec in SPECIALIZATIONS {
        if all_supported(spec.required, &probe) {
            (spec.inject)(registry);
            return Selection { name: spec.name, matched: true };
        }
    }
    inject_scalar(registry);
    Selection { name: "scalar", matched: false }
}

/// Select against the real host CPU.
pub fn select(registry: &mut KernelRegistry) -> Selection {
    select_with_probe(registry, has_feature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_features_falls_back_to_scalar() {
        let mut reg = KernelRegistry::empty();
        let sel = select_with_probe(&mut reg, |_| false);
        assert!(!sel.matched);
        assert_eq!(sel.name, "scalar");
        for op in Op::ALL {
            assert!(reg.is_populated(op));
        }
    }

    #[test]
    fn all_features_present_picks_strongest_specialization() {
        let mut reg = KernelRegistry::empty();
        let sel = select_with_probe(&mut reg, |_| true);
        assert!(sel.matched);
        assert_eq!(sel.name, "avx2");
    }

    #[test]
    fn partial_features_pick_the_weaker_match() {
        let mut reg = KernelRegistry::empty();
        let sel = select_with_probe(&mut reg, |f| f == CpuFeature::Sse41);
        assert!(sel.matched);
        assert_eq!(sel.name, "sse4.1");
    }

    #[test]
    fn selection_always_fully_populates_registry() {
        let mut reg = KernelRegistry::empty();
        select_with_probe(&mut reg, |_| false);
        for op in Op::ALL {
            assert!(reg.is_populated(op));
        }
    }
}
