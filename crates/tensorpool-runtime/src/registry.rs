//! Opcode-indexed kernel registry.
//!
//! Populated once by specialization selection at device init, then read
//! lock-free on every dispatch — a single indirect call through `fwd`.

use tensorpool_core::op::Op;
use tensorpool_core::payload::ComputePayload;

pub type ForwardKernel = fn(&ComputePayload);

pub struct KernelRegistry {
    fwd: [Option<ForwardKernel>; Op::COUNT],
}

impl KernelRegistry {
    pub fn empty() -> Self {
        Self { fwd: [None; Op::COUNT] }
    }

    pub fn set(&mut self, op: Op, kernel: ForwardKernel) {
        self.fwd[op.as_index()] = Some(kernel);
    }

    /// Look up the kernel for `op`.
    ///
    /// # Panics
    ///
    /// Panics if selection never populated this opcode. This is a
    /// programmer fault (registry used before `select()` ran), not a
    /// recoverable runtime condition.
    pub fn dispatch(&self, op: Op, payload: &ComputePayload) {
        let kernel = self.fwd[op.as_index()]
            .unwrap_or_else(|| panic!("tensorpool: no kernel registered for opcode {op}"));
        kernel(payload);
    }

    pub fn is_populated(&self, op: Op) -> bool {
        self.fwd[op.as_index()].is_some()
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
