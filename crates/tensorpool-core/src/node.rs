//! The narrow contract kernels and the device use to touch tensor data.
//!
//! The real tensor/storage/autograd model is an external collaborator;
//! this crate only needs enough of it to dispatch and shard a kernel
//! call. [`VecTensorNode`] is a `Vec<f32>`-backed implementation that
//! exists so this crate's own tests and demos are self-contained — it is
//! not meant to be the tensor type a real engine would use.

use std::cell::UnsafeCell;

use crate::op::Op;

/// A node representing one pending operator application.
///
/// # Safety contract
///
/// `output_ptr` must point to `numel()` contiguous, properly aligned
/// `f32` slots for the lifetime of the call. Kernels write only the
/// shard selected by `thread_idx`/`thread_num` in the payload that
/// references this node; the pool's barrier is what makes concurrent,
/// disjoint writes through this pointer sound.
pub trait TensorNode: Send + Sync {
    fn op(&self) -> Op;

    /// Total number of output elements; the sole input to the work-width
    /// heuristic.
    fn numel(&self) -> usize;

    /// Mutable output buffer, `numel()` elements long.
    fn output_ptr(&self) -> *mut f32;

    /// Read-only input buffers, in the order the opcode's kernel expects
    /// them (e.g. `[lhs, rhs]` for `Add`/`Mul`/`MatMul`, `[src]` for `Relu`).
    fn input_ptrs(&self) -> &[*const f32];

    /// Opcode-specific shape metadata. Elementwise ops ignore it;
    /// `MatMul` reads it as `[m, k, n]` (lhs is m×k, rhs is k×n).
    fn shape(&self) -> [usize; 3];
}

/// Self-contained `Vec<f32>`-backed tensor node for tests and demos.
pub struct VecTensorNode {
    op: Op,
    inputs: Vec<Vec<f32>>,
    input_ptrs: Vec<*const f32>,
    output: UnsafeCell<Vec<f32>>,
    shape: [usize; 3],
}

// Safety: callers only ever write through `output_ptr()` from inside a
// kernel invoked by the worker pool's barrier, which partitions writes
// by thread_idx into disjoint ranges and publishes them via the barrier
// before any thread reads the result. `input_ptrs` only ever points at
// `inputs`, which this struct owns for its own lifetime, so moving a
// `VecTensorNode` across threads (Send) or sharing `&VecTensorNode`
// across threads (Sync) is sound despite the raw-pointer fields.
unsafe impl Send for VecTensorNode {}
unsafe impl Sync for VecTensorNode {}

impl VecTensorNode {
    /// Build a node for an elementwise binary op (`Add`/`Mul`).
    pub fn elementwise_binary(op: Op, lhs: Vec<f32>, rhs: Vec<f32>) -> Self {
        assert_eq!(lhs.len(), rhs.len(), "elementwise operands must match in length");
        let numel = lhs.len();
        let inputs = vec![lhs, rhs];
        let input_ptrs = inputs.iter().map(|v| v.as_ptr()).collect();
        Self {
            op,
            inputs,
            input_ptrs,
            output: UnsafeCell::new(vec![0.0; numel]),
            shape: [numel, 0, 0],
        }
    }

    /// Build a node for an elementwise unary op (`Relu`).
    pub fn elementwise_unary(op: Op, src: Vec<f32>) -> Self {
        let numel = src.len();
        let inputs = vec![src];
        let input_ptrs = inputs.iter().map(|v| v.as_ptr()).collect();
        Self {
            op,
            inputs,
            input_ptrs,
            output: UnsafeCell::new(vec![0.0; numel]),
            shape: [numel, 0, 0],
        }
    }

    /// Build a node for `m`×`k` times `k`×`n` matrix multiplication.
    pub fn matmul(lhs: Vec<f32>, rhs: Vec<f32>, m: usize, k: usize, n: usize) -> Self {
        assert_eq!(lhs.len(), m * k, "lhs does not match m*k");
        assert_eq!(rhs.len(), k * n, "rhs does not match k*n");
        let inputs = vec![lhs, rhs];
        let input_ptrs = inputs.iter().map(|v| v.as_ptr()).collect();
        Self {
            op: Op::MatMul,
            inputs,
            input_ptrs,
            output: UnsafeCell::new(vec![0.0; m * n]),
            shape: [m, k, n],
        }
    }

    /// Snapshot the output buffer (for tests/demos, never called from a
    /// worker mid-phase).
    pub fn output(&self) -> Vec<f32> {
        unsafe { (*self.output.get()).clone() }
    }
}

impl TensorNode for VecTensorNode {
    fn op(&self) -> Op {
        self.op
    }

    fn numel(&self) -> usize {
        match self.op {
            Op::MatMul => self.shape[0] * self.shape[2],
            _ => self.shape[0],
        }
    }

    fn output_ptr(&self) -> *mut f32 {
        unsafe { (*self.output.get()).as_mut_ptr() }
    }

    fn input_ptrs(&self) -> &[*const f32] {
        &self.input_ptrs
    }

    fn shape(&self) -> [usize; 3] {
        self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elementwise_binary_numel_matches_input_len() {
        let node = VecTensorNode::elementwise_binary(Op::Add, vec![1.0; 10], vec![2.0; 10]);
        assert_eq!(node.numel(), 10);
    }

    #[test]
    fn matmul_numel_is_m_times_n() {
        let node = VecTensorNode::matmul(vec![0.0; 6], vec![0.0; 12], 2, 3, 4);
        assert_eq!(node.numel(), 8);
        assert_eq!(node.shape(), [2, 3, 4]);
    }

    #[test]
    #[should_panic]
    fn matmul_rejects_mismatched_shapes() {
        VecTensorNode::matmul(vec![0.0; 5], vec![0.0; 12], 2, 3, 4);
    }
}
