//! Generic scalar kernels. Always correct, used as the fallback and as
//! the sole implementation for ops no specialization accelerates.

use tensorpool_core::payload::ComputePayload;

/// Shard bounds: row/element indices this worker owns, by simple striding.
#[inline]
fn shard(thread_idx: usize, thread_num: usize, total: usize) -> impl Iterator<Item = usize> {
    (thread_idx..total).step_by(thread_num.max(1))
}

pub fn add(payload: &ComputePayload) {
    let Some(node) = payload.node.as_deref() else { return };
    let numel = node.numel();
    let inputs = node.input_ptrs();
    let out = node.output_ptr();
    unsafe {
        for i in shard(payload.thread_idx, payload.thread_num, numel) {
            *out.add(i) = *inputs[0].add(i) + *inputs[1].add(i);
        }
    }
}

pub fn mul(payload: &ComputePayload) {
    let Some(node) = payload.node.as_deref() else { return };
    let numel = node.numel();
    let inputs = node.input_ptrs();
    let out = node.output_ptr();
    unsafe {
        for i in shard(payload.thread_idx, payload.thread_num, numel) {
            *out.add(i) = *inputs[0].add(i) * *inputs[1].add(i);
        }
    }
}

pub fn relu(payload: &ComputePayload) {
    let Some(node) = payload.node.as_deref() else { return };
    let numel = node.numel();
    let inputs = node.input_ptrs();
    let out = node.output_ptr();
    unsafe {
        for i in shard(payload.thread_idx, payload.thread_num, numel) {
            let v = *inputs[0].add(i);
            *out.add(i) = if v > 0.0 { v } else { 0.0 };
        }
    }
}

pub fn matmul(payload: &ComputePayload) {
    let Some(node) = payload.node.as_deref() else { return };
    let [m, k, n] = node.shape();
    let inputs = node.input_ptrs();
    let (lhs, rhs, out) = (inputs[0], inputs[1], node.output_ptr());
    unsafe {
        for row in shard(payload.thread_idx, payload.thread_num, m) {
            for col in 0..n {
                let mut acc = 0.0f32;
                for idx in 0..k {
                    acc += *lhs.add(row * k + idx) * *rhs.add(idx * n + col);
                }
                *out.add(row * n + col) = acc;
            }
        }
    }
}
