//! AVX2-accelerated elementwise kernels. `relu` and `matmul` fall back to
//! the scalar implementations — vectorizing those isn't worth the extra
//! surface for a backend of this size.

use tensorpool_core::payload::ComputePayload;

use super::scalar;

pub use scalar::{matmul, relu};

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn add_avx2(payload: &ComputePayload) {
    use std::arch::x86_64::*;

    let Some(node) = payload.node.as_deref() else { return };
    let numel = node.numel();
    let inputs = node.input_ptrs();
    let (lhs, rhs, out) = (inputs[0], inputs[1], node.output_ptr());

    let lanes = 8;
    let mut i = payload.thread_idx * lanes;
    let stride = payload.thread_num.max(1) * lanes;
    while i + lanes <= numel {
        let a = _mm256_loadu_ps(lhs.add(i));
        let b = _mm256_loadu_ps(rhs.add(i));
        _mm256_storeu_ps(out.add(i), _mm256_add_ps(a, b));
        i += stride;
    }
    // Tail: elements past the last full 8-wide chunk this worker owns,
    // handled with the same striding the scalar kernel uses.
    let tail_start = ((numel / lanes) * lanes) + payload.thread_idx;
    let mut j = tail_start;
    while j < numel {
        *out.add(j) = *lhs.add(j) + *rhs.add(j);
        j += payload.thread_num.max(1);
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn mul_avx2(payload: &ComputePayload) {
    use std::arch::x86_64::*;

    let Some(node) = payload.node.as_deref() else { return };
    let numel = node.numel();
    let inputs = node.input_ptrs();
    let (lhs, rhs, out) = (inputs[0], inputs[1], node.output_ptr());

    let lanes = 8;
    let mut i = payload.thread_idx * lanes;
    let stride = payload.thread_num.max(1) * lanes;
    while i + lanes <= numel {
        let a = _mm256_loadu_ps(lhs.add(i));
        let b = _mm256_loadu_ps(rhs.add(i));
        _mm256_storeu_ps(out.add(i), _mm256_mul_ps(a, b));
        i += stride;
    }
    let tail_start = ((numel / lanes) * lanes) + payload.thread_idx;
    let mut j = tail_start;
    while j < numel {
        *out.add(j) = *lhs.add(j) * *rhs.add(j);
        j += payload.thread_num.max(1);
    }
}

#[cfg(target_arch = "x86_64")]
pub fn add(payload: &ComputePayload) {
    unsafe { add_avx2(payload) }
}

#[cfg(target_arch = "x86_64")]
pub fn mul(payload: &ComputePayload) {
    unsafe { mul_avx2(payload) }
}

#[cfg(not(target_arch = "x86_64"))]
pub use scalar::{add, mul};

#[cfg(all(test, target_arch = "x86_64"))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tensorpool_core::node::VecTensorNode;
    use tensorpool_core::op::Op;

    #[test]
    fn add_matches_scalar_for_non_multiple_of_lane_width() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        let lhs: Vec<f32> = (0..23).map(|i| i as f32).collect();
        let rhs: Vec<f32> = (0..23).map(|i| (i * 2) as f32).collect();
        let node = Arc::new(VecTensorNode::elementwise_binary(Op::Add, lhs, rhs));
        let payload = ComputePayload { node: Some(node.clone()), thread_idx: 0, thread_num: 1 };
        add(&payload);
        let expected: Vec<f32> = (0..23).map(|i| i as f32 + (i * 2) as f32).collect();
        assert_eq!(node.output(), expected);
    }
}
