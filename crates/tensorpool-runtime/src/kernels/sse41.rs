//! SSE4.1-accelerated elementwise kernels, used when AVX2 isn't available
//! but SSE4.1 is. `relu` and `matmul` fall back to scalar.

use tensorpool_core::payload::ComputePayload;

use super::scalar;

pub use scalar::{matmul, relu};

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
unsafe fn add_sse41(payload: &ComputePayload) {
    use std::arch::x86_64::*;

    let Some(node) = payload.node.as_deref() else { return };
    let numel = node.numel();
    let inputs = node.input_ptrs();
    let (lhs, rhs, out) = (inputs[0], inputs[1], node.output_ptr());

    let lanes = 4;
    let mut i = payload.thread_idx * lanes;
    let stride = payload.thread_num.max(1) * lanes;
    while i + lanes <= numel {
        let a = _mm_loadu_ps(lhs.add(i));
        let b = _mm_loadu_ps(rhs.add(i));
        _mm_storeu_ps(out.add(i), _mm_add_ps(a, b));
        i += stride;
    }
    let tail_start = ((numel / lanes) * lanes) + payload.thread_idx;
    let mut j = tail_start;
    while j < numel {
        *out.add(j) = *lhs.add(j) + *rhs.add(j);
        j += payload.thread_num.max(1);
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
unsafe fn mul_sse41(payload: &ComputePayload) {
    use std::arch::x86_64::*;

    let Some(node) = payload.node.as_deref() else { return };
    let numel = node.numel();
    let inputs = node.input_ptrs();
    let (lhs, rhs, out) = (inputs[0], inputs[1], node.output_ptr());

    let lanes = 4;
    let mut i = payload.thread_idx * lanes;
    let stride = payload.thread_num.max(1) * lanes;
    while i + lanes <= numel {
        let a = _mm_loadu_ps(lhs.add(i));
        let b = _mm_loadu_ps(rhs.add(i));
        _mm_storeu_ps(out.add(i), _mm_mul_ps(a, b));
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
    unsafe { add_sse41(payload) }
}

#[cfg(target_arch = "x86_64")]
pub fn mul(payload: &ComputePayload) {
    unsafe { mul_sse41(payload) }
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
    fn mul_matches_scalar_for_non_multiple_of_lane_width() {
        if !is_x86_feature_detected!("sse4.1") {
            return;
        }
        let lhs: Vec<f32> = (0..19).map(|i| i as f32).collect();
        let rhs: Vec<f32> = (0..19).map(|i| (i + 1) as f32).collect();
        let node = Arc::new(VecTensorNode::elementwise_binary(Op::Mul, lhs, rhs));
        let payload = ComputePayload { node: Some(node.clone()), thread_idx: 0, thread_num: 1 };
        mul(&payload);
        let expected: Vec<f32> = (0..19).map(|i| i as f32 * (i + 1) as f32).collect();
        assert_eq!(node.output(), expected);
    }
}
