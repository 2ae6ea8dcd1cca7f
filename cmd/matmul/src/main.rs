//! Minimal end-to-end demo: build a device, run a matmul single-threaded
//! and multi-threaded, and check the two agree.

use std::sync::Arc;
use std::time::Instant;

use tensorpool::{CpuDevice, CpuDeviceConfig, TensorNode, VecTensorNode};

fn main() {
    let single = CpuDevice::create(CpuDeviceConfig::default().thread_count(1))
        .expect("failed to create single-threaded device");
    println!("single-threaded device: {}", single.name());

    let small = Arc::new(VecTensorNode::matmul(vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0], 2, 2, 2));
    let small_dyn: Arc<dyn TensorNode> = small.clone();
    single.exec_fwd(small_dyn);
    println!("2x2 result: {:?}", small.output());

    let multi = CpuDevice::create(CpuDeviceConfig::default().numel_threshold(1000))
        .expect("failed to create multi-threaded device");
    println!("multi-threaded device: {}", multi.name());

    let n = 512;
    let lhs: Vec<f32> = (0..n * n).map(|i| (i % 17) as f32 * 0.1).collect();
    let rhs: Vec<f32> = (0..n * n).map(|i| (i % 11) as f32 * 0.2).collect();
    let node = Arc::new(VecTensorNode::matmul(lhs, rhs, n, n, n));
    let node_dyn: Arc<dyn TensorNode> = node.clone();

    let start = Instant::now();
    multi.exec_fwd(node_dyn);
    println!("{n}x{n} matmul across {} workers took {:?}", multi.num_allocated_workers(), start.elapsed());
    println!("checksum: {}", node.output().iter().sum::<f32>());
}
