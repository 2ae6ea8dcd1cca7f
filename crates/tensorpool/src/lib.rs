//! `tensorpool` — the CPU compute-device facade.
//!
//! Construct a [`CpuDevice`] once, run tensor operations through
//! [`CpuDevice::exec_fwd`], and let it drop to join its workers.
//!
//! ```
//! use std::sync::Arc;
//! use tensorpool::{CpuDevice, CpuDeviceConfig};
//! use tensorpool_core::node::{TensorNode, VecTensorNode};
//! use tensorpool_core::op::Op;
//!
//! let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(1)).unwrap();
//! let node: Arc<dyn TensorNode> =
//!     Arc::new(VecTensorNode::elementwise_binary(Op::Add, vec![1.0, 2.0], vec![3.0, 4.0]));
//! device.exec_fwd(node);
//! ```

use std::sync::Arc;

pub use tensorpool_core::error::{PoolError, PoolResult};
pub use tensorpool_core::node::{TensorNode, VecTensorNode};
pub use tensorpool_core::op::Op;
pub use tensorpool_runtime::{CpuDeviceConfig, DeviceDescriptor, DeviceType};

use tensorpool_core::constants::{DEFAULT_HARDWARE_CONCURRENCY, MAX_WORKERS};
use tensorpool_core::payload::ComputePayload;
use tensorpool_core::{tp_info, tp_warn};
use tensorpool_runtime::{width_for, KernelRegistry, ThreadPool};

/// The CPU compute device: owns the kernel registry, the worker pool
/// (when more than one worker is allocated), and the work-scaling
/// tunables used to pick a width per operation.
pub struct CpuDevice {
    name: String,
    pool: Option<ThreadPool>,
    registry: Arc<KernelRegistry>,
    num_allocated_workers: usize,
    growth_scale: f64,
    numel_threshold: usize,
}

impl CpuDevice {
    /// Create a device from `config`. Selects the best kernel
    /// specialization the host CPU supports (logging exactly one info
    /// line naming the outcome), then allocates a worker pool unless
    /// `config.thread_count` resolves to 1.
    pub fn create(config: CpuDeviceConfig) -> PoolResult<Self> {
        config.validate()?;

        let mut registry = KernelRegistry::empty();
        let selection = tensorpool_runtime::select(&mut registry);
        if selection.matched {
            tp_info!("selected kernel specialization: {}", selection.name);
        } else {
            tp_info!("no kernel specialization matched host CPU features; using scalar fallback");
        }
        let registry = Arc::new(registry);

        let num_allocated_workers = resolve_thread_count(config.thread_count);

        let pool = if num_allocated_workers > 1 {
            Some(ThreadPool::new(num_allocated_workers, registry.clone())?)
        } else {
            None
        };

        let name = format!(
            "CpuDevice(type=cpu, model={}, workers={}, specialization={})",
            tensorpool_core::cpu_model_string(),
            num_allocated_workers,
            selection.name
        );

        Ok(Self {
            name,
            pool,
            registry,
            num_allocated_workers,
            growth_scale: config.growth_scale,
            numel_threshold: config.numel_threshold,
        })
    }

    /// Convenience constructor from the minimal external descriptor.
    pub fn from_descriptor(descriptor: DeviceDescriptor) -> PoolResult<Self> {
        Self::create(descriptor.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_allocated_workers(&self) -> usize {
        self.num_allocated_workers
    }

    pub fn is_async(&self) -> bool {
        false
    }

    /// Eagerly execute `node`'s forward kernel, sharding across the
    /// width the work-width heuristic picks for its `numel()`. Serializes
    /// with any other call on this device: `exec_fwd` does not return
    /// until the operation has fully retired.
    pub fn exec_fwd(&self, node: Arc<dyn TensorNode>) {
        let numel = node.numel();
        let width = width_for(numel, self.num_allocated_workers, self.growth_scale, self.numel_threshold);

        if width <= 1 || self.pool.is_none() {
            let op = node.op();
            let payload = ComputePayload { node: Some(node), thread_idx: 0, thread_num: 1 };
            self.registry.dispatch(op, &payload);
            return;
        }

        let pool = self.pool.as_ref().expect("checked above");
        pool.kickoff(node, width);
        pool.barrier();
    }

    /// Backward execution is not implemented on the CPU device. Callers
    /// that reach this get a loud, fatal diagnostic rather than a silent
    /// no-op.
    pub fn exec_bwd(&self, _root: Arc<dyn TensorNode>) -> ! {
        panic!("{}", PoolError::BackwardNotImplemented);
    }

    pub fn alloc_storage(&self, size: usize) -> PoolResult<tensorpool_runtime::AlignedStorage> {
        tensorpool_runtime::AlignedStorage::alloc(size)
    }

    pub fn free_storage(&self, storage: tensorpool_runtime::AlignedStorage) {
        drop(storage);
    }
}

/// `0` means "use hardware concurrency"; a host that fails to report it
/// falls back to [`DEFAULT_HARDWARE_CONCURRENCY`] (reported as 0 is
/// itself clamped to 1 workers via that default). Either path is clamped
/// to [`MAX_WORKERS`] regardless of what the host or caller asked for.
fn resolve_thread_count(requested: usize) -> usize {
    let resolved = if requested != 0 {
        requested
    } else {
        match std::thread::available_parallelism() {
            Ok(n) => n.get().max(1),
            Err(_) => {
                tp_warn!("failed to query hardware concurrency; defaulting to {}", DEFAULT_HARDWARE_CONCURRENCY);
                DEFAULT_HARDWARE_CONCURRENCY
            }
        }
    };
    if resolved > MAX_WORKERS {
        tp_warn!("requested {} workers exceeds MAX_WORKERS={}; clamping", resolved, MAX_WORKERS);
        MAX_WORKERS
    } else {
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_thread_device_has_no_pool_and_runs_inline() {
        let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(1)).unwrap();
        assert!(device.pool.is_none());

        let concrete = Arc::new(VecTensorNode::matmul(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            2,
            2,
            2,
        ));
        let node: Arc<dyn TensorNode> = concrete.clone();
        device.exec_fwd(node);
        assert_eq!(concrete.output(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn multi_thread_matmul_matches_single_thread() {
        let single = CpuDevice::create(CpuDeviceConfig::default().thread_count(1)).unwrap();
        let multi = CpuDevice::create(
            CpuDeviceConfig::default().thread_count(4).numel_threshold(0),
        )
        .unwrap();

        let m = 64;
        let lhs: Vec<f32> = (0..m * m).map(|i| ((i % 13) as f32) * 0.5 - 3.0).collect();
        let rhs: Vec<f32> = (0..m * m).map(|i| ((i % 7) as f32) * 0.25 - 1.0).collect();

        let single_node = Arc::new(VecTensorNode::matmul(lhs.clone(), rhs.clone(), m, m, m));
        single.exec_fwd(single_node.clone());

        let multi_node = Arc::new(VecTensorNode::matmul(lhs, rhs, m, m, m));
        multi.exec_fwd(multi_node.clone());

        let a = single_node.output();
        let b = multi_node.output();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() <= 1e-3 * x.abs().max(1.0), "{x} vs {y}");
        }
    }

    #[test]
    fn zero_thread_count_resolves_to_hardware_concurrency() {
        let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(0)).unwrap();
        assert!(device.num_allocated_workers() >= 1);
    }

    #[test]
    fn thread_count_is_clamped_to_max_workers() {
        assert_eq!(resolve_thread_count(MAX_WORKERS + 1000), MAX_WORKERS);
        assert_eq!(resolve_thread_count(1), 1);
    }

    #[test]
    #[should_panic(expected = "not implemented")]
    fn backward_execution_aborts_loudly() {
        let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(1)).unwrap();
        let node: Arc<dyn TensorNode> = Arc::new(VecTensorNode::elementwise_unary(Op::Relu, vec![1.0]));
        device.exec_bwd(node);
    }

    #[test]
    fn storage_alloc_and_free_round_trip() {
        let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(1)).unwrap();
        let mut storage = device.alloc_storage(64).unwrap();
        storage.set(0, 7).unwrap();
        device.free_storage(storage);
    }

    #[test]
    fn device_name_reports_worker_count_and_specialization() {
        let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(2)).unwrap();
        assert!(device.name().contains("workers=2"));
    }

    #[test]
    fn device_name_reports_cpu_model() {
        let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(1)).unwrap();
        assert!(device.name().contains("model="));
        assert!(!device.name().contains("model=\""));
    }

    #[test]
    fn specialization_fallback_still_computes_correctly() {
        // Can't force-fail real feature detection from here, but exercising
        // a full device lifecycle on whatever the host actually supports
        // is this crate's closest black-box equivalent; the mocked-probe
        // variant lives in tensorpool-runtime::specialization.
        let device = CpuDevice::create(CpuDeviceConfig::default().thread_count(1)).unwrap();
        let concrete = Arc::new(VecTensorNode::elementwise_binary(Op::Add, vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]));
        let node: Arc<dyn TensorNode> = concrete.clone();
        device.exec_fwd(node);
        assert_eq!(concrete.output(), vec![5.0, 7.0, 9.0]);
    }
}
