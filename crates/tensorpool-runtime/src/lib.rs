//! OS-specific heavy lifting for the tensorpool CPU backend: the worker
//! pool, kernel registry, specialization selector and concrete kernels,
//! aligned storage, and the work-width heuristic.

pub mod config;
pub mod heuristic;
pub mod kernels;
pub mod pool;
pub mod registry;
pub mod specialization;
pub mod storage;

pub use config::{CpuDeviceConfig, DeviceDescriptor, DeviceType};
pub use heuristic::width_for;
pub use pool::ThreadPool;
pub use registry::{ForwardKernel, KernelRegistry};
pub use specialization::{select, select_with_probe, Selection, Specialization, SPECIALIZATIONS};
pub use storage::AlignedStorage;
