//! Kernel implementations, grouped by the specialization that provides
//! them. Every kernel here shards its output by `thread_idx`/`thread_num`
//! and performs no synchronization of its own — the pool's barrier is
//! what makes the concurrent, disjoint writes sound.

pub mod avx2;
pub mod scalar;
pub mod sse41;
