//! Phase-synchronized intra-op worker pool.
//!
//! One shared mutex and one condition variable coordinate every worker.
//! The main thread acts as worker 0 and is never spawned as an OS
//! thread; workers `1..num_allocated_workers` are. A monotonic `phase`
//! counter makes a missed wakeup impossible: a worker that wakes up for
//! any reason simply compares its last-seen phase against the pool's
//! current one and keeps waiting if they already match.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use tensorpool_core::error::{PoolError, PoolResult};
use tensorpool_core::node::TensorNode;
use tensorpool_core::op::Op;
use tensorpool_core::payload::ComputePayload;
use tensorpool_core::{tp_debug, tp_trace};

use crate::registry::KernelRegistry;

struct Inner {
    interrupt: bool,
    phase: u64,
    num_completed: usize,
    num_active_workers: usize,
    payloads: Vec<ComputePayload>,
}

struct Monitor {
    inner: Mutex<Inner>,
    cv: Condvar,
    registry: Arc<KernelRegistry>,
    num_allocated_workers: usize,
    num_workers_online: AtomicUsize,
}

/// A running pool of worker threads, phase-synchronized around one
/// mutex and one condition variable. The owner of a `ThreadPool` is
/// expected to call [`ThreadPool::kickoff`] then [`ThreadPool::barrier`]
/// once per operation, from the same thread each time (that thread plays
/// the role of worker 0).
pub struct ThreadPool {
    monitor: Arc<Monitor>,
    handles: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `num_allocated_workers - 1` OS threads and block (via
    /// spin-yield, not the condition variable — there's nothing to wait
    /// on yet) until every one of them has reached its first await.
    pub fn new(num_allocated_workers: usize, registry: Arc<KernelRegistry>) -> PoolResult<Self> {
        assert!(num_allocated_workers >= 1, "a pool needs at least one worker (the caller)");

        let payloads = (0..num_allocated_workers).map(ComputePayload::idle).collect();
        let monitor = Arc::new(Monitor {
            inner: Mutex::new(Inner {
                interrupt: false,
                phase: 0,
                num_completed: 0,
                num_active_workers: num_allocated_workers,
                payloads,
            }),
            cv: Condvar::new(),
            registry,
            num_allocated_workers,
            num_workers_online: AtomicUsize::new(0),
        });

        let mut handles = Vec::with_capacity(num_allocated_workers.saturating_sub(1));
        for thread_idx in 1..num_allocated_workers {
            let m = monitor.clone();
            let handle = thread::Builder::new()
                .name(format!("tensorpool-worker-{thread_idx}"))
                .spawn(move || worker_loop(m, thread_idx))
                .map_err(|e| PoolError::SpawnFailed(e.to_string()))?;
            handles.push(handle);
        }

        while monitor.num_workers_online.load(Ordering::Acquire) < num_allocated_workers - 1 {
            thread::yield_now();
        }

        tp_debug!("pool started with {} allocated workers", num_allocated_workers);
        Ok(Self { monitor, handles })
    }

    pub fn num_allocated_workers(&self) -> usize {
        self.monitor.num_allocated_workers
    }

    pub fn phase(&self) -> u64 {
        self.monitor.inner.lock().unwrap().phase
    }

    /// Width of the most recently kicked-off phase (workers beyond this
    /// index are parked-in-phase: they wake, see `thread_idx >= active`,
    /// and signal completion without touching the kernel).
    pub fn active_workers(&self) -> usize {
        self.monitor.inner.lock().unwrap().num_active_workers
    }

    /// Publish a new phase: every allocated worker's payload is updated
    /// to `node`/`active`, the phase counter ticks, and workers are
    /// woken. The calling thread then immediately runs its own share
    /// (it is worker 0) before returning — `kickoff` does not wait for
    /// the other workers; call [`ThreadPool::barrier`] for that.
    pub fn kickoff(&self, node: Arc<dyn TensorNode>, active: usize) {
        assert!(active >= 1 && active <= self.monitor.num_allocated_workers);
        let my_thread_num = {
            let mut inner = self.monitor.inner.lock().unwrap();
            inner.num_active_workers = active;
            for payload in inner.payloads.iter_mut() {
                payload.node = Some(node.clone());
                payload.thread_num = active;
            }
            inner.phase += 1;
            inner.num_completed = 0;
            tp_trace!("kickoff phase={} active={}", inner.phase, active);
            active
        };
        self.monitor.cv.notify_all();
        run_and_signal(&self.monitor, 0, Some(node), my_thread_num);
    }

    /// Block until every allocated worker has signaled completion of
    /// the current phase.
    pub fn barrier(&self) {
        let mut inner = self.monitor.inner.lock().unwrap();
        while inner.num_completed < self.monitor.num_allocated_workers {
            inner = self.monitor.cv.wait(inner).unwrap();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        {
            let mut inner = self.monitor.inner.lock().unwrap();
            inner.interrupt = true;
            inner.phase += 1;
        }
        self.monitor.cv.notify_all();
        while self.monitor.num_workers_online.load(Ordering::Acquire) > 0 {
            thread::yield_now();
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        tp_debug!("pool torn down");
    }
}

fn run_and_signal(
    monitor: &Monitor,
    thread_idx: usize,
    node: Option<Arc<dyn TensorNode>>,
    thread_num: usize,
) {
    let payload = ComputePayload { node, thread_idx, thread_num };
    if payload.is_active() {
        let op: Op = payload.node.as_deref().expect("is_active implies a node").op();
        monitor.registry.dispatch(op, &payload);
    }
    let mut inner = monitor.inner.lock().unwrap();
    inner.payloads[thread_idx].node = None;
    inner.num_completed += 1;
    if inner.num_completed == monitor.num_allocated_workers {
        monitor.cv.notify_all();
    }
}

fn worker_loop(monitor: Arc<Monitor>, thread_idx: usize) {
    monitor.num_workers_online.fetch_add(1, Ordering::AcqRel);
    let mut my_phase: u64 = 0;

    loop {
        let (node, thread_num) = {
            let mut inner = monitor.inner.lock().unwrap();
            while !inner.interrupt && inner.phase == my_phase {
                inner = monitor.cv.wait(inner).unwrap();
            }
            if inner.interrupt {
                break;
            }
            my_phase = inner.phase;
            let payload = &inner.payloads[thread_idx];
            (payload.node.clone(), payload.thread_num)
        };
        run_and_signal(&monitor, thread_idx, node, thread_num);
    }

    monitor.num_workers_online.fetch_sub(1, Ordering::AcqRel);
}
