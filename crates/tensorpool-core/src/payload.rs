//! The record each worker owns across one phase of the barrier.

use std::sync::Arc;

use crate::node::TensorNode;

/// What a worker needs to run its slice of the current operator.
///
/// `node` is `None` between operations (including for parked-in-phase
/// workers whose `thread_idx >= thread_num`) — a kernel call is skipped
/// entirely whenever it is `None`.
pub struct ComputePayload {
    pub node: Option<Arc<dyn TensorNode>>,
    pub thread_idx: usize,
    pub thread_num: usize,
}

impl ComputePayload {
    pub fn idle(thread_idx: usize) -> Self {
        Self { node: None, thread_idx, thread_num: 1 }
    }

    /// True when this worker should actually execute the kernel this
    /// phase (as opposed to merely observing it).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.node.is_some() && self.thread_idx < self.thread_num
    }
}
