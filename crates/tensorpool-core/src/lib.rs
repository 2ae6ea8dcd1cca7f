//! Platform-agnostic types shared between the tensorpool runtime and its
//! public facade: the opcode enumeration, compute payload, tensor node
//! contract, CPU feature probing, error types, logging and env helpers.

pub mod constants;
pub mod env;
pub mod error;
pub mod feature;
pub mod log;
pub mod node;
pub mod op;
pub mod payload;

pub use error::{PoolError, PoolResult};
pub use feature::{cpu_model_string, CpuFeature};
pub use node::{TensorNode, VecTensorNode};
pub use op::Op;
pub use payload::ComputePayload;
