//! Closed opcode enumeration and the payload every kernel receives.
//!
//! Dispatch is a table indexed by [`Op::as_index`], not a `dyn` call —
//! see the kernel registry in `tensorpool-runtime`.

use std::fmt;

/// A tensor operator. Adding a variant here and a matching registry slot
/// is the only change needed to support another op; the pool, barrier
/// and heuristic are all opcode-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Op {
    Add = 0,
    Mul = 1,
    Relu = 2,
    MatMul = 3,
}

impl Op {
    pub const COUNT: usize = 4;

    pub const ALL: [Op; Op::COUNT] = [Op::Add, Op::Mul, Op::Relu, Op::MatMul];

    #[inline]
    pub fn as_index(self) -> usize {
        self as u8 as usize
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Add => "add",
            Op::Mul => "mul",
            Op::Relu => "relu",
            Op::MatMul => "matmul",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_index_is_dense_and_unique() {
        let mut seen = [false; Op::COUNT];
        for op in Op::ALL {
            let idx = op.as_index();
            assert!(idx < Op::COUNT);
            assert!(!seen[idx], "duplicate index for {op}");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn display_is_lowercase_name() {
        assert_eq!(Op::MatMul.to_string(), "matmul");
    }
}
