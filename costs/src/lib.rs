#![deny(missing_docs)]
//! Cost accounting for snapshot Merkle tree operations.
//!
//! Every operation that runs the hash combinator returns its result wrapped
//! in a [`CostContext`], so callers can tell how much hashing and node-store
//! traffic an insertion, a proof or a verification actually caused.

mod context;

use std::ops::{Add, AddAssign};

pub use context::{CostContext, CostResult, CostsExt};

/// Resources consumed by a single tree operation.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many times the two-to-one hash combinator was invoked.
    pub hash_node_calls: u32,
    /// How many node digests were looked up in the sparse node store,
    /// whether they resolved to a stored entry or to a zero hash.
    pub node_reads: u32,
    /// How many node digests were committed to the sparse node store.
    pub node_writes: u32,
}

impl OperationCost {
    /// Cost consisting of `hash_node_calls` combinator invocations only.
    pub fn with_hash_node_calls(hash_node_calls: u32) -> Self {
        OperationCost {
            hash_node_calls,
            ..Default::default()
        }
    }

    /// Cost consisting of `node_reads` node-store lookups only.
    pub fn with_node_reads(node_reads: u32) -> Self {
        OperationCost {
            node_reads,
            ..Default::default()
        }
    }

    /// Cost consisting of `node_writes` node-store writes only.
    pub fn with_node_writes(node_writes: u32) -> Self {
        OperationCost {
            node_writes,
            ..Default::default()
        }
    }

    /// `true` if nothing was spent.
    pub fn is_zero(&self) -> bool {
        *self == OperationCost::default()
    }
}

impl Add for OperationCost {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hash_node_calls += rhs.hash_node_calls;
        self.node_reads += rhs.node_reads;
        self.node_writes += rhs.node_writes;
    }
}

/// Early-return helper for functions returning [`CostResult`].
///
/// Evaluates a `CostResult`, adds its cost to the accumulator named by
/// `$cost` and yields the `Ok` value. On `Err` the function returns at once,
/// carrying every cost accumulated so far.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

/// Same as [`cost_return_on_error`] but for a plain `Result`: no cost is
/// added, the already accumulated `$cost` is returned on error.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( &$cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashing_twice() -> CostResult<u32, &'static str> {
        Ok(2).wrap_with_cost(OperationCost::with_hash_node_calls(2))
    }

    fn failing_read() -> CostResult<u32, &'static str> {
        Err("missing").wrap_with_cost(OperationCost::with_node_reads(1))
    }

    fn chained(fail: bool) -> CostResult<u32, &'static str> {
        let mut cost = OperationCost::with_node_writes(3);
        let a = cost_return_on_error!(&mut cost, hashing_twice());
        if fail {
            cost_return_on_error!(&mut cost, failing_read());
        }
        let b = cost_return_on_error_no_add!(&cost, Ok::<_, &'static str>(a * 10));
        Ok(a + b).wrap_with_cost(cost)
    }

    #[test]
    fn test_add_assign_sums_every_field() {
        let mut cost = OperationCost {
            hash_node_calls: 1,
            node_reads: 2,
            node_writes: 3,
        };
        cost += OperationCost {
            hash_node_calls: 10,
            node_reads: 20,
            node_writes: 30,
        };
        assert_eq!(
            cost,
            OperationCost {
                hash_node_calls: 11,
                node_reads: 22,
                node_writes: 33,
            }
        );
        assert_eq!(
            OperationCost::with_node_reads(4) + OperationCost::with_node_writes(5),
            OperationCost {
                node_reads: 4,
                node_writes: 5,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_macro_accumulates_on_success() {
        let ctx = chained(false);
        assert_eq!(ctx.value, Ok(22));
        assert_eq!(
            ctx.cost,
            OperationCost {
                hash_node_calls: 2,
                node_writes: 3,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_macro_keeps_cost_on_early_return() {
        let ctx = chained(true);
        assert_eq!(ctx.value, Err("missing"));
        assert_eq!(
            ctx.cost,
            OperationCost {
                hash_node_calls: 2,
                node_reads: 1,
                node_writes: 3,
            }
        );
    }

    #[test]
    fn test_is_zero() {
        assert!(OperationCost::default().is_zero());
        assert!(!OperationCost::with_hash_node_calls(1).is_zero());
    }
}
