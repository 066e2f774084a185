use std::collections::HashSet;

use crate::model::TransactionRecord;

/// Flags addresses that sit on both sides of one transaction. Such an address
/// is receiving its own change (or round-tripping) and is never a counterparty.
#[derive(Debug, Clone)]
pub struct ChangeDetector<'a> {
    input_addresses: HashSet<&'a str>,
    output_addresses: HashSet<&'a str>,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(tx: &'a TransactionRecord) -> Self {
        Self {
            input_addresses: tx.input_addresses(),
            output_addresses: tx.output_addresses(),
        }
    }

    /// Output address that also funds the transaction
    pub fn is_change_output(
        &self,
        address: &str,
    ) -> bool {
        is_self_referential(&self.input_addresses, address)
    }

    /// Input address that also receives from the transaction
    pub fn is_round_trip_input(
        &self,
        address: &str,
    ) -> bool {
        is_self_referential(&self.output_addresses, address)
    }
}

/// Whether `candidate` appears among the addresses of the opposite side
pub fn is_self_referential(
    opposite_side: &HashSet<&str>,
    candidate: &str,
) -> bool {
    opposite_side.contains(candidate)
}
