use crate::error::FlowError;
use crate::model::NetEffect;
use crate::model::TransactionRecord;
use crate::model::TxEntry;

/// `sum(outputs to address) - sum(inputs from address)`.
///
/// Entries without an address never match. Fails only when the delta does not
/// fit in an `i64`, which no well-formed transaction can produce.
pub fn compute_net_effect(
    tx: &TransactionRecord,
    address: &str,
) -> Result<NetEffect, FlowError> {
    let received = matched_total(&tx.outputs, address);
    let spent = matched_total(&tx.inputs, address);
    let net = received as i128 - spent as i128;

    let net_satoshis = i64::try_from(net).map_err(|_| FlowError::MalformedTransaction {
        txid: tx.id.clone(),
        reason: format!("net effect {} exceeds the signed 64-bit range", net),
    })?;

    Ok(NetEffect {
        transaction_id: tx.id.clone(),
        net_satoshis,
    })
}

fn matched_total(
    entries: &[TxEntry],
    address: &str,
) -> u128 {
    entries
        .iter()
        .filter(|entry| entry.is_address(address))
        .map(|entry| entry.value as u128)
        .sum()
}
