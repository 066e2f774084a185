use crate::engine::change::ChangeDetector;
use crate::error::FlowError;
use crate::model::CandidateRole;
use crate::model::CounterpartyCandidate;
use crate::model::Direction;
use crate::model::FlowContribution;
use crate::model::NetEffect;
use crate::model::TransactionRecord;
use crate::model::TxEntry;

/// Eligible counterparties for a transaction of the given direction, one per
/// distinct address with its entry values summed, in first-occurrence order.
///
/// Incoming transactions look at inputs, outgoing ones at outputs. The queried
/// address, unaddressed entries and self-referential addresses are excluded.
pub fn counterparty_candidates(
    tx: &TransactionRecord,
    address: &str,
    direction: Direction,
) -> Vec<CounterpartyCandidate> {
    let detector = ChangeDetector::new(tx);
    let (entries, role): (&[TxEntry], CandidateRole) = match direction {
        Direction::Incoming => (&tx.inputs, CandidateRole::Input),
        Direction::Outgoing => (&tx.outputs, CandidateRole::Output),
    };

    let mut candidates: Vec<CounterpartyCandidate> = Vec::new();
    for entry in entries {
        let Some(candidate) = entry.address.as_deref() else {
            continue;
        };
        if candidate == address {
            continue;
        }
        let self_referential = match role {
            CandidateRole::Input => detector.is_round_trip_input(candidate),
            CandidateRole::Output => detector.is_change_output(candidate),
        };
        if self_referential {
            continue;
        }

        match candidates.iter_mut().find(|c| c.address == candidate) {
            Some(existing) => existing.value = existing.value.saturating_add(entry.value),
            None => candidates.push(CounterpartyCandidate {
                address: candidate.to_string(),
                value: entry.value,
                role,
            }),
        }
    }
    candidates
}

/// Picks the single most significant counterparty of a significant transaction.
///
/// The largest summed value wins; ties go to the earliest candidate in record
/// order. The attributed amount is `|net effect|`, not the candidate's value.
/// Only one counterparty is reported even when several comparable ones exist.
pub fn resolve_primary_counterparty(
    tx: &TransactionRecord,
    effect: &NetEffect,
    address: &str,
) -> Result<FlowContribution, FlowError> {
    let no_counterparty = || FlowError::NoResolvableCounterparty { txid: tx.id.clone() };
    let direction = effect.direction().ok_or_else(no_counterparty)?;

    let mut best: Option<CounterpartyCandidate> = None;
    for candidate in counterparty_candidates(tx, address, direction) {
        // strictly greater keeps the first occurrence on ties
        if best.as_ref().is_none_or(|current| candidate.value > current.value) {
            best = Some(candidate);
        }
    }
    let primary = best.ok_or_else(no_counterparty)?;

    Ok(FlowContribution {
        transaction_id: effect.transaction_id.clone(),
        counterparty: primary.address,
        direction,
        amount_satoshis: effect.magnitude(),
    })
}
