use crate::constants::CONSOLIDATION_TOLERANCE_SATOSHIS;
use crate::constants::EXCHANGE_BATCH_ADDRESS_COUNT;
use crate::constants::HIGH_FEE_SATOSHIS;
use crate::constants::HIGH_OUTPUT_COUNT;
use crate::constants::MAX_RISK_SCORE;
use crate::constants::MIXING_OUTPUT_ADDRESS_COUNT;
use crate::model::TransactionCategory;
use crate::model::TransactionProfile;
use crate::model::TransactionRecord;

pub fn categorize(tx: &TransactionRecord) -> TransactionCategory {
    let distinct_inputs = tx.input_addresses().len();
    let distinct_outputs = tx.output_addresses().len();
    let input_value = tx.total_input_value().unwrap_or(u64::MAX);
    let output_value = tx.total_output_value().unwrap_or(u64::MAX);

    if distinct_outputs > MIXING_OUTPUT_ADDRESS_COUNT {
        TransactionCategory::MixingSuspicious
    } else if distinct_inputs > EXCHANGE_BATCH_ADDRESS_COUNT || distinct_outputs > EXCHANGE_BATCH_ADDRESS_COUNT {
        TransactionCategory::ExchangeBatch
    } else if tx.inputs.len() > 1 && input_value.abs_diff(output_value) < CONSOLIDATION_TOLERANCE_SATOSHIS {
        TransactionCategory::Consolidation
    } else if distinct_inputs == 1 && distinct_outputs == 2 {
        TransactionCategory::SimplePayment
    } else {
        TransactionCategory::Standard
    }
}

pub fn risk_score(
    tx: &TransactionRecord,
    category: TransactionCategory,
) -> u8 {
    let mut score = 0u8;
    if category == TransactionCategory::MixingSuspicious {
        score += 3;
    }
    if tx.outputs.len() > HIGH_OUTPUT_COUNT {
        score += 2;
    }
    if tx.fee() > HIGH_FEE_SATOSHIS {
        score += 1;
    }
    if !tx.is_confirmed() {
        score += 1;
    }
    score.min(MAX_RISK_SCORE)
}

pub fn profile(tx: &TransactionRecord) -> TransactionProfile {
    let category = categorize(tx);
    TransactionProfile {
        category,
        risk_score: risk_score(tx, category),
        fee_satoshis: tx.fee(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::confirmed;
    use crate::test_utils::fixtures::fan_out;
    use crate::test_utils::fixtures::tx;

    #[test]
    fn one_input_two_outputs_is_simple_payment() {
        let record = confirmed(tx("t", &[("Q", 100_000)], &[("Q", 1_000), ("C", 98_000)]));
        assert_eq!(categorize(&record), TransactionCategory::SimplePayment);
        assert_eq!(profile(&record).risk_score, 0);
        assert_eq!(profile(&record).fee_satoshis, 1_000);
    }

    #[test]
    fn many_inputs_into_one_output_is_consolidation() {
        let record = tx("t", &[("A", 10_000), ("B", 10_000), ("C", 10_000)], &[("A", 29_500)]);
        assert_eq!(categorize(&record), TransactionCategory::Consolidation);
    }

    #[test]
    fn wide_fan_out_is_batch_then_mixing() {
        assert_eq!(categorize(&fan_out("Q", 11, 1_000)), TransactionCategory::ExchangeBatch);
        assert_eq!(categorize(&fan_out("Q", 51, 1_000)), TransactionCategory::MixingSuspicious);
    }

    #[test]
    fn risk_accumulates_and_caps() {
        // mixing (+3), >20 outputs (+2), unconfirmed (+1), high fee (+1) => capped at 5
        let record = fan_out("Q", 60, 1_000).with_fee(200_000);
        assert_eq!(profile(&record).risk_score, MAX_RISK_SCORE);

        let batch = confirmed(fan_out("Q", 25, 1_000));
        assert_eq!(risk_score(&batch, TransactionCategory::ExchangeBatch), 2);
    }

    #[test]
    fn unconfirmed_adds_one() {
        let record = tx("t", &[("A", 10_000)], &[("B", 9_000)]);
        assert_eq!(profile(&record).risk_score, 1);
        assert_eq!(profile(&confirmed(record)).risk_score, 0);
    }
}
