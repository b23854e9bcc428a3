//! Splits an estimate into per-party totals and decides whether repairing is worth it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{
    AllocationTotal, Estimate, EstimateAllocation, EstimateId, InsuranceCoverage,
    PreliminaryDecision, Recommendation, Responsibility,
};

#[derive(Debug, Clone, Copy, Default)]
struct Share {
    labour: Decimal,
    material: Decimal,
}

impl Share {
    fn total(&self) -> Option<Decimal> {
        self.labour.checked_add(self.material)
    }

    fn add(&mut self, labour: Decimal, material: Decimal) -> Option<()> {
        self.labour = self.labour.checked_add(labour)?;
        self.material = self.material.checked_add(material)?;
        Some(())
    }
}

/// Estimate amounts whose products or sums leave the decimal range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("amounts on estimate {estimate_number} are too large to total")]
pub struct AmountOverflow {
    pub estimate_number: String,
}

/// Allocate `estimate` across responsible parties.
///
/// `coverage` is the insurance the lessee holds for the unit, if any. Insurance lines beyond
/// what it pays are billed to the customer instead.
pub fn allocate(
    id: EstimateId,
    estimate: &Estimate,
    coverage: Option<&InsuranceCoverage>,
) -> Result<EstimateAllocation, AmountOverflow> {
    let overflow = || AmountOverflow {
        estimate_number: estimate.estimate_number.clone(),
    };

    let mut shares: BTreeMap<Responsibility, Share> = BTreeMap::new();
    for line in &estimate.line_items {
        let labour = line.labour_cost(estimate.labour_rate).ok_or_else(overflow)?;
        let material = line.material_cost().ok_or_else(overflow)?;
        shares
            .entry(line.responsibility)
            .or_default()
            .add(labour, material)
            .ok_or_else(overflow)?;
    }

    let total = shares
        .values()
        .try_fold(Decimal::ZERO, |sum, share| sum.checked_add(share.total()?))
        .ok_or_else(overflow)?;
    let decision = preliminary_decision(total, estimate.depreciated_value);

    if let Some(coverage) = coverage {
        apply_coverage(&mut shares, coverage, decision.recommendation).ok_or_else(overflow)?;
    }

    let mut allocations = Vec::with_capacity(shares.len());
    for (party_type, share) in shares {
        let share_total = share.total().ok_or_else(overflow)?;
        if share_total.is_zero() {
            continue;
        }
        allocations.push(AllocationTotal {
            party_type,
            labour: share.labour,
            material: share.material,
            total: share_total,
        });
    }

    Ok(EstimateAllocation {
        id,
        estimate_number: estimate.estimate_number.clone(),
        revision: estimate.revision,
        currency: estimate.currency.clone(),
        allocations,
        total,
        preliminary_decision: Some(decision),
    })
}

fn preliminary_decision(total: Decimal, depreciated_value: Option<Decimal>) -> PreliminaryDecision {
    match depreciated_value {
        Some(value) if total > value => PreliminaryDecision {
            recommendation: Recommendation::Ctl,
            reason: Some(format!(
                "repair total {total} exceeds the depreciated value {value}"
            )),
        },
        Some(value) => PreliminaryDecision {
            recommendation: Recommendation::Fix,
            reason: Some(format!(
                "repair total {total} is within the depreciated value {value}"
            )),
        },
        None => PreliminaryDecision {
            recommendation: Recommendation::Fix,
            reason: Some("no depreciated value provided".to_string()),
        },
    }
}

fn apply_coverage(
    shares: &mut BTreeMap<Responsibility, Share>,
    coverage: &InsuranceCoverage,
    recommendation: Recommendation,
) -> Option<()> {
    let Some(insured) = shares.get(&Responsibility::Insurance).copied() else {
        return Some(());
    };
    let damage = insured.total()?;
    if damage.is_zero() {
        return Some(());
    }

    let covers_ctl = coverage.applies_to_ctl.unwrap_or(false);
    let covered = if recommendation == Recommendation::Ctl && !covers_ctl {
        Decimal::ZERO
    } else {
        coverage.covered_portion(damage)
    };
    if covered == damage {
        return Some(());
    }

    let labour = insured
        .labour
        .checked_mul(covered)?
        .checked_div(damage)?
        .round_dp(2);
    let kept = Share {
        labour,
        material: covered.checked_sub(labour)?,
    };
    shares.insert(Responsibility::Insurance, kept);

    shares.entry(Responsibility::Customer).or_default().add(
        insured.labour.checked_sub(kept.labour)?,
        insured.material.checked_sub(kept.material)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EstimateLineItem, EstimateLineItemPart, Party};
    use chrono::DateTime;

    fn line(number: u32, hours: i64, material: i64, responsibility: Responsibility) -> EstimateLineItem {
        EstimateLineItem {
            line_number: number,
            damage_location_code: "DB1N".into(),
            component_code: "PAA".into(),
            damage_code: "CU".into(),
            repair_code: "RP".into(),
            length: None,
            width: None,
            quantity: None,
            hours: Decimal::from(hours),
            material: Some(Decimal::from(material)),
            responsibility,
            comments: None,
            parts: Vec::new(),
            photos: Vec::new(),
        }
    }

    fn estimate(lines: Vec<EstimateLineItem>, depreciated: Option<i64>) -> Estimate {
        Estimate {
            estimate_number: "DEHAMCE1856373".into(),
            revision: 0,
            depot: Party::reference("DEHAMCMRA"),
            customer: None,
            owner: None,
            unit_number: "CONU1234561".into(),
            equipment: Some("22G1".into()),
            estimate_time: DateTime::parse_from_rfc3339("2024-03-01T10:00:00+01:00")
                .expect("valid time"),
            currency: "EUR".into(),
            labour_rate: Decimal::from(40),
            depreciated_value: depreciated.map(Decimal::from),
            comments: None,
            line_items: lines,
            photos: Vec::new(),
        }
    }

    #[test]
    fn totals_labour_and_material_per_party() {
        let mut owner_line = line(1, 2, 30, Responsibility::Owner);
        owner_line.quantity = Some(2);
        owner_line.parts.push(EstimateLineItemPart {
            description: Some("door gasket".into()),
            number: "108106".into(),
            quantity: 2,
            price: Decimal::new(550, 2),
        });
        let customer_line = line(2, 1, 10, Responsibility::Customer);

        let allocation = allocate(EstimateId(3), &estimate(vec![owner_line, customer_line], None), None)
            .expect("allocates");

        assert_eq!(allocation.id, EstimateId(3));
        assert_eq!(allocation.allocations.len(), 2);
        assert_eq!(allocation.allocations[0].party_type, Responsibility::Owner);
        assert_eq!(allocation.allocations[0].labour, Decimal::from(160));
        assert_eq!(allocation.allocations[0].material, Decimal::from(41));
        assert_eq!(allocation.total_for(Responsibility::Customer), Decimal::from(50));
        assert_eq!(allocation.total, Decimal::from(251));
        let decision = allocation.preliminary_decision.expect("decision");
        assert_eq!(decision.recommendation, Recommendation::Fix);
    }

    #[test]
    fn recommends_ctl_when_repair_exceeds_depreciated_value() {
        let lines = vec![line(1, 10, 600, Responsibility::Customer)];
        let allocation = allocate(EstimateId(1), &estimate(lines, Some(900)), None)
            .expect("allocates");
        let decision = allocation.preliminary_decision.expect("decision");
        assert_eq!(decision.recommendation, Recommendation::Ctl);
        assert_eq!(allocation.total, Decimal::from(1000));
    }

    #[test]
    fn insurance_share_is_capped_by_coverage() {
        let coverage = InsuranceCoverage {
            amount_covered: Some(Decimal::from(300)),
            amount_currency: Some("EUR".into()),
            all_or_nothing: Some(false),
            ..InsuranceCoverage::default()
        };
        let lines = vec![line(1, 5, 200, Responsibility::Insurance)];
        let allocation = allocate(EstimateId(1), &estimate(lines, None), Some(&coverage))
            .expect("allocates");

        assert_eq!(allocation.total_for(Responsibility::Insurance), Decimal::from(300));
        assert_eq!(allocation.total_for(Responsibility::Customer), Decimal::from(100));
        assert_eq!(allocation.total, Decimal::from(400));
    }

    #[test]
    fn all_or_nothing_coverage_moves_everything_to_the_customer() {
        let coverage = InsuranceCoverage {
            amount_covered: Some(Decimal::from(300)),
            all_or_nothing: Some(true),
            ..InsuranceCoverage::default()
        };
        let lines = vec![line(1, 5, 200, Responsibility::Insurance)];
        let allocation = allocate(EstimateId(1), &estimate(lines, None), Some(&coverage))
            .expect("allocates");

        assert_eq!(allocation.total_for(Responsibility::Insurance), Decimal::ZERO);
        assert!(allocation
            .allocations
            .iter()
            .all(|entry| entry.party_type != Responsibility::Insurance));
        assert_eq!(allocation.total_for(Responsibility::Customer), Decimal::from(400));
    }

    #[test]
    fn coverage_without_ctl_applies_nothing_to_a_total_loss() {
        let coverage = InsuranceCoverage {
            amount_covered: Some(Decimal::from(5000)),
            applies_to_ctl: Some(false),
            ..InsuranceCoverage::default()
        };
        let lines = vec![line(1, 5, 200, Responsibility::Insurance)];
        let allocation = allocate(EstimateId(1), &estimate(lines, Some(100)), Some(&coverage))
            .expect("allocates");

        assert_eq!(allocation.total_for(Responsibility::Customer), Decimal::from(400));
    }

    #[test]
    fn oversized_amounts_are_reported_instead_of_overflowing() {
        let mut huge = line(1, 1, 0, Responsibility::Customer);
        huge.hours = Decimal::MAX;

        let err = allocate(EstimateId(1), &estimate(vec![huge], None), None)
            .expect_err("labour leaves the decimal range");

        assert_eq!(err.estimate_number, "DEHAMCE1856373");
    }

    #[test]
    fn overflowing_part_totals_are_reported() {
        let mut repair = line(1, 0, 1, Responsibility::Owner);
        repair.parts.push(EstimateLineItemPart {
            description: None,
            number: "108106".into(),
            quantity: 10,
            price: Decimal::MAX,
        });

        assert!(allocate(EstimateId(1), &estimate(vec![repair], None), None).is_err());
    }
}
