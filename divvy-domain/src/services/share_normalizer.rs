use crate::{
    context::ItemizedShares,
    model::{Expense, Item, Money, OwedShares, ParticipantId, SplitMode},
};

/// Turns any split mode into a concrete list of owed amounts.
pub struct ShareNormalizer;

impl ShareNormalizer {
    /// Returns `None` for an expense that is not split among anyone; such an
    /// expense contributes nothing to any balance.
    pub fn normalize(&self, expense: &Expense, itemized: ItemizedShares) -> Option<OwedShares> {
        if expense.split_among.is_empty() {
            return None;
        }

        let shares = match &expense.split {
            SplitMode::Unequal(shares) => shares
                .iter()
                .map(|(id, owed)| (id.clone(), *owed))
                .collect(),
            SplitMode::Percentage(percentages) => percentages
                .iter()
                .map(|(id, percent)| (id.clone(), expense.amount.percent(*percent)))
                .collect(),
            SplitMode::Itemized(items) if itemized == ItemizedShares::PerItem => {
                Self::item_shares(items)
            }
            SplitMode::Equal | SplitMode::Itemized(_) => {
                Self::even_shares(expense.amount, &expense.split_among)
            }
        };

        Some(shares)
    }

    fn even_shares(amount: Money, members: &[ParticipantId]) -> OwedShares {
        let Some(per_person) = amount.split_evenly(members.len()) else {
            return OwedShares::default();
        };
        members
            .iter()
            .map(|member| (member.clone(), per_person))
            .collect()
    }

    // Items nobody is attached to are left unassigned.
    fn item_shares(items: &[Item]) -> OwedShares {
        let mut shares = OwedShares::default();
        for item in items {
            let Some(share) = item.amount.split_evenly(item.participants.len()) else {
                continue;
            };
            for participant in &item.participants {
                shares.push(participant.clone(), share);
            }
        }
        shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Percentages, Shares};
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn normalizer() -> ShareNormalizer {
        ShareNormalizer
    }

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|name| ParticipantId::from(*name)).collect()
    }

    fn owed(shares: &OwedShares) -> Vec<(&str, Money)> {
        shares.iter().map(|(id, owed)| (id.as_str(), owed)).collect()
    }

    #[rstest]
    fn empty_split_is_skipped(normalizer: ShareNormalizer) {
        let expense = Expense::new("A".into(), Money::from_i64(50), Vec::new());
        assert_eq!(normalizer.normalize(&expense, ItemizedShares::Even), None);
    }

    #[rstest]
    fn empty_split_is_skipped_even_with_exact_shares(normalizer: ShareNormalizer) {
        let expense = Expense::new("A".into(), Money::from_i64(50), Vec::new()).with_split(
            SplitMode::Unequal(Shares::from_iter([("B".into(), Money::from_i64(50))])),
        );
        assert_eq!(normalizer.normalize(&expense, ItemizedShares::Even), None);
    }

    #[rstest]
    fn equal_split_divides_amount(normalizer: ShareNormalizer) {
        let expense = Expense::new("A".into(), Money::from_i64(90), ids(&["A", "B", "C"]));
        let shares = normalizer
            .normalize(&expense, ItemizedShares::Even)
            .expect("split among three");
        assert_eq!(
            owed(&shares),
            vec![
                ("A", Money::from_i64(30)),
                ("B", Money::from_i64(30)),
                ("C", Money::from_i64(30)),
            ]
        );
    }

    #[rstest]
    fn unequal_split_uses_given_amounts(normalizer: ShareNormalizer) {
        let expense = Expense::new("A".into(), Money::from_i64(100), ids(&["A", "B"])).with_split(
            SplitMode::Unequal(Shares::from_iter([
                ("A".into(), Money::from_i64(20)),
                ("B".into(), Money::from_i64(80)),
            ])),
        );
        let shares = normalizer
            .normalize(&expense, ItemizedShares::Even)
            .expect("split among two");
        assert_eq!(
            owed(&shares),
            vec![("A", Money::from_i64(20)), ("B", Money::from_i64(80))]
        );
    }

    #[rstest]
    fn percentage_split_converts_to_amounts(normalizer: ShareNormalizer) {
        let expense = Expense::new("A".into(), Money::from_i64(200), ids(&["A", "B"])).with_split(
            SplitMode::Percentage(Percentages::from_iter([
                ("A".into(), dec!(25)),
                ("B".into(), dec!(75)),
            ])),
        );
        let shares = normalizer
            .normalize(&expense, ItemizedShares::Even)
            .expect("split among two");
        assert_eq!(
            owed(&shares),
            vec![("A", Money::from_i64(50)), ("B", Money::from_i64(150))]
        );
    }

    fn itemized_dinner() -> Expense {
        Expense::new("A".into(), Money::from_i64(90), ids(&["A", "B", "C"])).with_split(
            SplitMode::Itemized(vec![
                Item {
                    name: "Main Course".to_owned(),
                    amount: Money::from_i64(60),
                    participants: ids(&["A", "B"]),
                },
                Item {
                    name: "Beverages".to_owned(),
                    amount: Money::from_i64(30),
                    participants: ids(&["C"]),
                },
            ]),
        )
    }

    #[rstest]
    fn itemized_defaults_to_even_split(normalizer: ShareNormalizer) {
        let shares = normalizer
            .normalize(&itemized_dinner(), ItemizedShares::Even)
            .expect("split among three");
        assert_eq!(shares.total(), Money::from_i64(90));
        assert!(shares.iter().all(|(_, owed)| owed == Money::from_i64(30)));
    }

    #[rstest]
    fn itemized_per_item_follows_item_participants(normalizer: ShareNormalizer) {
        let shares = normalizer
            .normalize(&itemized_dinner(), ItemizedShares::PerItem)
            .expect("split among three");
        assert_eq!(
            owed(&shares),
            vec![
                ("A", Money::from_i64(30)),
                ("B", Money::from_i64(30)),
                ("C", Money::from_i64(30)),
            ]
        );
    }

    #[rstest]
    fn unattached_items_are_unassigned(normalizer: ShareNormalizer) {
        let expense = Expense::new("A".into(), Money::from_i64(50), ids(&["A"])).with_split(
            SplitMode::Itemized(vec![Item {
                name: "Extras".to_owned(),
                amount: Money::from_i64(50),
                participants: Vec::new(),
            }]),
        );
        let shares = normalizer
            .normalize(&expense, ItemizedShares::PerItem)
            .expect("split among one");
        assert!(shares.is_empty());
    }
}
