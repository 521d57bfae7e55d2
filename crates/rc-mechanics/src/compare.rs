//! Ordering of resolved rolls.
//!
//! Two rolls tie when they land in the same band and their net values are
//! within the tie threshold of each other. Otherwise the higher band wins,
//! and inside one band the higher net value wins. The tie window is not
//! transitive (A ties B and B ties C does not imply A ties C), so rolls are
//! never handed to the standard library's sorts, which require a total
//! order. [`sort_descending`] is a stable insertion sort driven only by
//! [`is_less`].

use std::cmp::Ordering;

use crate::roll::Resolution;

/// Default tie threshold.
pub const TIE_THRESHOLD: i32 = 5;

/// Same band and net values no more than `threshold` apart.
pub fn ties(a: &Resolution, b: &Resolution, threshold: i32) -> bool {
    a.ordinal == b.ordinal && (a.net - b.net).abs() <= threshold
}

/// Strictly lower: a lower band, or the same band and more than
/// `threshold` below.
pub fn is_less(a: &Resolution, b: &Resolution, threshold: i32) -> bool {
    if a.ordinal == b.ordinal {
        a.net + threshold < b.net
    } else {
        a.ordinal < b.ordinal
    }
}

/// Three-way comparison built from [`ties`] and band/net order.
pub fn compare(a: &Resolution, b: &Resolution, threshold: i32) -> Ordering {
    if a.ordinal != b.ordinal {
        a.ordinal.cmp(&b.ordinal)
    } else if ties(a, b, threshold) {
        Ordering::Equal
    } else {
        a.net.cmp(&b.net)
    }
}

/// Sort highest first, keeping the input order of items that are not strictly ordered.
pub fn sort_descending<T>(items: &mut [T], threshold: i32, key: impl Fn(&T) -> &Resolution) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && is_less(key(&items[j - 1]), key(&items[j]), threshold) {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{DifficultyRating, Polarity, RollResultBand};
    use proptest::prelude::*;

    fn resolution(ordinal: usize, net: i32) -> Resolution {
        Resolution {
            raw: 50,
            stat_contribution: 0,
            skill_contribution: 0,
            extra_contribution: 0,
            difficulty: DifficultyRating::new("normal", 0),
            net,
            ordinal,
            band: RollResultBand {
                name: format!("band {ordinal}"),
                ceiling: None,
                polarity: Polarity::Success,
                template: String::new(),
            },
            natural: None,
            description: format!("{ordinal}/{net}"),
        }
    }

    #[test]
    fn tie_window_is_inclusive() {
        let a = resolution(2, 90);
        assert!(ties(&a, &resolution(2, 85), 5));
        assert!(ties(&a, &resolution(2, 95), 5));
        assert!(!ties(&a, &resolution(2, 84), 5));
        assert_eq!(compare(&a, &resolution(2, 85), 5), Ordering::Equal);
    }

    #[test]
    fn different_bands_never_tie() {
        let a = resolution(2, 40);
        let b = resolution(3, 41);
        assert!(!ties(&a, &b, 5));
        assert!(is_less(&a, &b, 5));
        assert_eq!(compare(&b, &a, 5), Ordering::Greater);
    }

    #[test]
    fn band_beats_net_value() {
        let low_band_high_net = resolution(1, 500);
        let high_band_low_net = resolution(2, -500);
        assert_eq!(
            compare(&low_band_high_net, &high_band_low_net, 5),
            Ordering::Less
        );
    }

    #[test]
    fn less_needs_more_than_threshold() {
        assert!(!is_less(&resolution(1, 85), &resolution(1, 90), 5));
        assert!(is_less(&resolution(1, 84), &resolution(1, 90), 5));
    }

    #[test]
    fn tie_is_not_transitive() {
        let a = resolution(1, 90);
        let b = resolution(1, 86);
        let c = resolution(1, 82);
        assert!(ties(&a, &b, 5));
        assert!(ties(&b, &c, 5));
        assert!(!ties(&a, &c, 5));
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut items = vec![
            resolution(1, 50),
            resolution(2, 10),
            resolution(1, 52),
            resolution(0, 99),
        ];
        sort_descending(&mut items, 5, |r| r);
        let order: Vec<&str> = items.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, vec!["2/10", "1/50", "1/52", "0/99"]);
    }

    fn arb_resolution() -> impl Strategy<Value = Resolution> {
        (0usize..4, -100i32..200).prop_map(|(ordinal, net)| resolution(ordinal, net))
    }

    proptest! {
        #[test]
        fn ties_are_reflexive_and_symmetric(a in arb_resolution(), b in arb_resolution()) {
            prop_assert!(ties(&a, &a, 5));
            prop_assert_eq!(ties(&a, &b, 5), ties(&b, &a, 5));
        }

        #[test]
        fn compare_is_antisymmetric(a in arb_resolution(), b in arb_resolution()) {
            prop_assert_eq!(compare(&a, &b, 5), compare(&b, &a, 5).reverse());
        }

        #[test]
        fn less_and_tie_are_exclusive(a in arb_resolution(), b in arb_resolution()) {
            prop_assert!(!(ties(&a, &b, 5) && is_less(&a, &b, 5)));
        }

        #[test]
        fn resorting_keeps_order(items in proptest::collection::vec(arb_resolution(), 0..12)) {
            let mut once = items.clone();
            sort_descending(&mut once, 5, |r| r);
            let mut twice = once.clone();
            sort_descending(&mut twice, 5, |r| r);
            let a: Vec<(usize, i32)> = once.iter().map(|r| (r.ordinal, r.net)).collect();
            let b: Vec<(usize, i32)> = twice.iter().map(|r| (r.ordinal, r.net)).collect();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn sorted_has_no_adjacent_inversion(items in proptest::collection::vec(arb_resolution(), 0..12)) {
            let mut sorted = items;
            sort_descending(&mut sorted, 5, |r| r);
            for pair in sorted.windows(2) {
                prop_assert!(!is_less(&pair[0], &pair[1], 5));
            }
        }
    }
}
