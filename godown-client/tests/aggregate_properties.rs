//! Property-based tests for the analytics aggregation.

use godown_client::analytics::{
    compute_capacity_series, compute_product_movement, compute_returns_summary, count_roles,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::models::{Employee, Godown, InwardRecord, OutwardRecord, ReturnRecord, Role};
use std::collections::HashSet;

fn role_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Clerk", "Manager", "Driver", "Loader", "clerk", "Accountant"])
        .prop_map(str::to_string)
}

fn product_name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Rice", "Wheat", "Dal", "Sugar", "Salt", "rice"]).prop_map(str::to_string)
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000, 0u32..3).prop_map(|(value, scale)| Decimal::new(value, scale))
}

fn outwards_strategy() -> impl Strategy<Value = Vec<OutwardRecord>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["Pune", "Nashik", "Nagpur"]),
            quantity_strategy(),
            product_name_strategy(),
            quantity_strategy(),
        )
            .prop_map(|(location, capacity, product, quantity)| {
                OutwardRecord::new(Godown::new(location, capacity), product, quantity)
            }),
        0..30,
    )
}

fn inwards_strategy() -> impl Strategy<Value = Vec<InwardRecord>> {
    prop::collection::vec(
        (product_name_strategy(), quantity_strategy())
            .prop_map(|(product, quantity)| InwardRecord::new(product, quantity)),
        0..30,
    )
}

fn returns_strategy() -> impl Strategy<Value = Vec<ReturnRecord>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["cancelled", "damaged", "lost", "Damaged"]),
            quantity_strategy(),
        )
            .prop_map(|(reason, quantity)| ReturnRecord::new(reason, quantity)),
        0..40,
    )
}

// Property: one role count per known role, each an exact tally
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn role_counts_cover_every_role(
        roles in prop::collection::vec(role_name_strategy(), 0..6),
        holders in prop::collection::vec(role_name_strategy(), 0..40),
    ) {
        let roles: Vec<Role> = roles.into_iter().map(Role::new).collect();
        let employees: Vec<Employee> = holders.iter().map(|r| Employee::new("e", r.as_str())).collect();

        let series = count_roles(&employees, &roles);
        prop_assert_eq!(series.len(), roles.len());
        for (entry, role) in series.entries.iter().zip(&roles) {
            prop_assert_eq!(&entry.label, &role.name);
            let expected = employees.iter().filter(|e| e.role.name == role.name).count();
            prop_assert_eq!(entry.count, expected);
        }
    }
}

// Property: product totals stay aligned to one label list
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn product_totals_are_aligned(outwards in outwards_strategy(), inwards in inwards_strategy()) {
        let series = compute_product_movement(&outwards, &inwards).unwrap();

        prop_assert_eq!(series.outward_totals.len(), series.labels.len());
        prop_assert_eq!(series.inward_totals.len(), series.labels.len());

        let distinct: HashSet<&str> = outwards
            .iter()
            .map(|r| r.product.name.as_str())
            .chain(inwards.iter().map(|r| r.product.name.as_str()))
            .collect();
        prop_assert!(series.labels.len() >= distinct.len());

        for row in series.rows() {
            let outward: Decimal = outwards
                .iter()
                .filter(|r| r.product.name == row.label)
                .map(|r| r.quantity)
                .sum();
            let inward: Decimal = inwards
                .iter()
                .filter(|r| r.product.name == row.label)
                .map(|r| r.quantity)
                .sum();
            prop_assert_eq!(row.outward_total, outward);
            prop_assert_eq!(row.inward_total, inward);
        }
    }

    #[test]
    fn capacity_has_one_bar_per_outward(outwards in outwards_strategy()) {
        let series = compute_capacity_series(&outwards);
        prop_assert_eq!(series.len(), outwards.len());
        prop_assert_eq!(&series.inwards, &series.outwards);
    }
}

// Property: returns do not depend on record order
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn returns_summary_is_order_independent(
        (returns, shuffled) in returns_strategy()
            .prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle()))
    ) {
        prop_assert_eq!(compute_returns_summary(&returns), compute_returns_summary(&shuffled));
    }
}

// Property: recomputing over unchanged snapshots gives equal output
proptest! {
    #[test]
    fn recompute_is_idempotent(
        outwards in outwards_strategy(),
        inwards in inwards_strategy(),
        returns in returns_strategy(),
    ) {
        prop_assert_eq!(
            compute_product_movement(&outwards, &inwards),
            compute_product_movement(&outwards, &inwards)
        );
        prop_assert_eq!(compute_capacity_series(&outwards), compute_capacity_series(&outwards));
        prop_assert_eq!(compute_returns_summary(&returns), compute_returns_summary(&returns));
    }
}
