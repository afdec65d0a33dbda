use assert_approx_eq::assert_approx_eq;
use cohort_metrics::{
    average_first_to_second_month_retention, build_cohort_table, build_retention_table,
    predict_next_period, OrderLoader, RawOrder, YearMonth,
};
use pretty_assertions::assert_eq;

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn sample_rows() -> Vec<Vec<String>> {
    // Three cohorts across the summer, one unparseable timestamp, one user
    // ("u2") retained into the month after their first order.
    let raw = [
        ("1", "u1", "06/02/2022", "30.0", "0.0"),
        ("2", "u1", "06/18/2022", "12.5", "1.5"),
        ("3", "u2", "06/25/2022", "44.0", "0.0"),
        ("4", "u2", "07/09/2022", "27.0", "0.0"),
        ("5", "u3", "07/04/2022", "19.0", "3.0"),
        ("6", "u3", "whenever", "55.0", "0.0"),
        ("7", "u4", "08/01/2022", "61.0", "0.0"),
    ];
    raw.iter()
        .map(|(order_id, user_id, created_at, basket, discount)| {
            vec![
                order_id.to_string(),
                user_id.to_string(),
                created_at.to_string(),
                basket.to_string(),
                discount.to_string(),
            ]
        })
        .collect()
}

const COLUMNS: [&str; 5] = ["order_id", "user_id", "created_at", "basket", "discount_cost"];

#[test]
fn test_full_pipeline_over_lenient_load() {
    let records = OrderLoader::from_fields(&COLUMNS, &sample_rows(), None).unwrap();
    assert_eq!(records.len(), 7);

    // One record failed inference and is excluded from aggregation.
    let aggregable = records.iter().filter(|r| r.year_month.is_some()).count();
    assert_eq!(aggregable, 6);

    let cohort_table = build_cohort_table(&records);
    assert_eq!(cohort_table.cohorts(), &[ym(2022, 6), ym(2022, 7), ym(2022, 8)]);
    assert_eq!(cohort_table.months(), &[ym(2022, 6), ym(2022, 7), ym(2022, 8)]);
    assert_eq!(cohort_table.total(), aggregable as u64);

    assert_eq!(cohort_table.get(ym(2022, 6), ym(2022, 6)), Some(3));
    assert_eq!(cohort_table.get(ym(2022, 6), ym(2022, 7)), Some(1));
    assert_eq!(cohort_table.get(ym(2022, 7), ym(2022, 7)), Some(1));
    assert_eq!(cohort_table.get(ym(2022, 8), ym(2022, 8)), Some(1));
    assert_eq!(cohort_table.get(ym(2022, 7), ym(2022, 6)), Some(0));

    let retention_table = build_retention_table(&records);
    assert_eq!(retention_table.periods(), &[0, 1]);
    assert_eq!(retention_table.get(ym(2022, 6), 0), Some(3.0));
    assert_eq!(retention_table.get(ym(2022, 6), 1), Some(1.0));
    assert_eq!(retention_table.get(ym(2022, 7), 1), Some(0.0));

    // Cohort ratios: June 1/3, July 0, August 0 → mean 1/9.
    let rate = average_first_to_second_month_retention(&retention_table);
    assert_approx_eq!(rate, 1.0 / 9.0);

    // July cohort had 1 first-month order; floor(1 * 1/9) = 0.
    assert_eq!(predict_next_period(&cohort_table, ym(2022, 7), rate), Some(0));

    // September is not in the data yet: no prediction, by design.
    assert_eq!(predict_next_period(&cohort_table, ym(2022, 9), rate), None);
}

#[test]
fn test_pipeline_is_idempotent() {
    let first = OrderLoader::from_fields(&COLUMNS, &sample_rows(), None).unwrap();
    let second = OrderLoader::from_fields(&COLUMNS, &sample_rows(), None).unwrap();
    assert_eq!(first, second);

    assert_eq!(build_cohort_table(&first), build_cohort_table(&second));
    assert_eq!(build_retention_table(&first), build_retention_table(&second));

    let rate_a = average_first_to_second_month_retention(&build_retention_table(&first));
    let rate_b = average_first_to_second_month_retention(&build_retention_table(&second));
    assert_eq!(rate_a, rate_b);
}

#[test]
fn test_input_order_does_not_change_matrices() {
    let mut reversed = sample_rows();
    reversed.reverse();

    let forward = OrderLoader::from_fields(&COLUMNS, &sample_rows(), None).unwrap();
    let backward = OrderLoader::from_fields(&COLUMNS, &reversed, None).unwrap();

    // Aggregation is an order-insensitive reduction.
    assert_eq!(build_cohort_table(&forward), build_cohort_table(&backward));
    assert_eq!(
        build_retention_table(&forward),
        build_retention_table(&backward)
    );
}

#[test]
fn test_cohort_never_postdates_order_month() {
    let records = OrderLoader::from_fields(&COLUMNS, &sample_rows(), None).unwrap();
    for record in &records {
        if let (Some(cohort), Some(month)) = (record.cohort_month, record.year_month) {
            assert!(cohort <= month);
        }
    }
}

#[test]
fn test_strict_mode_rejects_the_sample() {
    // The sample holds one garbled timestamp; in strict mode the whole load
    // fails instead of producing a partial result.
    let result = OrderLoader::from_fields(&COLUMNS, &sample_rows(), Some("%m/%d/%Y"));
    assert!(result.is_err());
}
