use super::*;

fn item(quantity: i64, unit_price: f64) -> OrderItemInput {
    OrderItemInput {
        product_id: 1,
        quantity,
        unit_price,
        notes: None,
    }
}

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_accumulation_precision() {
    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_line_subtotal() {
    assert_eq!(line_subtotal(3, 10.99), 32.97);
    assert_eq!(line_subtotal(2, 100.0), 200.0);
    assert_eq!(line_subtotal(1, 0.0), 0.0);
}

#[test]
fn test_order_totals_reference_scenario() {
    // 2 x 100.00 => subtotal 200.00, 16% tax 32.00, total 232.00
    let totals = order_totals(&[item(2, 100.0)]);
    assert_eq!(totals.subtotal, 200.0);
    assert_eq!(totals.tax, 32.0);
    assert_eq!(totals.total, 232.0);
}

#[test]
fn test_order_totals_rounding() {
    // 3 x 10.99 => subtotal 32.97, tax 5.2752 -> 5.28, total 38.25
    let totals = order_totals(&[item(3, 10.99)]);
    assert_eq!(totals.subtotal, 32.97);
    assert_eq!(totals.tax, 5.28);
    assert_eq!(totals.total, 38.25);
}

#[test]
fn test_order_totals_multiple_items() {
    let totals = order_totals(&[item(2, 145.0), item(1, 35.0), item(4, 55.0)]);
    // subtotal = 290 + 35 + 220 = 545
    assert_eq!(totals.subtotal, 545.0);
    assert_eq!(totals.tax, 87.2);
    assert_eq!(totals.total, 632.2);
}

#[test]
fn test_total_is_subtotal_plus_tax() {
    for items in [
        vec![item(1, 99.99)],
        vec![item(7, 13.37), item(2, 0.01)],
        vec![item(9999, 0.03)],
    ] {
        let t = order_totals(&items);
        let expected = to_f64(to_decimal(t.subtotal) + to_decimal(t.tax));
        assert_eq!(t.total, expected);
    }
}

#[test]
fn test_empty_order_is_zero() {
    let totals = order_totals(&[]);
    assert_eq!(totals.subtotal, 0.0);
    assert_eq!(totals.tax, 0.0);
    assert_eq!(totals.total, 0.0);
}
