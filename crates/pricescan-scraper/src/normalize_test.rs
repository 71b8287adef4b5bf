use super::*;

// ---------------------------------------------------------------------------
// parse_price
// ---------------------------------------------------------------------------

#[test]
fn parse_price_last_separator_is_decimal() {
    assert_eq!(parse_price("1.299,00"), Some(1299.00));
    assert_eq!(parse_price("1,299.00"), Some(1299.00));
    assert_eq!(parse_price("12.345.678,9"), Some(12_345_678.9));
}

#[test]
fn parse_price_single_separator_uses_tail_length() {
    assert_eq!(parse_price("7.99"), Some(7.99));
    assert_eq!(parse_price("7,5"), Some(7.5));
    assert_eq!(parse_price("1.299"), Some(1299.0));
    assert_eq!(parse_price("1,299"), Some(1299.0));
    assert_eq!(parse_price("2.000.000"), Some(2_000_000.0));
}

#[test]
fn parse_price_strips_currency_and_words() {
    assert_eq!(parse_price("US $12.50"), Some(12.5));
    assert_eq!(parse_price("S/ 18,24"), Some(18.24));
    assert_eq!(parse_price("€ 3"), Some(3.0));
}

#[test]
fn parse_price_range_takes_lowest_candidate() {
    assert_eq!(parse_price("US $7.99 - 15.99"), Some(7.99));
    assert_eq!(parse_price("€56,78 - 12,34"), Some(12.34));
    assert_eq!(parse_price("3.60–5.60"), Some(3.6));
    assert_eq!(parse_price("10 — 2"), Some(2.0));
}

#[test]
fn parse_price_empty_or_garbage_is_none() {
    assert_eq!(parse_price(""), None);
    assert_eq!(parse_price("   "), None);
    assert_eq!(parse_price("Precio no disponible"), None);
    assert_eq!(parse_price(".,"), None);
}

#[test]
fn parse_price_leading_separator_has_zero_integer_part() {
    assert_eq!(parse_price(",5"), Some(0.5));
}

#[test]
fn parse_price_is_idempotent_up_to_two_decimals() {
    for raw in ["7.99", "1299", "0.5", "12.3", "1.299,00", "US $7.99 - 15.99", "1,000"] {
        let first = parse_price(raw).expect("parseable");
        assert_eq!(parse_price(&first.to_string()), Some(first), "input {raw:?}");
    }
}

#[test]
fn parse_price_reparse_of_three_decimals_reads_grouping() {
    let first = parse_price("1,234.567").expect("parseable");
    assert_eq!(first, 1234.567);
    assert_eq!(first.to_string(), "1234.567");
    // A lone `.` followed by three digits groups thousands.
    assert_eq!(parse_price(&first.to_string()), Some(1_234_567.0));
}

// ---------------------------------------------------------------------------
// parse_quantity
// ---------------------------------------------------------------------------

#[test]
fn parse_quantity_scales_suffixes() {
    assert_eq!(parse_quantity("1.2k"), 1200);
    assert_eq!(parse_quantity("3 mil"), 3000);
    assert_eq!(parse_quantity("8.3K+ ventas"), 8300);
    assert_eq!(parse_quantity("10 k"), 10_000);
}

#[test]
fn parse_quantity_plain_counts() {
    assert_eq!(parse_quantity("14 sold"), 14);
    assert_eq!(parse_quantity("1,000+ sold"), 1000);
    assert_eq!(parse_quantity("1 vendido"), 1);
}

#[test]
fn parse_quantity_k_needs_a_number_before_it() {
    // "pack" and "kg" are units, not thousands.
    assert_eq!(parse_quantity("2 pack"), 2);
    assert_eq!(parse_quantity("5kg"), 5);
}

#[test]
fn parse_quantity_applies_multiplier_once() {
    assert_eq!(parse_quantity("2k mil"), 2000);
}

#[test]
fn parse_quantity_unparseable_is_zero() {
    assert_eq!(parse_quantity(""), 0);
    assert_eq!(parse_quantity("sin ventas"), 0);
    assert_eq!(parse_quantity("+"), 0);
}

#[test]
fn parse_quantity_rounds_half_to_even() {
    assert_eq!(parse_quantity("2.5"), 2);
    assert_eq!(parse_quantity("3.5"), 4);
}

// ---------------------------------------------------------------------------
// parse_price_range / currency
// ---------------------------------------------------------------------------

#[test]
fn parse_price_range_reads_bounds_and_currency() {
    let range = parse_price_range("S/ 18,24 - 31,00");
    assert_eq!(range.min, Some(18.24));
    assert_eq!(range.max, Some(31.0));
    assert_eq!(range.currency.as_deref(), Some("S/"));

    let range = parse_price_range("USD 5 - 7");
    assert_eq!((range.min, range.max), (Some(5.0), Some(7.0)));
    assert_eq!(range.currency.as_deref(), Some("USD"));

    let range = parse_price_range("USD 72.41-80.00");
    assert_eq!((range.min, range.max), (Some(72.41), Some(80.0)));
}

#[test]
fn parse_price_range_handles_mixed_locales() {
    let range = parse_price_range("US$1,299.50-1,599.75");
    assert_eq!((range.min, range.max), (Some(1299.5), Some(1599.75)));
    assert_eq!(range.currency.as_deref(), Some("US$"));

    let range = parse_price_range("€1.299,50");
    assert_eq!((range.min, range.max), (Some(1299.5), Some(1299.5)));

    let range = parse_price_range("R$ 2.000,00 - R$ 2.500,00");
    assert_eq!((range.min, range.max), (Some(2000.0), Some(2500.0)));
    assert_eq!(range.currency.as_deref(), Some("R$"));

    let range = parse_price_range("¥1,299");
    assert_eq!((range.min, range.max), (Some(1299.0), Some(1299.0)));
}

#[test]
fn parse_price_range_orders_inverted_bounds() {
    let range = parse_price_range("$9 - 4");
    assert_eq!((range.min, range.max), (Some(4.0), Some(9.0)));
}

#[test]
fn parse_price_range_without_numbers_keeps_currency() {
    let range = parse_price_range("US$ negotiable");
    assert_eq!(range.min, None);
    assert_eq!(range.currency.as_deref(), Some("US$"));
}

#[test]
fn detect_currency_finds_first_symbol() {
    assert_eq!(detect_currency("US$1.20-3.40").as_deref(), Some("US$"));
    assert_eq!(detect_currency("S/ 20").as_deref(), Some("S/"));
    assert_eq!(detect_currency("€5").as_deref(), Some("€"));
    assert_eq!(detect_currency("12.00"), None);
}

// ---------------------------------------------------------------------------
// Supplier badges
// ---------------------------------------------------------------------------

#[test]
fn parse_rating_reads_score_and_count() {
    assert_eq!(parse_rating("4.8/5.0 (120)"), Some((4.8, 120)));
    assert_eq!(parse_rating("5 / 5 (3)"), Some((5.0, 3)));
    assert_eq!(parse_rating("No reviews"), None);
}

#[test]
fn parse_years_accepts_spanish_and_english() {
    assert_eq!(parse_years("4 años CN"), Some(4));
    assert_eq!(parse_years("12 yrs"), Some(12));
    assert_eq!(parse_years("1 Year"), Some(1));
    assert_eq!(parse_years("CN"), None);
}

#[test]
fn parse_percent_reads_first_rate() {
    assert_eq!(parse_percent("31% tasa de repetición"), Some(31));
    assert_eq!(parse_percent("Envío rápido"), None);
}

#[test]
fn parse_moq_returns_quantity_and_text() {
    assert_eq!(
        parse_moq(" Pedido mín: 2 unidades "),
        (Some(2), Some("Pedido mín: 2 unidades".to_string()))
    );
    assert_eq!(
        parse_moq("Min. order: 1,000 pieces"),
        (Some(1000), Some("Min. order: 1,000 pieces".to_string()))
    );
    assert_eq!(parse_moq("Negotiable"), (None, Some("Negotiable".to_string())));
    assert_eq!(parse_moq(""), (None, None));
}

#[test]
fn parse_unit_count_treats_separators_as_grouping() {
    assert_eq!(parse_unit_count("1,200 Pieces (MOQ)"), 1200);
    assert_eq!(parse_unit_count("10.000 Units"), 10_000);
    assert_eq!(parse_unit_count("MOQ info"), 0);
}

#[test]
fn join_split_price_combines_parts() {
    assert_eq!(join_split_price(Some("10"), Some(".99")).as_deref(), Some("10.99"));
    assert_eq!(join_split_price(Some("S/ 7"), None).as_deref(), Some("7"));
    assert_eq!(join_split_price(None, Some("50")).as_deref(), Some("0.50"));
    assert_eq!(join_split_price(Some(""), Some("")), None);
}

// ---------------------------------------------------------------------------
// split_range
// ---------------------------------------------------------------------------

#[test]
fn split_range_ignores_dashes_not_between_digits() {
    assert_eq!(split_range("Wi-Fi 5"), None);
    assert_eq!(split_range("-5"), None);
    assert_eq!(split_range("1 - 2"), Some(vec!["1", "2"]));
}
