use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount with Vietnamese grouping: `1234500.5` becomes `1.234.500,5 VND`.
pub fn format_vnd(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();

    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    out.push_str(" VND");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_vnd(dec!(1234500)), "1.234.500 VND");
        assert_eq!(format_vnd(dec!(40.00)), "40 VND");
        assert_eq!(format_vnd(dec!(999)), "999 VND");
        assert_eq!(format_vnd(dec!(1000)), "1.000 VND");
    }

    #[test]
    fn keeps_fraction_after_comma() {
        assert_eq!(format_vnd(dec!(1234.5)), "1.234,5 VND");
        assert_eq!(format_vnd(dec!(-2500.25)), "-2.500,25 VND");
    }
}
