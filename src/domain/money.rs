use rust_decimal::Decimal;

use crate::domain::Error;

/// Pounds and pence: every stored amount carries exactly two decimal places.
pub const SCALE: u32 = 2;

/// Normalize a value to the two-decimal representation used everywhere.
pub fn to_pence(mut value: Decimal) -> Decimal {
    value.rescale(SCALE);
    value
}

/// Parse a keyed-in amount. Accepts positive numbers with at most two
/// decimal places; everything else is malformed.
pub fn parse_amount(entered: &str) -> Result<Decimal, Error> {
    let amount: Decimal = entered.trim().parse().map_err(|_| Error::MalformedAmount)?;
    if amount <= Decimal::ZERO || amount.scale() > SCALE {
        return Err(Error::MalformedAmount);
    }
    Ok(to_pence(amount))
}

/// Customer-facing rendering, e.g. `£103.45`.
pub fn gbp(value: Decimal) -> String {
    format!("£{}", to_pence(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_amount("20").unwrap(), Decimal::new(2000, 2));
        assert_eq!(parse_amount(" 123.45 ").unwrap(), Decimal::new(12345, 2));
        assert_eq!(parse_amount("0.01").unwrap(), Decimal::new(1, 2));
    }

    #[test]
    fn parsed_amounts_are_normalized_to_pence() {
        assert_eq!(parse_amount("20").unwrap().scale(), SCALE);
        assert_eq!(parse_amount("20.5").unwrap().scale(), SCALE);
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(matches!(parse_amount(""), Err(Error::MalformedAmount)));
        assert!(matches!(parse_amount("abc"), Err(Error::MalformedAmount)));
        assert!(matches!(parse_amount("12.3.4"), Err(Error::MalformedAmount)));
    }

    #[test]
    fn rejects_zero_and_negatives() {
        assert!(matches!(parse_amount("0"), Err(Error::MalformedAmount)));
        assert!(matches!(parse_amount("-20"), Err(Error::MalformedAmount)));
    }

    #[test]
    fn rejects_sub_penny_precision() {
        assert!(matches!(parse_amount("10.123"), Err(Error::MalformedAmount)));
    }

    #[test]
    fn formats_with_two_decimal_places() {
        assert_eq!(gbp(Decimal::new(2000, 2)), "£20.00");
        assert_eq!(gbp(Decimal::new(1034, 1)), "£103.40");
        assert_eq!(gbp(Decimal::new(20, 0)), "£20.00");
    }
}
