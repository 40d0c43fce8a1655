//! Currency display formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// How amounts are written for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    /// Prefix placed before the number, separated by a space.
    pub symbol: String,
    /// Separator between groups of three integer digits.
    pub thousands_separator: char,
    /// Separator between integer and fractional digits.
    pub decimal_separator: char,
    /// Number of fractional digits.
    pub decimal_places: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::pt_br()
    }
}

impl CurrencyFormat {
    /// Brazilian real: `R$ 1.234,50`.
    pub fn pt_br() -> Self {
        Self {
            symbol: "R$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            decimal_places: 2,
        }
    }

    /// Round an amount to the displayed precision, half away from zero.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format an amount, rounding half away from zero.
    pub fn format(&self, amount: Decimal) -> String {
        let mut rounded = self.round(amount);
        rounded.rescale(self.decimal_places);

        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        let mut out = String::with_capacity(digits.len() + self.symbol.len() + 8);
        out.push_str(&self.symbol);
        out.push(' ');
        if negative {
            out.push('-');
        }
        out.push_str(&self.group_thousands(int_part));
        if !frac_part.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }

    fn group_thousands(&self, int_part: &str) -> String {
        let len = int_part.len();
        let mut grouped = String::with_capacity(len + len / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(ch);
        }
        grouped
    }
}

/// Format an amount as Brazilian reais.
///
/// ```
/// use openitems_core::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.5)), "R$ 1.234,50");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    CurrencyFormat::pt_br().format(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_examples() {
        assert_eq!(format_currency(dec!(1234.5)), "R$ 1.234,50");
        assert_eq!(format_currency(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_currency(dec!(1000000)), "R$ 1.000.000,00");
        assert_eq!(format_currency(dec!(350)), "R$ 350,00");
    }

    #[test]
    fn test_format_currency_small_and_grouping_edges() {
        assert_eq!(format_currency(dec!(0.5)), "R$ 0,50");
        assert_eq!(format_currency(dec!(999.99)), "R$ 999,99");
        assert_eq!(format_currency(dec!(1000)), "R$ 1.000,00");
        assert_eq!(format_currency(dec!(123456.789)), "R$ 123.456,79");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(0.005)), "R$ 0,01");
        assert_eq!(format_currency(dec!(-0.005)), "R$ -0,01");
        assert_eq!(format_currency(dec!(2.344)), "R$ 2,34");
    }

    #[test]
    fn test_round_matches_display() {
        let brl = CurrencyFormat::pt_br();
        assert_eq!(brl.round(dec!(0.005)), dec!(0.01));
        assert_eq!(brl.round(dec!(12.3449)), dec!(12.34));
        assert_eq!(brl.format(brl.round(dec!(7.125))), brl.format(dec!(7.125)));
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.5)), "R$ -1.234,50");
        assert_eq!(format_currency(dec!(-0.001)), "R$ 0,00");
    }

    #[test]
    fn test_custom_format() {
        let usd = CurrencyFormat {
            symbol: "US$".to_string(),
            thousands_separator: ',',
            decimal_separator: '.',
            decimal_places: 2,
        };
        assert_eq!(usd.format(dec!(1234567.1)), "US$ 1,234,567.10");
    }
}
