//! Display formatting for money and percentages
//!
//! The marketing site, the API, and the CLI all render the same strings,
//! so the formatting lives here next to the engines that produce the numbers.

/// Format an amount as a dollar string with thousands separators.
///
/// Whole amounts print without decimals (`1234` → `"$1,234"`); fractional
/// amounts keep cents (`19.5` → `"$19.50"`). Negative amounts keep the sign
/// after the dollar symbol (`-1234` → `"$-1,234"`).
pub fn format_price(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents_total = (amount.abs() * 100.0).round() as i64;
    let whole = cents_total / 100;
    let cents = cents_total % 100;

    let sign = if negative && cents_total > 0 { "-" } else { "" };
    if cents == 0 {
        format!("${}{}", sign, group_thousands(whole))
    } else {
        format!("${}{}.{:02}", sign, group_thousands(whole), cents)
    }
}

/// Format a rounded percentage value as `"{n}%"`.
pub fn format_percentage(value: i64) -> String {
    format!("{}%", value)
}

fn group_thousands(n: i64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_groups_thousands() {
        assert_eq!(format_price(1234.0), "$1,234");
        assert_eq!(format_price(1_234_567.0), "$1,234,567");
        assert_eq!(format_price(999.0), "$999");
    }

    #[test]
    fn test_format_price_zero_and_small() {
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(61.0), "$61");
    }

    #[test]
    fn test_format_price_fractional_keeps_cents() {
        assert_eq!(format_price(19.5), "$19.50");
        assert_eq!(format_price(27.5), "$27.50");
        assert_eq!(format_price(1234.56), "$1,234.56");
    }

    #[test]
    fn test_format_price_rounds_sub_cent() {
        assert_eq!(format_price(999.999), "$1,000");
        assert_eq!(format_price(0.004), "$0");
    }

    #[test]
    fn test_format_price_negative() {
        assert_eq!(format_price(-1234.0), "$-1,234");
        assert_eq!(format_price(-0.5), "$-0.50");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(2650), "2650%");
        assert_eq!(format_percentage(0), "0%");
        assert_eq!(format_percentage(-12), "-12%");
    }
}
