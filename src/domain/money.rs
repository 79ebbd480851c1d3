/// Money is represented as integer cents to avoid floating-point precision issues.
/// For EUR/USD, 1 unit = 100 cents, so $4.50 = 450 cents.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Convert a decimal amount in currency units into cents, rounding to the
/// nearest cent. Returns `None` for NaN, infinities and values outside the
/// representable range.
pub fn cents_from_units(units: f64) -> Option<Cents> {
    if !units.is_finite() {
        return None;
    }
    let cents = (units * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(cents as Cents)
}

/// Convert cents back into a decimal amount in currency units.
pub fn units_from_cents(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Serde adapter storing `Cents` as a JSON number in currency units,
/// e.g. 450 <-> `4.5`.
pub mod as_units {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::{Cents, cents_from_units, units_from_cents};

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(units_from_cents(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let units = f64::deserialize(deserializer)?;
        cents_from_units(units).ok_or_else(|| D::Error::custom("amount is not a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(1234), "12.34");
        assert_eq!(format_cents(450), "4.50");
        assert_eq!(format_cents(1), "0.01");
        assert_eq!(format_cents(0), "0.00");
        assert_eq!(format_cents(-5000), "-50.00");
        assert_eq!(format_cents(-1), "-0.01");
    }

    #[test]
    fn test_cents_from_units() {
        assert_eq!(cents_from_units(4.5), Some(450));
        assert_eq!(cents_from_units(0.1 + 0.2), Some(30));
        assert_eq!(cents_from_units(1000.0), Some(100_000));
        assert_eq!(cents_from_units(-5.0), Some(-500));
        assert_eq!(cents_from_units(0.004), Some(0));
    }

    #[test]
    fn test_cents_from_units_rejects_non_finite() {
        assert_eq!(cents_from_units(f64::NAN), None);
        assert_eq!(cents_from_units(f64::INFINITY), None);
        assert_eq!(cents_from_units(f64::NEG_INFINITY), None);
        assert_eq!(cents_from_units(1e300), None);
    }

    #[test]
    fn test_units_from_cents() {
        assert_eq!(units_from_cents(450), 4.5);
        assert_eq!(units_from_cents(99_550), 995.5);
    }
}
