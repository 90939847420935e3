use ethers::types::U256;

use crate::{error::ChainError, types::TokenAmount};

/// Largest power of ten that fits in a `U256`.
const MAX_DECIMALS: u8 = 77;

/// Render a raw integer amount with `decimals` fractional digits, keeping at least one ("1.0").
pub fn format_units(raw: U256, decimals: u8) -> Result<String, ChainError> {
    if decimals > MAX_DECIMALS {
        return Err(ChainError::InvalidDecimals(decimals));
    }

    let formatted = ethers::utils::format_units(raw, u32::from(decimals))?;

    let Some((whole, fraction)) = formatted.split_once('.') else {
        return Ok(format!("{formatted}.0"));
    };

    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        Ok(format!("{whole}.0"))
    } else {
        Ok(format!("{whole}.{fraction}"))
    }
}

/// USD value of `amount`; zero when the price is unknown.
pub fn to_usd_value(amount: &TokenAmount, price_usd: Option<f64>) -> f64 {
    match price_usd {
        Some(price) if price.is_finite() && price != 0.0 => amount.value * price,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(1_000_000u64), 6).unwrap(), "1.0");
        assert_eq!(format_units(U256::from(1_500_000u64), 6).unwrap(), "1.5");
        assert_eq!(format_units(U256::from(1u8), 6).unwrap(), "0.000001");
        assert_eq!(format_units(U256::zero(), 18).unwrap(), "0.0");
        assert_eq!(format_units(U256::from(42u8), 0).unwrap(), "42.0");
        assert_eq!(
            format_units(U256::from(1_234_567_890_000_000_000_000u128), 18).unwrap(),
            "1234.56789"
        );
    }

    #[test]
    fn test_absurd_decimals_are_an_error() {
        assert!(matches!(
            format_units(U256::one(), 200),
            Err(ChainError::InvalidDecimals(200))
        ));
    }

    #[test]
    fn test_usd_value_needs_a_price() {
        let amount = TokenAmount::new(U256::from(2_500_000u64), 6).unwrap();
        assert!((amount.value - 2.5).abs() < f64::EPSILON);

        assert!((to_usd_value(&amount, Some(2.0)) - 5.0).abs() < f64::EPSILON);
        assert_eq!(to_usd_value(&amount, None), 0.0);
        assert_eq!(to_usd_value(&amount, Some(0.0)), 0.0);
        assert_eq!(to_usd_value(&amount, Some(f64::NAN)), 0.0);
    }
}
