use crate::to_decimal_rate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedApyInput {
    pub balance_usd: f64,
    pub apy_percent: f64,
}

/// Balance-weighted APY across positions, in percent.
///
/// Non-positive balances carry no weight. Returns zero when nothing is held.
pub fn calculate_blended_apy(inputs: &[BlendedApyInput]) -> f64 {
    let total_balance: f64 = inputs.iter().map(|item| item.balance_usd.max(0.0)).sum();
    if total_balance <= 0.0 {
        return 0.0;
    }

    inputs
        .iter()
        .filter(|item| item.balance_usd > 0.0)
        .map(|item| {
            let weight = item.balance_usd / total_balance;
            weight * to_decimal_rate(item.apy_percent) * 100.0
        })
        .sum()
}
