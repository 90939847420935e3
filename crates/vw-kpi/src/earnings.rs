use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{DAYS_IN_YEAR, WEEKS_IN_YEAR, to_decimal_rate};

const DAYS_IN_WEEK: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionHorizon {
    OneDay,
    SevenDays,
    ThirtyDays,
    NinetyDays,
    OneYear,
}

impl ProjectionHorizon {
    pub const ALL: [Self; 5] = [
        Self::OneDay,
        Self::SevenDays,
        Self::ThirtyDays,
        Self::NinetyDays,
        Self::OneYear,
    ];

    pub const fn days(self) -> u32 {
        match self {
            Self::OneDay => 1,
            Self::SevenDays => 7,
            Self::ThirtyDays => 30,
            Self::NinetyDays => 90,
            Self::OneYear => 365,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::SevenDays => "7d",
            Self::ThirtyDays => "30d",
            Self::NinetyDays => "90d",
            Self::OneYear => "365d",
        }
    }
}

/// Projected earnings in USD for each standard horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EarningsProjections {
    #[serde(rename = "1d")]
    pub one_day: f64,
    #[serde(rename = "7d")]
    pub seven_days: f64,
    #[serde(rename = "30d")]
    pub thirty_days: f64,
    #[serde(rename = "90d")]
    pub ninety_days: f64,
    #[serde(rename = "365d")]
    pub one_year: f64,
}

impl EarningsProjections {
    pub const fn get(&self, horizon: ProjectionHorizon) -> f64 {
        match horizon {
            ProjectionHorizon::OneDay => self.one_day,
            ProjectionHorizon::SevenDays => self.seven_days,
            ProjectionHorizon::ThirtyDays => self.thirty_days,
            ProjectionHorizon::NinetyDays => self.ninety_days,
            ProjectionHorizon::OneYear => self.one_year,
        }
    }

    const fn slot(&mut self, horizon: ProjectionHorizon) -> &mut f64 {
        match horizon {
            ProjectionHorizon::OneDay => &mut self.one_day,
            ProjectionHorizon::SevenDays => &mut self.seven_days,
            ProjectionHorizon::ThirtyDays => &mut self.thirty_days,
            ProjectionHorizon::NinetyDays => &mut self.ninety_days,
            ProjectionHorizon::OneYear => &mut self.one_year,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectionHorizon, f64)> + '_ {
        ProjectionHorizon::ALL
            .into_iter()
            .map(|horizon| (horizon, self.get(horizon)))
    }
}

impl Add for EarningsProjections {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for EarningsProjections {
    fn add_assign(&mut self, rhs: Self) {
        for horizon in ProjectionHorizon::ALL {
            *self.slot(horizon) += rhs.get(horizon);
        }
    }
}

impl std::iter::Sum for EarningsProjections {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Expected earnings over one day at the given APY.
pub fn calculate_daily_earnings(balance_usd: f64, apy_percent: f64) -> f64 {
    if balance_usd <= 0.0 {
        return 0.0;
    }

    balance_usd * to_decimal_rate(apy_percent) / DAYS_IN_YEAR
}

/// Expected earnings over `period_days`.
///
/// Without compounding the yield accrues linearly. With `compound_weekly` the APY is turned into
/// an equivalent weekly rate which is compounded over `period_days / 7` weeks.
pub fn calculate_earnings_projection(
    balance_usd: f64,
    apy_percent: f64,
    period_days: f64,
    compound_weekly: bool,
) -> f64 {
    if balance_usd <= 0.0 || period_days <= 0.0 {
        return 0.0;
    }

    let apy = to_decimal_rate(apy_percent);
    if apy <= 0.0 {
        return 0.0;
    }

    if !compound_weekly {
        return balance_usd * apy * (period_days / DAYS_IN_YEAR);
    }

    let weekly_rate = (1.0 + apy).powf(1.0 / WEEKS_IN_YEAR) - 1.0;
    let weeks = period_days / DAYS_IN_WEEK;
    let growth = (1.0 + weekly_rate).powf(weeks) - 1.0;
    balance_usd * growth
}

pub fn build_earnings_projections(
    balance_usd: f64,
    apy_percent: f64,
    compound_weekly: bool,
) -> EarningsProjections {
    let mut projections = EarningsProjections::default();
    for horizon in ProjectionHorizon::ALL {
        *projections.slot(horizon) = calculate_earnings_projection(
            balance_usd,
            apy_percent,
            f64::from(horizon.days()),
            compound_weekly,
        );
    }
    projections
}
