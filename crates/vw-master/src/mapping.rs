use chrono::{DateTime, Utc};
use vaultwatch_types::{
    ApyBreakdown, ApyIntervals, AssetSummary, HoldersSummary, RewardSummary, TopHolder,
    VaultDefinition, VaultHistoricalPoint, VaultSummary,
};

use crate::clients::vaultsfyi::types::{
    DetailedVault, HoldersData, HistoricalPoint, LpToken, ProviderApy, ProviderApyBreakdown,
    ProviderAsset, ProviderReward,
};

const fn breakdown(apy: &ProviderApyBreakdown) -> ApyBreakdown {
    ApyBreakdown {
        base: apy.base,
        reward: apy.reward,
        total: apy.total,
    }
}

const fn apy_intervals(apy: &ProviderApy) -> ApyIntervals {
    ApyIntervals {
        one_day: breakdown(&apy.one_day),
        seven_days: breakdown(&apy.seven_days),
        thirty_days: breakdown(&apy.thirty_days),
    }
}

fn asset_summary(asset: &ProviderAsset) -> AssetSummary {
    AssetSummary {
        address: asset.address.clone(),
        symbol: asset.symbol.clone(),
        name: asset.name.clone(),
        decimals: asset.decimals,
        price_usd: asset.asset_price_in_usd,
        logo_url: asset.asset_logo.clone(),
    }
}

fn lp_token_summary(lp_token: &LpToken) -> AssetSummary {
    AssetSummary {
        address: lp_token.address.clone(),
        symbol: lp_token.symbol.clone(),
        name: lp_token.name.clone(),
        decimals: lp_token.decimals,
        price_usd: None,
        logo_url: None,
    }
}

fn reward_summary(reward: &ProviderReward) -> RewardSummary {
    let reward_only = |value: f64| ApyBreakdown {
        base: 0.0,
        reward: value,
        total: value,
    };

    RewardSummary {
        asset: asset_summary(&reward.asset),
        apy: ApyIntervals {
            one_day: reward_only(reward.apy.one_day),
            seven_days: reward_only(reward.apy.seven_days),
            thirty_days: reward_only(reward.apy.thirty_days),
        },
    }
}

fn holders_summary(holders: &HoldersData) -> HoldersSummary {
    HoldersSummary {
        total_count: holders.total_count,
        total_balance: holders.total_balance,
        top_holders: holders.top_holders.as_ref().map(|top| {
            top.iter()
                .map(|holder| TopHolder {
                    address: holder.address.clone(),
                    lp_token_balance: holder.lp_token_balance,
                })
                .collect()
        }),
    }
}

pub(crate) fn to_summary(
    definition: &VaultDefinition,
    item: &DetailedVault,
    fetched_at: DateTime<Utc>,
) -> VaultSummary {
    VaultSummary {
        key: definition.key,
        address: item.address.clone(),
        network: item.network.name.clone(),
        name: item.name.clone(),
        protocol: item.protocol.name.clone(),
        asset: asset_summary(&item.asset),
        apy: apy_intervals(&item.apy),
        tvl_usd: item.tvl.usd,
        tvl_native: item.tvl.native,
        rewards: item
            .rewards
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(reward_summary)
            .collect(),
        holders: item.holders_data.as_ref().map(holders_summary),
        lp_token: item.lp_token.as_ref().map(lp_token_summary),
        fetched_at,
    }
}

pub(crate) fn to_history_point(point: &HistoricalPoint) -> VaultHistoricalPoint {
    VaultHistoricalPoint {
        timestamp: point.timestamp * 1000,
        block_number: point.block_number.clone(),
        apy: breakdown(&point.apy),
        tvl_usd: point.tvl.usd,
        tvl_native: point.tvl.native,
        share_price: point.share_price,
    }
}
