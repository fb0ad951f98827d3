//! Month-indexed cumulative savings per strategy, for charting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::double_refi::DoubleRefiProfile;
use super::immediate::RefinanceNowProfile;
use super::waiting::WaitThenRefinanceProfile;
use super::CashFlowProfile;
use crate::types::{round2, Breakeven, Money};

/// Timelines always show at least five years.
const MIN_TIMELINE_MONTHS: u32 = 60;

/// Months of runway shown past the latest breakeven.
const BREAKEVEN_RUNWAY_MONTHS: u32 = 24;

/// Months shown past the plan-to-stay horizon at most.
const HORIZON_OVERHANG_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month: u32,
    pub cumulative_net_savings: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsTimelines {
    /// Last month on every timeline.
    pub horizon_months: u32,
    pub refinance_now: Vec<TimelinePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_then_refinance: Option<Vec<TimelinePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_refinance: Option<Vec<TimelinePoint>>,
}

/// `max(finite breakevens, 60) + 24`, capped at `max(plan + 12, 60)`.
pub fn timeline_horizon(breakevens: &[Breakeven], planning_horizon_months: u32) -> u32 {
    let latest = breakevens
        .iter()
        .filter_map(Breakeven::months)
        .fold(MIN_TIMELINE_MONTHS, u32::max);
    let wanted = latest.saturating_add(BREAKEVEN_RUNWAY_MONTHS);
    let cap = planning_horizon_months
        .saturating_add(HORIZON_OVERHANG_MONTHS)
        .max(MIN_TIMELINE_MONTHS);
    wanted.min(cap)
}

/// Running sum of a profile from month 0 through `horizon_months`.
///
/// Month 0 already carries the upfront cost, so every timeline starts at or
/// below zero.
pub fn build_timeline(profile: &impl CashFlowProfile, horizon_months: u32) -> Vec<TimelinePoint> {
    let mut points = Vec::with_capacity(horizon_months as usize + 1);
    let mut cumulative = Decimal::ZERO;
    for month in 0..=horizon_months {
        cumulative = round2(cumulative + profile.cash_flow(month));
        points.push(TimelinePoint {
            month,
            cumulative_net_savings: cumulative,
        });
    }
    points
}

/// Build every available strategy's timeline over a shared horizon.
pub fn build_savings_timelines(
    now: &RefinanceNowProfile,
    wait: Option<&WaitThenRefinanceProfile>,
    double: Option<&DoubleRefiProfile>,
    breakevens: &[Breakeven],
    planning_horizon_months: u32,
) -> SavingsTimelines {
    let horizon_months = timeline_horizon(breakevens, planning_horizon_months);
    SavingsTimelines {
        horizon_months,
        refinance_now: build_timeline(now, horizon_months),
        wait_then_refinance: wait.map(|p| build_timeline(p, horizon_months)),
        double_refinance: double.map(|p| build_timeline(p, horizon_months)),
    }
}
