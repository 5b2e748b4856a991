//! Deterministic multi-criteria route scoring
//!
//! Cost, transit time and emissions are min-max normalized across the
//! candidate set (1 = best) and combined with priority weights.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::tools::{as_number, round2};
use crate::types::Priority;

/// Relative importance of each metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub cost: f64,
    pub time: f64,
    pub emissions: f64,
}

impl Weights {
    pub fn for_priority(priority: Priority) -> Self {
        let (cost, time, emissions) = match priority {
            Priority::Cost => (0.70, 0.15, 0.15),
            Priority::Speed => (0.15, 0.70, 0.15),
            Priority::Carbon => (0.15, 0.15, 0.70),
            Priority::Balanced => (0.33, 0.33, 0.34),
        };
        Self {
            cost,
            time,
            emissions,
        }
    }
}

/// A route joined with its emissions and compliance figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub route_id: String,
    pub name: String,
    pub modes: Vec<String>,
    pub base_cost_usd: f64,
    pub regulatory_cost_usd: f64,
    pub total_cost_usd: f64,
    pub transit_days: f64,
    pub total_emissions_kg: f64,
    pub compliance_status: String,
    pub segments: Vec<Value>,
    pub score: f64,
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn number(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(as_number)
}

fn by_route_id<'a>(rows: &'a [Value], id: &str) -> Option<&'a Value> {
    rows.iter()
        .find(|r| r.get("route_id").and_then(Value::as_str) == Some(id))
}

/// Join route options with the Carbon and Policy analyses by route id
///
/// Missing numbers count as 0; a route without compliance data is `unknown`.
pub fn build_candidates(routes: &[Value], emissions: &[Value], compliance: &[Value]) -> Vec<Candidate> {
    routes
        .iter()
        .map(|route| {
            let route_id = text(route, "id")
                .or_else(|| text(route, "route_id"))
                .unwrap_or_default();
            let emission = by_route_id(emissions, &route_id);
            let policy = by_route_id(compliance, &route_id);

            let base_cost = number(route, "total_cost_usd")
                .or_else(|| number(route, "base_cost_usd"))
                .unwrap_or(0.0);
            let regulatory = policy
                .and_then(|p| number(p, "total_compliance_cost"))
                .unwrap_or(0.0);

            Candidate {
                name: text(route, "name").unwrap_or_else(|| route_id.clone()),
                modes: route
                    .get("modes")
                    .and_then(Value::as_array)
                    .map(|m| m.iter().filter_map(Value::as_str).map(str::to_string).collect())
                    .unwrap_or_default(),
                base_cost_usd: base_cost,
                regulatory_cost_usd: regulatory,
                total_cost_usd: round2(base_cost + regulatory),
                transit_days: number(route, "transit_days").unwrap_or(0.0),
                total_emissions_kg: emission
                    .and_then(|e| number(e, "total_emissions_kg"))
                    .unwrap_or(0.0),
                compliance_status: policy
                    .and_then(|p| text(p, "compliance_status"))
                    .unwrap_or_else(|| "unknown".to_string()),
                segments: route
                    .get("segments")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                score: 0.0,
                route_id,
            }
        })
        .collect()
}

/// Map `value` into [0, 1] where the set minimum scores 1
///
/// When every candidate shares the same value the metric carries no
/// information and everyone scores 1.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max > min {
        1.0 - (value - min) / (max - min)
    } else {
        1.0
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Fill in `score` for every candidate
pub fn score(candidates: &mut [Candidate], priority: Priority) {
    let weights = Weights::for_priority(priority);
    let (cost_lo, cost_hi) = bounds(candidates.iter().map(|c| c.total_cost_usd));
    let (time_lo, time_hi) = bounds(candidates.iter().map(|c| c.transit_days));
    let (em_lo, em_hi) = bounds(candidates.iter().map(|c| c.total_emissions_kg));

    for c in candidates.iter_mut() {
        c.score = weights.cost * normalize(c.total_cost_usd, cost_lo, cost_hi)
            + weights.time * normalize(c.transit_days, time_lo, time_hi)
            + weights.emissions * normalize(c.total_emissions_kg, em_lo, em_hi);
    }
}

/// Score and sort best first; ties keep input order
pub fn rank(mut candidates: Vec<Candidate>, priority: Priority) -> Vec<Candidate> {
    score(&mut candidates, priority);
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRange {
    pub min: f64,
    pub max: f64,
    pub savings_vs_worst: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
    pub delay_vs_fastest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionsRange {
    pub min: f64,
    pub max: f64,
    pub reduction_vs_worst_pct: f64,
}

/// How the top-ranked route compares with the rest of the set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOffAnalysis {
    pub cost_range: CostRange,
    pub time_range: TimeRange,
    pub emissions_range: EmissionsRange,
    pub key_insights: Vec<String>,
}

fn extreme_by<F>(candidates: &[Candidate], key: F, want_max: bool) -> Option<&Candidate>
where
    F: Fn(&Candidate) -> f64,
{
    let cmp = |a: &&Candidate, b: &&Candidate| {
        key(*a).partial_cmp(&key(*b)).unwrap_or(Ordering::Equal)
    };
    if want_max {
        candidates.iter().max_by(cmp)
    } else {
        candidates.iter().min_by(cmp)
    }
}

/// Trade-offs of `ranked[0]` against the whole set; `None` when empty
pub fn trade_offs(ranked: &[Candidate]) -> Option<TradeOffAnalysis> {
    let best = ranked.first()?;
    let (cost_lo, cost_hi) = bounds(ranked.iter().map(|c| c.total_cost_usd));
    let (time_lo, time_hi) = bounds(ranked.iter().map(|c| c.transit_days));
    let (em_lo, em_hi) = bounds(ranked.iter().map(|c| c.total_emissions_kg));

    let savings = round2(cost_hi - best.total_cost_usd);
    let delay = round2(best.transit_days - time_lo);
    let reduction_pct = if em_hi > 0.0 {
        ((em_hi - best.total_emissions_kg) / em_hi * 1000.0).round() / 10.0
    } else {
        0.0
    };

    let mut insights = Vec::new();
    if let Some(priciest) = extreme_by(ranked, |c| c.total_cost_usd, true) {
        if savings > 0.0 {
            insights.push(format!(
                "{} saves ${:.2} vs {}",
                best.name, savings, priciest.name
            ));
        }
    }
    if let Some(dirtiest) = extreme_by(ranked, |c| c.total_emissions_kg, true) {
        if reduction_pct > 0.0 {
            insights.push(format!(
                "{:.1}% lower emissions than {}",
                reduction_pct, dirtiest.name
            ));
        }
    }
    match extreme_by(ranked, |c| c.transit_days, false) {
        Some(fastest) if delay > 0.0 => insights.push(format!(
            "{} days slower than {}",
            delay, fastest.name
        )),
        _ => insights.push(format!("{} is the fastest option", best.name)),
    }

    Some(TradeOffAnalysis {
        cost_range: CostRange {
            min: round2(cost_lo),
            max: round2(cost_hi),
            savings_vs_worst: savings,
        },
        time_range: TimeRange {
            min: time_lo,
            max: time_hi,
            delay_vs_fastest: delay,
        },
        emissions_range: EmissionsRange {
            min: round2(em_lo),
            max: round2(em_hi),
            reduction_vs_worst_pct: reduction_pct,
        },
        key_insights: insights,
    })
}
