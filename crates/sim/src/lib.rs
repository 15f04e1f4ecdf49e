//! Replays a scripted price history through a [`PriceTimeline`].
//!
//! Input is a JSON scenario:
//!
//! ```json
//! {
//!   "initial_price": "100.00",
//!   "created_at": "2024-01-01T00:00:00Z",
//!   "changes": [{ "at": "2024-02-15T00:00:00Z", "price": "75.00" }],
//!   "query_at": ["2024-03-20T00:00:00Z"]
//! }
//! ```
//!
//! Changes and queries are processed in time order (a change before a query at
//! the same instant).

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use redpencil_core::{ManualClock, Money};
use redpencil_products::{PriceTimeline, PromotionPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub initial_price: Money,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub changes: Vec<PriceStep>,
    #[serde(default)]
    pub query_at: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceStep {
    pub at: DateTime<Utc>,
    pub price: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    SetPrice,
    Query,
}

/// State of the timeline after one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub at: DateTime<Utc>,
    pub action: Action,
    pub price: Money,
    pub baseline: Money,
    pub promoted: bool,
}

impl Scenario {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid scenario JSON")
    }
}

/// Run `scenario` under `policy`, reporting the state after each step.
pub fn run(scenario: &Scenario, policy: PromotionPolicy) -> anyhow::Result<Vec<StepReport>> {
    let clock = ManualClock::new(scenario.created_at);
    let mut timeline = PriceTimeline::with_policy(scenario.initial_price, clock.clone(), policy)
        .context("invalid promotion policy")?;

    let mut steps: Vec<(DateTime<Utc>, Option<Money>)> = scenario
        .changes
        .iter()
        .map(|step| (step.at, Some(step.price)))
        .chain(scenario.query_at.iter().map(|at| (*at, None)))
        .collect();
    // Stable sort keeps changes ahead of queries at the same instant.
    steps.sort_by_key(|(at, _)| *at);

    let mut reports = vec![report(&timeline, scenario.created_at, Action::Created)];
    for (at, price) in steps {
        if at < scenario.created_at {
            bail!("step at {at} precedes product creation at {}", scenario.created_at);
        }
        clock.set(at);

        let action = match price {
            Some(price) => {
                timeline
                    .set_price(price)
                    .with_context(|| format!("setting price {price} at {at}"))?;
                Action::SetPrice
            }
            None => Action::Query,
        };
        reports.push(report(&timeline, at, action));
    }

    info!(
        steps = reports.len(),
        events = timeline.history().len(),
        "scenario replayed"
    );
    Ok(reports)
}

fn report(timeline: &PriceTimeline<ManualClock>, at: DateTime<Utc>, action: Action) -> StepReport {
    StepReport {
        at,
        action,
        price: timeline.price(),
        baseline: timeline.baseline_price_at(at),
        promoted: timeline.is_promoted_at(at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "initial_price": "100",
        "created_at": "2024-01-01T00:00:00Z",
        "changes": [
            { "at": "2024-02-15T00:00:00Z", "price": "75.00" },
            { "at": "2024-02-20T00:00:00Z", "price": "80.00" }
        ],
        "query_at": ["2024-02-16T00:00:00Z", "2024-02-15T00:00:00Z"]
    }"#;

    #[test]
    fn replays_changes_and_queries_in_time_order() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        let reports = run(&scenario, PromotionPolicy::default()).unwrap();

        let summary: Vec<(Action, bool)> = reports.iter().map(|r| (r.action, r.promoted)).collect();
        assert_eq!(
            summary,
            vec![
                (Action::Created, false),
                (Action::SetPrice, true),
                (Action::Query, true),
                (Action::Query, true),
                (Action::SetPrice, false),
            ]
        );
        assert_eq!(reports[1].baseline, "100.00".parse().unwrap());
        assert_eq!(reports[4].price, "80.00".parse().unwrap());
    }

    #[test]
    fn rejects_steps_before_creation() {
        let scenario = Scenario::from_json(
            r#"{
                "initial_price": "10.00",
                "created_at": "2024-01-01T00:00:00Z",
                "changes": [{ "at": "2023-12-31T00:00:00Z", "price": "9.00" }]
            }"#,
        )
        .unwrap();
        let err = run(&scenario, PromotionPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("precedes product creation"));
    }

    #[test]
    fn rejects_negative_prices_in_input() {
        let err = Scenario::from_json(
            r#"{ "initial_price": "-1", "created_at": "2024-01-01T00:00:00Z" }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid scenario JSON"));
    }

    #[test]
    fn reports_serialize_as_json_lines() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        let reports = run(&scenario, PromotionPolicy::default()).unwrap();
        let line = serde_json::to_value(&reports[1]).unwrap();
        assert_eq!(line["action"], "set_price");
        assert_eq!(line["price"], "75.00");
        assert_eq!(line["promoted"], true);
    }
}
