use anyhow::Context;

use redpencil_products::PromotionPolicy;
use redpencil_sim::{Scenario, run};

fn main() -> anyhow::Result<()> {
    redpencil_observability::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: redpencil-sim <scenario.json>")?;
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;

    let scenario = Scenario::from_json(&raw)?;
    let policy = PromotionPolicy::from_env().context("loading promotion policy")?;

    for report in run(&scenario, policy)? {
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}
