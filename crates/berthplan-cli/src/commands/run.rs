use berthplan_core::BerthplanConfig;
use berthplan_planner::{PlanReport, Planner};
use berthplan_state::StateStore;

pub fn run(store: StateStore, config: &BerthplanConfig) -> anyhow::Result<()> {
    let report = plan(store, config)?;
    println!("Planned {} berth assignments", report.planned);
    if report.unpreferred > 0 {
        println!(
            "  {} outside the applicants' chosen harbors",
            report.unpreferred
        );
    }
    Ok(())
}

fn plan(store: StateStore, config: &BerthplanConfig) -> anyhow::Result<PlanReport> {
    let planner = Planner::new(store, config.planner.clone());
    Ok(planner.run()?)
}
