use berthplan_state::{AssignmentPlan, StateStore};

pub fn show(store: &StateStore, format: &str) -> anyhow::Result<()> {
    let rows = store.list_plan()?;
    println!("{}", render(&rows, format)?);
    Ok(())
}

fn render(rows: &[AssignmentPlan], format: &str) -> anyhow::Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(rows)?),
        "text" => Ok(format_text(rows)),
        other => anyhow::bail!("unknown format '{other}' (expected text or json)"),
    }
}

fn format_text(rows: &[AssignmentPlan]) -> String {
    if rows.is_empty() {
        return "No berth assignments planned".to_string();
    }
    let width = rows
        .iter()
        .map(|row| row.application_id.len())
        .max()
        .unwrap_or(0);
    let mut out = format!("{} berth assignments\n", rows.len());
    for row in rows {
        out.push_str(&format!(
            "  {:<width$}  →  {}  (planned at {})\n",
            row.application_id, row.berth_id, row.created_at
        ));
    }
    out.trim_end().to_string()
}
