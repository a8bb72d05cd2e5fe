use std::path::PathBuf;

use crate::analysis::compare::compare;

use super::load_summaries;

pub fn run(paths: &[PathBuf]) -> anyhow::Result<()> {
    let summaries = load_summaries(paths);
    let comparison = compare(summaries)?;

    println!("{}", serde_json::to_string_pretty(&comparison)?);

    eprintln!(
        "dataco-jumps: compared {} datasets ({} common tags)",
        comparison.datasets.len(),
        comparison.common_tags.len()
    );
    Ok(())
}
