use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::config;

#[derive(Debug, Serialize)]
struct CheckReport {
    exists: bool,
    checked_path: String,
    results: BTreeMap<String, usize>,
}

/// Report how many jump files each dataset has under the base directory.
pub fn run(datacos: &[String], base_dir: Option<&Path>) -> anyhow::Result<()> {
    let base_dir = config::detect_base_dir(base_dir)?;

    let mut results = BTreeMap::new();
    for dataco in datacos {
        let files = config::find_dataco_files(&base_dir, dataco)?;
        results.insert(dataco.clone(), files.len());
    }

    let report = CheckReport {
        exists: results.values().any(|&n| n > 0),
        checked_path: base_dir.display().to_string(),
        results,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_existing_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("SBS1");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(project.join("s_vt_DATACO-11.jump"), "").unwrap();

        run(&["11".to_string(), "12".to_string()], Some(dir.path())).unwrap();
        assert!(run(&["11".to_string()], Some(dir.path().join("missing").as_path())).is_err());
    }
}
