use anyhow::{Context, Result};
use stargaze_core::Repository;
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Read repository records from a `.json`/`.jsonl` file, or every such file under a directory.
pub fn load_repositories(input: &Path) -> Result<Vec<Repository>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        let entries = WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok());
        for entry in entries {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input path {} does not exist", input.display());
    }

    let mut repos = Vec::new();
    for file in files {
        let before = repos.len();
        if extension(&file) == Some("jsonl") {
            load_jsonl(&file, &mut repos)?;
        } else {
            load_json(&file, &mut repos)?;
        }
        let count = repos.len() - before;
        tracing::debug!(file = %file.display(), count, "loaded repositories");
    }
    Ok(repos)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn open(file: &Path) -> Result<BufReader<File>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    Ok(BufReader::new(f))
}

fn load_jsonl(file: &Path, repos: &mut Vec<Repository>) -> Result<()> {
    let reader = open(file)?;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let repo: Repository = serde_json::from_str(&line).with_context(|| {
            format!("{}:{}: invalid repository record", file.display(), line_no + 1)
        })?;
        repos.push(repo);
    }
    Ok(())
}

fn load_json(file: &Path, repos: &mut Vec<Repository>) -> Result<()> {
    let reader = open(file)?;
    let invalid = || format!("{}: invalid repository record", file.display());
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("{}: invalid JSON", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                repos.push(serde_json::from_value(v).with_context(invalid)?);
            }
        }
        serde_json::Value::Object(_) => {
            repos.push(serde_json::from_value(json).with_context(invalid)?);
        }
        _ => anyhow::bail!("{}: expected a repository object or an array of them", file.display()),
    }
    Ok(())
}
