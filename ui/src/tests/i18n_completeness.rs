use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const FTL_FILENAME: &str = "testwatch-ui.ftl";
const I18N_DIR: &str = "i18n";

/// Message ids defined in a Fluent file (`id = ...` lines; terms and
/// comments skipped).
fn parse_ftl_keys(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| line.split_once('=').map(|(id, _)| id.trim()))
        .filter(|id| !id.is_empty() && id.chars().all(valid_key_char))
        .map(str::to_string)
        .collect()
}

fn valid_key_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-')
}

/// Literal ids passed to `t!("...")` anywhere under `src/`.
fn referenced_keys(src_root: &Path) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut stack = vec![src_root.to_path_buf()];

    while let Some(path) = stack.pop() {
        if path.is_dir() {
            if let Ok(read_dir) = fs::read_dir(&path) {
                stack.extend(read_dir.flatten().map(|entry| entry.path()));
            }
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for chunk in content.split("t!(\"").skip(1) {
            if let Some(end) = chunk.find('"') {
                let key = &chunk[..end];
                if !key.is_empty() && key.chars().all(valid_key_char) {
                    found.insert(key.to_string());
                }
            }
        }
    }

    found
}

fn locale_dirs(i18n_root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(i18n_root)
        .map(|read_dir| {
            read_dir
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect()
        })
        .unwrap_or_default();
    dirs.sort();
    dirs
}

#[test]
fn every_referenced_key_exists_in_every_locale() {
    let crate_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let i18n_root = crate_root.join(I18N_DIR);
    let referenced = referenced_keys(&crate_root.join("src"));
    assert!(!referenced.is_empty(), "no t!(...) lookups found under src/");

    let dirs = locale_dirs(&i18n_root);
    assert!(
        dirs.iter().any(|dir| dir.ends_with("en-US")),
        "missing fallback locale directory under {i18n_root:?}"
    );

    let mut report = Vec::new();
    for dir in dirs {
        let path = dir.join(FTL_FILENAME);
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("cannot read {path:?}: {err}"));
        let defined = parse_ftl_keys(&content);
        let missing: Vec<_> = referenced.difference(&defined).cloned().collect();
        if !missing.is_empty() {
            report.push(format!("{}: {}", dir.display(), missing.join(", ")));
        }
    }

    assert!(
        report.is_empty(),
        "keys used in code but not translated:\n  {}",
        report.join("\n  ")
    );
}
