use std::path::PathBuf;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Two `measure-complexity` runs over the same program, two trials each.
pub fn runs_dir() -> PathBuf {
    fixture("runs")
}
