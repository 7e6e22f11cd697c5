//! Build script for rnx-la
//!
//! Stamps the binary with the source revision and build date so a results
//! workbook can be traced back to the aggregator that produced it.
//! `SOURCE_DATE_EPOCH` pins the date for reproducible builds.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    println!("cargo:rustc-env=RNX_SOURCE_REVISION={}", source_revision());
    println!("cargo:rustc-env=RNX_BUILD_DATE={}", build_date());
    println!(
        "cargo:rustc-env=RNX_BUILD_PROFILE={}",
        env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string())
    );
}

/// Nearest tag plus commit, `-dirty` for uncommitted changes
fn source_revision() -> String {
    Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unversioned".to_string())
}

/// UTC calendar date of the build
fn build_date() -> String {
    let now = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|epoch| epoch.trim().parse::<i64>().ok())
        .and_then(|secs| chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0))
        .unwrap_or_else(chrono::Utc::now);
    now.format("%Y-%m-%d").to_string()
}
