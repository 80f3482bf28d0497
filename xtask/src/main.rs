//! Custom cargo commands for apiscope.
//!
//! Usage:
//!   cargo xtask verify          - Full suite (markers, defaults, tests, clippy)
//!   cargo xtask test            - Run all tests
//!   cargo xtask check           - Quick check (check + test + clippy)
//!   cargo xtask bench           - Run criterion benchmarks
//!   cargo xtask fuzz <target>   - Run a cargo-fuzz target for 60s

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let task = args.next();
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => run_cargo(&["test"])?,
        Some("check") => check()?,
        Some("bench") => run_cargo(&["bench"])?,
        Some("fuzz") => fuzz(args.next().as_deref())?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify          Invariant markers, documented defaults, tests, clippy
  test            Run all tests
  check           Quick check (cargo check + test + clippy)
  bench           Run benchmarks
  fuzz <target>   Run a fuzz target (search_queries, filter_state)
"#
    );
}

fn verify() -> Result<()> {
    println!("==========================================");
    println!("apiscope verification");
    println!("==========================================\n");

    println!("[1/4] Checking invariant sections...");
    check_invariant_markers()?;
    println!("✓ Invariant sections present\n");

    println!("[2/4] Checking documented defaults...");
    verify_defaults()?;
    println!("✓ Config docs match the constants\n");

    println!("[3/4] Running tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All tests passed\n");

    println!("[4/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--all-targets", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");
    Ok(())
}

fn check() -> Result<()> {
    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

fn fuzz(target: Option<&str>) -> Result<()> {
    let Some(target) = target else {
        bail!("usage: cargo xtask fuzz <target>");
    };
    let root = project_root()?;
    let status = Command::new("cargo")
        .args(["+nightly", "fuzz", "run", target, "--", "-max_total_time=60"])
        .current_dir(&root)
        .status()
        .context("Failed to run cargo fuzz (is cargo-fuzz installed?)")?;
    if !status.success() {
        bail!("fuzz target {} failed", target);
    }
    Ok(())
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("no current directory")?,
    };
    // xtask lives in <root>/xtask
    Ok(manifest_dir.parent().unwrap_or(&manifest_dir).to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .current_dir(project_root()?)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }
    Ok(())
}

/// Modules that state their invariants must keep doing so.
fn check_invariant_markers() -> Result<()> {
    let src = project_root()?.join("src");
    let expected = ["index.rs", "debounce.rs"];

    for file in expected {
        let text = read(&src.join(file))?;
        if !text.contains("# INVARIANTS (DO NOT VIOLATE)") {
            bail!("{} lost its INVARIANTS section", file);
        }
    }
    Ok(())
}

/// The JSON example in config.rs documents the defaults; keep it honest.
fn verify_defaults() -> Result<()> {
    let src = project_root()?.join("src");
    let cache = read(&src.join("cache.rs"))?;
    let debounce = read(&src.join("debounce.rs"))?;
    let config = read(&src.join("config.rs"))?;

    let checks = [
        ("cacheTtlMs", millis_const(&cache, "DEFAULT_TTL")),
        ("cacheMaxEntries", usize_const(&cache, "DEFAULT_MAX_ENTRIES")),
        ("cacheRetainEntries", usize_const(&cache, "DEFAULT_RETAIN_ENTRIES")),
        ("debounceDelayMs", millis_const(&debounce, "DEFAULT_DELAY")),
    ];

    for (key, constant) in checks {
        let Some(constant) = constant else {
            bail!("could not find the constant behind {}", key);
        };
        let documented = documented_value(&config, key)
            .with_context(|| format!("{} missing from the config.rs example", key))?;
        if documented != constant {
            bail!("{}: documented {} but the code says {}", key, documented, constant);
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn digits(text: &str) -> Option<u64> {
    let number: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '_')
        .filter(|c| *c != '_')
        .collect();
    number.parse().ok()
}

// `pub const DEFAULT_TTL: Duration = Duration::from_millis(60_000);`
fn millis_const(source: &str, name: &str) -> Option<u64> {
    source
        .lines()
        .find(|line| line.contains(&format!("const {}:", name)))
        .and_then(|line| line.split("from_millis(").nth(1))
        .and_then(digits)
}

// `pub const DEFAULT_MAX_ENTRIES: usize = 100;`
fn usize_const(source: &str, name: &str) -> Option<u64> {
    source
        .lines()
        .find(|line| line.contains(&format!("const {}:", name)))
        .and_then(|line| line.split('=').nth(1))
        .and_then(digits)
}

// `//!   "cacheTtlMs": 60000,`
fn documented_value(source: &str, key: &str) -> Option<u64> {
    source
        .lines()
        .filter(|line| line.trim_start().starts_with("//!"))
        .find(|line| line.contains(&format!("\"{}\"", key)))
        .and_then(|line| line.split(':').nth(1))
        .and_then(digits)
}
