//! Headless breach playback.
//!
//! Replays a script through the infiltration engine and prints the JSON
//! report to stdout. Pass a script path as the first argument, or run the
//! embedded demo. Logs go to stderr so the report stays parseable.

use anyhow::{Context, Result};
use chrono::Utc;

use coldwire_core::{load_profiles, run_script, InfiltrationScript, ProfileSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("coldwire_core=info")
        .with_writer(std::io::stderr)
        .init();

    let profiles = load_profiles(ProfileSource::Embedded).context("load security profiles")?;

    let script: InfiltrationScript = match std::env::args().nth(1) {
        Some(path) => {
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("read script {path}"))?;
            serde_yaml::from_str(&text).with_context(|| format!("parse script {path}"))?
        }
        None => serde_yaml::from_str(include_str!("../../data/demo_breach.yaml"))
            .context("parse embedded demo script")?,
    };

    let report = run_script(&script, &profiles, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
