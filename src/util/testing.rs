//! Test support: one-time logging setup and model fixtures.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Car ← Engine ← Piston, with Engine exactly once per Car and 1..4 Pistons per Engine.
pub const CAR_MODEL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Model>
    <Class name="Car" isRoot="true" documentation="A passenger car">
        <Attribute name="brand" type="string"/>
        <Attribute name="year" type="int"/>
    </Class>
    <Class name="Engine" documentation="Combustion engine">
        <Attribute name="power" type="double"/>
    </Class>
    <Class name="Piston"/>
    <Aggregation source="Engine" target="Car" sourceMultiplicity="1" targetMultiplicity="1"/>
    <Aggregation source="Piston" target="Engine" sourceMultiplicity="1..4" targetMultiplicity="1"/>
</Model>
"#;

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Write a model document into `dir` and return its path.
pub fn write_model(dir: &Path, name: &str, xml: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, xml).expect("write model file");
    path
}
