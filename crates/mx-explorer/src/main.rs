//! Reads the built-in sample, meshes it and prints every exploration report
//!
//! Usage: `mx-explorer [config.ron]`

mod demo;
mod mesher;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use mx_core::exchange::{ExchangeError, ExchangeResult, LicenseManager, import_and_mesh};
use mx_core::explore::{
    SceneStats, bill_of_materials, collect_appearances, collect_properties, explore_brep,
    explore_geometry, explore_pmi, explore_poly, fill_default_layers, instance_transforms,
    layer_statistics, remove_elements_named,
};
use mx_core::{ExchangeConfig, LicenseGate, ProgressObserver, ProgressStatus};

use crate::demo::{SAMPLE_PATH, SampleReader};
use crate::mesher::PlanarMesher;

/// Accepts any non-empty key; stands in for a vendor license service
struct OfflineLicense;

impl LicenseManager for OfflineLicense {
    fn activate(&self, key: &str) -> ExchangeResult<()> {
        if key.trim().is_empty() {
            return Err(ExchangeError::License("empty license key".into()));
        }
        Ok(())
    }
}

/// Logs progress in steps of ten percent
#[derive(Default)]
struct LogProgress {
    last_step: AtomicU64,
}

impl ProgressObserver for LogProgress {
    fn changed_value(&self, value: f64) {
        let step = (value / 10.0).floor() as u64;
        if self.last_step.fetch_max(step, Ordering::Relaxed) < step {
            tracing::info!("Progress: {:.0}%", value);
        }
    }

    fn completed(&self) {
        tracing::info!("Import completed");
    }

    fn canceled(&self) {
        tracing::warn!("Import canceled");
    }
}

fn section(title: &str) {
    println!();
    println!("===== {title} =====");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mx_explorer=info,mx_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ExchangeConfig::load_or_default(path)?,
        None => ExchangeConfig::default(),
    };

    let gate = LicenseGate::new(Arc::new(OfflineLicense));
    gate.activate(config.license_key.as_deref().unwrap_or("evaluation"))?;

    let status = ProgressStatus::new();
    let _guard = status.register(Arc::new(LogProgress::default()));
    let mut model = import_and_mesh(
        &gate,
        &mut SampleReader::default(),
        &PlanarMesher,
        Path::new(SAMPLE_PATH),
        &config,
        &status,
    )?;
    fill_default_layers(&mut model)?;

    section("Bill of materials");
    print!("{}", bill_of_materials(&model));

    section("Transformations");
    for transform in instance_transforms(&model) {
        print!("{transform}");
    }

    section("B-Rep");
    print!("{}", explore_brep(&model)?);

    section("Geometry");
    for part in explore_geometry(&model)? {
        println!("Part {}:", part.part);
        for line in &part.lines {
            println!("{line}");
        }
    }

    section("Appearances");
    print!("{}", collect_appearances(&model)?);

    section("Properties");
    for properties in collect_properties(&model)? {
        print!("{properties}");
    }

    section("PMI");
    for pmi in explore_pmi(&model)? {
        println!("Element {}:", pmi.element);
        for line in &pmi.lines {
            println!("  {line}");
        }
    }

    section("Poly");
    print!("{}", explore_poly(&model)?);

    section("Layers");
    for stats in layer_statistics(&model) {
        println!("{stats}");
    }

    section("Removal");
    println!("Before: {}", SceneStats::of(&model)?);
    let summary = remove_elements_named(&mut model, "bolt");
    println!(
        "Removed {} roots named 'bolt' and {} instances of 'bolt'",
        summary.roots, summary.instances
    );
    println!("After: {}", SceneStats::of(&model)?);

    tracing::info!("Completed");
    Ok(())
}
