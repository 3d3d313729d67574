//! Licensed end-to-end operations with progress reporting

use std::path::Path;

use super::{
    ExchangeError, ExchangeResult, LicenseGate, Mesher, ModelReader, ModelWriter, Simplifier,
    SimplifierParameters, WriterParameters,
};
use crate::config::ExchangeConfig;
use crate::error::ModelError;
use crate::model::Model;
use crate::progress::{ProgressScope, ProgressStatus};

/// Share of the overall progress spent reading
const READ_WEIGHT: f64 = 40.0;

/// Materialization failures caused by a cancel request surface as `Canceled`
fn settle<T>(status: &ProgressStatus, result: ExchangeResult<T>) -> ExchangeResult<T> {
    match result {
        Err(ExchangeError::Model(ModelError::Canceled)) => Err(ExchangeError::Canceled),
        Err(_) if status.was_canceled() => Err(ExchangeError::Canceled),
        other => other,
    }
}

fn bail_if_canceled(status: &ProgressStatus) -> ExchangeResult<()> {
    if status.was_canceled() {
        tracing::info!("Canceled at {:.1}%", status.value());
        return Err(ExchangeError::Canceled);
    }
    Ok(())
}

/// Read `path` and mesh every part
///
/// Reading takes the first 40% of `status` (25% open, 75% transfer) and
/// meshing the rest. Cancellation is checked between the scopes.
pub fn import_and_mesh(
    gate: &LicenseGate,
    reader: &mut dyn ModelReader,
    mesher: &dyn Mesher,
    path: &Path,
    config: &ExchangeConfig,
    status: &ProgressStatus,
) -> ExchangeResult<Model> {
    gate.check()?;
    let root = ProgressScope::root(status);

    let mut model = {
        let scope = root.child(READ_WEIGHT);
        settle(status, reader.read(path, &config.reader, Some(&scope)))?
    };
    bail_if_canceled(status)?;

    {
        let scope = root.child(ProgressScope::REMAINING);
        settle(
            status,
            mesher.compute_model(&mut model, &config.mesher, Some(&scope)),
        )?;
    }
    bail_if_canceled(status)?;
    Ok(model)
}

pub fn simplify(
    gate: &LicenseGate,
    simplifier: &dyn Simplifier,
    model: &Model,
    params: &SimplifierParameters,
    status: &ProgressStatus,
) -> ExchangeResult<Model> {
    gate.check()?;
    let root = ProgressScope::root(status);
    let simplified = settle(status, simplifier.perform(model, params, Some(&root)))?;
    bail_if_canceled(status)?;
    tracing::info!(
        "{} simplified '{}' ({:?})",
        simplifier.name(),
        model.name(),
        params.level
    );
    Ok(simplified)
}

pub fn export(
    gate: &LicenseGate,
    writer: &dyn ModelWriter,
    model: &Model,
    path: &Path,
    params: &WriterParameters,
    status: &ProgressStatus,
) -> ExchangeResult<()> {
    gate.check()?;
    let root = ProgressScope::root(status);
    settle(status, writer.write(model, path, params, Some(&root)))?;
    bail_if_canceled(status)
}
