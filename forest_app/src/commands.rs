//! Export and import subcommands

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use forest_io::core::{ExportConfig, ImportConfig};
use forest_io::forest::{
    export_to_path, with_format_extension, ErrorPolicy, ForestFormat, ObjectKind, PlacementRecord,
};
use forest_io::foundation::logging::{info, warn};
use forest_io::scene::{SceneCollections, SceneImporter};

use crate::AppError;

/// Command-line flags win over the configuration file
pub fn apply_export_args(config: &mut ExportConfig, tag: Option<String>, format: Option<ForestFormat>) {
    if let Some(tag) = tag {
        config.type_tag = tag;
    }
    if let Some(format) = format {
        config.format = format;
    }
}

/// `--fail-fast` only ever tightens the configured policy
pub fn apply_import_args(config: &mut ImportConfig, kind: Option<ObjectKind>, fail_fast: bool) {
    if let Some(kind) = kind {
        config.object_kind = kind;
    }
    if fail_fast {
        config.error_policy = ErrorPolicy::FailFast;
    }
}

/// Read a placement list, choosing RON or JSON by extension
pub fn load_placements(path: &Path) -> Result<Vec<PlacementRecord>, AppError> {
    let contents = fs::read_to_string(path)?;
    let parsed = match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => ron::from_str(&contents).map_err(|e| e.to_string()),
        Some("json") => serde_json::from_str(&contents).map_err(|e| e.to_string()),
        _ => Err("expected a .ron or .json placement list".to_string()),
    };

    parsed.map_err(|reason| AppError::Placements {
        path: path.to_path_buf(),
        reason,
    })
}

pub fn run_export(config: &ExportConfig, input: &Path, output: &Path) -> Result<(), AppError> {
    let records = load_placements(input)?;
    let target = with_format_extension(output, config.format);

    export_to_path(&target, &config.type_tag, &records, config.format)?;
    info!("Wrote {} items to {}", records.len(), target.display());
    Ok(())
}

/// Import into a fresh scene and print its instructions as JSON lines
pub fn run_import(config: &ImportConfig, input: &Path) -> Result<(), AppError> {
    let mut scene = SceneCollections::new();
    let result = SceneImporter::with_config(config).import_path(&mut scene, input)?;

    for failure in &result.failures {
        eprintln!("line {}: {}", failure.line, failure.error);
    }
    if !result.failures.is_empty() {
        warn!("{} lines skipped", result.failures.len());
    }

    let mut out = BufWriter::new(io::stdout().lock());
    if let Some(collection) = scene.collection(&result.collection) {
        for instance in &collection.instances {
            serde_json::to_writer(&mut out, instance)?;
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;
    Ok(())
}
