//! Prediction Output Writer
//!
//! Output is written to a temporary file next to its destination and only
//! moved into place once fully flushed, so a failed run never leaves a
//! partial file at the requested path.

use inference_engine::SOURCE_RECEIVER_CONFIGS;
use ndarray::ArrayView2;
use profile_parser::DepthArray;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use tracing::info;

/// Errors while writing the output file
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to move output into place at {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prediction matrix has {rows}x{columns} values for {depths} depths and {configs} configurations")]
    ShapeMismatch {
        rows: usize,
        columns: usize,
        depths: usize,
        configs: usize,
    },
}

/// Depth column: integers without decimals, everything else with one
pub fn format_depth(depth: f32) -> String {
    if depth.fract() == 0.0 {
        format!("{}", depth as i64)
    } else {
        format!("{:.1}", depth)
    }
}

/// Header line: `DEPT` followed by the configuration names
pub fn header() -> String {
    format!("DEPT  {}", SOURCE_RECEIVER_CONFIGS.join("  "))
}

/// Render the full output document
pub fn render<W: Write>(
    writer: &mut W,
    depths: &DepthArray,
    predictions: ArrayView2<'_, f32>,
) -> Result<(), OutputError> {
    let (rows, columns) = predictions.dim();
    if rows != depths.len() || columns != SOURCE_RECEIVER_CONFIGS.len() {
        return Err(OutputError::ShapeMismatch {
            rows,
            columns,
            depths: depths.len(),
            configs: SOURCE_RECEIVER_CONFIGS.len(),
        });
    }

    writeln!(writer, "{}", header())?;
    for (depth, row) in depths.values().iter().zip(predictions.rows()) {
        let values: Vec<String> = row.iter().map(|v| format!("{:10.3}", v)).collect();
        writeln!(writer, "{:>6}  {}", format_depth(*depth), values.join("  "))?;
    }
    Ok(())
}

/// Write predictions to `output_path`, or to a fresh `predictions_*.dat`
/// file in `output_dir` (system temp dir if unset). Returns the final path.
pub fn write_predictions(
    depths: &DepthArray,
    predictions: ArrayView2<'_, f32>,
    output_path: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<PathBuf, OutputError> {
    let mut file = staging_file(output_path, output_dir)?;

    {
        let mut writer = BufWriter::new(&mut file);
        render(&mut writer, depths, predictions)?;
        writer.flush()?;
    }
    file.as_file().sync_all()?;

    let path = match output_path {
        Some(path) => {
            file.persist(path).map_err(|e| OutputError::Persist {
                path: path.to_path_buf(),
                source: e.error,
            })?;
            path.to_path_buf()
        }
        None => {
            let (_, path) = file.keep().map_err(|e| OutputError::Persist {
                path: e.file.path().to_path_buf(),
                source: e.error,
            })?;
            path
        }
    };

    info!("Wrote {} prediction rows to {}", depths.len(), path.display());
    Ok(path)
}

fn staging_file(output_path: Option<&Path>, output_dir: Option<&Path>) -> Result<NamedTempFile, OutputError> {
    let file = match output_path {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            Builder::new()
                .prefix(".predictions_")
                .suffix(".partial")
                .tempfile_in(dir)?
        }
        None => {
            let mut builder = Builder::new();
            builder.prefix("predictions_").suffix(".dat");
            match output_dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            }
        }
    };
    Ok(file)
}
