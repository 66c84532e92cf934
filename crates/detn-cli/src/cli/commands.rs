use super::CliError;
use super::helpers::{
    ConfigOverrides, read_array_document, read_text_input, resolve_config, warn_on_order_conflict,
};
use anyhow::Context;
use detn_core::numerics::{NumericTolerance, compare_with_tolerance, format_determinant};
use detn_core::serialization::{
    DeterminantDocument, compute_document, parse_determinant_document, render_json_document,
    write_text_artifact,
};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct ComputeArgs {
    /// Input array document (JSON with `shape`, `data` and an optional `order`)
    #[arg(long)]
    input: PathBuf,

    /// Where to write the determinant document; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

#[derive(clap::Args)]
pub(super) struct CheckArgs {
    /// Input array document
    #[arg(long)]
    input: PathBuf,

    /// Expected determinant document
    #[arg(long)]
    expected: PathBuf,

    /// Absolute tolerance
    #[arg(long = "abs-tol", default_value_t = NumericTolerance::default().abs_tol)]
    abs_tol: f64,

    /// Relative tolerance
    #[arg(long = "rel-tol", default_value_t = NumericTolerance::default().rel_tol)]
    rel_tol: f64,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

pub(super) fn run_compute_command(args: ComputeArgs) -> Result<i32, CliError> {
    let config = resolve_config(&args.overrides)?;
    let document = read_array_document(&args.input)?;
    warn_on_order_conflict(&args.overrides, &document);
    let result = compute_document(&document, config).map_err(CliError::Compute)?;
    let rendered =
        render_json_document(&DeterminantDocument::from(&result)).map_err(CliError::Compute)?;

    match &args.output {
        Some(output) => {
            write_text_artifact(output, &rendered).with_context(|| {
                format!("failed to write determinant document '{}'", output.display())
            })?;
            tracing::info!(
                path = %output.display(),
                determinants = result.len(),
                singular = result.singular_indices().len(),
                "wrote determinant document"
            );
        }
        None => print!("{rendered}"),
    }

    Ok(0)
}

pub(super) fn run_check_command(args: CheckArgs) -> Result<i32, CliError> {
    let config = resolve_config(&args.overrides)?;
    let document = read_array_document(&args.input)?;
    warn_on_order_conflict(&args.overrides, &document);
    let expected_source = read_text_input(&args.expected, "expected determinant document")?;
    let expected = parse_determinant_document(&expected_source).map_err(CliError::Compute)?;
    let actual = compute_document(&document, config).map_err(CliError::Compute)?;

    let tolerance = NumericTolerance {
        abs_tol: args.abs_tol,
        rel_tol: args.rel_tol,
        ..NumericTolerance::default()
    };

    let mut mismatches = Vec::new();
    if expected.shape != actual.shape() {
        mismatches.push(format!(
            "shape: expected {:?} actual {:?}",
            expected.shape,
            actual.shape()
        ));
    }
    if expected.singular_indices != actual.singular_indices() {
        mismatches.push(format!(
            "singularIndices: expected {:?} actual {:?}",
            expected.singular_indices,
            actual.singular_indices()
        ));
    }

    let expected_values = expected.values();
    if expected_values.len() != actual.len() {
        mismatches.push(format!(
            "determinants: expected {} entries, computed {}",
            expected_values.len(),
            actual.len()
        ));
    } else {
        for (index, (&want, &got)) in expected_values.iter().zip(actual.values()).enumerate() {
            let comparison = compare_with_tolerance(want, got, tolerance);
            if !comparison.passes {
                mismatches.push(format!(
                    "determinants[{index}]: expected {} actual {} abs_diff={:.3e} rel_diff={:.3e}",
                    format_determinant(want),
                    format_determinant(got),
                    comparison.abs_diff,
                    comparison.rel_diff
                ));
            }
        }
    }

    if mismatches.is_empty() {
        println!(
            "PASS {} determinants within abs_tol={:e} rel_tol={:e}",
            actual.len(),
            tolerance.abs_tol,
            tolerance.rel_tol
        );
        return Ok(0);
    }

    for mismatch in &mismatches {
        println!("MISMATCH {mismatch}");
    }
    println!("FAIL {} mismatches", mismatches.len());
    tracing::warn!(mismatches = mismatches.len(), "determinant check failed");
    Ok(1)
}
