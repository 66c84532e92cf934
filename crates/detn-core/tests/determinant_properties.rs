use detn_core::batch::{crout_determinant, determinant};
use detn_core::numerics::{CroutScratch, MatrixView};
use detn_core::{
    BatchArray, BatchDeterminant, BatchError, DeterminantConfig, ElementOrder, ExecutionMode,
    SingularMatrixPolicy, batch_determinants,
};

/// Row-major, strictly diagonally dominant, so never singular.
fn well_conditioned(dimension: usize, seed: usize) -> Vec<f64> {
    let mut rows = vec![0.0; dimension * dimension];
    for row in 0..dimension {
        for col in 0..dimension {
            let raw = (row * 7 + col * 3 + seed * 5) % 11;
            rows[row * dimension + col] = raw as f64 - 5.0;
        }
        rows[row * dimension + row] += 6.0 * dimension as f64;
    }
    rows
}

/// Last row equals the one above it plus a tiny perturbation.
fn near_singular(dimension: usize, seed: usize) -> Vec<f64> {
    let mut rows = well_conditioned(dimension, seed);
    let last = dimension - 1;
    for col in 0..dimension {
        rows[last * dimension + col] = rows[(last - 1) * dimension + col];
    }
    rows[last * dimension + seed % dimension] += 1.0e-9;
    rows
}

fn identity(dimension: usize) -> Vec<f64> {
    let mut rows = vec![0.0; dimension * dimension];
    for index in 0..dimension {
        rows[index * dimension + index] = 1.0;
    }
    rows
}

fn transpose(rows: &[f64], dimension: usize) -> Vec<f64> {
    let mut transposed = vec![0.0; rows.len()];
    for row in 0..dimension {
        for col in 0..dimension {
            transposed[col * dimension + row] = rows[row * dimension + col];
        }
    }
    transposed
}

fn single_determinant(rows: &[f64], dimension: usize) -> f64 {
    let config = DeterminantConfig::default().with_element_order(ElementOrder::RowMajor);
    batch_determinants(rows, vec![dimension, dimension], config)
        .expect("determinant should compute")
        .scalar()
        .expect("rank two input yields a scalar")
}

fn assert_relative_close(label: &str, expected: f64, actual: f64, rel_tol: f64) {
    let scale = expected.abs().max(actual.abs()).max(1.0e-300);
    assert!(
        (expected - actual).abs() <= rel_tol * scale,
        "{label}: expected={expected:.17e} actual={actual:.17e}"
    );
}

#[test]
fn identity_determinant_is_exactly_one() {
    for dimension in [2, 3, 4, 5, 8] {
        assert_eq!(
            single_determinant(&identity(dimension), dimension),
            1.0,
            "n={dimension}"
        );
    }
}

#[test]
fn literal_scenarios() {
    assert_eq!(single_determinant(&[1.0, 2.0, 3.0, 4.0], 2), -2.0);
    assert_eq!(
        single_determinant(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0], 3),
        -3.0
    );

    let mut batch = Vec::new();
    for _ in 0..2 {
        batch.extend(identity(4).iter().map(|value| value * 2.0));
    }
    let result = batch_determinants(&batch, vec![4, 4, 2], DeterminantConfig::default())
        .expect("scaled identities");
    assert_eq!(result.values(), &[16.0, 16.0]);
}

#[test]
fn swapping_two_rows_negates_the_determinant() {
    for dimension in 2..=6 {
        let rows = well_conditioned(dimension, dimension);
        let mut swapped = rows.clone();
        for col in 0..dimension {
            swapped.swap(col, (dimension - 1) * dimension + col);
        }

        let original = single_determinant(&rows, dimension);
        let negated = single_determinant(&swapped, dimension);
        assert!(original.abs() > 1.0, "n={dimension} should be well conditioned");
        assert_relative_close(&format!("n={dimension}"), -original, negated, 1.0e-12);
    }
}

#[test]
fn scaling_one_row_scales_the_determinant() {
    let factor = -2.5;
    for dimension in 2..=6 {
        let rows = well_conditioned(dimension, dimension + 1);
        let mut scaled = rows.clone();
        let row = dimension / 2;
        for col in 0..dimension {
            scaled[row * dimension + col] *= factor;
        }

        let original = single_determinant(&rows, dimension);
        let stretched = single_determinant(&scaled, dimension);
        assert_relative_close(&format!("n={dimension}"), factor * original, stretched, 1.0e-12);
    }
}

#[test]
fn closed_forms_agree_with_lu_path_and_block_embedding() {
    for dimension in 1..=3 {
        let rows = well_conditioned(dimension, 3);
        let view = MatrixView::new(&rows, dimension, ElementOrder::RowMajor).expect("view");

        let mut unused = CroutScratch::new(0);
        let mut small = CroutScratch::new(dimension);
        let direct = if dimension == 1 {
            determinant(&view, &mut small).expect("1x1 uses LU")
        } else {
            determinant(&view, &mut unused).expect("closed form")
        };
        let general = crout_determinant(&view, &mut small).expect("LU path");
        assert_relative_close(&format!("n={dimension} LU"), direct, general, 1.0e-12);

        for embedded_dimension in [4, 6] {
            let mut embedded = identity(embedded_dimension);
            for row in 0..dimension {
                for col in 0..dimension {
                    embedded[row * embedded_dimension + col] = rows[row * dimension + col];
                }
            }
            let block = single_determinant(&embedded, embedded_dimension);
            assert_relative_close(
                &format!("n={dimension} embedded in {embedded_dimension}"),
                direct,
                block,
                1.0e-12,
            );
        }
    }
}

#[test]
fn zero_row_aborts_or_records_nan_for_large_matrices() {
    for dimension in [4, 5, 7] {
        let mut rows = well_conditioned(dimension, 1);
        let zero_row = dimension - 2;
        for col in 0..dimension {
            rows[zero_row * dimension + col] = 0.0;
        }

        let abort = DeterminantConfig::default().with_element_order(ElementOrder::RowMajor);
        let error = BatchDeterminant::new(abort)
            .compute(
                &BatchArray::new(&rows, vec![dimension, dimension], ElementOrder::RowMajor)
                    .expect("valid batch"),
            )
            .expect_err("zero row should abort");
        assert_eq!(
            error,
            BatchError::SingularMatrix {
                batch_index: 0,
                row: zero_row
            }
        );

        let record = abort.with_singular_policy(SingularMatrixPolicy::RecordNan);
        let result = batch_determinants(&rows, vec![dimension, dimension], record)
            .expect("zero row is recorded");
        assert!(result.values()[0].is_nan());
        assert_eq!(result.singular_indices(), &[0]);
    }
}

#[test]
fn zero_column_gives_negligible_determinant() {
    for dimension in [4, 6] {
        let mut rows = well_conditioned(dimension, 2);
        for row in 0..dimension {
            rows[row * dimension + 1] = 0.0;
        }

        let value = single_determinant(&rows, dimension);
        assert!(value.is_finite());
        assert!(value.abs() < 1.0e-10, "n={dimension} det={value:e}");
    }
}

#[test]
fn batch_results_match_individual_determinants() {
    let dimension = 5;
    for batch_len in [1usize, 1000] {
        let mut data = Vec::with_capacity(batch_len * dimension * dimension);
        for index in 0..batch_len {
            if index % 3 == 2 {
                data.extend(near_singular(dimension, index));
            } else {
                data.extend(well_conditioned(dimension, index));
            }
        }

        let serial = DeterminantConfig::default().with_element_order(ElementOrder::RowMajor);
        let parallel = serial.with_execution_mode(ExecutionMode::Parallel);
        let shape = vec![batch_len, dimension, dimension];
        let serial_result =
            batch_determinants(&data, shape.clone(), serial).expect("serial batch");
        let parallel_result = batch_determinants(&data, shape, parallel).expect("parallel batch");

        assert_eq!(serial_result.shape(), &[batch_len]);
        assert_eq!(serial_result.len(), batch_len);
        for index in 0..batch_len {
            let block = &data[index * dimension * dimension..(index + 1) * dimension * dimension];
            let expected = single_determinant(block, dimension);
            assert_eq!(
                serial_result.values()[index].to_bits(),
                expected.to_bits(),
                "batch index {index}"
            );
            assert_eq!(
                parallel_result.values()[index].to_bits(),
                expected.to_bits(),
                "parallel batch index {index}"
            );
        }
    }
}

#[test]
fn storage_order_does_not_change_results() {
    for dimension in [2, 3, 4, 7] {
        let rows = well_conditioned(dimension, 4);
        let columns = transpose(&rows, dimension);

        let row_major = single_determinant(&rows, dimension);
        let column_major =
            batch_determinants(&columns, vec![dimension, dimension], DeterminantConfig::default())
                .expect("column-major")
                .scalar()
                .expect("scalar");
        assert_eq!(row_major.to_bits(), column_major.to_bits(), "n={dimension}");
    }
}

#[test]
fn input_storage_is_left_untouched() {
    let data = well_conditioned(6, 9);
    let before = data.clone();
    let input = BatchArray::new(&data, vec![6, 6], ElementOrder::RowMajor).expect("valid batch");
    BatchDeterminant::default()
        .compute(&input)
        .expect("determinant");
    assert_eq!(data, before);
}
