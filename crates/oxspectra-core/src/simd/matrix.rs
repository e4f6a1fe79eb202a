//! 3x3 matrix kernels for tristimulus conversion

use multiversion::multiversion;

/// Multiply a row-major 3x3 matrix by a vector
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn matrix_multiply_vec3(matrix: &[[f64; 3]; 3], vec: [f64; 3]) -> [f64; 3] {
    [
        matrix[0][0] * vec[0] + matrix[0][1] * vec[1] + matrix[0][2] * vec[2],
        matrix[1][0] * vec[0] + matrix[1][1] * vec[1] + matrix[1][2] * vec[2],
        matrix[2][0] * vec[0] + matrix[2][1] * vec[1] + matrix[2][2] * vec[2],
    ]
}

/// Multiply a row-major 3x3 matrix by every vector of a batch
///
/// # Panics
/// If `output` is shorter than `input`.
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn matrix_multiply_vec3_batch(
    matrix: &[[f64; 3]; 3],
    input: &[[f64; 3]],
    output: &mut [[f64; 3]],
) {
    assert!(output.len() >= input.len());

    // Hoisted so the loop body stays in registers
    let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = *matrix;

    for (inp, out) in input.iter().zip(output.iter_mut()) {
        let [a, b, c] = *inp;
        out[0] = m00 * a + m01 * b + m02 * c;
        out[1] = m10 * a + m11 * b + m12 * c;
        out[2] = m20 * a + m21 * b + m22 * c;
    }
}
