//! SIMD batch kernels
//!
//! Runtime-dispatched versions of the hot loops used by the batch APIs.
//! The `multiversion` crate compiles each kernel for every listed target
//! and picks the best one at first call:
//! - x86-64: SSE4.1, AVX2
//! - ARM64: NEON
//!
//! The scalar fallback is always available.

mod batch;
mod matrix;

pub use batch::{clamp_preserving_ratio_batch, spectral_to_xyz_batch};
pub use matrix::{matrix_multiply_vec3, matrix_multiply_vec3_batch};
