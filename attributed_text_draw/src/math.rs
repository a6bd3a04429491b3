// Copyright 2025 the Vello Authors and the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mathematical helper functions.

use crate::kurbo::Affine;

/// Whether `transform` only translates.
pub(crate) fn is_translation_only(transform: Affine) -> bool {
    let [a, b, c, d, _, _] = transform.as_coeffs();
    a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0
}

/// Whether `transform` collapses the plane onto a line or a point.
pub(crate) fn is_singular(transform: Affine) -> bool {
    transform.determinant().abs() <= f64::EPSILON
}
