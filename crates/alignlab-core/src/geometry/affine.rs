//! 2x3 affine transforms for alignment.
//!
//! All alignment operations (translate, rotate, zoom about the image
//! center) compose into a single matrix, so repeated micro-adjustments
//! never accumulate drift the way sequential discrete warps would.
//!
//! The matrix maps source coordinates into the destination frame:
//! ```text
//! dst_x = a * src_x + b * src_y + tx
//! dst_y = c * src_x + d * src_y + ty
//! ```

/// A 2x3 row-major affine transform: `[a, b, tx, c, d, ty]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    /// Matrix entries in row-major order.
    pub m: [f64; 6],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            m: [1.0, 0.0, tx, 0.0, 1.0, ty],
        }
    }

    /// Rotation by `angle_degrees` combined with uniform `scale`, both
    /// about the point `(cx, cy)`.
    ///
    /// Positive angles rotate counter-clockwise in image coordinates
    /// (y pointing down), matching the interactive rotate keys.
    pub fn rotation_scale_about(cx: f64, cy: f64, angle_degrees: f64, scale: f64) -> Self {
        let theta = angle_degrees.to_radians();
        let alpha = scale * theta.cos();
        let beta = scale * theta.sin();
        Self {
            m: [
                alpha,
                beta,
                (1.0 - alpha) * cx - beta * cy,
                -beta,
                alpha,
                beta * cx + (1.0 - alpha) * cy,
            ],
        }
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, tx, c, d, ty] = self.m;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// Compose: apply `self` first, then `next`.
    pub fn then(&self, next: &Self) -> Self {
        let [a1, b1, tx1, c1, d1, ty1] = self.m;
        let [a2, b2, tx2, c2, d2, ty2] = next.m;
        Self {
            m: [
                a2 * a1 + b2 * c1,
                a2 * b1 + b2 * d1,
                a2 * tx1 + b2 * ty1 + tx2,
                c2 * a1 + d2 * c1,
                c2 * b1 + d2 * d1,
                c2 * tx1 + d2 * ty1 + ty2,
            ],
        }
    }

    /// The same transform with an extra translation added on top.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut m = self.m;
        m[2] += dx;
        m[5] += dy;
        Self { m }
    }

    /// The same transform with its translation entries multiplied by
    /// `factor`, leaving the linear part untouched.
    ///
    /// This is the conjugation identity used to move a transform between
    /// resolutions: for a uniform scale `S` by `s`, `S * M * S^-1` keeps
    /// the linear part of `M` and scales its translation by `s`.
    pub fn with_translation_scaled(&self, factor: f64) -> Self {
        let mut m = self.m;
        m[2] *= factor;
        m[5] *= factor;
        Self { m }
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        let [a, b, _, c, d, _] = self.m;
        a * d - b * c
    }

    /// Closed-form inverse. Returns `None` for a degenerate transform.
    pub fn invert(&self) -> Option<Self> {
        let [a, b, tx, c, d, ty] = self.m;
        let det = a * d - b * c;
        if det.abs() < 1e-12 {
            return None;
        }
        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;
        Some(Self {
            m: [
                ia,
                ib,
                -(ia * tx + ib * ty),
                ic,
                id,
                -(ic * tx + id * ty),
            ],
        })
    }

    /// Entry-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(x, y)| (x - y).abs() <= epsilon)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn transform_strategy() -> impl Strategy<Value = AffineTransform> {
        (
            -200.0f64..=200.0,
            -200.0f64..=200.0,
            -45.0f64..=45.0,
            0.5f64..=2.0,
            -50.0f64..=50.0,
            -50.0f64..=50.0,
        )
            .prop_map(|(cx, cy, angle, scale, dx, dy)| {
                AffineTransform::rotation_scale_about(cx, cy, angle, scale).translated(dx, dy)
            })
    }

    proptest! {
        /// Property: Inverting twice returns the original transform.
        #[test]
        fn prop_double_invert_is_identity(t in transform_strategy()) {
            let back = t.invert().unwrap().invert().unwrap();
            prop_assert!(back.approx_eq(&t, 1e-6));
        }

        /// Property: A transform composed with its inverse is the identity.
        #[test]
        fn prop_compose_with_inverse_is_identity(t in transform_strategy()) {
            let inv = t.invert().unwrap();
            prop_assert!(t.then(&inv).approx_eq(&AffineTransform::IDENTITY, 1e-6));
            prop_assert!(inv.then(&t).approx_eq(&AffineTransform::IDENTITY, 1e-6));
        }

        /// Property: Composition agrees with applying transforms in sequence.
        #[test]
        fn prop_then_matches_sequential_apply(
            t1 in transform_strategy(),
            t2 in transform_strategy(),
            x in -500.0f64..=500.0,
            y in -500.0f64..=500.0,
        ) {
            let (sx, sy) = t1.apply(x, y);
            let (ex, ey) = t2.apply(sx, sy);
            let (cx, cy) = t1.then(&t2).apply(x, y);
            prop_assert!((cx - ex).abs() < 1e-6, "x: {} vs {}", cx, ex);
            prop_assert!((cy - ey).abs() < 1e-6, "y: {} vs {}", cy, ey);
        }

        /// Property: Round-tripping a point through a transform and its
        /// inverse returns the original point.
        #[test]
        fn prop_point_round_trip(
            t in transform_strategy(),
            x in -500.0f64..=500.0,
            y in -500.0f64..=500.0,
        ) {
            let inv = t.invert().unwrap();
            let (fx, fy) = t.apply(x, y);
            let (bx, by) = inv.apply(fx, fy);
            prop_assert!((bx - x).abs() < 1e-5);
            prop_assert!((by - y).abs() < 1e-5);
        }
    }
}
