//! Affine transformation matrices.

/// A 2D affine transformation matrix.
///
/// The six components encode the 3×3 matrix `[a b 0; c d 0; e f 1]`, applied
/// to row vectors: `[x' y' 1] = [x y 1] × M`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity transformation.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// A pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Build a matrix from `[a, b, c, d, e, f]`.
    pub fn from_array(values: [f64; 6]) -> Self {
        let [a, b, c, d, e, f] = values;
        Self::new(a, b, c, d, e, f)
    }

    /// The components as `[a, b, c, d, e, f]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Compose `other` in front of `self`.
    ///
    /// The result is `other × self`: transforming a point with the result is
    /// the same as transforming it with `other` first and `self` second. This
    /// is how the `cm` operator updates the current transformation matrix.
    pub fn pre_multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: other.a * self.a + other.b * self.c,
            b: other.a * self.b + other.b * self.d,
            c: other.c * self.a + other.d * self.c,
            d: other.c * self.b + other.d * self.d,
            e: other.e * self.a + other.f * self.c + self.e,
            f: other.e * self.b + other.f * self.d + self.f,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}
