//! Geometric primitives on 3D points
//!
//! Pure functions used by the basis solver. Points are plain `[f64; 3]`.

/// A point or vector in 3D
pub type Point3 = [f64; 3];

#[inline]
pub fn sub(a: &Point3, b: &Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn dot(a: &Point3, b: &Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: &Point3, b: &Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Squared Euclidean distance between two points
#[inline]
pub fn squared_distance(a: &Point3, b: &Point3) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Area of triangle (a, b, c) and its unit normal.
///
/// The normal follows the right-hand rule on (b - a) x (c - a). For a
/// degenerate triangle the area is zero and the normal is left as zero.
pub fn signed_area(a: &Point3, b: &Point3, c: &Point3) -> (f64, Point3) {
    let n = cross(&sub(b, a), &sub(c, a));
    let mag = dot(&n, &n).sqrt();

    if mag == 0.0 {
        return (0.0, [0.0; 3]);
    }
    (0.5 * mag, [n[0] / mag, n[1] / mag, n[2] / mag])
}

/// Determinant of the 3x3 matrix with rows a, b, c
#[inline]
fn det3(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    dot(a, &cross(b, c))
}

/// Signed volume of tetrahedron (a, b, c, d).
///
/// Cofactor expansion of the 4x4 determinant whose rows are the vertices
/// with a homogeneous coordinate of 1, divided by six. Positive when
/// (b - a, c - a, d - a) is a right-handed frame.
pub fn signed_volume(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> f64 {
    (det3(b, c, d) - det3(a, c, d) + det3(a, b, d) - det3(a, b, c)) / 6.0
}
