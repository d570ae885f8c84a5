//! Geometric predicates and constructions on flat mesh arrays.
//!
//! Every function reads coordinates straight out of a flat `vertices` array
//! (three per vertex) and, where a triangle is involved, a flat `triangles`
//! array. Indices are trusted; an out-of-range index panics.
//!
//! # Sign convention
//!
//! [`orient2d`] is **negative** when `a`, `b`, `c` turn counter-clockwise, so
//! [`area_triangle_2d`] is positive for counter-clockwise triangles. The
//! exact arithmetic comes from the `robust` crate, whose own `orient2d` uses
//! the opposite sign.

use nalgebra::{Point2, Point3, Vector3};
use robust::Coord;

#[inline]
fn coord(vertices: &[f64], i: usize) -> Coord<f64> {
    Coord {
        x: vertices[3 * i],
        y: vertices[3 * i + 1],
    }
}

#[inline]
fn point(vertices: &[f64], i: usize) -> Point3<f64> {
    Point3::new(vertices[3 * i], vertices[3 * i + 1], vertices[3 * i + 2])
}

#[inline]
fn triangle_coords(vertices: &[f64], triangles: &[usize], t: usize) -> [Coord<f64>; 3] {
    [
        coord(vertices, triangles[3 * t]),
        coord(vertices, triangles[3 * t + 1]),
        coord(vertices, triangles[3 * t + 2]),
    ]
}

/// Exact orientation of three 2D points.
///
/// Negative if `a`, `b`, `c` are counter-clockwise, positive if clockwise,
/// zero if collinear.
///
/// # Example
/// ```
/// use meshweave::nalgebra::Point2;
/// use meshweave::predicates::orient2d;
///
/// let o = orient2d(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0));
/// assert!(o < 0.0);
/// ```
#[inline]
pub fn orient2d(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    -robust::orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

/// [`orient2d`] of three indexed vertices, ignoring their `z` coordinate.
#[inline]
pub fn orientation(vertices: &[f64], i: usize, j: usize, k: usize) -> f64 {
    -robust::orient2d(coord(vertices, i), coord(vertices, j), coord(vertices, k))
}

/// Signed area of triangle `t` projected to the `xy` plane.
///
/// Positive for counter-clockwise triangles.
pub fn area_triangle_2d(vertices: &[f64], triangles: &[usize], t: usize) -> f64 {
    -0.5 * orientation(vertices, triangles[3 * t], triangles[3 * t + 1], triangles[3 * t + 2])
}

/// Whether vertex `p` lies strictly inside the circumcircle of triangle `t`.
///
/// Assumes `t` is counter-clockwise; for a clockwise triangle the answer is
/// inverted.
pub fn in_circle(vertices: &[f64], triangles: &[usize], t: usize, p: usize) -> bool {
    let [a, b, c] = triangle_coords(vertices, triangles, t);
    robust::incircle(a, b, c, coord(vertices, p)) > 0.0
}

/// Whether `query` lies inside or on the boundary of triangle `t`.
///
/// Tests the three edge half-planes in turn and stops at the first one the
/// point is outside of.
pub fn in_triangle_2d(
    vertices: &[f64],
    triangles: &[usize],
    t: usize,
    query: Point2<f64>,
) -> bool {
    let [a, b, c] = triangle_coords(vertices, triangles, t);
    let q = Coord {
        x: query.x,
        y: query.y,
    };
    [(a, b), (b, c), (c, a)]
        .into_iter()
        .all(|(p0, p1)| -robust::orient2d(p0, p1, q) <= 0.0)
}

/// Arithmetic mean of the given vertices.
pub fn centroid(vertices: &[f64], indices: &[usize]) -> Point3<f64> {
    let n = indices.len() as f64;
    let sum = indices
        .iter()
        .fold(Vector3::zeros(), |acc, &i| acc + point(vertices, i).coords);
    Point3::from(sum / n)
}

/// Midpoint of the segment between vertices `p` and `q`.
#[inline]
pub fn midpoint(vertices: &[f64], p: usize, q: usize) -> Point3<f64> {
    centroid(vertices, &[p, q])
}

/// Center of the circle through the three vertices of triangle `t`.
///
/// Uses barycentric weights on the squared edge lengths, so it works for
/// triangles in 3D. Collinear or repeated vertices divide by zero.
pub fn circumcenter(vertices: &[f64], triangles: &[usize], t: usize) -> Point3<f64> {
    let pi = point(vertices, triangles[3 * t]);
    let pj = point(vertices, triangles[3 * t + 1]);
    let pk = point(vertices, triangles[3 * t + 2]);

    // Squared lengths of the edges opposite each vertex.
    let la = (pk - pj).norm_squared();
    let lb = (pk - pi).norm_squared();
    let lc = (pj - pi).norm_squared();

    let wa = la * (-la + lb + lc);
    let wb = lb * (la - lb + lc);
    let wc = lc * (la + lb - lc);

    let c = pi.coords * wa + pj.coords * wb + pk.coords * wc;
    Point3::from(c / (wa + wb + wc))
}

/// Closest point to `p` on the unit sphere centered at the origin.
///
/// The origin itself has no projection and yields NaN coordinates.
#[inline]
pub fn project_to_sphere(p: &Point3<f64>) -> Point3<f64> {
    Point3::from(p.coords.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> (Vec<f64>, Vec<usize>) {
        (
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_orientation_sign() {
        let (v, _) = unit_triangle();
        assert!(orientation(&v, 0, 1, 2) < 0.0);
        assert!(orientation(&v, 0, 2, 1) > 0.0);
        assert_eq!(orientation(&v, 0, 1, 1), 0.0);

        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(2.0, 2.0);
        assert_eq!(orient2d(a, b, Point2::new(1.0, 1.0)), 0.0);
        assert_eq!(
            orient2d(a, b, Point2::new(0.0, 1.0)),
            orientation(&[0.0, 0.0, 0.0, 2.0, 2.0, 0.0, 0.0, 1.0, 0.0], 0, 1, 2)
        );
    }

    #[test]
    fn test_orientation_exact_near_collinear() {
        let a = Point2::new(0.5, 0.5);
        let b = Point2::new(12.0, 12.0);
        let c = Point2::new(24.0, 24.0);
        assert_eq!(orient2d(a, b, c), 0.0);

        // One ulp off the line y = x.
        let c = Point2::new(24.0, 24.0 + f64::EPSILON * 16.0);
        assert!(orient2d(a, b, c) < 0.0);
    }

    #[test]
    fn test_area() {
        let (v, t) = unit_triangle();
        assert_relative_eq!(area_triangle_2d(&v, &t, 0), 0.5);
        assert_relative_eq!(area_triangle_2d(&v, &[0, 2, 1], 0), -0.5);
        assert_eq!(area_triangle_2d(&v, &[0, 1, 1], 0), 0.0);
    }

    #[test]
    fn test_in_triangle() {
        let (v, t) = unit_triangle();
        assert!(in_triangle_2d(&v, &t, 0, Point2::new(0.25, 0.25)));
        assert!(in_triangle_2d(&v, &t, 0, Point2::new(0.5, 0.5)));
        assert!(in_triangle_2d(&v, &t, 0, Point2::new(0.0, 0.0)));
        assert!(!in_triangle_2d(&v, &t, 0, Point2::new(1.0, 1.0)));
        assert!(!in_triangle_2d(&v, &t, 0, Point2::new(-0.1, 0.5)));
    }

    #[test]
    fn test_in_circle() {
        let mut v = unit_triangle().0;
        v.extend_from_slice(&[0.9, 0.9, 0.0, 1.1, 1.1, 0.0, 1.0, 1.0, 0.0]);
        let t = [0, 1, 2];

        assert!(in_circle(&v, &t, 0, 3));
        assert!(!in_circle(&v, &t, 0, 4));
        // On the circle.
        assert!(!in_circle(&v, &t, 0, 5));
    }

    #[test]
    fn test_centroid_and_midpoint() {
        let v = vec![0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 3.0, 0.0];
        let c = centroid(&v, &[0, 1, 2]);
        assert_relative_eq!(c, Point3::new(1.0, 1.0, 0.0));

        let (v, _) = unit_triangle();
        assert_relative_eq!(midpoint(&v, 0, 1), Point3::new(0.5, 0.0, 0.0));
        assert_relative_eq!(midpoint(&v, 1, 2), Point3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_circumcenter() {
        let (v, t) = unit_triangle();
        assert_relative_eq!(circumcenter(&v, &t, 0), Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);

        // Equidistant from all three vertices off the xy plane too.
        let v = vec![1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0];
        let c = circumcenter(&v, &[0, 1, 2], 0);
        let r0 = (Point3::new(1.0, 0.0, 0.0) - c).norm();
        let r1 = (Point3::new(0.0, 2.0, 0.0) - c).norm();
        let r2 = (Point3::new(0.0, 0.0, 3.0) - c).norm();
        assert_relative_eq!(r0, r1, epsilon = 1e-12);
        assert_relative_eq!(r0, r2, epsilon = 1e-12);
    }

    #[test]
    fn test_project_to_sphere() {
        let p = project_to_sphere(&Point3::new(0.0, 3.0, 4.0));
        assert_relative_eq!(p, Point3::new(0.0, 0.6, 0.8), epsilon = 1e-15);
        assert_relative_eq!(p.coords.norm(), 1.0);
    }
}
