//! Voronoi cell construction from a Delaunay triangulation
//!
//! Interior seeds take the fan of circumcenters around them. Seeds on the
//! hull (and every seed of a collinear set) have unbounded cells, which are
//! built instead by cutting the bounds rectangle with the perpendicular
//! bisector against each Delaunay neighbor. An interior fan that reaches
//! outside the bounds goes through the bisector path too, which yields the
//! same polygon as cutting the fan but never interpolates between far-away
//! circumcenters of nearly flat triangles.

use glam::DVec2;

use crate::bounds::Bounds;
use crate::cell::{signed_area, VoronoiCell};

use super::delaunay::Triangulation;

/// Relative tolerance for merging nearly identical polygon vertices
const VERTEX_EPSILON: f64 = 1e-9;

/// Build one Voronoi cell per seed, in seed order
///
/// Seeds the triangulation could not place (coincident copies) get an empty
/// cell. A single isolated seed receives the whole bounds rectangle.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use voronoi_coverage::Bounds;
/// use voronoi_coverage::tessellation::{triangulate, voronoi};
///
/// let seeds = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
/// let bounds = Bounds::new(-5.0, -5.0, 15.0, 5.0).unwrap();
/// let cells = voronoi(&triangulate(&seeds), &bounds);
///
/// assert_eq!(cells.len(), 2);
/// assert!((cells[0].area() - 100.0).abs() < 1e-9);
/// assert!((cells[1].area() - 100.0).abs() < 1e-9);
/// ```
pub fn voronoi(triangulation: &Triangulation, bounds: &Bounds) -> Vec<VoronoiCell> {
    let tolerance = VERTEX_EPSILON * bounds.width().max(bounds.height());

    (0..triangulation.len())
        .map(|seed| {
            if !triangulation.is_placed(seed) {
                return VoronoiCell::empty(seed);
            }

            let polygon = match fan_polygon(triangulation, seed) {
                Some(fan) if fan.iter().all(|c| bounds.contains(*c, 0.0)) => fan,
                _ => bisector_polygon(triangulation, seed, bounds),
            };

            let polygon = normalize(polygon, tolerance);
            VoronoiCell::new(seed, polygon)
        })
        .collect()
}

/// Circumcenters around an interior seed, or `None` when the seed needs the
/// bisector construction
fn fan_polygon(triangulation: &Triangulation, seed: usize) -> Option<Vec<DVec2>> {
    let fan = triangulation
        .edges_around(seed)?
        .into_iter()
        .map(|edge| triangulation.triangle_of_edge(edge).map(|t| triangulation.circumcenter(t)))
        .collect::<Option<Vec<DVec2>>>()?;

    if fan.iter().all(|c| c.is_finite()) {
        Some(fan)
    } else {
        None
    }
}

/// The bounds rectangle restricted to the points closer to `seed` than to
/// any of its Delaunay neighbors
fn bisector_polygon(triangulation: &Triangulation, seed: usize, bounds: &Bounds) -> Vec<DVec2> {
    let points = triangulation.points();
    let site = points[seed];

    let mut polygon = bounds.corners();
    for neighbor in triangulation.neighbors(seed) {
        let other = points[neighbor];
        if other == site {
            continue;
        }
        let midpoint = (site + other) * 0.5;
        polygon = clip_half_plane(&polygon, midpoint, other - site);
        if polygon.is_empty() {
            break;
        }
    }
    polygon
}

/// Sutherland-Hodgman cut of a convex polygon
///
/// Keeps the side where `(p - origin) . normal <= 0`.
pub(crate) fn clip_half_plane(polygon: &[DVec2], origin: DVec2, normal: DVec2) -> Vec<DVec2> {
    let n = polygon.len();
    let mut clipped = Vec::with_capacity(n + 1);

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let da = (a - origin).dot(normal);
        let db = (b - origin).dot(normal);

        if da <= 0.0 {
            clipped.push(a);
        }
        if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
            let t = da / (da - db);
            clipped.push(a + (b - a) * t);
        }
    }
    clipped
}

/// Cut a polygon to the four sides of the bounds
pub(crate) fn clip_to_rect(polygon: &[DVec2], bounds: &Bounds) -> Vec<DVec2> {
    let (min, max) = (bounds.min(), bounds.max());
    let sides = [
        (min, DVec2::new(-1.0, 0.0)),
        (max, DVec2::new(1.0, 0.0)),
        (min, DVec2::new(0.0, -1.0)),
        (max, DVec2::new(0.0, 1.0)),
    ];

    let mut clipped = polygon.to_vec();
    for (origin, normal) in sides {
        if clipped.is_empty() {
            break;
        }
        clipped = clip_half_plane(&clipped, origin, normal);
    }
    clipped
}

/// Merge near-equal consecutive vertices and wind counter-clockwise
///
/// Anything left with fewer than three vertices or no area becomes empty.
pub(crate) fn normalize(polygon: Vec<DVec2>, tolerance: f64) -> Vec<DVec2> {
    let mut merged: Vec<DVec2> = Vec::with_capacity(polygon.len());
    for point in polygon {
        match merged.last() {
            Some(last) if last.distance(point) <= tolerance => {}
            _ => merged.push(point),
        }
    }
    while merged.len() > 1 {
        let (first, last) = (merged[0], merged[merged.len() - 1]);
        if first.distance(last) <= tolerance {
            merged.pop();
        } else {
            break;
        }
    }

    if merged.len() < 3 {
        return Vec::new();
    }
    let area = signed_area(&merged);
    if area.abs() <= tolerance * tolerance {
        return Vec::new();
    }
    if area < 0.0 {
        merged.reverse();
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tessellation::triangulate;
    use approx::assert_relative_eq;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn extent(polygon: &[DVec2]) -> (DVec2, DVec2) {
        polygon.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        )
    }

    fn random_seeds(count: usize, bounds: &Bounds, seed: u64) -> Vec<DVec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                DVec2::new(
                    rng.gen_range(bounds.min_x..bounds.max_x),
                    rng.gen_range(bounds.min_y..bounds.max_y),
                )
            })
            .collect()
    }

    /// Cell areas add up to the bounds and every grid sample lies in the
    /// cell of its nearest seed
    fn assert_partition(seeds: &[DVec2], bounds: &Bounds, cells: &[VoronoiCell]) {
        let total: f64 = cells.iter().map(|c| c.area()).sum();
        assert_relative_eq!(total, bounds.width() * bounds.height(), max_relative = 1e-6);

        let scale = bounds.width().max(bounds.height());
        let steps = 60;
        for i in 0..=steps {
            for j in 0..=steps {
                let sample = bounds.min()
                    + DVec2::new(
                        bounds.width() * i as f64 / steps as f64,
                        bounds.height() * j as f64 / steps as f64,
                    );

                let mut distances: Vec<(f64, usize)> = seeds
                    .iter()
                    .enumerate()
                    .map(|(k, s)| (s.distance(sample), k))
                    .collect();
                distances.sort_by(|a, b| a.0.total_cmp(&b.0));
                if distances.len() > 1 && distances[1].0 - distances[0].0 < 1e-6 * scale {
                    continue;
                }

                let nearest = distances[0].1;
                assert!(
                    cells[nearest].contains(sample, 1e-7 * scale),
                    "sample {:?} not in the cell of its nearest seed {}",
                    sample,
                    nearest
                );
            }
        }
    }

    #[test]
    fn test_two_seeds_split_at_bisector() {
        let seeds = [DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)];
        let bounds = Bounds::new(-5.0, -5.0, 15.0, 5.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].seed_index, 0);
        assert_eq!(cells[1].seed_index, 1);

        let (lo, hi) = extent(&cells[0].polygon);
        assert!(lo.abs_diff_eq(DVec2::new(-5.0, -5.0), 1e-9));
        assert!(hi.abs_diff_eq(DVec2::new(5.0, 5.0), 1e-9));

        let (lo, hi) = extent(&cells[1].polygon);
        assert!(lo.abs_diff_eq(DVec2::new(5.0, -5.0), 1e-9));
        assert!(hi.abs_diff_eq(DVec2::new(15.0, 5.0), 1e-9));

        assert_relative_eq!(cells[0].area(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(cells[1].area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_seed_gets_full_bounds() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 50.0).unwrap();
        let cells = voronoi(&triangulate(&[DVec2::new(50.0, 25.0)]), &bounds);

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].vertex_count(), 4);
        assert_relative_eq!(cells[0].area(), 5000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let bounds = Bounds::new(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(voronoi(&triangulate(&[]), &bounds).is_empty());
    }

    #[test]
    fn test_coincident_seed_gets_empty_cell() {
        let seeds = [DVec2::new(5.0, 5.0), DVec2::new(5.0, 5.0)];
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        assert_eq!(cells.len(), 2);
        assert_relative_eq!(cells[0].area(), 100.0, epsilon = 1e-9);
        assert!(cells[1].is_empty());
        assert_eq!(cells[1].seed_index, 1);
    }

    #[test]
    fn test_collinear_seeds_make_strips() {
        let seeds = [
            DVec2::new(1.0, 5.0),
            DVec2::new(5.0, 5.0),
            DVec2::new(3.0, 5.0),
        ];
        let bounds = Bounds::new(0.0, 0.0, 6.0, 10.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        assert_relative_eq!(cells[0].area(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(cells[2].area(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(cells[1].area(), 20.0, epsilon = 1e-9);

        let (lo, hi) = extent(&cells[2].polygon);
        assert_relative_eq!(lo.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(hi.x, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cells_are_ccw_and_inside_bounds() {
        let bounds = Bounds::new(0.0, 0.0, 400.0, 300.0).unwrap();
        let seeds = random_seeds(60, &bounds, 7);
        let cells = voronoi(&triangulate(&seeds), &bounds);

        for cell in &cells {
            assert!(!cell.is_empty());
            assert!(signed_area(&cell.polygon) > 0.0);
            for p in &cell.polygon {
                assert!(bounds.contains(*p, 1e-9), "{:?} escapes bounds", p);
            }
            assert!(cell.contains(seeds[cell.seed_index], 1e-9));
        }
    }

    #[test]
    fn test_cells_partition_bounds() {
        let bounds = Bounds::new(-20.0, 10.0, 180.0, 110.0).unwrap();
        let seeds = random_seeds(40, &bounds, 42);
        let cells = voronoi(&triangulate(&seeds), &bounds);
        assert_partition(&seeds, &bounds, &cells);
    }

    #[test]
    fn test_line_with_noise_partitions_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let seeds: Vec<DVec2> = (0..50)
            .map(|i| {
                let x = i as f64;
                DVec2::new(x, 2.0 * x + rng.gen_range(-1e-10..1e-10))
            })
            .collect();
        let bounds = Bounds::new(-5.0, -5.0, 54.0, 103.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        assert!(cells.iter().all(|c| !c.is_empty()));
        assert_partition(&seeds, &bounds, &cells);
    }

    #[test]
    fn test_shallow_line_partitions_bounds() {
        let seeds: Vec<DVec2> = (0..50)
            .map(|i| {
                let x = i as f64 * 0.1;
                DVec2::new(x, 0.3 * x)
            })
            .collect();
        let bounds = Bounds::new(-1.0, -1.0, 6.0, 3.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        assert!(cells.iter().all(|c| !c.is_empty()));
        assert_partition(&seeds, &bounds, &cells);
    }

    #[test]
    fn test_grid_far_from_origin_partitions_bounds() {
        let offset = 1e7;
        let seeds: Vec<DVec2> = (0..12)
            .flat_map(|i| (0..12).map(move |j| DVec2::new(offset + i as f64, offset + j as f64)))
            .collect();
        let bounds = Bounds::new(offset - 1.0, offset - 1.0, offset + 12.0, offset + 12.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        // interior seeds own exactly their unit square
        for (seed, cell) in seeds.iter().zip(&cells) {
            let local = *seed - DVec2::splat(offset);
            if local.min_element() > 0.0 && local.max_element() < 11.0 {
                assert_relative_eq!(cell.area(), 1.0, epsilon = 1e-6);
            }
        }
        assert_partition(&seeds, &bounds, &cells);
    }

    #[test]
    fn test_line_with_one_outlier_partitions_bounds() {
        let mut seeds: Vec<DVec2> = (0..40).map(|i| DVec2::new(i as f64, 0.0)).collect();
        seeds.push(DVec2::new(20.5, 7.0));
        let bounds = Bounds::new(-2.0, -10.0, 42.0, 20.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        assert!(cells.iter().all(|c| !c.is_empty()));
        assert_partition(&seeds, &bounds, &cells);
    }

    #[test]
    fn test_seeds_outside_bounds() {
        let seeds = [
            DVec2::new(-50.0, 0.0),
            DVec2::new(5.0, 5.0),
            DVec2::new(5.0, -40.0),
            DVec2::new(60.0, 60.0),
        ];
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let cells = voronoi(&triangulate(&seeds), &bounds);

        assert_eq!(cells.len(), 4);
        let total: f64 = cells.iter().map(|c| c.area()).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
        assert_relative_eq!(cells[1].area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fan_matches_bisector_cut() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0).unwrap();
        let seeds = random_seeds(30, &bounds, 3);
        let triangulation = triangulate(&seeds);

        let mut compared = 0;
        for seed in 0..seeds.len() {
            if let Some(fan) = fan_polygon(&triangulation, seed) {
                let fan = normalize(clip_to_rect(&fan, &bounds), 1e-9);
                let cut = normalize(bisector_polygon(&triangulation, seed, &bounds), 1e-9);
                assert_relative_eq!(signed_area(&fan), signed_area(&cut), max_relative = 1e-9);
                compared += 1;
            }
        }
        assert!(compared > 0);
    }

    #[test]
    fn test_clip_half_plane() {
        let square = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(0.0, 4.0),
        ];
        let half = clip_half_plane(&square, DVec2::new(1.0, 0.0), DVec2::new(1.0, 0.0));
        assert_relative_eq!(signed_area(&half), 4.0, epsilon = 1e-12);

        let none = clip_half_plane(&square, DVec2::new(-1.0, 0.0), DVec2::new(1.0, 0.0));
        assert!(none.is_empty());
    }

    #[test]
    fn test_normalize() {
        let cw = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(0.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(0.0, 0.0),
        ];
        let ccw = normalize(cw, 1e-9);
        assert_eq!(ccw.len(), 4);
        assert!(signed_area(&ccw) > 0.0);

        let sliver = vec![DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)];
        assert!(normalize(sliver, 1e-9).is_empty());
    }
}
