//! Delaunay triangulation of planar seed points
//!
//! Built on [`spade`], whose orientation and in-circle tests are exact, so
//! near-collinear seeds and coordinates far from the origin triangulate
//! correctly. This module owns the mapping between the caller's seed order
//! and spade's vertices, resolves exact duplicates in favor of their first
//! occurrence, and exposes the views the Voronoi stage needs: neighbors,
//! the ordered fan of edges around a seed and triangle circumcenters.

use std::collections::HashMap;
use std::fmt;

use glam::DVec2;
use spade::handles::{FixedDirectedEdgeHandle, FixedVertexHandle, VertexHandle};
use spade::{DelaunayTriangulation, Point2, Triangulation as _};

type Delaunay = DelaunayTriangulation<Point2<f64>>;

/// Delaunay triangulation over a fixed seed sequence
///
/// Indices everywhere refer to the caller's seed order. Seeds that are not
/// placed (later copies of an exact duplicate, or coordinates spade rejects)
/// appear in no triangle and have no neighbors.
pub struct Triangulation {
    points: Vec<DVec2>,
    delaunay: Delaunay,

    /// spade vertex per seed
    vertex_of: Vec<Option<FixedVertexHandle>>,

    /// seed per spade vertex index
    seed_of: Vec<usize>,

    duplicate_of: Vec<Option<usize>>,

    /// Seed indices of each triangle, counter-clockwise
    triangles: Vec<[usize; 3]>,
    circumcenters: Vec<DVec2>,

    hull: Vec<usize>,
    on_hull: Vec<bool>,
}

impl fmt::Debug for Triangulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triangulation")
            .field("seeds", &self.points.len())
            .field("placed", &self.seed_of.len())
            .field("triangles", &self.triangles.len())
            .field("hull", &self.hull)
            .finish()
    }
}

impl Triangulation {
    /// Number of seeds, placed or not
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Seed positions in input order
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Seed indices of triangle `t`, counter-clockwise
    pub fn triangle(&self, t: usize) -> [usize; 3] {
        self.triangles[t]
    }

    /// Convex hull as seed indices; for collinear input, the seeds in line order
    pub fn hull(&self) -> &[usize] {
        &self.hull
    }

    /// All placed seeds lie on one line (or there is only one)
    pub fn is_collinear(&self) -> bool {
        !self.seed_of.is_empty() && self.triangles.is_empty()
    }

    /// Whether the seed takes part in the triangulation
    pub fn is_placed(&self, seed: usize) -> bool {
        self.vertex_of[seed].is_some()
    }

    /// Earlier seed with exactly the same position, if any
    pub fn duplicate_of(&self, seed: usize) -> Option<usize> {
        self.duplicate_of[seed]
    }

    /// Whether the seed is a vertex of the convex hull
    pub fn is_on_hull(&self, seed: usize) -> bool {
        self.on_hull[seed]
    }

    /// Circumcenter of triangle `t`
    pub fn circumcenter(&self, t: usize) -> DVec2 {
        self.circumcenters[t]
    }

    /// Circumcenters of every triangle, indexed by triangle
    pub fn circumcenters(&self) -> &[DVec2] {
        &self.circumcenters
    }

    /// Outgoing edges around an interior seed, counter-clockwise
    ///
    /// Returns `None` for unplaced seeds, hull seeds and collinear input,
    /// whose Voronoi cells are unbounded.
    pub fn edges_around(&self, seed: usize) -> Option<Vec<FixedDirectedEdgeHandle>> {
        if self.is_collinear() || self.on_hull[seed] {
            return None;
        }
        let vertex = self.vertex(seed)?;
        Some(vertex.out_edges().map(|edge| edge.fix()).collect())
    }

    /// Triangle on the left of a directed edge, `None` outside the hull
    pub fn triangle_of_edge(&self, edge: FixedDirectedEdgeHandle) -> Option<usize> {
        self.delaunay
            .directed_edge(edge)
            .face()
            .as_inner()
            .map(|face| face_index(face.fix().index()))
    }

    /// Delaunay neighbors of a seed, counter-clockwise
    ///
    /// These are exactly the seeds whose Voronoi cells share an edge with
    /// this seed's cell. For collinear input the neighbors are the adjacent
    /// seeds along the line.
    pub fn neighbors(&self, seed: usize) -> Vec<usize> {
        match self.vertex(seed) {
            Some(vertex) => vertex
                .out_edges()
                .map(|edge| self.seed_of[edge.to().fix().index()])
                .collect(),
            None => Vec::new(),
        }
    }

    fn vertex(&self, seed: usize) -> Option<VertexHandle<'_, Point2<f64>>> {
        self.vertex_of[seed].map(|handle| self.delaunay.vertex(handle))
    }
}

/// Triangle index of an inner face; spade reserves face 0 for the outside
#[inline]
fn face_index(face: usize) -> usize {
    face - 1
}

/// Triangulate a planar seed sequence
///
/// Never panics: an empty sequence yields an empty triangulation, a single
/// seed or a collinear set yields no triangles, and exact duplicates are
/// resolved in favor of their first occurrence. Seeds inserted in input
/// order make the result deterministic.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use voronoi_coverage::tessellation::triangulate;
///
/// let points = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(10.0, 0.0),
///     DVec2::new(0.0, 10.0),
///     DVec2::new(10.0, 10.0),
/// ];
/// let triangulation = triangulate(&points);
/// assert_eq!(triangulation.triangle_count(), 2);
/// assert_eq!(triangulation.hull().len(), 4);
/// ```
pub fn triangulate(points: &[DVec2]) -> Triangulation {
    let n = points.len();
    let mut delaunay = Delaunay::new();
    let mut vertex_of = vec![None; n];
    let mut seed_of = Vec::with_capacity(n);
    let mut duplicate_of = vec![None; n];

    let mut first_seen: HashMap<(u64, u64), usize> = HashMap::with_capacity(n);
    for (seed, p) in points.iter().enumerate() {
        // +0.0 folds -0.0 into 0.0 so both hash alike
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        if let Some(&first) = first_seen.get(&key) {
            duplicate_of[seed] = Some(first);
            continue;
        }
        first_seen.insert(key, seed);

        match delaunay.insert(Point2::new(p.x, p.y)) {
            Ok(handle) if handle.index() == seed_of.len() => {
                vertex_of[seed] = Some(handle);
                seed_of.push(seed);
            }
            // spade merged the point into an existing vertex
            Ok(handle) => duplicate_of[seed] = Some(seed_of[handle.index()]),
            Err(error) => log::warn!("seed {} at {:?} not triangulated: {:?}", seed, p, error),
        }
    }

    let mut triangles = vec![[0; 3]; delaunay.num_inner_faces()];
    let mut circumcenters = vec![DVec2::NAN; delaunay.num_inner_faces()];
    for face in delaunay.inner_faces() {
        let t = face_index(face.fix().index());
        let [a, b, c] = face.vertices();
        triangles[t] = [
            seed_of[a.fix().index()],
            seed_of[b.fix().index()],
            seed_of[c.fix().index()],
        ];
        let center = face.circumcenter();
        circumcenters[t] = DVec2::new(center.x, center.y);
    }

    let hull = if triangles.is_empty() {
        line_order(&delaunay, &seed_of)
    } else {
        hull_order(&delaunay, &seed_of)
    };
    let mut on_hull = vec![false; n];
    for &seed in &hull {
        on_hull[seed] = true;
    }

    Triangulation {
        points: points.to_vec(),
        delaunay,
        vertex_of,
        seed_of,
        duplicate_of,
        triangles,
        circumcenters,
        hull,
        on_hull,
    }
}

/// Walk the outer face once, starting at the lowest-left hull vertex
fn hull_order(delaunay: &Delaunay, seed_of: &[usize]) -> Vec<usize> {
    let start = delaunay
        .vertices()
        .flat_map(|vertex| vertex.out_edges())
        .filter(|edge| edge.face().is_outer())
        .min_by(|a, b| lexicographic(a.from().position(), b.from().position()));
    let Some(start) = start else {
        return Vec::new();
    };

    let mut hull = Vec::new();
    let mut edge = start;
    loop {
        hull.push(seed_of[edge.from().fix().index()]);
        edge = edge.next();
        if edge.fix() == start.fix() || hull.len() > seed_of.len() {
            break;
        }
    }
    hull
}

/// Seeds of a degenerate triangulation in order along their common line
fn line_order(delaunay: &Delaunay, seed_of: &[usize]) -> Vec<usize> {
    let start = delaunay
        .vertices()
        .filter(|vertex| vertex.out_edges().count() <= 1)
        .min_by(|a, b| lexicographic(a.position(), b.position()));
    let Some(mut vertex) = start else {
        return Vec::new();
    };

    let mut line = vec![seed_of[vertex.fix().index()]];
    let mut previous: Option<FixedVertexHandle> = None;
    while let Some(next) = vertex
        .out_edges()
        .map(|edge| edge.to())
        .find(|to| Some(to.fix()) != previous)
    {
        if line.len() >= seed_of.len() {
            break;
        }
        previous = Some(vertex.fix());
        vertex = next;
        line.push(seed_of[vertex.fix().index()]);
    }
    line
}

fn lexicographic(a: Point2<f64>, b: Point2<f64>) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}
