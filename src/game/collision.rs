//! Spatial partitioning and collision queries over static world geometry.
//!
//! # Overview
//!
//! This module indexes the triangles of the static world in a Bounding Volume
//! Hierarchy (BVH) built once at load time. Every tick, entities ask it two
//! kinds of question: "what does this ray hit first?" and "which triangles
//! does this capsule overlap, and by how much?".
//!
//! # Core Components
//!
//! * [`BvhNode`] - Arena node: an internal split or a leaf holding triangle indices
//! * [`Bvh`] - The hierarchy plus the flattened triangle list it indexes
//! * [`RaycastHit`] / [`Contact`] - Query results
//! * [`CollisionSystem`] - World loader and query front-end used by gameplay
//!
//! # How the System Works
//!
//! 1. Model triangle lists are validated and flattened into one collection
//! 2. [`Bvh::init`] recursively splits the collection at the spatial median
//!    of the triangle centroids along their widest axis
//! 3. Queries walk the tree with [`Bvh::traverse`], pruning any subtree whose
//!    bounds fail a caller-supplied filter, then run exact tests on the
//!    surviving triangles
//!
//! The tree is never modified after construction, so queries only need `&self`
//! and a single `Bvh` can be shared freely between threads.

use log::info;

use crate::benchmarks;
use crate::error::WorldError;
use crate::geometry::{Bounds, Capsule, Ray, Triangle};
use crate::math::vec::Vec3;
use crate::maze::{self, Maze};

/// Nodes at this depth become leaves regardless of how many triangles remain.
pub const MAX_BVH_DEPTH: usize = 64;

/// A node in the BVH arena.
///
/// Children are referenced by their index in [`Bvh::nodes`]; leaves reference
/// triangles by their index in [`Bvh::triangles`].
#[derive(Debug, Clone, PartialEq)]
pub enum BvhNode {
    /// Internal node with exactly two children
    Internal {
        bounds: Bounds,
        left: usize,
        right: usize,
    },
    /// Leaf node holding the triangles of its region
    Leaf {
        bounds: Bounds,
        triangles: Vec<usize>,
    },
}

impl BvhNode {
    /// Returns the bounds of this node.
    pub fn bounds(&self) -> &Bounds {
        match self {
            BvhNode::Internal { bounds, .. } => bounds,
            BvhNode::Leaf { bounds, .. } => bounds,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }
}

/// First triangle struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Hit parameter in multiples of the ray direction.
    pub distance: f32,
    /// World-space hit position, `ray.point_at(distance)`.
    pub position: Vec3,
    /// Face normal of the struck triangle.
    pub normal: Vec3,
    /// Index of the struck triangle in [`Bvh::triangles`].
    pub triangle: usize,
}

/// Overlap between a capsule and one world triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub triangle: usize,
    /// Unit push-out direction.
    pub normal: Vec3,
    /// Penetration depth along `normal`.
    pub overlap: f32,
}

impl Contact {
    /// The displacement that would exactly separate the capsule from this triangle.
    pub fn correction(&self) -> Vec3 {
        self.normal * self.overlap
    }
}

/// Bounding Volume Hierarchy over a static triangle set.
///
/// # Structure
///
/// Nodes live in a flat arena (`nodes`) addressed by index, with the root at
/// `root`. Construction of an empty set produces a single empty leaf, so every
/// `Bvh` has a valid root.
#[derive(Debug, Clone)]
pub struct Bvh {
    triangles: Vec<Triangle>,
    nodes: Vec<BvhNode>,
    root: usize,
    depth: usize,
}

impl Default for Bvh {
    fn default() -> Self {
        Self::from_triangles(Vec::new())
    }
}

impl Bvh {
    /// Builds a BVH over the triangles of every model.
    ///
    /// # Arguments
    ///
    /// * `models` - One triangle list per model; all lists are flattened into
    ///   a single collection before the tree is built from one root
    pub fn init<M: AsRef<[Triangle]>>(models: &[M]) -> Self {
        let triangles = models
            .iter()
            .flat_map(|model| model.as_ref().iter().copied())
            .collect();
        Self::from_triangles(triangles)
    }

    /// Builds a BVH over an already-flattened triangle list.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(triangles.len().max(1) * 2),
            triangles,
            root: 0,
            depth: 0,
        };
        let all = (0..bvh.triangles.len()).collect();
        bvh.root = bvh.construct_node(all, 0);
        bvh
    }

    /// Recursively builds the subtree for `indices` and returns its arena index.
    ///
    /// # Algorithm
    ///
    /// 1. Node bounds enclose every vertex of every triangle in the set
    /// 2. The set becomes a leaf when it holds at most one triangle, when all
    ///    centroids coincide, or when [`MAX_BVH_DEPTH`] is reached
    /// 3. Otherwise it is split on the axis where the centroids spread the
    ///    most, at the midpoint of the centroid bounds (spatial median)
    /// 4. A split that leaves one side empty also produces a leaf
    ///
    /// Children are pushed before their parent, so the root is the last node.
    fn construct_node(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        self.depth = self.depth.max(depth);

        let mut bounds = Bounds::EMPTY;
        let mut centroid_bounds = Bounds::EMPTY;
        for &index in &indices {
            let triangle = &self.triangles[index];
            for vertex in triangle.vertices() {
                bounds.expand_point(&vertex);
            }
            centroid_bounds.expand_point(&triangle.centroid);
        }

        let axis = centroid_bounds.longest_axis();
        let extent = centroid_bounds.dimensions()[axis];
        if indices.len() <= 1 || extent <= 0.0 || depth >= MAX_BVH_DEPTH {
            return self.push(BvhNode::Leaf {
                bounds,
                triangles: indices,
            });
        }

        let split = centroid_bounds.center()[axis];
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&index| self.triangles[index].centroid[axis] < split);

        if left.is_empty() || right.is_empty() {
            return self.push(BvhNode::Leaf {
                bounds,
                triangles: indices,
            });
        }

        let left = self.construct_node(left, depth + 1);
        let right = self.construct_node(right, depth + 1);
        self.push(BvhNode::Internal {
            bounds,
            left,
            right,
        })
    }

    fn push(&mut self, node: BvhNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Collects the triangles of every leaf reachable through `filter`.
    ///
    /// Starting at `node`, a child is visited only when `filter` accepts its
    /// bounds; leaves append their triangle indices to `found`. The node
    /// passed in is always expanded, so callers test the root themselves.
    ///
    /// # Arguments
    ///
    /// * `filter` - Pruning test applied to child bounds
    /// * `node` - Arena index to start from
    /// * `found` - Accumulator for candidate triangle indices
    pub fn traverse<F>(&self, filter: &F, node: usize, found: &mut Vec<usize>)
    where
        F: Fn(&Bounds) -> bool,
    {
        match &self.nodes[node] {
            BvhNode::Leaf { triangles, .. } => found.extend_from_slice(triangles),
            BvhNode::Internal { left, right, .. } => {
                for child in [*left, *right] {
                    if filter(self.nodes[child].bounds()) {
                        self.traverse(filter, child, found);
                    }
                }
            }
        }
    }

    /// Candidate triangles whose containing subtrees pass `filter`, root included.
    pub fn candidates<F>(&self, filter: F) -> Vec<usize>
    where
        F: Fn(&Bounds) -> bool,
    {
        let mut found = Vec::new();
        if filter(self.nodes[self.root].bounds()) {
            self.traverse(&filter, self.root, &mut found);
        }
        found
    }

    /// Finds the nearest front-facing triangle along a ray.
    ///
    /// # Returns
    ///
    /// The hit with the smallest non-negative parameter, or `None`. When two
    /// triangles are hit at exactly the same parameter, the first one found
    /// during traversal wins.
    pub fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        let mut nearest: Option<(f32, usize)> = None;

        for index in self.candidates(|bounds| ray.intersects_bounds(bounds)) {
            if let Some(t) = ray.triangle_intersection(&self.triangles[index]) {
                if nearest.is_none_or(|(best, _)| t < best) {
                    nearest = Some((t, index));
                }
            }
        }

        nearest.map(|(distance, triangle)| RaycastHit {
            distance,
            position: ray.point_at(distance),
            normal: self.triangles[triangle].normal,
            triangle,
        })
    }

    /// Every triangle the capsule currently overlaps.
    pub fn collision_query(&self, capsule: &Capsule) -> Vec<Contact> {
        let query = capsule.bounds();
        self.candidates(|bounds| query.overlaps(bounds))
            .into_iter()
            .filter_map(|index| {
                capsule
                    .triangle_intersection(&self.triangles[index])
                    .map(|hit| Contact {
                        triangle: index,
                        normal: hit.normal,
                        overlap: hit.overlap,
                    })
            })
            .collect()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Deepest level reached during construction; the root is depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn bounds(&self) -> &Bounds {
        self.nodes[self.root].bounds()
    }
}

/// Static world loader and query front-end.
///
/// Owns the [`Bvh`] and adds the gameplay-level helpers built on top of raw
/// queries, such as [`CollisionSystem::has_line_of_sight`].
///
/// # How To Use
///
/// 1. Build with [`CollisionSystem::from_models`] or [`CollisionSystem::from_maze`]
/// 2. Hand it by reference to entity physics every tick
/// 3. Use [`CollisionSystem::raycast`] for scanning and visibility
#[derive(Debug, Default, Clone)]
pub struct CollisionSystem {
    bvh: Bvh,
}

impl CollisionSystem {
    /// Builds the world from raw model triangle lists.
    ///
    /// # Arguments
    ///
    /// * `models` - One list per model, each triangle given as three
    ///   world-space points in front-face winding order
    ///
    /// # Errors
    ///
    /// [`WorldError::NonFiniteVertex`] if any coordinate is NaN or infinite.
    pub fn from_models(models: &[Vec<[Vec3; 3]>]) -> Result<Self, WorldError> {
        let mut triangles = Vec::with_capacity(models.iter().map(Vec::len).sum());

        for (model, points) in models.iter().enumerate() {
            for (triangle, [v0, v1, v2]) in points.iter().enumerate() {
                if !(v0.is_finite() && v1.is_finite() && v2.is_finite()) {
                    return Err(WorldError::NonFiniteVertex { model, triangle });
                }
                triangles.push(Triangle::new(*v0, *v1, *v2));
            }
        }

        let count = triangles.len();
        let bvh = benchmarks::time("bvh_build", || Bvh::from_triangles(triangles));
        info!(
            "Collision world built: {} triangles, {} nodes, depth {}",
            count,
            bvh.nodes().len(),
            bvh.depth()
        );

        Ok(Self { bvh })
    }

    /// Builds the world from a generated maze.
    ///
    /// The floor and every exposed wall side become triangles; see
    /// [`maze::mesh::build_triangles`].
    ///
    /// # Errors
    ///
    /// [`WorldError::EmptyMaze`] if the maze has no cells.
    pub fn from_maze(maze: &Maze, cell_size: f32, wall_height: f32) -> Result<Self, WorldError> {
        if maze.width == 0 || maze.height == 0 {
            return Err(WorldError::EmptyMaze {
                width: maze.width,
                height: maze.height,
            });
        }

        let model = maze::mesh::build_triangles(maze, cell_size, wall_height);
        Self::from_models(&[model])
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    pub fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        self.bvh.raycast(ray)
    }

    pub fn collision_query(&self, capsule: &Capsule) -> Vec<Contact> {
        self.bvh.collision_query(capsule)
    }

    /// Whether nothing in the world blocks the segment from `from` to `to`.
    ///
    /// Only front faces block, so sight lines leaving the inside of a closed
    /// shell are never obstructed by its own back faces.
    pub fn has_line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        match self.raycast(&Ray::between(from, to)) {
            Some(hit) => hit.distance >= 1.0,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::mat::Mat4;
    use approx::assert_relative_eq;

    fn floor_points() -> [Vec3; 3] {
        [
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 0.0, -10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ]
    }

    fn small_floor(x: f32) -> [Vec3; 3] {
        [
            Vec3::new(x - 1.0, 0.0, -1.0),
            Vec3::new(x + 1.0, 0.0, -1.0),
            Vec3::new(x, 0.0, 1.0),
        ]
    }

    fn leaf_triangles(bvh: &Bvh) -> Vec<usize> {
        let mut all: Vec<usize> = bvh
            .nodes()
            .iter()
            .filter_map(|node| match node {
                BvhNode::Leaf { triangles, .. } => Some(triangles.clone()),
                BvhNode::Internal { .. } => None,
            })
            .flatten()
            .collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn downward_ray_hits_floor_triangle() {
        let world = CollisionSystem::from_models(&[vec![floor_points()]]).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = world.raycast(&ray).unwrap();

        assert_relative_eq!(hit.distance, 5.0);
        assert_eq!(hit.position, Vec3::ZERO);
        assert_eq!(hit.normal, Vec3::UP);
        assert_eq!(hit.triangle, 0);
    }

    #[test]
    fn empty_world_is_a_single_empty_leaf() {
        let bvh = Bvh::init::<Vec<Triangle>>(&[]);
        assert_eq!(bvh.nodes().len(), 1);
        assert!(bvh.nodes()[bvh.root()].is_leaf());

        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        assert_eq!(bvh.raycast(&ray), None);
        assert!(bvh.collision_query(&Capsule::upright(2.0, 0.5)).is_empty());
    }

    #[test]
    fn single_triangle_is_a_leaf() {
        let [a, b, c] = floor_points();
        let bvh = Bvh::init(&[vec![Triangle::new(a, b, c)]]);
        assert_eq!(bvh.nodes().len(), 1);
        assert_eq!(bvh.bounds().min, Vec3::new(-10.0, 0.0, -10.0));
        assert_eq!(bvh.bounds().max, Vec3::new(10.0, 0.0, 10.0));
    }

    #[test]
    fn coincident_centroids_stay_in_one_leaf() {
        let [a, b, c] = floor_points();
        let flipped = Triangle::new(a, c, b);
        let bvh = Bvh::init(&[vec![Triangle::new(a, b, c), flipped, flipped]]);
        assert_eq!(bvh.nodes().len(), 1);
        assert_eq!(leaf_triangles(&bvh), vec![0, 1, 2]);
    }

    #[test]
    fn every_triangle_lands_in_exactly_one_leaf() {
        let models: Vec<Vec<Triangle>> = (0..5)
            .map(|model| {
                (0..7)
                    .map(|i| {
                        let [a, b, c] = small_floor((model * 7 + i) as f32 * 3.0);
                        Triangle::new(a, b, c)
                    })
                    .collect()
            })
            .collect();
        let bvh = Bvh::init(&models);

        assert_eq!(bvh.triangles().len(), 35);
        assert_eq!(leaf_triangles(&bvh), (0..35).collect::<Vec<_>>());
        assert!(bvh.depth() > 0);

        for node in bvh.nodes() {
            if let BvhNode::Internal { bounds, left, right } = node {
                let mut union = *bvh.nodes()[*left].bounds();
                union.expand(bvh.nodes()[*right].bounds());
                assert_eq!(&union, bounds);
            }
        }
    }

    #[test]
    fn capsule_near_one_triangle_only_touches_it() {
        let world =
            CollisionSystem::from_models(&[vec![small_floor(0.0)], vec![small_floor(100.0)]])
                .unwrap();

        let mut capsule = Capsule::upright(2.0, 0.5);
        capsule.set_transform(Mat4::translation(0.0, -0.1, 0.0));
        let contacts = world.collision_query(&capsule);

        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].triangle, 0);
        assert_eq!(contacts[0].normal, Vec3::UP);
        assert_relative_eq!(contacts[0].overlap, 0.1, epsilon = 1e-6);
        assert_relative_eq!(contacts[0].correction().y(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn capsule_outside_world_bounds_has_no_contacts() {
        let world =
            CollisionSystem::from_models(&[vec![small_floor(0.0), small_floor(10.0)]]).unwrap();
        let mut capsule = Capsule::upright(2.0, 0.5);
        capsule.set_transform(Mat4::translation(5.0, 3.0, 20.0));
        assert!(!capsule.bounds().overlaps(world.bvh().bounds()));
        assert!(world.collision_query(&capsule).is_empty());
    }

    #[test]
    fn rejects_non_finite_vertices() {
        let mut bad = small_floor(0.0);
        bad[2] = Vec3::new(f32::NAN, 0.0, 0.0);
        let err = CollisionSystem::from_models(&[vec![small_floor(5.0)], vec![small_floor(0.0), bad]])
            .unwrap_err();
        assert_eq!(err, WorldError::NonFiniteVertex { model: 1, triangle: 1 });
    }

    #[test]
    fn empty_maze_is_rejected() {
        let maze = Maze::new(0, 3);
        let err = CollisionSystem::from_maze(&maze, 2.0, 3.0).unwrap_err();
        assert_eq!(err, WorldError::EmptyMaze { width: 0, height: 3 });
    }

    #[test]
    fn line_of_sight_is_blocked_by_front_faces() {
        // Wall in the plane z = 0 facing -z.
        let wall = [
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(0.0, 5.0, 0.0),
        ];
        let world = CollisionSystem::from_models(&[vec![wall]]).unwrap();
        assert_eq!(world.bvh().triangles()[0].normal, -Vec3::Z);

        let viewer = Vec3::new(0.0, 1.0, -4.0);
        assert!(!world.has_line_of_sight(viewer, Vec3::new(0.0, 1.0, 4.0)));
        assert!(world.has_line_of_sight(viewer, Vec3::new(0.0, 1.0, -1.0)));
        // Seen from behind, the wall does not block.
        assert!(world.has_line_of_sight(Vec3::new(0.0, 1.0, 4.0), viewer));
    }
}
