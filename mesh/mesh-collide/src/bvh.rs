//! Bounding volume hierarchy over a triangle soup.

use crate::intersect::{ray_aabb_entry, ray_triangle_intersection};
use mesh_types::{Aabb, Point3, Triangle};
use smallvec::SmallVec;

/// Triangles per leaf before a node stops splitting.
const DEFAULT_MAX_LEAF: usize = 4;

/// Subtree size above which construction forks onto the rayon pool.
const PARALLEL_THRESHOLD: usize = 4096;

#[derive(Debug)]
enum Node {
    Leaf {
        bbox: Aabb,
        triangles: SmallVec<[u32; 8]>,
    },
    Internal {
        bbox: Aabb,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Shape statistics for a built hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvhStats {
    /// Total node count.
    pub nodes: usize,
    /// Leaf node count.
    pub leaves: usize,
    /// Longest root-to-leaf path.
    pub max_depth: usize,
    /// Triangles indexed by the hierarchy.
    pub triangles: usize,
}

/// A median-split bounding volume hierarchy.
///
/// The hierarchy stores triangle *indices*; callers keep the triangle
/// slice and pass it back for queries, so the same triangles are never
/// held twice.
///
/// # Example
///
/// ```
/// use mesh_collide::Bvh;
/// use mesh_types::{Triangle, Point3};
/// use nalgebra::Vector3;
///
/// let tris = vec![Triangle::new(
///     Point3::new(-1.0, -1.0, 1.0),
///     Point3::new(1.0, -1.0, 1.0),
///     Point3::new(0.0, 1.0, 1.0),
/// )];
/// let bvh = Bvh::build(&tris);
/// let hits = bvh.ray_hits(&tris, &Point3::origin(), &Vector3::z());
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].0, 0);
/// ```
#[derive(Debug)]
pub struct Bvh {
    root: Option<Node>,
    triangle_count: usize,
}

impl Bvh {
    /// Build a hierarchy with the default leaf size.
    #[must_use]
    pub fn build(triangles: &[Triangle]) -> Self {
        Self::build_with_leaf_size(triangles, DEFAULT_MAX_LEAF)
    }

    /// Build a hierarchy with an explicit leaf size.
    ///
    /// Large triangle sets split their subtrees across the rayon pool.
    #[must_use]
    pub fn build_with_leaf_size(triangles: &[Triangle], max_leaf_size: usize) -> Self {
        if triangles.is_empty() {
            return Self {
                root: None,
                triangle_count: 0,
            };
        }

        #[allow(clippy::cast_possible_truncation)]
        let items: Vec<Item> = triangles
            .iter()
            .enumerate()
            .map(|(i, tri)| Item {
                index: i as u32,
                bbox: tri.aabb(),
                center: tri.centroid(),
            })
            .collect();

        let order: Vec<usize> = (0..items.len()).collect();
        let root = build_node(&items, order, max_leaf_size.max(1));

        Self {
            root: Some(root),
            triangle_count: triangles.len(),
        }
    }

    /// Number of triangles indexed.
    #[inline]
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Whether the hierarchy indexes no triangles.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.triangle_count == 0
    }

    /// All ray intersections, sorted by ascending distance.
    ///
    /// Hits behind the ray origin are excluded. Equal distances order by
    /// triangle index, which makes repeated queries on the same geometry
    /// byte-for-byte identical.
    #[must_use]
    pub fn ray_hits(
        &self,
        triangles: &[Triangle],
        origin: &Point3<f64>,
        direction: &nalgebra::Vector3<f64>,
    ) -> Vec<(u32, f64)> {
        let mut hits = Vec::new();
        let Some(root) = &self.root else {
            return hits;
        };

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if ray_aabb_entry(node.bbox(), origin, direction).is_none() {
                continue;
            }
            match node {
                Node::Leaf {
                    triangles: leaf, ..
                } => {
                    for &idx in leaf {
                        if let Some(tri) = triangles.get(idx as usize) {
                            if let Some(t) = ray_triangle_intersection(tri, origin, direction) {
                                hits.push((idx, t));
                            }
                        }
                    }
                }
                Node::Internal { left, right, .. } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        hits
    }

    /// Shape statistics for logging and tests.
    #[must_use]
    pub fn stats(&self) -> BvhStats {
        fn walk(node: &Node, depth: usize, stats: &mut BvhStats) {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            match node {
                Node::Leaf { .. } => stats.leaves += 1,
                Node::Internal { left, right, .. } => {
                    walk(left, depth + 1, stats);
                    walk(right, depth + 1, stats);
                }
            }
        }

        let mut stats = BvhStats {
            nodes: 0,
            leaves: 0,
            max_depth: 0,
            triangles: self.triangle_count,
        };
        if let Some(root) = &self.root {
            walk(root, 0, &mut stats);
        }
        stats
    }
}

struct Item {
    index: u32,
    bbox: Aabb,
    center: Point3<f64>,
}

fn combined_bbox(items: &[Item], order: &[usize]) -> Aabb {
    let mut iter = order.iter();
    let first = iter.next().map_or_else(
        || Aabb::new(Point3::origin(), Point3::origin()),
        |&i| items[i].bbox,
    );
    iter.fold(first, |acc, &i| acc.union(&items[i].bbox))
}

fn build_node(items: &[Item], mut order: Vec<usize>, max_leaf: usize) -> Node {
    let bbox = combined_bbox(items, &order);

    if order.len() <= max_leaf {
        let triangles = order.iter().map(|&i| items[i].index).collect();
        return Node::Leaf { bbox, triangles };
    }

    // Median split on the longest axis of the combined box.
    let axis = bbox.longest_axis();
    order.sort_by(|&a, &b| {
        let ca = items[a].center[axis];
        let cb = items[b].center[axis];
        ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
    });

    let right_order = order.split_off(order.len() / 2);
    let left_order = order;

    let (left, right) = if left_order.len() >= PARALLEL_THRESHOLD {
        rayon::join(
            || build_node(items, left_order, max_leaf),
            || build_node(items, right_order, max_leaf),
        )
    } else {
        (
            build_node(items, left_order, max_leaf),
            build_node(items, right_order, max_leaf),
        )
    };

    Node::Internal {
        bbox,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::unit_cube;
    use nalgebra::Vector3;

    fn cube_triangles() -> Vec<Triangle> {
        unit_cube().triangles().collect()
    }

    #[test]
    fn empty_build_yields_no_hits() {
        let bvh = Bvh::build(&[]);
        assert!(bvh.is_empty());
        assert!(bvh
            .ray_hits(&[], &Point3::origin(), &Vector3::z())
            .is_empty());
    }

    #[test]
    fn vertical_ray_through_cube_hits_twice() {
        let tris = cube_triangles();
        let bvh = Bvh::build(&tris);
        // XY off the face diagonals so exactly one triangle per face hits.
        let hits = bvh.ray_hits(&tris, &Point3::new(0.25, 0.75, -1.0), &Vector3::z());
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0].1, 1.0, epsilon = 1e-10);
        assert_relative_eq!(hits[1].1, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn hits_are_sorted_and_stable() {
        let tris = cube_triangles();
        let bvh = Bvh::build(&tris);
        let origin = Point3::new(0.5, 0.5, -2.0);
        let a = bvh.ray_hits(&tris, &origin, &Vector3::z());
        let b = bvh.ray_hits(&tris, &origin, &Vector3::z());
        assert_eq!(a, b);
        for pair in a.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn no_hits_behind_origin() {
        let tris = cube_triangles();
        let bvh = Bvh::build(&tris);
        // Origin above the cube, ray pointing further up.
        let hits = bvh.ray_hits(&tris, &Point3::new(0.5, 0.5, 2.0), &Vector3::z());
        assert!(hits.is_empty());
    }

    #[test]
    fn stats_count_all_triangles() {
        let tris = cube_triangles();
        let bvh = Bvh::build_with_leaf_size(&tris, 2);
        let stats = bvh.stats();
        assert_eq!(stats.triangles, 12);
        assert!(stats.leaves >= 2);
        assert_eq!(stats.nodes, stats.leaves * 2 - 1);
    }

    #[test]
    fn deep_split_still_finds_every_hit() {
        // Stack many parallel squares; a ray down the middle must hit all.
        let mut tris = Vec::new();
        for i in 0..64 {
            let z = f64::from(i) * 0.1;
            tris.push(Triangle::new(
                Point3::new(-1.0, -1.0, z),
                Point3::new(1.0, -1.0, z),
                Point3::new(0.0, 1.0, z),
            ));
        }
        let bvh = Bvh::build_with_leaf_size(&tris, 1);
        let hits = bvh.ray_hits(&tris, &Point3::new(0.0, 0.0, -1.0), &Vector3::z());
        assert_eq!(hits.len(), 64);
        // Ascending distance follows ascending stack order here.
        for (rank, (idx, _)) in hits.iter().enumerate() {
            assert_eq!(*idx as usize, rank);
        }
    }
}
