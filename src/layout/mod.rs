// Circle-packing layouter for Hierarchy.
//
// Goals:
// - Pure: hierarchy + viewport + padding function -> PackedTree
// - Deterministic: fixed packing order, fixed-seed shuffle, no time budgets
// - Deepest-first: pack children, then treat the enclosing circle as the
//   parent's circle
// - No overlap between siblings, every child inside its parent
// - Produces local (relative to parent center) and world positions
//
// Submodules:
// - siblings: front-chain packing of one set of siblings
// - enclose: smallest enclosing circle
//
// Output:
// - PackedTree in the inner-box frame: the root circle is centered in the
//   viewport minus margins and exactly fills its shorter side.

use std::collections::HashMap;

use serde::Serialize;

use crate::hierarchy::{Hierarchy, NodeIndex, SourceRef};

pub mod enclose;
pub mod siblings;

use enclose::Lcg;
use siblings::pack_siblings;

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn center(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.center().distance(&p) <= self.r
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl LayoutParams {
    /// Resolve the box the root is fitted into. When the margins leave no
    /// room, they are dropped and the full viewport is used.
    pub fn frame(&self) -> Frame {
        let width = finite_or_zero(self.width).max(0.0);
        let height = finite_or_zero(self.height).max(0.0);
        let margin = finite_or_zero(self.margin).max(0.0);
        let inner_width = width - 2.0 * margin;
        let inner_height = height - 2.0 * margin;

        if inner_width > 0.0 && inner_height > 0.0 {
            Frame { width, height, offset: margin, inner_width, inner_height }
        } else {
            Frame { width, height, offset: 0.0, inner_width: width, inner_height: height }
        }
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Viewport geometry a packed tree was computed for.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    /// Margin actually applied (0 when the viewport is too small for it).
    pub offset: f64,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl Frame {
    pub fn inner_center(&self) -> Point {
        Point::new(self.inner_width / 2.0, self.inner_height / 2.0)
    }

    /// Shorter side of the inner box: the root circle's diameter.
    pub fn extent(&self) -> f64 {
        self.inner_width.min(self.inner_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedNode {
    pub index: NodeIndex,
    pub name: String,
    /// Aggregate value of the subtree.
    pub value: f64,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub source: SourceRef,
    /// Center relative to the parent's center (root: relative to the inner box origin).
    pub local: Point,
    /// Center in the inner box frame.
    pub world: Point,
    pub radius: f64,
    pub depth: usize,
}

impl PackedNode {
    pub fn circle(&self) -> Circle {
        Circle { x: self.world.x, y: self.world.y, r: self.radius }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedTree {
    nodes: Vec<PackedNode>,
    frame: Frame,
    max_depth: usize,
    #[serde(skip)]
    by_source: HashMap<SourceRef, NodeIndex>,
}

impl PackedTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Option<&PackedNode> {
        self.nodes.first()
    }

    pub fn get(&self, index: NodeIndex) -> Option<&PackedNode> {
        self.nodes.get(index.0)
    }

    /// All nodes in pre-order (parents before children).
    pub fn nodes(&self) -> &[PackedNode] {
        &self.nodes
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Node for a source reference. With duplicate references the first node wins.
    pub fn find(&self, source: SourceRef) -> Option<&PackedNode> {
        self.by_source.get(&source).and_then(|&i| self.get(i))
    }

    /// Re-find a node remembered as `index` + `source`. The index wins while
    /// it still carries the same source reference, so nodes sharing a
    /// reference stay distinct; otherwise the first node with `source` is used.
    pub fn resolve(&self, index: NodeIndex, source: SourceRef) -> Option<&PackedNode> {
        match self.get(index) {
            Some(node) if node.source == source => Some(node),
            _ => self.find(source),
        }
    }
}

/// Pack `hierarchy` into the viewport described by `params`.
///
/// `padding(depth)` is the separation, in pixels, kept around the children of
/// a node at `depth` (between siblings and against the parent's edge).
pub fn pack_hierarchy(
    hierarchy: &Hierarchy,
    params: &LayoutParams,
    padding: impl Fn(usize) -> f64,
) -> PackedTree {
    let frame = params.frame();
    if hierarchy.is_empty() {
        return PackedTree { frame, ..PackedTree::default() };
    }

    let aggregate = hierarchy.aggregate_values();
    let orders = packing_orders(hierarchy, &aggregate);
    let mut random = Lcg::new();
    let mut circles = vec![Circle::default(); hierarchy.len()];

    // First pass without padding tells us how many layout units one pixel is.
    pack_pass(hierarchy, &aggregate, &orders, &mut circles, |_| 0.0, &mut random);
    let extent = frame.extent();
    if extent > 0.0 {
        let units_per_px = 2.0 * circles[0].r / extent;
        pack_pass(
            hierarchy,
            &aggregate,
            &orders,
            &mut circles,
            |depth| sanitize_padding(padding(depth)) * units_per_px,
            &mut random,
        );
    }

    let root_r = circles[0].r;
    let scale = if root_r > 0.0 { extent / (2.0 * root_r) } else { 0.0 };

    let mut nodes: Vec<PackedNode> = Vec::with_capacity(hierarchy.len());
    let mut by_source = HashMap::with_capacity(hierarchy.len());
    for (node, circle) in hierarchy.nodes().iter().zip(&circles) {
        let (local, world) = match node.parent {
            None => (frame.inner_center(), frame.inner_center()),
            Some(parent) => {
                let local = Point::new(circle.x * scale, circle.y * scale);
                let pw = nodes[parent.0].world;
                (local, Point::new(pw.x + local.x, pw.y + local.y))
            }
        };
        by_source.entry(node.source).or_insert(node.index);
        nodes.push(PackedNode {
            index: node.index,
            name: node.name.clone(),
            value: aggregate[node.index.0],
            parent: node.parent,
            children: node.children.clone(),
            source: node.source,
            local,
            world,
            radius: circle.r * scale,
            depth: node.depth,
        });
    }

    tracing::debug!(
        nodes = nodes.len(),
        root_radius = nodes[0].radius,
        scale,
        "packed hierarchy"
    );

    PackedTree { nodes, frame, max_depth: hierarchy.max_depth(), by_source }
}

fn sanitize_padding(p: f64) -> f64 {
    if p.is_finite() && p > 0.0 { p } else { 0.0 }
}

/// Children of every node in packing order: descending aggregate value,
/// ties broken by original position.
fn packing_orders(hierarchy: &Hierarchy, aggregate: &[f64]) -> Vec<Vec<NodeIndex>> {
    hierarchy
        .nodes()
        .iter()
        .map(|node| {
            let mut order = node.children.clone();
            order.sort_by(|a, b| aggregate[b.0].total_cmp(&aggregate[a.0]).then(a.0.cmp(&b.0)));
            order
        })
        .collect()
}

/// One bottom-up packing pass. Writes radii for every node and, for every
/// non-root node, its center relative to the parent's center (layout units).
fn pack_pass(
    hierarchy: &Hierarchy,
    aggregate: &[f64],
    orders: &[Vec<NodeIndex>],
    circles: &mut [Circle],
    padding: impl Fn(usize) -> f64,
    random: &mut Lcg,
) {
    let mut scratch: Vec<Circle> = Vec::new();

    // Pre-order indices reversed visit children before their parent.
    for node in hierarchy.nodes().iter().rev() {
        let i = node.index.0;
        let order = &orders[i];
        if order.is_empty() {
            circles[i] = Circle { x: 0.0, y: 0.0, r: aggregate[i].sqrt() };
            continue;
        }

        equalize_radii(order, circles);

        let pad = padding(node.depth);
        scratch.clear();
        scratch.extend(order.iter().map(|c| Circle { x: 0.0, y: 0.0, r: circles[c.0].r + pad }));
        let enclosing = pack_siblings(&mut scratch, random);

        for (child, packed) in order.iter().zip(&scratch) {
            circles[child.0].x = packed.x;
            circles[child.0].y = packed.y;
        }
        circles[i] = Circle { x: 0.0, y: 0.0, r: enclosing + pad };
    }
}

/// Raise sibling radii so a larger aggregate value never gets a smaller
/// circle. Growing a circle around a fixed center keeps its children inside.
fn equalize_radii(order: &[NodeIndex], circles: &mut [Circle]) {
    // `order` is descending by aggregate; walk it backwards for ascending.
    let mut running = 0.0f64;
    for child in order.iter().rev() {
        let r = &mut circles[child.0].r;
        *r = r.max(running);
        running = *r;
    }
}
