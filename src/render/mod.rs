//! Rendering of packed trees.
//!
//! The [`Renderer`] turns a [`PackedTree`] plus the current view transform
//! into a backend-neutral [`Scene`]: circles in screen space (parents before
//! children) and the arc-fitted ring label. Backends implement [`Surface`]
//! and receive the scene through [`paint`].
//!
//! The renderer also owns the per-circle visual state (default or hovered)
//! and answers hit tests. Labels never take part in hit testing; the circle
//! under the pointer is always the target.

use serde::Serialize;

use crate::config::ViewConfig;
use crate::focus::ViewTransform;
use crate::hierarchy::{NodeIndex, SourceRef};
use crate::layout::{PackedNode, PackedTree, Point};

pub mod canvas;
pub mod color;
pub mod label;
pub mod svg;

pub use canvas::CanvasSurface;
pub use color::{depth_color, Rgb};
pub use label::{char_budget, fit_label};
pub use svg::SvgSurface;

const DEFAULT_FILL_OPACITY: f64 = 0.15;
const DEFAULT_STROKE_WIDTH: f64 = 1.0;
const HOVER_FILL_OPACITY: f64 = 0.6;
const HOVER_STROKE_WIDTH: f64 = 3.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CircleState {
    Default,
    Hovered,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub fill: Rgb,
    pub fill_opacity: f64,
    pub stroke: Rgb,
    pub stroke_width: f64,
}

impl CircleStyle {
    pub fn for_state(color: Rgb, state: CircleState) -> Self {
        match state {
            CircleState::Default => Self {
                fill: color,
                fill_opacity: DEFAULT_FILL_OPACITY,
                stroke: color,
                stroke_width: DEFAULT_STROKE_WIDTH,
            },
            CircleState::Hovered => Self {
                fill: color,
                fill_opacity: HOVER_FILL_OPACITY,
                stroke: color,
                stroke_width: HOVER_STROKE_WIDTH,
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleItem {
    pub node: NodeIndex,
    pub source: SourceRef,
    /// Screen-space center.
    pub center: Point,
    /// Screen-space radius.
    pub radius: f64,
    pub depth: usize,
    pub state: CircleState,
    pub style: CircleStyle,
}

/// Upper semicircle a label is laid along, left to right.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LabelArc {
    pub center: Point,
    pub radius: f64,
}

impl LabelArc {
    /// SVG path data for the arc.
    pub fn path_data(&self) -> String {
        let Self { center, radius } = *self;
        format!(
            "M {} {} A {} {} 0 0 1 {} {}",
            center.x - radius,
            center.y,
            radius,
            radius,
            center.x + radius,
            center.y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelItem {
    pub node: NodeIndex,
    pub text: String,
    pub font_size: f64,
    pub arc: LabelArc,
    /// Always false: labels must not intercept pointer events.
    pub pointer_events: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// Everything is clipped to the viewport bounds.
    pub clip: Rect,
    pub circles: Vec<CircleItem>,
    pub labels: Vec<LabelItem>,
}

/// A drawing backend.
pub trait Surface {
    fn begin(&mut self, width: f64, height: f64, clip: &Rect);
    fn circle(&mut self, circle: &CircleItem);
    fn label(&mut self, label: &LabelItem);
    fn end(&mut self);
}

/// Draw `scene` onto `surface`: circles first, labels on top.
pub fn paint<S: Surface + ?Sized>(scene: &Scene, surface: &mut S) {
    surface.begin(scene.width, scene.height, &scene.clip);
    for circle in &scene.circles {
        surface.circle(circle);
    }
    for label in &scene.labels {
        surface.label(label);
    }
    surface.end();
}

/// Pointer hover state; ephemeral and never batched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HoverState {
    pub node: Option<NodeIndex>,
    pub source: Option<SourceRef>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    config: ViewConfig,
    hover: HoverState,
}

impl Renderer {
    pub fn new(config: &ViewConfig) -> Self {
        Self { config: config.clone(), hover: HoverState::default() }
    }

    pub fn configure(&mut self, config: &ViewConfig) {
        self.config = config.clone();
    }

    pub fn hovered(&self) -> Option<SourceRef> {
        self.hover.source
    }

    pub fn hovered_node(&self) -> Option<NodeIndex> {
        self.hover.node
    }

    /// Update the hovered circle. Returns true if the state changed.
    pub fn set_hovered(&mut self, node: Option<&PackedNode>) -> bool {
        let next = HoverState { node: node.map(|n| n.index), source: node.map(|n| n.source) };
        if self.hover == next {
            return false;
        }
        tracing::trace!(node = ?next.node, source = ?next.source, "hover changed");
        self.hover = next;
        true
    }

    pub fn circle_state(&self, index: NodeIndex) -> CircleState {
        if self.hover.node == Some(index) { CircleState::Hovered } else { CircleState::Default }
    }

    /// Build the scene for `tree` under `transform`, labelling `label_for`
    /// when it is large enough on screen.
    pub fn scene(&self, tree: &PackedTree, transform: &ViewTransform, label_for: Option<NodeIndex>) -> Scene {
        let frame = tree.frame();
        let mut scene = Scene {
            width: frame.width,
            height: frame.height,
            clip: Rect { x: 0.0, y: 0.0, width: frame.width, height: frame.height },
            circles: Vec::with_capacity(tree.len()),
            labels: Vec::new(),
        };

        let max_depth = tree.max_depth();
        for node in tree.nodes() {
            let state = self.circle_state(node.index);
            scene.circles.push(CircleItem {
                node: node.index,
                source: node.source,
                center: transform.apply(node.world),
                radius: node.radius * transform.scale,
                depth: node.depth,
                state,
                style: CircleStyle::for_state(depth_color(node.depth, max_depth), state),
            });
        }

        if let Some(label) = label_for.and_then(|i| self.label(tree, transform, i)) {
            scene.labels.push(label);
        }
        scene
    }

    fn label(&self, tree: &PackedTree, transform: &ViewTransform, index: NodeIndex) -> Option<LabelItem> {
        let node = tree.get(index)?;
        let radius = node.radius * transform.scale;
        if !(radius > self.config.min_label_radius) {
            return None;
        }
        let font_size = self.config.font_size(node.depth);
        let text = fit_label(&node.name, radius, font_size);
        if text.is_empty() {
            return None;
        }
        Some(LabelItem {
            node: node.index,
            text,
            font_size,
            arc: LabelArc {
                center: transform.apply(node.world),
                radius: (radius - font_size).max(0.0),
            },
            pointer_events: false,
        })
    }

    /// Deepest node whose circle contains the screen point `at`.
    pub fn hit_test(&self, tree: &PackedTree, transform: &ViewTransform, at: Point) -> Option<NodeIndex> {
        let p = transform.invert(at)?;
        let mut current = tree.root()?;
        if !current.circle().contains_point(p) {
            return None;
        }
        'descend: loop {
            for &child in &current.children {
                let Some(node) = tree.get(child) else { continue };
                if node.circle().contains_point(p) {
                    current = node;
                    continue 'descend;
                }
            }
            return Some(current.index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{flatten, SourceTree};
    use crate::layout::pack_hierarchy;

    fn setup() -> (ViewConfig, PackedTree) {
        let mut src = SourceTree::new();
        let a = src.add_root("Program");
        src.add_child(a, "Comment");
        let c = src.add_child(a, "FunctionDeclaration");
        src.add_child(c, "Identifier");
        let cfg = ViewConfig { viewport_width: 800.0, viewport_height: 600.0, margin: 50.0, ..ViewConfig::default() };
        let tree = pack_hierarchy(&flatten(&src, src.root()), &cfg.layout_params(), |d| cfg.padding(d));
        (cfg, tree)
    }

    #[test]
    fn test_scene_draws_every_circle_parents_first() {
        let (cfg, tree) = setup();
        let renderer = Renderer::new(&cfg);
        let vt = ViewTransform::root(&tree.frame());
        let scene = renderer.scene(&tree, &vt, None);

        assert_eq!(scene.circles.len(), 4);
        assert_eq!(scene.circles[0].node, NodeIndex(0));
        assert_eq!(scene.circles[0].center, Point::new(400.0, 300.0));
        assert_eq!(scene.clip, Rect { x: 0.0, y: 0.0, width: 800.0, height: 600.0 });
        assert!(scene.labels.is_empty());
        assert!(scene.circles.iter().all(|c| c.state == CircleState::Default));
        assert_eq!(scene.circles[0].style.fill, color::SHALLOW);
        assert_eq!(scene.circles[3].style.fill, color::DEEP);
    }

    #[test]
    fn test_hovered_circle_is_highlighted() {
        let (cfg, tree) = setup();
        let mut renderer = Renderer::new(&cfg);
        assert!(renderer.set_hovered(tree.get(NodeIndex(1))));
        assert!(!renderer.set_hovered(tree.get(NodeIndex(1))));
        assert_eq!(renderer.hovered(), Some(SourceRef(1)));

        let scene = renderer.scene(&tree, &ViewTransform::root(&tree.frame()), None);
        let hovered = &scene.circles[1];
        assert_eq!(hovered.state, CircleState::Hovered);
        assert!(hovered.style.stroke_width > scene.circles[0].style.stroke_width);
        assert!(hovered.style.fill_opacity > scene.circles[0].style.fill_opacity);

        renderer.set_hovered(None);
        let scene = renderer.scene(&tree, &ViewTransform::root(&tree.frame()), None);
        assert_eq!(scene.circles[1].state, CircleState::Default);
    }

    #[test]
    fn test_hover_highlights_one_of_two_shared_sources() {
        let cfg = ViewConfig { viewport_width: 800.0, viewport_height: 600.0, margin: 50.0, ..ViewConfig::default() };
        let mut h = crate::hierarchy::Hierarchy::new();
        let a = h.push_root("A", 1.0, SourceRef(5));
        h.push_child(a, "B", 1.0, SourceRef(7));
        h.push_child(a, "C", 1.0, SourceRef(7));
        let tree = pack_hierarchy(&h, &cfg.layout_params(), |d| cfg.padding(d));

        let mut renderer = Renderer::new(&cfg);
        renderer.set_hovered(tree.get(NodeIndex(2)));
        let scene = renderer.scene(&tree, &ViewTransform::root(&tree.frame()), None);
        let states: Vec<CircleState> = scene.circles.iter().map(|c| c.state).collect();
        assert_eq!(states, vec![CircleState::Default, CircleState::Default, CircleState::Hovered]);

        // Same source, different node: still a change.
        assert!(renderer.set_hovered(tree.get(NodeIndex(1))));
    }

    #[test]
    fn test_label_for_large_ring_only() {
        let (cfg, tree) = setup();
        let renderer = Renderer::new(&cfg);
        let vt = ViewTransform::root(&tree.frame());

        let scene = renderer.scene(&tree, &vt, Some(NodeIndex(0)));
        assert_eq!(scene.labels.len(), 1);
        let label = &scene.labels[0];
        assert_eq!(label.text, "Program");
        assert_eq!(label.font_size, 14.0);
        assert!(!label.pointer_events);
        assert!((label.arc.radius - (250.0 - 14.0)).abs() < 1e-9);

        let tiny = ViewConfig { min_label_radius: 1000.0, ..cfg };
        let scene = Renderer::new(&tiny).scene(&tree, &vt, Some(NodeIndex(0)));
        assert!(scene.labels.is_empty());
    }

    #[test]
    fn test_hit_test_finds_deepest_circle() {
        let (cfg, tree) = setup();
        let renderer = Renderer::new(&cfg);
        let vt = ViewTransform::root(&tree.frame());

        let d = tree.get(NodeIndex(3)).unwrap();
        assert_eq!(renderer.hit_test(&tree, &vt, vt.apply(d.world)), Some(NodeIndex(3)));

        // Just inside the root's edge, away from any child.
        let root = tree.root().unwrap();
        let near_edge = Point::new(root.world.x, root.world.y - root.radius + 0.5);
        let hit = renderer.hit_test(&tree, &vt, vt.apply(near_edge));
        assert_eq!(hit, Some(NodeIndex(0)));

        assert_eq!(renderer.hit_test(&tree, &vt, Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_label_arc_path() {
        let arc = LabelArc { center: Point::new(10.0, 20.0), radius: 5.0 };
        assert_eq!(arc.path_data(), "M 5 20 A 5 5 0 0 1 15 20");
    }
}
