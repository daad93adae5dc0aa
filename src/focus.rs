//! Click-to-zoom navigation.
//!
//! Two states: [`Focus::Root`] and [`Focus::FocusedOn`]. Every transition
//! computes the view transform that makes the target ring fill the inner box
//! and eases towards it. A new click or reset arriving mid-flight cancels the
//! running transition and starts from wherever the view currently is.
//!
//! Time is supplied by the host in milliseconds (animation frame timestamps),
//! so the controller never reads a clock itself.

use serde::Serialize;

use crate::config::{Easing, ViewConfig};
use crate::hierarchy::{NodeIndex, SourceRef};
use crate::layout::{Circle, Frame, PackedNode, PackedTree, Point};

/// Maps inner-box coordinates to screen coordinates: `screen = translate + scale * p`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl ViewTransform {
    /// Transform showing the whole tree: just the margin offset.
    pub fn root(frame: &Frame) -> Self {
        Self { translate_x: frame.offset, translate_y: frame.offset, scale: 1.0 }
    }

    /// Transform that makes `circle` fill the shorter side of the inner box,
    /// centered in it.
    pub fn focus_on(frame: &Frame, circle: &Circle) -> Self {
        if !(circle.r > 0.0) {
            return Self::root(frame);
        }
        let scale = frame.extent() / (2.0 * circle.r);
        let center = frame.inner_center();
        Self {
            translate_x: frame.offset + center.x - circle.x * scale,
            translate_y: frame.offset + center.y - circle.y * scale,
            scale,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.translate_x + p.x * self.scale, self.translate_y + p.y * self.scale)
    }

    /// Screen -> inner-box coordinates. `None` for a degenerate scale.
    pub fn invert(&self, p: Point) -> Option<Point> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        Some(Point::new((p.x - self.translate_x) / self.scale, (p.y - self.translate_y) / self.scale))
    }

    pub fn lerp(&self, to: &ViewTransform, t: f64) -> ViewTransform {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        ViewTransform {
            translate_x: mix(self.translate_x, to.translate_x),
            translate_y: mix(self.translate_y, to.translate_y),
            scale: mix(self.scale, to.scale),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "node", rename_all = "camelCase")]
pub enum Focus {
    Root,
    FocusedOn(SourceRef),
}

/// An in-flight eased interpolation between two transforms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transition {
    pub from: ViewTransform,
    pub to: ViewTransform,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Transition {
    /// Raw progress in [0, 1] before easing.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        let t = (now_ms - self.start_ms) / self.duration_ms;
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 }
    }

    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    pub fn value_at(&self, now_ms: f64) -> ViewTransform {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from.lerp(&self.to, self.easing.apply(t))
    }
}

#[derive(Debug, Clone)]
pub struct FocusController {
    focus: Focus,
    /// The clicked node itself; source references may repeat.
    target: Option<NodeIndex>,
    transform: ViewTransform,
    transition: Option<Transition>,
    duration_ms: f64,
    easing: Easing,
}

impl FocusController {
    pub fn new(config: &ViewConfig, tree: &PackedTree) -> Self {
        Self {
            focus: Focus::Root,
            target: None,
            transform: ViewTransform::root(&tree.frame()),
            transition: None,
            duration_ms: config.transition_duration_ms,
            easing: config.easing,
        }
    }

    /// Pick up new timing settings. Affects transitions started afterwards.
    pub fn configure(&mut self, config: &ViewConfig) {
        self.duration_ms = config.transition_duration_ms;
        self.easing = config.easing;
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Transform as of the last `tick` (or action).
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Ring labels are hidden for the whole duration of a transition.
    pub fn labels_visible(&self) -> bool {
        self.transition.is_none()
    }

    /// Node acting as the top-level ring: the focused node, or the root.
    pub fn focused_node(&self, tree: &PackedTree) -> Option<NodeIndex> {
        match self.focus {
            Focus::Root => tree.root().map(|n| n.index),
            Focus::FocusedOn(_) => self.resolve(tree).map(|n| n.index),
        }
    }

    fn resolve<'t>(&self, tree: &'t PackedTree) -> Option<&'t PackedNode> {
        match (self.focus, self.target) {
            (Focus::Root, _) => None,
            (Focus::FocusedOn(source), Some(index)) => tree.resolve(index, source),
            (Focus::FocusedOn(source), None) => tree.find(source),
        }
    }

    /// Node whose label may be drawn right now.
    pub fn label_target(&self, tree: &PackedTree) -> Option<NodeIndex> {
        if self.labels_visible() { self.focused_node(tree) } else { None }
    }

    /// Focus `node`. Returns false (and changes nothing) for an unknown node.
    pub fn click(&mut self, tree: &PackedTree, node: NodeIndex, now_ms: f64) -> bool {
        let Some(target) = tree.get(node) else {
            return false;
        };
        tracing::debug!(node = target.index.0, name = %target.name, "focus node");
        self.focus = Focus::FocusedOn(target.source);
        self.target = Some(target.index);
        self.start(ViewTransform::focus_on(&tree.frame(), &target.circle()), now_ms);
        true
    }

    /// Zoom back out to the root.
    pub fn reset(&mut self, tree: &PackedTree, now_ms: f64) {
        tracing::debug!("focus root");
        self.focus = Focus::Root;
        self.target = None;
        self.start(ViewTransform::root(&tree.frame()), now_ms);
    }

    fn start(&mut self, to: ViewTransform, now_ms: f64) {
        // Last action wins: settle wherever the running transition is now.
        let from = match &self.transition {
            Some(running) => running.value_at(now_ms),
            None => self.transform,
        };
        self.transform = from;

        if self.duration_ms > 0.0 {
            self.transition = Some(Transition {
                from,
                to,
                start_ms: now_ms,
                duration_ms: self.duration_ms,
                easing: self.easing,
            });
        } else {
            self.transform = to;
            self.transition = None;
        }
    }

    /// Advance the running transition. Returns true while still animating.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(running) = self.transition else {
            return false;
        };
        self.transform = running.value_at(now_ms);
        if running.is_complete(now_ms) {
            self.transform = running.to;
            self.transition = None;
            tracing::trace!(focus = ?self.focus, "transition finished");
        }
        self.is_animating()
    }

    /// Re-anchor after the packed tree was rebuilt. A focused node that no
    /// longer exists resets to the root; either way the view snaps to the new
    /// geometry without animating.
    pub fn on_tree_rebuilt(&mut self, tree: &PackedTree) {
        self.transition = None;
        let frame = tree.frame();

        if let Focus::FocusedOn(source) = self.focus {
            match self.resolve(tree).map(|n| (n.index, n.circle())) {
                Some((index, circle)) => {
                    self.target = Some(index);
                    self.transform = ViewTransform::focus_on(&frame, &circle);
                    return;
                }
                None => {
                    tracing::debug!(source = source.0, "focused node vanished, resetting to root");
                    self.focus = Focus::Root;
                    self.target = None;
                }
            }
        }
        self.transform = ViewTransform::root(&frame);
    }
}
