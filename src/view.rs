//! The interactive view: one tree, one focus, one hover.
//!
//! [`RingView`] wires the pipeline together. Tree-affecting inputs (a new
//! tree, a resize, a config change) rebuild the packed tree from scratch;
//! focus and hover survive a rebuild only if their node is still present.
//! Pointer input is routed into hover notifications and click-to-zoom.

use std::fmt;

use crate::config::ViewConfig;
use crate::error::Result;
use crate::focus::{Focus, FocusController, ViewTransform};
use crate::hierarchy::{flatten, Hierarchy, NodeIndex, SourceRef, SourceTree, SyntaxTree};
use crate::hover::HoverBridge;
use crate::layout::{pack_hierarchy, PackedTree, Point};
use crate::render::{paint, Renderer, Scene, Surface, SvgSurface};

pub type PaddingFn = Box<dyn Fn(usize) -> f64>;

pub struct RingView {
    config: ViewConfig,
    padding: Option<PaddingFn>,
    hierarchy: Hierarchy,
    tree: PackedTree,
    renderer: Renderer,
    focus: FocusController,
    hover: HoverBridge,
}

impl fmt::Debug for RingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingView")
            .field("config", &self.config)
            .field("custom_padding", &self.padding.is_some())
            .field("nodes", &self.tree.len())
            .field("focus", &self.focus.focus())
            .field("hovered", &self.renderer.hovered())
            .field("hover", &self.hover)
            .finish()
    }
}

impl Default for RingView {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl RingView {
    pub fn new(config: ViewConfig) -> Self {
        let config = config.sanitized();
        let tree = pack_hierarchy(&Hierarchy::new(), &config.layout_params(), |d| config.padding(d));
        Self {
            renderer: Renderer::new(&config),
            focus: FocusController::new(&config, &tree),
            hover: HoverBridge::new(),
            hierarchy: Hierarchy::new(),
            padding: None,
            tree,
            config,
        }
    }

    /// Replace the depth -> padding function (pixels). The default is the
    /// label font size at that depth.
    pub fn with_padding(mut self, padding: impl Fn(usize) -> f64 + 'static) -> Self {
        self.padding = Some(Box::new(padding));
        self.relayout();
        self
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn tree(&self) -> &PackedTree {
        &self.tree
    }

    pub fn focus(&self) -> Focus {
        self.focus.focus()
    }

    pub fn transform(&self) -> ViewTransform {
        self.focus.transform()
    }

    pub fn is_animating(&self) -> bool {
        self.focus.is_animating()
    }

    pub fn hovered(&self) -> Option<SourceRef> {
        self.renderer.hovered()
    }

    /// Flatten and lay out a new external tree.
    pub fn set_tree<T: SyntaxTree>(&mut self, tree: &T, root: Option<T::Node>) {
        self.set_hierarchy(flatten(tree, root));
    }

    /// Decode a [`SourceTree`] and show it. On error the current tree stays.
    pub fn set_tree_json(&mut self, input: &str) -> Result<()> {
        let tree = SourceTree::from_json(input)?;
        self.set_tree(&tree, tree.root());
        Ok(())
    }

    pub fn set_hierarchy(&mut self, hierarchy: Hierarchy) {
        self.hierarchy = hierarchy;
        self.relayout();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.config = ViewConfig { viewport_width: width, viewport_height: height, ..self.config.clone() }.sanitized();
        self.relayout();
    }

    pub fn set_config(&mut self, config: ViewConfig) {
        self.config = config.sanitized();
        self.renderer.configure(&self.config);
        self.focus.configure(&self.config);
        self.relayout();
    }

    fn relayout(&mut self) {
        let params = self.config.layout_params();
        self.tree = match &self.padding {
            Some(padding) => pack_hierarchy(&self.hierarchy, &params, padding),
            None => {
                let config = &self.config;
                pack_hierarchy(&self.hierarchy, &params, |d| config.padding(d))
            }
        };
        self.focus.on_tree_rebuilt(&self.tree);

        if let (Some(index), Some(source)) = (self.renderer.hovered_node(), self.renderer.hovered()) {
            match self.tree.resolve(index, source) {
                Some(node) => {
                    self.renderer.set_hovered(Some(node));
                }
                None => {
                    tracing::debug!(source = source.0, "hovered node vanished");
                    self.renderer.set_hovered(None);
                    self.hover.emit(None);
                }
            }
        }
    }

    pub fn set_hover_listener(&mut self, listener: impl FnMut(Option<SourceRef>) + 'static) {
        self.hover.set_listener(listener);
    }

    pub fn clear_hover_listener(&mut self) {
        self.hover.clear_listener();
    }

    /// Route a raw pointer position (screen pixels). Returns the hovered node.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<NodeIndex> {
        let hit = self.hit_test(x, y);
        match hit {
            Some(node) => self.pointer_enter(node),
            None => self.pointer_leave(),
        }
        hit
    }

    /// The pointer entered `node`'s circle. Leaving the previously hovered
    /// circle is reported first.
    pub fn pointer_enter(&mut self, node: NodeIndex) {
        let Some(target) = self.tree.get(node) else {
            return;
        };
        let previous = self.renderer.hovered_node();
        if !self.renderer.set_hovered(Some(target)) {
            return;
        }
        if previous.is_some() {
            self.hover.emit(None);
        }
        self.hover.emit(Some(target.source));
    }

    pub fn pointer_leave(&mut self) {
        if self.renderer.set_hovered(None) {
            self.hover.emit(None);
        }
    }

    /// Deepest node under the screen point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeIndex> {
        self.renderer.hit_test(&self.tree, &self.focus.transform(), Point::new(x, y))
    }

    pub fn click(&mut self, node: NodeIndex, now_ms: f64) -> bool {
        self.focus.click(&self.tree, node, now_ms)
    }

    /// Click at a screen point: focus the node under it, or zoom back out
    /// when the click lands outside every circle.
    pub fn click_at(&mut self, x: f64, y: f64, now_ms: f64) -> Option<NodeIndex> {
        match self.hit_test(x, y) {
            Some(node) => {
                self.click(node, now_ms);
                Some(node)
            }
            None => {
                self.reset(now_ms);
                None
            }
        }
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.focus.reset(&self.tree, now_ms);
    }

    /// Advance animations. Returns true while another frame is needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.focus.tick(now_ms)
    }

    pub fn scene(&self) -> Scene {
        self.renderer.scene(&self.tree, &self.focus.transform(), self.focus.label_target(&self.tree))
    }

    pub fn paint<S: Surface + ?Sized>(&self, surface: &mut S) {
        paint(&self.scene(), surface);
    }

    pub fn render_svg(&self) -> String {
        let mut svg = SvgSurface::new();
        self.paint(&mut svg);
        svg.finish()
    }
}
