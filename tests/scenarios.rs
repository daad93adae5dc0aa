//! End-to-end scenarios through `RingView`: the sample tree `A(B, C(D))`
//! in an 800x600 viewport with a 50px margin.

use std::cell::RefCell;
use std::rc::Rc;

use treerings_core::layout::Point;
use treerings_core::render::SvgSurface;
use treerings_core::{Focus, NodeIndex, RingView, SourceRef, SourceTree, ViewConfig, ViewTransform};

fn sample() -> SourceTree {
    SourceTree::from_json(
        r#"{
            "root": 0,
            "nodes": [
                { "kind": "A", "children": [1, 2], "id": 100 },
                { "kind": "B", "id": 101 },
                { "kind": "C", "children": [3], "id": 102 },
                { "kind": "D", "id": 103 }
            ]
        }"#,
    )
    .unwrap()
}

fn view() -> RingView {
    let config = ViewConfig { viewport_width: 800.0, viewport_height: 600.0, margin: 50.0, ..ViewConfig::default() };
    let mut view = RingView::new(config);
    let tree = sample();
    view.set_tree(&tree, tree.root());
    view
}

fn screen_center(view: &RingView, index: usize) -> Point {
    let node = view.tree().get(NodeIndex(index)).unwrap();
    view.transform().apply(node.world)
}

#[test]
fn test_sample_tree_nests_strictly() {
    let view = view();
    let tree = view.tree();
    let a = tree.find(SourceRef(100)).unwrap();
    let c = tree.find(SourceRef(102)).unwrap();
    let d = tree.find(SourceRef(103)).unwrap();

    assert_eq!(a.depth, 0);
    assert!(a.parent.is_none());
    assert!(d.radius > 0.0);
    assert!(d.world.distance(&c.world) + d.radius < c.radius);
    assert!(c.world.distance(&a.world) + c.radius < a.radius);
}

#[test]
fn test_click_fills_inner_box() {
    let mut view = view();
    let c = view.tree().find(SourceRef(102)).unwrap().index;

    assert!(view.click(c, 0.0));
    assert_eq!(view.focus(), Focus::FocusedOn(SourceRef(102)));
    assert!(!view.tick(300.0));

    let node = view.tree().get(c).unwrap();
    let t = view.transform();
    assert!((t.scale - 500.0 / (2.0 * node.radius)).abs() < 1e-9);
    let center = t.apply(node.world);
    assert!((center.x - 400.0).abs() < 1e-6);
    assert!((center.y - 300.0).abs() < 1e-6);
    assert!((node.radius * t.scale - 250.0).abs() < 1e-6);
}

#[test]
fn test_focus_then_reset_returns_to_root() {
    let mut view = view();
    view.click(NodeIndex(3), 0.0);
    view.tick(150.0);
    view.reset(150.0);
    view.tick(1000.0);

    assert_eq!(view.focus(), Focus::Root);
    assert_eq!(view.transform(), ViewTransform { translate_x: 50.0, translate_y: 50.0, scale: 1.0 });
}

#[test]
fn test_hover_enter_and_leave_emit_once() {
    let mut view = view();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    view.set_hover_listener(move |s| sink.borrow_mut().push(s));

    let b = screen_center(&view, 1);
    view.pointer_move(b.x, b.y);
    view.pointer_move(b.x + 1.0, b.y + 1.0);
    view.pointer_leave();
    view.pointer_leave();

    assert_eq!(*events.borrow(), vec![Some(SourceRef(101)), None]);
}

#[test]
fn test_labels_hidden_during_transition() {
    let mut view = view();
    assert_eq!(view.scene().labels.len(), 1);
    assert_eq!(view.scene().labels[0].text, "A");

    view.click(NodeIndex(2), 0.0);
    view.tick(100.0);
    assert!(view.scene().labels.is_empty());

    view.tick(300.0);
    let scene = view.scene();
    assert_eq!(scene.labels.len(), 1);
    assert_eq!(scene.labels[0].text, "C");
    assert_eq!(scene.labels[0].font_size, 12.0);
}

#[test]
fn test_hovered_circle_renders_highlighted_svg() {
    let mut view = view();
    let d = screen_center(&view, 3);
    view.pointer_move(d.x, d.y);

    let scene = view.scene();
    let hovered: Vec<_> = scene.circles.iter().filter(|c| c.source == SourceRef(103)).collect();
    assert_eq!(hovered.len(), 1);
    assert!(hovered[0].style.stroke_width > scene.circles[0].style.stroke_width);

    let mut svg = SvgSurface::new();
    view.paint(&mut svg);
    let out = svg.finish();
    assert_eq!(out.matches("<circle").count(), 4);
    assert!(out.contains("data-node=\"103\""));
    assert_eq!(out, view.render_svg());
}

#[test]
fn test_rebuild_without_focused_node_resets_instantly() {
    let mut view = view();
    view.click(NodeIndex(3), 0.0);
    view.tick(300.0);

    let mut smaller = SourceTree::new();
    let a = smaller.add_root("A");
    smaller.add_child(a, "B");
    view.set_tree(&smaller, smaller.root());

    assert_eq!(view.focus(), Focus::Root);
    assert!(!view.is_animating());
    assert_eq!(view.transform(), ViewTransform { translate_x: 50.0, translate_y: 50.0, scale: 1.0 });
}

#[test]
fn test_tiny_viewport_still_renders() {
    let config = ViewConfig { viewport_width: 30.0, viewport_height: 20.0, margin: 50.0, ..ViewConfig::default() };
    let mut view = RingView::new(config);
    let tree = sample();
    view.set_tree(&tree, tree.root());

    let scene = view.scene();
    assert_eq!(scene.circles.len(), 4);
    assert_eq!(scene.clip.width, 30.0);
    assert_eq!(scene.clip.height, 20.0);
    assert!((scene.circles[0].radius - 10.0).abs() < 1e-9);
}
