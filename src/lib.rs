//! treerings-core: zoomable circle-packing view of syntax trees.
//!
//! Pipeline: external tree -> [`hierarchy::flatten`] -> [`layout::pack_hierarchy`]
//! -> [`render::Renderer`] scene, with [`focus::FocusController`] driving
//! click-to-zoom and [`hover::HoverBridge`] relaying hovered nodes to the host.
//! [`view::RingView`] ties the stages together; [`wasm`] exposes it to JavaScript.

pub mod config;
pub mod error;
pub mod focus;
pub mod hierarchy;
pub mod hover;
pub mod layout;
pub mod output;
pub mod render;
pub mod view;
pub mod wasm;

pub use config::{Easing, ViewConfig};
pub use error::{Error, Result};
pub use focus::{Focus, FocusController, ViewTransform};
pub use hierarchy::{flatten, Hierarchy, HierarchyNode, NodeIndex, SourceRef, SourceTree, SyntaxTree};
pub use hover::HoverBridge;
pub use layout::{pack_hierarchy, LayoutParams, PackedNode, PackedTree};
pub use output::ViewSnapshot;
pub use render::{paint, Renderer, Scene, Surface};
pub use view::RingView;
