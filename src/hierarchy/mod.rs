//
// Flatten step: external syntax tree -> Hierarchy (layout-friendly IR)
//
// What this does:
// - Walks any tree exposing a kind label and ordered children
// - Flattens it into an indexed vector with parent pointers (pre-order)
// - Gives every node a unit weight so each node counts once toward its
//   ancestors' aggregate size
// - Keeps a non-owning SourceRef back to the external node for hover/focus
//
// The walk uses an explicit stack of child iterators, so it never recurses
// and its extra space is proportional to tree depth.

use serde::{Deserialize, Serialize};

pub mod source;

pub use source::SourceTree;

/// Opaque key identifying a node in the externally owned syntax tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRef(pub u64);

/// Index of a node inside a `Hierarchy` (and the `PackedTree` built from it).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub usize);

/// Capabilities the flattener needs from an external tree.
pub trait SyntaxTree {
    /// Cheap handle to a node of the tree.
    type Node: Copy;

    /// Kind label of the node ("function_item", "BinaryExpression", ...).
    fn kind(&self, node: Self::Node) -> &str;

    /// Children in source order.
    fn children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// Identity of the node in the host's tree. Need not be unique: focus and
    /// hover remember the node itself and only fall back to this reference
    /// when the tree is rebuilt.
    fn source_ref(&self, node: Self::Node) -> SourceRef;

    /// Optional explicit weight. Unit weight is used when absent.
    fn weight(&self, _node: Self::Node) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub index: NodeIndex,
    /// Kind label of the source node.
    pub name: String,
    /// Own weight (always positive and finite).
    pub value: f64,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub source: SourceRef,
    pub depth: usize,
}

/// Immutable-once-built weighted tree. Root is `NodeIndex(0)` when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
}

/// Missing, non-finite or non-positive weights count as one unit.
pub fn sanitize_weight(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 1.0,
    }
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Option<&HierarchyNode> {
        self.nodes.first()
    }

    pub fn get(&self, index: NodeIndex) -> Option<&HierarchyNode> {
        self.nodes.get(index.0)
    }

    /// All nodes in pre-order (parents before children).
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Start the hierarchy. Clears any existing nodes.
    pub fn push_root(&mut self, name: impl Into<String>, value: f64, source: SourceRef) -> NodeIndex {
        self.nodes.clear();
        self.nodes.push(HierarchyNode {
            index: NodeIndex(0),
            name: name.into(),
            value: sanitize_weight(Some(value)),
            parent: None,
            children: Vec::new(),
            source,
            depth: 0,
        });
        NodeIndex(0)
    }

    /// Append a child under `parent`; it becomes the parent's last child.
    ///
    /// Children must be pushed after their parent, so indices stay in
    /// pre-order only when callers push depth-first (as `flatten` does).
    pub fn push_child(
        &mut self,
        parent: NodeIndex,
        name: impl Into<String>,
        value: f64,
        source: SourceRef,
    ) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(HierarchyNode {
            index,
            name: name.into(),
            value: sanitize_weight(Some(value)),
            parent: Some(parent),
            children: Vec::new(),
            source,
            depth,
        });
        self.nodes[parent.0].children.push(index);
        index
    }

    /// Aggregate value per node: own value plus the aggregate of all children.
    pub fn aggregate_values(&self) -> Vec<f64> {
        let mut sums: Vec<f64> = self.nodes.iter().map(|n| n.value).collect();
        // Children always have larger indices than their parent.
        for node in self.nodes.iter().rev() {
            if let Some(parent) = node.parent {
                sums[parent.0] += sums[node.index.0];
            }
        }
        sums
    }
}

/// Flatten an external tree rooted at `root` into a `Hierarchy`.
///
/// `None` yields an empty hierarchy.
pub fn flatten<T: SyntaxTree>(tree: &T, root: Option<T::Node>) -> Hierarchy {
    let mut hierarchy = Hierarchy::new();
    let Some(root) = root else {
        return hierarchy;
    };

    let root_index = hierarchy.push_root(
        tree.kind(root),
        sanitize_weight(tree.weight(root)),
        tree.source_ref(root),
    );

    let mut stack = vec![(root_index, tree.children(root))];
    while let Some((parent, children)) = stack.last_mut() {
        let parent = *parent;
        match children.next() {
            Some(child) => {
                let index = hierarchy.push_child(
                    parent,
                    tree.kind(child),
                    sanitize_weight(tree.weight(child)),
                    tree.source_ref(child),
                );
                stack.push((index, tree.children(child)));
            }
            None => {
                stack.pop();
            }
        }
    }

    tracing::debug!(nodes = hierarchy.len(), depth = hierarchy.max_depth(), "flattened syntax tree");
    hierarchy
}
