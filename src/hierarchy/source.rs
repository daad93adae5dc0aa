// Flat, index-linked syntax tree handed over by an external parser.
//
// JSON shape:
//
//   { "root": 0,
//     "nodes": [ { "kind": "Program", "children": [1, 2], "id": 17 },
//                { "kind": "Comment" },
//                { "kind": "FunctionDecl", "weight": 2.0 } ] }
//
// Nodes reference children by index, so arbitrarily deep trees decode
// without recursive JSON. `id` becomes the SourceRef (defaults to the index).

use serde::{Deserialize, Serialize};

use super::{SourceRef, SyntaxTree};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub kind: String,
    #[serde(default)]
    pub children: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTree {
    #[serde(default)]
    pub root: usize,
    #[serde(default)]
    pub nodes: Vec<SourceNode>,
}

impl SourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and validate a tree. An empty `nodes` array is a valid empty tree.
    pub fn from_json(input: &str) -> Result<Self> {
        let tree: SourceTree = serde_json::from_str(input)?;
        tree.validate()?;
        Ok(tree)
    }

    /// Check indices and single parenthood. Together these rule out cycles in
    /// the part of the tree reachable from the root.
    pub fn validate(&self) -> Result<()> {
        let len = self.nodes.len();
        if len == 0 {
            return Ok(());
        }
        if self.root >= len {
            return Err(Error::RootOutOfRange { root: self.root, len });
        }

        let mut has_parent = vec![false; len];
        for (parent, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if child >= len {
                    return Err(Error::ChildOutOfRange { parent, child, len });
                }
                if child == self.root || has_parent[child] {
                    return Err(Error::SharedChild { child });
                }
                has_parent[child] = true;
            }
        }
        Ok(())
    }

    pub fn root(&self) -> Option<usize> {
        (self.root < self.nodes.len()).then_some(self.root)
    }

    /// Replace the tree with a single root node.
    pub fn add_root(&mut self, kind: impl Into<String>) -> usize {
        self.nodes.clear();
        self.nodes.push(SourceNode {
            kind: kind.into(),
            children: Vec::new(),
            id: None,
            weight: None,
        });
        self.root = 0;
        0
    }

    pub fn add_child(&mut self, parent: usize, kind: impl Into<String>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(SourceNode {
            kind: kind.into(),
            children: Vec::new(),
            id: None,
            weight: None,
        });
        self.nodes[parent].children.push(index);
        index
    }
}

impl SyntaxTree for SourceTree {
    type Node = usize;

    fn kind(&self, node: usize) -> &str {
        &self.nodes[node].kind
    }

    fn children(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[node].children.iter().copied()
    }

    fn source_ref(&self, node: usize) -> SourceRef {
        SourceRef(self.nodes[node].id.unwrap_or(node as u64))
    }

    fn weight(&self, node: usize) -> Option<f64> {
        self.nodes[node].weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::flatten;

    #[test]
    fn test_from_json() {
        let tree = SourceTree::from_json(
            r#"{ "root": 0, "nodes": [
                { "kind": "Program", "children": [1, 2], "id": 17 },
                { "kind": "Comment" },
                { "kind": "FunctionDecl", "weight": 2.0 }
            ] }"#,
        )
        .unwrap();

        let h = flatten(&tree, tree.root());
        assert_eq!(h.len(), 3);
        assert_eq!(h.root().unwrap().source, SourceRef(17));
        assert_eq!(h.nodes()[2].source, SourceRef(2));
        assert_eq!(h.nodes()[2].value, 2.0);
    }

    #[test]
    fn test_empty_json_is_empty_tree() {
        let tree = SourceTree::from_json(r#"{ "nodes": [] }"#).unwrap();
        assert_eq!(tree.root(), None);
        let tree = SourceTree::from_json("{}").unwrap();
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_rejects_out_of_range_child() {
        let err = SourceTree::from_json(r#"{ "nodes": [ { "kind": "A", "children": [4] } ] }"#).unwrap_err();
        assert!(matches!(err, Error::ChildOutOfRange { parent: 0, child: 4, len: 1 }));
    }

    #[test]
    fn test_rejects_cycles_and_shared_children() {
        let cyclic = r#"{ "nodes": [
            { "kind": "A", "children": [1] },
            { "kind": "B", "children": [0] }
        ] }"#;
        assert!(matches!(SourceTree::from_json(cyclic), Err(Error::SharedChild { child: 0 })));

        let shared = r#"{ "nodes": [
            { "kind": "A", "children": [1, 2] },
            { "kind": "B", "children": [2] },
            { "kind": "C" }
        ] }"#;
        assert!(matches!(SourceTree::from_json(shared), Err(Error::SharedChild { child: 2 })));
    }

    #[test]
    fn test_rejects_bad_root_and_bad_json() {
        assert!(matches!(
            SourceTree::from_json(r#"{ "root": 3, "nodes": [ { "kind": "A" } ] }"#),
            Err(Error::RootOutOfRange { root: 3, len: 1 })
        ));
        assert!(matches!(SourceTree::from_json("{ nodes: "), Err(Error::Json(_))));
    }
}
