//! Graphviz rendering of bucket trees, for eyeballing shapes while debugging.

use crate::avl_tree::{AvlTree, NodeRef};
use crate::hash::BucketHash;
use crate::hash_index::HashIndex;
use core::borrow::Borrow;
use core::fmt::{self, Display, Write};

/// Key text with `"` and `\` escaped for use inside a quoted DOT id.
struct Escaped(String);

impl Escaped {
    fn new<K: Display>(key: &K) -> Self {
        Escaped(key.to_string())
    }
}

impl Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

fn write_node<K: Display, W: Write>(node: NodeRef<'_, K>, out: &mut W) -> fmt::Result {
    let key = Escaped::new(node.key());
    writeln!(out, "    \"{key}\" [label=\"{key}\\nheight: {}\"];", node.height())?;
    for child in [node.left(), node.right()].into_iter().flatten() {
        writeln!(out, "    \"{key}\" -> \"{}\";", Escaped::new(child.key()))?;
    }
    for child in [node.left(), node.right()].into_iter().flatten() {
        write_node(child, out)?;
    }
    Ok(())
}

impl<K: Display> AvlTree<K> {
    /// Write the tree as a `digraph`, one labelled vertex per key.
    pub fn write_dot<W: Write>(&self, out: &mut W) -> fmt::Result {
        out.write_str("digraph G {\n")?;
        if let Some(root) = self.root() {
            write_node(root, out)?;
        }
        out.write_str("}\n")
    }

    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_dot(&mut out);
        out
    }
}

impl<K, H> HashIndex<K, H>
where
    K: Ord + AsRef<[u8]> + Display,
    H: BucketHash,
{
    /// Render the bucket tree that holds `key`. Returns `Ok(false)` and
    /// writes nothing when the key is absent.
    pub fn write_bucket_dot<Q, W>(&self, key: &Q, out: &mut W) -> Result<bool, fmt::Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord + AsRef<[u8]>,
        W: Write,
    {
        match self.bucket(self.bucket_of(key)) {
            Some(tree) if tree.contains(key) => tree.write_dot(out).map(|_| true),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_renders_empty_graph() {
        let tree: AvlTree<i32> = AvlTree::new();
        assert_eq!(tree.to_dot(), "digraph G {\n}\n");
    }

    #[test]
    fn renders_every_node_and_edge() {
        let tree: AvlTree<i32> = [20, 10, 30, 40].into_iter().collect();
        let expected = "digraph G {\n\
            \x20   \"20\" [label=\"20\\nheight: 3\"];\n\
            \x20   \"20\" -> \"10\";\n\
            \x20   \"20\" -> \"30\";\n\
            \x20   \"10\" [label=\"10\\nheight: 1\"];\n\
            \x20   \"30\" [label=\"30\\nheight: 2\"];\n\
            \x20   \"30\" -> \"40\";\n\
            \x20   \"40\" [label=\"40\\nheight: 1\"];\n\
            }\n";
        assert_eq!(tree.to_dot(), expected);
    }

    #[test]
    fn quotes_are_escaped() {
        let tree: AvlTree<String> = ["say \"hi\"".to_string()].into_iter().collect();
        assert!(tree.to_dot().contains("\"say \\\"hi\\\"\" [label="));
    }

    #[test]
    fn bucket_dot_only_for_present_keys() {
        let idx: HashIndex<String> = ["Pippin".to_string()].into_iter().collect();
        let mut out = String::new();
        assert_eq!(idx.write_bucket_dot("Legolas", &mut out), Ok(false));
        assert!(out.is_empty());
        assert_eq!(idx.write_bucket_dot("Pippin", &mut out), Ok(true));
        assert!(out.contains("\"Pippin\" [label=\"Pippin\\nheight: 1\"];"));
    }
}
