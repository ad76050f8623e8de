//! AvlTree: owned-node AVL tree used as the storage of a single bucket.
//!
//! Every node is exclusively owned by its parent (or by the tree for the
//! root). Rotations move boxed nodes between local bindings; nothing keeps a
//! parent link, so the recursion carries whatever path information a caller
//! needs.

use crate::error::InvariantViolation;
use core::borrow::Borrow;
use core::cmp::Ordering;
use tracing::trace;

type Link<K> = Option<Box<Node<K>>>;

#[derive(Debug, Clone)]
struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    height: usize,
}

impl<K> Node<K> {
    fn new(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
            height: 1,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// `height(right) - height(left)`.
    fn balance_factor(&self) -> isize {
        height(&self.right) as isize - height(&self.left) as isize
    }
}

#[inline]
fn height<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

fn balance_factor<K>(link: &Link<K>) -> isize {
    link.as_ref().map_or(0, |n| n.balance_factor())
}

/// Promote the left child. A node without a left child is returned as is.
fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    trace!(target: "avl_hashindex::tree", height = pivot.height, "rotate right");
    pivot
}

/// Promote the right child. A node without a right child is returned as is.
fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    trace!(target: "avl_hashindex::tree", height = pivot.height, "rotate left");
    pivot
}

/// Restore the height cache and the balance of `node`, whose children are
/// already valid AVL trees differing in height by at most 2.
fn rebalance<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.update_height();
    let bf = node.balance_factor();

    if bf < -1 {
        if balance_factor(&node.left) > 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if bf > 1 {
        if balance_factor(&node.right) < 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

fn insert_at<K: Ord>(link: Link<K>, key: K) -> (Box<Node<K>>, bool) {
    let mut node = match link {
        None => return (Box::new(Node::new(key)), true),
        Some(node) => node,
    };
    let inserted = match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, inserted) = insert_at(node.left.take(), key);
            node.left = Some(child);
            inserted
        }
        Ordering::Greater => {
            let (child, inserted) = insert_at(node.right.take(), key);
            node.right = Some(child);
            inserted
        }
        Ordering::Equal => return (node, false),
    };
    (rebalance(node), inserted)
}

/// Detach the leftmost node of `node`, rebalancing along the way up.
fn take_min<K>(mut node: Box<Node<K>>) -> (Link<K>, K) {
    match node.left.take() {
        None => {
            let Node { key, right, .. } = *node;
            (right, key)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}

fn remove_at<K, Q>(link: Link<K>, key: &Q) -> (Link<K>, Option<K>)
where
    K: Borrow<Q>,
    Q: ?Sized + Ord,
{
    let mut node = match link {
        None => return (None, None),
        Some(node) => node,
    };
    let removed = match key.cmp(node.key.borrow()) {
        Ordering::Less => {
            let (child, removed) = remove_at(node.left.take(), key);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = remove_at(node.right.take(), key);
            node.right = child;
            removed
        }
        Ordering::Equal => {
            let Node {
                key: own,
                left,
                right,
                ..
            } = *node;
            match (left, right) {
                (None, right) => return (right, Some(own)),
                (left, None) => return (left, Some(own)),
                (Some(left), Some(right)) => {
                    // The in-order successor takes the removed key's place.
                    let (rest, successor) = take_min(right);
                    node = Box::new(Node {
                        key: successor,
                        left: Some(left),
                        right: rest,
                        height: 0,
                    });
                    Some(own)
                }
            }
        }
    };
    (Some(rebalance(node)), removed)
}

fn search_at<'a, K, Q>(link: &'a Link<K>, key: &Q) -> Option<&'a K>
where
    K: Borrow<Q>,
    Q: ?Sized + Ord,
{
    let node = link.as_deref()?;
    match key.cmp(node.key.borrow()) {
        Ordering::Less => search_at(&node.left, key),
        Ordering::Greater => search_at(&node.right, key),
        Ordering::Equal => Some(&node.key),
    }
}

/// Recursively verify ordering, height cache and balance below `link`.
/// Returns the recomputed height of the subtree.
fn check_at<K: Ord>(
    link: &Link<K>,
    path: &mut String,
    lower: Option<&K>,
    upper: Option<&K>,
) -> Result<usize, InvariantViolation> {
    let Some(node) = link.as_deref() else {
        return Ok(0);
    };
    if lower.is_some_and(|lo| node.key <= *lo) || upper.is_some_and(|hi| node.key >= *hi) {
        return Err(InvariantViolation::Ordering { path: path.clone() });
    }

    path.push('L');
    let left = check_at(&node.left, path, lower, Some(&node.key))?;
    path.pop();
    path.push('R');
    let right = check_at(&node.right, path, Some(&node.key), upper)?;
    path.pop();

    let actual = 1 + left.max(right);
    if node.height != actual {
        return Err(InvariantViolation::StaleHeight {
            path: path.clone(),
            cached: node.height,
            actual,
        });
    }
    let balance = right as isize - left as isize;
    if !(-1..=1).contains(&balance) {
        return Err(InvariantViolation::Unbalanced {
            path: path.clone(),
            balance,
        });
    }
    Ok(actual)
}

/// A self-balancing binary search tree of unique keys.
#[derive(Debug, Clone)]
pub struct AvlTree<K> {
    root: Link<K>,
    len: usize,
}

impl<K> AvlTree<K> {
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree: 0 when empty, 1 for a single node.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.as_deref().map(NodeRef)
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    pub fn min(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.key)
    }

    pub fn max(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.key)
    }

    /// Keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut it = Iter {
            stack: Vec::with_capacity(self.height()),
            remaining: self.len,
        };
        it.push_left(self.root.as_deref());
        it
    }

    /// Keys in node, left, right order.
    pub fn preorder(&self) -> Preorder<'_, K> {
        Preorder {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Keys in left, right, node order.
    pub fn postorder(&self) -> Postorder<'_, K> {
        Postorder {
            stack: self.root.as_deref().map(|n| (n, false)).into_iter().collect(),
        }
    }
}

impl<K: Ord> AvlTree<K> {
    /// Insert `key`. Returns `false` and leaves the tree untouched when an
    /// equal key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        let (root, inserted) = insert_at(self.root.take(), key);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        self.debug_check();
        inserted
    }

    /// Remove `key`, returning the stored key if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (root, removed) = remove_at(self.root.take(), key);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        self.debug_check();
        removed
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        search_at(&self.root, key)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).is_some()
    }

    /// Walk the whole tree and report the first broken invariant, if any.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut path = String::new();
        check_at(&self.root, &mut path, None, None).map(|_| ())
    }

    // Full walk is O(n), so only the crate's own tests pay for it.
    #[inline]
    fn debug_check(&self) {
        #[cfg(test)]
        {
            if let Err(violation) = self.validate() {
                panic!("AVL invariant broken: {violation}");
            }
        }
    }
}

impl<K> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Read-only view of a node inside an [`AvlTree`].
#[derive(Debug)]
pub struct NodeRef<'a, K>(&'a Node<K>);

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<'a, K> NodeRef<'a, K> {
    pub fn key(&self) -> &'a K {
        &self.0.key
    }

    pub fn height(&self) -> usize {
        self.0.height
    }

    pub fn balance_factor(&self) -> isize {
        self.0.balance_factor()
    }

    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.0.left.as_deref().map(NodeRef)
    }

    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.0.right.as_deref().map(NodeRef)
    }
}

/// In-order iterator over the keys of an [`AvlTree`].
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn push_left(&mut self, mut cur: Option<&'a Node<K>>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

/// Pre-order iterator over the keys of an [`AvlTree`].
pub struct Preorder<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Iterator for Preorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.key)
    }
}

/// Post-order iterator over the keys of an [`AvlTree`].
pub struct Postorder<'a, K> {
    // `true` once the node's children have been pushed.
    stack: Vec<(&'a Node<K>, bool)>,
}

impl<'a, K> Iterator for Postorder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(&node.key);
            }
            self.stack.push((node, true));
            self.stack.extend(node.right.as_deref().map(|n| (n, false)));
            self.stack.extend(node.left.as_deref().map(|n| (n, false)));
        }
        None
    }
}
