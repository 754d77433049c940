//! Module provide ordered-map implemented by [OMap] type.
//!
//! OMap is implemented using [left-leaning-red-black][wiki-llrb] insertion
//! and Hibbard deletion, with every node annotated by the size of its
//! sub-tree.
//!
//! Insertion keeps the tree balanced. Deletion only splices nodes out,
//! so under heavy removal the tree can drift away from red-black shape
//! while key order and sub-tree sizes stay exact. [OMap::is_balanced] is
//! a cheap heuristic over the leftmost and rightmost paths, not a proof
//! of balance; use [OMap::validate_llrb] for the full check.
//!
//! [wiki-llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree

use log::{debug, trace};

use std::{
    borrow::Borrow,
    cmp::{self, Ord, Ordering},
    fmt,
    iter::FromIterator,
    marker, mem,
    ops::{Bound, Deref, RangeBounds},
};

use crate::{
    node::{is_red, size_of, walkuprot_23, Node},
    Error, Result,
};

/// OMap manage a single instance of in-memory ordered-map using
/// [left-leaning-red-black][llrb] tree.
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
#[derive(Clone)]
pub struct OMap<K, V> {
    root: Option<Box<Node<K, V>>>,
}

impl<K, V> Default for OMap<K, V> {
    fn default() -> Self {
        OMap::new()
    }
}

impl<K, V> fmt::Debug for OMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Extend<(K, V)> for OMap<K, V>
where
    K: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        iter.into_iter().for_each(|(key, value)| {
            self.set(key, value);
        });
    }
}

impl<K, V> FromIterator<(K, V)> for OMap<K, V>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut index = OMap::new();
        index.extend(iter);
        index
    }
}

impl<'a, K, V> IntoIterator for &'a OMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V> OMap<K, V> {
    /// Create an empty instance of OMap.
    pub fn new() -> OMap<K, V> {
        OMap { root: None }
    }
}

/// Maintenance API.
impl<K, V> OMap<K, V> {
    /// Return number of entries in this instance, read from the root's
    /// sub-tree size.
    #[inline]
    pub fn len(&self) -> usize {
        size_of(self.as_root_ref())
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        let n = self.len();
        self.root = None;
        debug!("clear dropped {} entries", n);
    }

    /// Return the number of nodes on the path from root that follows only
    /// left children. This is not the height of the tree.
    pub fn left_path_height(&self) -> usize {
        let (mut node, mut height) = (self.as_root_ref(), 0);
        while let Some(nref) = node {
            height += 1;
            node = nref.as_left_ref();
        }
        height
    }

    /// Return the number of nodes on the path from root that follows only
    /// right children. This is not the height of the tree.
    pub fn right_path_height(&self) -> usize {
        let (mut node, mut height) = (self.as_root_ref(), 0);
        while let Some(nref) = node {
            height += 1;
            node = nref.as_right_ref();
        }
        height
    }

    /// Larger of [OMap::left_path_height] and [OMap::right_path_height].
    pub fn common_height(&self) -> usize {
        cmp::max(self.left_path_height(), self.right_path_height())
    }

    /// Weak balance check, true when leftmost and rightmost path heights
    /// differ by at most one. Other branches are not inspected.
    pub fn is_balanced(&self) -> bool {
        let (l, r) = (self.left_path_height(), self.right_path_height());
        cmp::max(l, r) - cmp::min(l, r) <= 1
    }

    /// Validate tree with following rules:
    ///
    /// * Keys are in sorted order, every key in a left sub-tree is less
    ///   than its ancestor and every key in a right sub-tree is greater.
    /// * Every node's size equals the size of its children plus one.
    ///
    /// Colors are not checked, this holds after any mix of set and
    /// remove. Refer to [OMap::validate_llrb] for color rules.
    pub fn validate(&self) -> Result<Stats>
    where
        K: Ord + fmt::Debug,
    {
        self.do_validate(false /*llrb*/)
    }

    /// Validate tree like [OMap::validate] and additionally:
    ///
    /// * Root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * No red right links.
    /// * Number of blacks should be same under left child and right child.
    ///
    /// Removal does not repair colors, hence color rules are guaranteed
    /// only when the index was built with `set` alone, since creation or
    /// the last `clear`.
    pub fn validate_llrb(&self) -> Result<Stats>
    where
        K: Ord + fmt::Debug,
    {
        self.do_validate(true /*llrb*/)
    }

    fn do_validate(&self, llrb: bool) -> Result<Stats>
    where
        K: Ord + fmt::Debug,
    {
        let root = self.as_root_ref();
        if llrb && is_red(root) {
            err_at!(Fatal, msg: "red root")?;
        }

        let mut stats = Stats::new(self.len(), mem::size_of::<Node<K, V>>());
        stats.left_height = self.left_path_height();
        stats.right_height = self.right_path_height();

        let blacks = Self::validate_tree(root, llrb, false, 0, 0, (None, None), &mut stats)?;
        if llrb {
            stats.blacks = Some(blacks);
        }

        trace!("validate llrb:{} {:?}", llrb, stats);
        Ok(stats)
    }

    fn validate_tree(
        node: Option<&Node<K, V>>,
        llrb: bool,
        fromred: bool,
        mut n_blacks: usize,
        depth: usize,
        (low, high): (Option<&K>, Option<&K>),
        stats: &mut Stats,
    ) -> Result<usize>
    where
        K: Ord + fmt::Debug,
    {
        let node = match node {
            Some(node) => node,
            None => {
                stats.sample_depth(depth);
                return Ok(n_blacks);
            }
        };

        match (low, high) {
            (Some(low), _) if node.key.le(low) => {
                err_at!(Fatal, msg: "sort key:{:?} low:{:?}", node.key, low)?
            }
            (_, Some(high)) if node.key.ge(high) => {
                err_at!(Fatal, msg: "sort key:{:?} high:{:?}", node.key, high)?
            }
            _ => (),
        }

        let (left, right) = (node.as_left_ref(), node.as_right_ref());

        let size = size_of(left) + size_of(right) + 1;
        if node.size != size {
            err_at!(Fatal, msg: "size key:{:?} {} != {}", node.key, node.size, size)?;
        }

        let red = is_red(Some(node));
        if llrb {
            if fromred && red {
                err_at!(Fatal, msg: "consecutive reds at key:{:?}", node.key)?;
            }
            if is_red(right) {
                err_at!(Fatal, msg: "red right link under key:{:?}", node.key)?;
            }
        }
        if !red {
            n_blacks += 1;
        }

        let lrange = (low, Some(&node.key));
        let lblacks = Self::validate_tree(left, llrb, red, n_blacks, depth + 1, lrange, stats)?;
        let rrange = (Some(&node.key), high);
        let rblacks = Self::validate_tree(right, llrb, red, n_blacks, depth + 1, rrange, stats)?;
        if llrb && lblacks != rblacks {
            err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks)?;
        }

        Ok(lblacks)
    }
}

/// Write API.
impl<K, V> OMap<K, V> {
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    /// Otherwise return None.
    pub fn set(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        let (mut root, old_value) = Self::do_set(self.root.take(), key, value);
        root.set_black();
        self.root = Some(root);
        old_value
    }

    /// Same as [OMap::set].
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        self.set(key, value)
    }

    /// Set every entry from `iter`, in the iterator's order.
    pub fn put_all<I>(&mut self, iter: I)
    where
        K: Ord,
        I: IntoIterator<Item = (K, V)>,
    {
        let n = self.len();
        self.extend(iter);
        debug!("put_all entries {} -> {}", n, self.len());
    }

    /// Remove key from this instance. If key is not present, then remove
    /// is a no-op. The removed value is dropped, not returned.
    ///
    /// Removal does not rebalance, refer to [OMap::validate_llrb].
    pub fn remove<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root = Self::do_remove(self.root.take(), key);
    }
}

/// Read API.
impl<K, V> OMap<K, V> {
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| &node.value)
    }

    /// Check whether key is present in this index.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Check whether any entry holds `value`. Values are not ordered,
    /// hence this is a full table scan.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    /// Return the entry with the smallest key.
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut nref = self.as_root_ref()?;
        while let Some(left) = nref.as_left_ref() {
            nref = left;
        }
        Some((&nref.key, &nref.value))
    }

    /// Return the entry with the largest key.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut nref = self.as_root_ref()?;
        while let Some(right) = nref.as_right_ref() {
            nref = right;
        }
        Some((&nref.key, &nref.value))
    }

    /// Snapshot of all keys, in ascending order.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of all values, in ascending order of their keys.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Snapshot of all entries, in ascending key order.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Return an iterator over all entries in this instance.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut paths = Vec::default();
        build_iter(self.as_root_ref(), &mut paths);
        Iter { paths }
    }

    /// Range over all entries within `range`, in ascending key order.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V, R, Q>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        let mut paths = Vec::default();
        seek(self.as_root_ref(), range.start_bound(), &mut paths);

        Range {
            iter: Some(Iter { paths }),
            range,
            _key: marker::PhantomData,
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.as_root_ref();
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.as_right_ref(),
                Ordering::Greater => nref.as_left_ref(),
                Ordering::Equal => return Some(nref),
            };
        }
        None
    }

    #[inline]
    fn as_root_ref(&self) -> Option<&Node<K, V>> {
        self.root.as_ref().map(Deref::deref)
    }
}

type Upsert<K, V> = (Box<Node<K, V>>, Option<V>);
type Delmin<K, V> = (Option<Box<Node<K, V>>>, Box<Node<K, V>>);

impl<K, V> OMap<K, V> {
    fn do_set(node: Option<Box<Node<K, V>>>, key: K, value: V) -> Upsert<K, V>
    where
        K: Ord,
    {
        let mut node = match node {
            Some(node) => node,
            None => return (Box::new(Node::new(key, value)), None),
        };

        let old_value = match node.key.cmp(&key) {
            Ordering::Greater => {
                let (left, o) = Self::do_set(node.left.take(), key, value);
                node.left = Some(left);
                o
            }
            Ordering::Less => {
                let (right, o) = Self::do_set(node.right.take(), key, value);
                node.right = Some(right);
                o
            }
            Ordering::Equal => Some(mem::replace(&mut node.value, value)),
        };
        (walkuprot_23(node), old_value)
    }

    fn do_remove<Q>(node: Option<Box<Node<K, V>>>, key: &Q) -> Option<Box<Node<K, V>>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = node?;

        match node.key.borrow().cmp(key) {
            Ordering::Greater => node.left = Self::do_remove(node.left.take(), key),
            Ordering::Less => node.right = Self::do_remove(node.right.take(), key),
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (left, None) => return left,
                (None, right) => return right,
                (Some(left), Some(right)) => {
                    // successor takes over this position, keeping its color.
                    let (right, mut newnode) = Self::remove_min(right);
                    newnode.left = Some(left);
                    newnode.right = right;
                    node = newnode;
                }
            },
        }

        node.resize();
        Some(node)
    }

    fn remove_min(mut node: Box<Node<K, V>>) -> Delmin<K, V> {
        match node.left.take() {
            None => {
                let right = node.right.take();
                node.resize();
                (right, node)
            }
            Some(left) => {
                let (left, min) = Self::remove_min(left);
                node.left = left;
                node.resize();
                (Some(node), min)
            }
        }
    }
}

/// Statistics on OMap tree, returned by [OMap::validate].
#[derive(Clone, Debug, Default)]
pub struct Stats {
    entries: usize,
    blacks: Option<usize>,
    min_depth: usize,
    max_depth: usize,
    left_height: usize,
    right_height: usize,
    node_size: usize,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            ..Stats::default()
        }
    }

    fn sample_depth(&mut self, depth: usize) {
        if self.max_depth == 0 || depth < self.min_depth {
            self.min_depth = depth;
        }
        self.max_depth = cmp::max(self.max_depth, depth);
    }

    /// Number of entries in the tree.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Black height, only computed by [OMap::validate_llrb].
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Shortest path, in nodes, from root to an empty link.
    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    /// Longest path, in nodes, from root to an empty link. This is the
    /// true height of the tree.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Leftmost path height, refer to [OMap::left_path_height].
    pub fn left_height(&self) -> usize {
        self.left_height
    }

    /// Rightmost path height, refer to [OMap::right_path_height].
    pub fn right_height(&self) -> usize {
        self.right_height
    }

    /// Size of a single node in bytes.
    pub fn node_size(&self) -> usize {
        self.node_size
    }
}

/// In-order iterator over [OMap] entries, refer to [OMap::iter].
pub struct Iter<'a, K, V> {
    paths: Vec<Fragment<'a, K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = self.paths.last_mut()?;
            match path.flag {
                IFlag::Left => {
                    path.flag = IFlag::Center;
                    break Some((&path.node.key, &path.node.value));
                }
                IFlag::Center => {
                    path.flag = IFlag::Right;
                    let right = path.node.as_right_ref();
                    build_iter(right, &mut self.paths)
                }
                IFlag::Right => {
                    self.paths.pop();
                }
            }
        }
    }
}

/// In-order iterator over a window of [OMap] entries, refer to
/// [OMap::range].
pub struct Range<'a, K, V, R, Q>
where
    Q: ?Sized,
{
    iter: Option<Iter<'a, K, V>>, // None once past the upper bound.
    range: R,
    _key: marker::PhantomData<Q>,
}

impl<'a, K, V, R, Q> Iterator for Range<'a, K, V, R, Q>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
    R: RangeBounds<Q>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.iter.as_mut()?.next()?;

        let qkey: &Q = key.borrow();
        let within = match self.range.end_bound() {
            Bound::Included(high) => qkey <= high,
            Bound::Excluded(high) => qkey < high,
            Bound::Unbounded => true,
        };
        if within {
            Some((key, value))
        } else {
            self.iter = None;
            None
        }
    }
}

// Left: node is yet to be yielded, its left spine is already on the stack.
// Center: node is yielded, right sub-tree is pending.
// Right: node and its right sub-tree are done.
#[derive(Copy, Clone)]
enum IFlag {
    Left,
    Center,
    Right,
}

struct Fragment<'a, K, V> {
    flag: IFlag,
    node: &'a Node<K, V>,
}

fn build_iter<'a, K, V>(node: Option<&'a Node<K, V>>, paths: &mut Vec<Fragment<'a, K, V>>) {
    let mut node = node;
    while let Some(nref) = node {
        paths.push(Fragment {
            flag: IFlag::Left,
            node: nref,
        });
        node = nref.as_left_ref();
    }
}

// Stack up every node, on the search path for `low`, that falls within
// `low`. Nodes below `low` are skipped along with their left sub-tree.
fn seek<'a, K, V, Q>(
    root: Option<&'a Node<K, V>>,
    low: Bound<&Q>,
    paths: &mut Vec<Fragment<'a, K, V>>,
) where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut node = root;
    while let Some(nref) = node {
        let key: &Q = nref.key.borrow();
        let within = match low {
            Bound::Included(low) => key >= low,
            Bound::Excluded(low) => key > low,
            Bound::Unbounded => true,
        };
        node = if within {
            paths.push(Fragment {
                flag: IFlag::Left,
                node: nref,
            });
            nref.as_left_ref()
        } else {
            nref.as_right_ref()
        };
    }
}

#[cfg(test)]
#[path = "omap_test.rs"]
mod omap_test;
