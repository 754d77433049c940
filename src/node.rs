use std::ops::DerefMut;

/// Node corresponds to a single entry in OMap instance.
#[derive(Clone)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub size: usize,                    // store: nodes in this sub-tree
    pub black: bool,                    // store: black or red
    pub left: Option<Box<Node<K, V>>>,  // store: left child
    pub right: Option<Box<Node<K, V>>>, // store: right child
}

impl<K, V> Node<K, V> {
    /// New nodes are always red, and leaf.
    pub fn new(key: K, value: V) -> Node<K, V> {
        Node {
            key,
            value,
            size: 1,
            black: false,
            left: None,
            right: None,
        }
    }

    /// Recompute size from immediate children.
    #[inline]
    pub fn resize(&mut self) {
        self.size = size_of(self.as_left_ref()) + size_of(self.as_right_ref()) + 1;
    }

    #[inline]
    pub fn as_left_ref(&self) -> Option<&Node<K, V>> {
        self.left.as_ref().map(AsRef::as_ref)
    }

    #[inline]
    pub fn as_right_ref(&self) -> Option<&Node<K, V>> {
        self.right.as_ref().map(AsRef::as_ref)
    }

    #[inline]
    pub fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    pub fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.black
    }
}

#[inline]
pub fn size_of<K, V>(node: Option<&Node<K, V>>) -> usize {
    node.map_or(0, |node| node.size)
}

#[inline]
pub fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool {
    node.map_or(false, |node| !node.is_black())
}

//--------- rotation routines for 2-3 algorithm ----------------

/// Fixup applied bottom-up on every node along the insert path, in this
/// order: lean left, split a left-left red pair, push a 4-node up.
/// Size is recomputed last, once the shape is final.
pub fn walkuprot_23<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    if is_red(node.as_right_ref()) && !is_red(node.as_left_ref()) {
        node = rotate_left(node);
    }
    let left = node.as_left_ref();
    if is_red(left) && is_red(left.and_then(Node::as_left_ref)) {
        node = rotate_right(node);
    }
    if is_red(node.as_left_ref()) && is_red(node.as_right_ref()) {
        flip(node.deref_mut())
    }
    node.resize();
    node
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//             /    (r)                 (r)  \
//            /       \                 /     \
//          left       x             node      xr
//                    / \            /  \
//                  xl   xr       left   xl
//
pub fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = match node.right.take() {
        Some(x) if !x.is_black() => x,
        _ => panic!("rotate_left(): rotating a black link ? Call the programmer"),
    };
    node.right = x.left.take();
    x.black = node.black;
    x.size = node.size;
    node.set_red();
    node.resize();
    x.left = Some(node);
    x
}

//              (i)                       (i)
//               |                         |
//              node                       x
//              /  \                      / \
//            (r)   \                   (r)  \
//           /       \                 /      \
//          x       right             xl      node
//         / \                                / \
//       xl   xr                             xr  right
//
pub fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = match node.left.take() {
        Some(x) if !x.is_black() => x,
        _ => panic!("rotate_right(): rotating a black link ? Call the programmer"),
    };
    node.left = x.right.take();
    x.black = node.black;
    x.size = node.size;
    node.set_red();
    node.resize();
    x.right = Some(node);
    x
}

//        (b)                   (r)
//         |                     |
//        node                  node
//        / \                   / \
//      (r) (r)              (b)   (b)
//     /      \              /      \
//   left    right         left    right
//
pub fn flip<K, V>(node: &mut Node<K, V>) {
    if let Some(left) = node.left.as_mut() {
        left.set_black();
    }
    if let Some(right) = node.right.as_mut() {
        right.set_black();
    }
    node.set_red();
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
