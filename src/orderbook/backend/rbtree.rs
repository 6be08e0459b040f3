//! Arena-indexed red-black tree with a cached best node.
//!
//! Nodes live in a `Slab` and refer to each other by index, so there are
//! no raw pointers to dangle. Rotations and the insert / delete fix-ups are
//! written once against a [`Dir`] and mirrored by flipping it.
//!
//! Deletion relinks nodes (CLRS transplant) instead of swapping payloads
//! between them, so an index always names the same price. That is what lets
//! `best` be cached: it is replaced on insert when the new price ranks
//! ahead, and moved to its in-order neighbour before the best node is
//! deleted. Reads of the best level are therefore O(1) while every
//! structural change stays O(log n).
//!
//! Invariants (checked in tests):
//! 1. The root is black.
//! 2. A red node has no red child.
//! 3. Every root-to-leaf path crosses the same number of black nodes.
//! 4. In-order traversal yields strictly ascending prices.

use slab::Slab;

use crate::config::Backend;
use crate::orderbook::level::PriceLevel;
use crate::orderbook::side::LevelStore;
use crate::types::{Price, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Left,
    Right,
}

impl Dir {
    #[inline]
    fn flip(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Debug, Clone)]
struct RbNode {
    level: PriceLevel,
    color: Color,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Red-black tree of levels keyed by ascending price
#[derive(Debug, Clone)]
pub struct RedBlackStore {
    side: Side,
    nodes: Slab<RbNode>,
    root: Option<usize>,
    best: Option<usize>,
}

impl RedBlackStore {
    /// Create an empty store
    pub fn new(side: Side) -> Self {
        Self {
            side,
            nodes: Slab::new(),
            root: None,
            best: None,
        }
    }

    /// Direction in which prices get worse for this side
    #[inline]
    fn worse(&self) -> Dir {
        match self.side {
            Side::Bid => Dir::Left,
            Side::Ask => Dir::Right,
        }
    }

    #[inline]
    fn price(&self, n: usize) -> Price {
        self.nodes[n].level.price()
    }

    #[inline]
    fn color(&self, n: Option<usize>) -> Color {
        n.map_or(Color::Black, |n| self.nodes[n].color)
    }

    #[inline]
    fn child(&self, n: usize, dir: Dir) -> Option<usize> {
        match dir {
            Dir::Left => self.nodes[n].left,
            Dir::Right => self.nodes[n].right,
        }
    }

    #[inline]
    fn set_child(&mut self, n: usize, dir: Dir, child: Option<usize>) {
        match dir {
            Dir::Left => self.nodes[n].left = child,
            Dir::Right => self.nodes[n].right = child,
        }
    }

    /// Which side of `parent` holds `n`
    #[inline]
    fn dir_of(&self, n: usize, parent: usize) -> Dir {
        if self.nodes[parent].left == Some(n) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// Point whatever referenced `old` (its parent, or the root) at `new`
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let dir = self.dir_of(old, p);
                self.set_child(p, dir, new);
            }
        }
    }

    /// Rotate `n` down toward `dir`; its child on the opposite side takes
    /// its place.
    fn rotate(&mut self, n: usize, dir: Dir) {
        let Some(pivot) = self.child(n, dir.flip()) else {
            return;
        };
        let inner = self.child(pivot, dir);

        self.set_child(n, dir.flip(), inner);
        if let Some(i) = inner {
            self.nodes[i].parent = Some(n);
        }

        let parent = self.nodes[n].parent;
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, n, Some(pivot));

        self.set_child(pivot, dir, Some(n));
        self.nodes[n].parent = Some(pivot);
    }

    /// Last node reached by always stepping toward `dir`
    fn extreme(&self, mut n: usize, dir: Dir) -> usize {
        while let Some(c) = self.child(n, dir) {
            n = c;
        }
        n
    }

    /// In-order neighbour of `n` in direction `dir`
    fn neighbor(&self, n: usize, dir: Dir) -> Option<usize> {
        if let Some(c) = self.child(n, dir) {
            return Some(self.extreme(c, dir.flip()));
        }
        let mut cursor = n;
        while let Some(p) = self.nodes[cursor].parent {
            if self.child(p, dir.flip()) == Some(cursor) {
                return Some(p);
            }
            cursor = p;
        }
        None
    }

    fn find(&self, price: Price) -> Option<usize> {
        let mut cursor = self.root;
        while let Some(n) = cursor {
            let here = self.price(n);
            if price == here {
                return Some(n);
            }
            cursor = if price < here {
                self.nodes[n].left
            } else {
                self.nodes[n].right
            };
        }
        None
    }

    fn insert_fixup(&mut self, mut z: usize) {
        while let Some(mut p) = self.nodes[z].parent {
            if self.nodes[p].color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(g) = self.nodes[p].parent else {
                break;
            };
            let dir = self.dir_of(p, g);
            let uncle = self.child(g, dir.flip());

            if let Some(u) = uncle.filter(|&u| self.nodes[u].color == Color::Red) {
                self.nodes[p].color = Color::Black;
                self.nodes[u].color = Color::Black;
                self.nodes[g].color = Color::Red;
                z = g;
            } else {
                if self.child(p, dir.flip()) == Some(z) {
                    self.rotate(p, dir);
                    std::mem::swap(&mut z, &mut p);
                }
                self.nodes[p].color = Color::Black;
                self.nodes[g].color = Color::Red;
                self.rotate(g, dir.flip());
            }
        }
        if let Some(r) = self.root {
            self.nodes[r].color = Color::Black;
        }
    }

    /// Put `v` where `u` hangs (its parent's link, or the root)
    fn transplant(&mut self, u: usize, v: Option<usize>) {
        let parent = self.nodes[u].parent;
        self.replace_child(parent, u, v);
        if let Some(v) = v {
            self.nodes[v].parent = parent;
        }
    }

    /// Unlink `z` from the tree and rebalance. The node stays in the slab.
    fn unlink(&mut self, z: usize) {
        let mut removed_color = self.nodes[z].color;
        let x;
        let x_parent;

        match (self.nodes[z].left, self.nodes[z].right) {
            (None, right) => {
                x = right;
                x_parent = self.nodes[z].parent;
                self.transplant(z, right);
            }
            (left, None) => {
                x = left;
                x_parent = self.nodes[z].parent;
                self.transplant(z, left);
            }
            (Some(left), Some(right)) => {
                let y = self.extreme(right, Dir::Left);
                removed_color = self.nodes[y].color;
                x = self.nodes[y].right;

                if self.nodes[y].parent == Some(z) {
                    x_parent = Some(y);
                } else {
                    x_parent = self.nodes[y].parent;
                    self.transplant(y, x);
                    self.nodes[y].right = Some(right);
                    self.nodes[right].parent = Some(y);
                }

                self.transplant(z, Some(y));
                self.nodes[y].left = Some(left);
                self.nodes[left].parent = Some(y);
                self.nodes[y].color = self.nodes[z].color;
            }
        }

        if removed_color == Color::Black {
            self.delete_fixup(x, x_parent);
        }
    }

    /// Restore the black-height after a black node left the tree. `x` is the
    /// node that took its place (possibly nil) and `parent` is x's parent.
    fn delete_fixup(&mut self, mut x: Option<usize>, mut parent: Option<usize>) {
        while x != self.root && self.color(x) == Color::Black {
            let Some(p) = parent else {
                break;
            };
            let dir = if self.nodes[p].left == x {
                Dir::Left
            } else {
                Dir::Right
            };

            let mut sibling = self.child(p, dir.flip());
            if let Some(s) = sibling.filter(|&s| self.nodes[s].color == Color::Red) {
                self.nodes[s].color = Color::Black;
                self.nodes[p].color = Color::Red;
                self.rotate(p, dir);
                sibling = self.child(p, dir.flip());
            }

            let Some(mut s) = sibling else {
                x = Some(p);
                parent = self.nodes[p].parent;
                continue;
            };

            let near = self.child(s, dir);
            let far = self.child(s, dir.flip());
            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                self.nodes[s].color = Color::Red;
                x = Some(p);
                parent = self.nodes[p].parent;
                continue;
            }

            if self.color(far) == Color::Black {
                if let Some(n) = near {
                    self.nodes[n].color = Color::Black;
                }
                self.nodes[s].color = Color::Red;
                self.rotate(s, dir.flip());
                let Some(rotated) = self.child(p, dir.flip()) else {
                    break;
                };
                s = rotated;
            }

            self.nodes[s].color = self.nodes[p].color;
            self.nodes[p].color = Color::Black;
            if let Some(f) = self.child(s, dir.flip()) {
                self.nodes[f].color = Color::Black;
            }
            self.rotate(p, dir);
            x = self.root;
            parent = None;
        }

        if let Some(x) = x {
            self.nodes[x].color = Color::Black;
        }
    }

    /// Black height of the subtree at `n`, or `None` if any invariant fails
    #[cfg(test)]
    fn check(&self, n: Option<usize>, lo: Option<Price>, hi: Option<Price>) -> Option<usize> {
        let Some(n) = n else {
            return Some(1);
        };
        let node = &self.nodes[n];
        let price = node.level.price();
        if lo.is_some_and(|lo| price <= lo) || hi.is_some_and(|hi| price >= hi) {
            return None;
        }
        if node.color == Color::Red
            && (self.color(node.left) == Color::Red || self.color(node.right) == Color::Red)
        {
            return None;
        }
        for child in [node.left, node.right].into_iter().flatten() {
            if self.nodes[child].parent != Some(n) {
                return None;
            }
        }
        let left = self.check(node.left, lo, Some(price))?;
        let right = self.check(node.right, Some(price), hi)?;
        (left == right).then_some(left + usize::from(node.color == Color::Black))
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        let root_ok = self.color(self.root) == Color::Black
            && self.root.map_or(true, |r| self.nodes[r].parent.is_none());
        let expected_best = self.root.map(|r| self.extreme(r, self.worse().flip()));
        root_ok && self.check(self.root, None, None).is_some() && self.best == expected_best
    }
}

impl LevelStore for RedBlackStore {
    fn backend(&self) -> Backend {
        Backend::RedBlackTree
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn get(&self, price: Price) -> Option<&PriceLevel> {
        self.find(price).map(|n| &self.nodes[n].level)
    }

    fn get_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        let n = self.find(price)?;
        Some(&mut self.nodes[n].level)
    }

    fn insert_level(&mut self, level: PriceLevel) {
        let price = level.price();

        let mut parent = None;
        let mut cursor = self.root;
        while let Some(n) = cursor {
            parent = Some(n);
            cursor = if price < self.price(n) {
                self.nodes[n].left
            } else {
                self.nodes[n].right
            };
        }

        let z = self.nodes.insert(RbNode {
            level,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(z),
            Some(p) if price < self.price(p) => self.nodes[p].left = Some(z),
            Some(p) => self.nodes[p].right = Some(z),
        }
        self.insert_fixup(z);

        if self
            .best
            .map_or(true, |b| self.side.is_better(price, self.price(b)))
        {
            self.best = Some(z);
        }
    }

    fn remove_level(&mut self, price: Price) -> Option<PriceLevel> {
        let z = self.find(price)?;
        if self.best == Some(z) {
            self.best = self.neighbor(z, self.worse());
        }
        self.unlink(z);
        Some(self.nodes.remove(z).level)
    }

    fn best(&self) -> Option<&PriceLevel> {
        self.best.map(|n| &self.nodes[n].level)
    }

    fn worst_price(&self) -> Option<Price> {
        self.root
            .map(|r| self.price(self.extreme(r, self.worse())))
    }

    fn best_levels(&self, n: usize) -> Vec<&PriceLevel> {
        let worse = self.worse();
        std::iter::successors(self.best, |&node| self.neighbor(node, worse))
            .take(n)
            .map(|node| &self.nodes[node].level)
            .collect()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.best = None;
    }
}
