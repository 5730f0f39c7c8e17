/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Augmented interval tree for overlap probing.
//!
//! An unbalanced binary search tree over closed integer intervals `[lo, hi]`,
//! keyed by `lo` (equal keys go left), with every node carrying the maximum
//! `hi` of its subtree.  The augmentation lets [`IntervalTree::intersects`]
//! discard whole subtrees: if the left subtree's max endpoint ends before the
//! query starts, nothing on that side can overlap.
//!
//! The placement search drives this tree hard — add on descent, remove on
//! backtrack, probe before every try — so nodes live in a flat arena with a
//! free list instead of heap-boxed links.  Indices into the arena act as
//! handles; parent links make upward max propagation iterative.
//!
//! No balancing is performed.  The workloads here insert in backtracking
//! order, which is scrambled enough in practice that the tree stays shallow.

use crate::task::Time;

// ── Node and tree ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct TreeNode {
    lo: Time,
    hi: Time,
    /// Maximum `hi` in the subtree rooted at this node.
    max: Time,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

/// A multiset of closed intervals supporting add, remove and overlap probes.
#[derive(Debug, Clone, Default)]
pub struct IntervalTree {
    nodes: Vec<TreeNode>,
    free: Vec<usize>,
    root: Option<usize>,
    len: usize,
}

impl IntervalTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `[lo, hi]` (normalized so `lo ≤ hi`).  Duplicates are kept.
    pub fn add(&mut self, lo: Time, hi: Time) {
        let (lo, hi) = normalize(lo, hi);
        let idx = self.alloc(lo, hi);
        self.len += 1;

        let Some(mut cur) = self.root else {
            self.root = Some(idx);
            return;
        };
        loop {
            let next = if lo > self.nodes[cur].lo {
                &mut self.nodes[cur].right
            } else {
                &mut self.nodes[cur].left
            };
            match *next {
                Some(n) => cur = n,
                None => {
                    *next = Some(idx);
                    self.nodes[idx].parent = Some(cur);
                    break;
                }
            }
        }
        // Push the new endpoint up while it raises ancestor maxima.
        let mut up = Some(cur);
        while let Some(p) = up {
            if self.nodes[p].max >= hi {
                break;
            }
            self.nodes[p].max = hi;
            up = self.nodes[p].parent;
        }
    }

    /// Whether any stored interval overlaps `[lo, hi]` (closed on both ends).
    pub fn intersects(&self, lo: Time, hi: Time) -> bool {
        let (lo, hi) = normalize(lo, hi);
        let mut cur = self.root;
        while let Some(i) = cur {
            let node = &self.nodes[i];
            if hi >= node.lo && lo <= node.hi {
                return true;
            }
            cur = match node.left {
                // Left subtree can only overlap if some interval there ends
                // at or after the query start.
                Some(l) if self.nodes[l].max >= lo => Some(l),
                _ => node.right,
            };
        }
        false
    }

    /// Remove one occurrence of `[lo, hi]`.  Returns `false` if absent.
    pub fn remove(&mut self, lo: Time, hi: Time) -> bool {
        let (lo, hi) = normalize(lo, hi);
        let Some(idx) = self.find(lo, hi) else {
            return false;
        };
        self.len -= 1;

        let (left, right) = (self.nodes[idx].left, self.nodes[idx].right);
        if left.is_none() || right.is_none() {
            self.splice(idx);
            return true;
        }

        // Two children: replace this node's interval with its in-order
        // predecessor (rightmost of the left subtree), which by construction
        // has at most one child and can be spliced out directly.
        let mut pred = left.unwrap_or(idx);
        while let Some(r) = self.nodes[pred].right {
            pred = r;
        }
        let (plo, phi) = (self.nodes[pred].lo, self.nodes[pred].hi);
        self.splice(pred);
        self.nodes[idx].lo = plo;
        self.nodes[idx].hi = phi;
        self.recompute_max_upward(Some(idx));
        true
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn alloc(&mut self, lo: Time, hi: Time) -> usize {
        let node = TreeNode {
            lo,
            hi,
            max: hi,
            parent: None,
            left: None,
            right: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Locate a node holding exactly `[lo, hi]`.  Equal-`lo` duplicates live
    /// in the left subtree, so an endpoint mismatch continues leftwards.
    fn find(&self, lo: Time, hi: Time) -> Option<usize> {
        let mut cur = self.root;
        while let Some(i) = cur {
            let node = &self.nodes[i];
            if lo > node.lo {
                cur = node.right;
            } else if lo < node.lo || hi != node.hi {
                cur = node.left;
            } else {
                return Some(i);
            }
        }
        None
    }

    /// Detach a node with at most one child, reattaching that child in its
    /// place, and refresh ancestor maxima.
    fn splice(&mut self, idx: usize) {
        debug_assert!(self.nodes[idx].left.is_none() || self.nodes[idx].right.is_none());
        let child = self.nodes[idx].left.or(self.nodes[idx].right);
        let parent = self.nodes[idx].parent;

        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
        match parent {
            None => self.root = child,
            Some(p) => {
                if self.nodes[p].left == Some(idx) {
                    self.nodes[p].left = child;
                } else {
                    self.nodes[p].right = child;
                }
            }
        }
        self.free.push(idx);
        self.recompute_max_upward(parent);
    }

    fn subtree_max(&self, idx: Option<usize>) -> Option<Time> {
        idx.map(|i| self.nodes[i].max)
    }

    fn recompute_max_upward(&mut self, from: Option<usize>) {
        let mut cur = from;
        while let Some(i) = cur {
            let mut m = self.nodes[i].hi;
            if let Some(lm) = self.subtree_max(self.nodes[i].left) {
                m = m.max(lm);
            }
            if let Some(rm) = self.subtree_max(self.nodes[i].right) {
                m = m.max(rm);
            }
            self.nodes[i].max = m;
            cur = self.nodes[i].parent;
        }
    }

    /// Walk the whole tree asserting the BST ordering, the max augmentation
    /// and parent-link consistency.  Test support only.
    #[cfg(test)]
    fn check_invariants(&self) {
        fn walk(tree: &IntervalTree, idx: usize, parent: Option<usize>) -> (Time, usize) {
            let node = &tree.nodes[idx];
            assert_eq!(node.parent, parent, "parent link out of sync");
            assert!(node.lo <= node.hi);
            let mut max = node.hi;
            let mut count = 1;
            if let Some(l) = node.left {
                assert!(tree.nodes[l].lo <= node.lo, "left child key exceeds parent");
                let (m, c) = walk(tree, l, Some(idx));
                max = max.max(m);
                count += c;
            }
            if let Some(r) = node.right {
                assert!(tree.nodes[r].lo > node.lo, "right child key not greater");
                let (m, c) = walk(tree, r, Some(idx));
                max = max.max(m);
                count += c;
            }
            assert_eq!(node.max, max, "stale subtree max");
            (max, count)
        }

        match self.root {
            None => assert_eq!(self.len, 0),
            Some(root) => {
                let (_, count) = walk(self, root, None);
                assert_eq!(count, self.len, "node count out of sync");
            }
        }
    }
}

fn normalize(lo: Time, hi: Time) -> (Time, Time) {
    if lo <= hi {
        (lo, hi)
    } else {
        (hi, lo)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
