use super::{BlankNodes, CacheStatistics, MemoryManager, NodeIdx, QuadTreeNode};
use crate::{rule::next_state, MAX_MATERIALIZE_DEPTH};
use ahash::AHashMap as HashMap;
use num_bigint::BigInt;

/// Implementation of [HashLife algorithm](https://conwaylife.com/wiki/HashLife)
///
/// A session owns the canonical node store, the advance memo (kept inline in the
/// nodes) and the cache of empty nodes. Every [`NodeIdx`] is only meaningful for the
/// session that issued it. Nothing is evicted while the session lives; call
/// [`HashLife::clear`] between independent simulations or let the `run_gc` of
/// [`HashLifeEngine`](crate::HashLifeEngine) compact the store.
///
/// # Example
///
/// ```rust
/// use hashlife_core::HashLife;
///
/// let mut life = HashLife::new();
/// // a blinker in the middle of an 8x8 board
/// let board = life.build_from_cells(3, |x, y| y == 3 && (2..5).contains(&x));
/// // two generations later the center 4x4 is back to the horizontal phase
/// let advanced = life.advance_center(board);
/// let center = life.center(board);
/// assert_eq!(advanced, center);
/// ```
pub struct HashLife {
    mem: MemoryManager,
    blank_nodes: BlankNodes,
    memo_entries: usize,
    memo_hits: u64,
    memo_misses: u64,
}

impl Default for HashLife {
    fn default() -> Self {
        Self::new()
    }
}

impl HashLife {
    /// Creates a session whose only nodes are the dead and the live leaf.
    pub fn new() -> Self {
        Self {
            mem: MemoryManager::new(),
            blank_nodes: BlankNodes::new(),
            memo_entries: 0,
            memo_hits: 0,
            memo_misses: 0,
        }
    }

    /// Returns the canonical live or dead leaf.
    pub fn leaf_for(&self, alive: bool) -> NodeIdx {
        self.mem.leaf(alive)
    }

    /// Returns the canonical node with the given quadrants.
    ///
    /// # Panics
    ///
    /// Panics if the quadrants have different depths.
    pub fn make_node(&mut self, nw: NodeIdx, ne: NodeIdx, sw: NodeIdx, se: NodeIdx) -> NodeIdx {
        self.mem.find_or_create_node(nw, ne, sw, se)
    }

    /// Returns the canonical node of the given depth with all cells dead.
    pub fn empty_of_depth(&mut self, depth: u32) -> NodeIdx {
        self.blank_nodes.get(depth, &mut self.mem)
    }

    /// Side length of the node is `2^depth`.
    pub fn depth(&self, node: NodeIdx) -> u32 {
        self.mem.get(node).depth
    }

    /// True only for the live leaf.
    pub fn is_alive(&self, node: NodeIdx) -> bool {
        self.mem.get(node).alive
    }

    /// Quadrants `[nw, ne, sw, se]` of an internal node, `None` for leaves.
    pub fn parts(&self, node: NodeIdx) -> Option<[NodeIdx; 4]> {
        let n = self.mem.get(node);
        (!n.is_leaf()).then(|| n.parts())
    }

    /// True if every cell of `node` is dead.
    pub fn is_empty(&mut self, node: NodeIdx) -> bool {
        let depth = self.depth(node);
        node == self.empty_of_depth(depth)
    }

    fn grandchildren(&self, node: NodeIdx) -> [QuadTreeNode; 4] {
        let n = self.mem.get(node);
        assert!(n.depth >= 2, "Node of depth {} has no grandchildren", n.depth);
        n.parts().map(|x| *self.mem.get(x))
    }

    /// The centered sub-square of half the side length.
    pub fn center(&mut self, node: NodeIdx) -> NodeIdx {
        let [nw, ne, sw, se] = self.grandchildren(node);
        self.mem.find_or_create_node(nw.se, ne.sw, sw.ne, se.nw)
    }

    fn north(&mut self, node: NodeIdx) -> NodeIdx {
        let [nw, ne, _, _] = self.grandchildren(node);
        self.mem.find_or_create_node(nw.ne, ne.nw, nw.se, ne.sw)
    }

    fn south(&mut self, node: NodeIdx) -> NodeIdx {
        let [_, _, sw, se] = self.grandchildren(node);
        self.mem.find_or_create_node(sw.ne, se.nw, sw.se, se.sw)
    }

    fn west(&mut self, node: NodeIdx) -> NodeIdx {
        let [nw, _, sw, _] = self.grandchildren(node);
        self.mem.find_or_create_node(nw.sw, nw.se, sw.nw, sw.ne)
    }

    fn east(&mut self, node: NodeIdx) -> NodeIdx {
        let [_, ne, _, se] = self.grandchildren(node);
        self.mem.find_or_create_node(ne.sw, ne.se, se.nw, se.ne)
    }

    /// Returns the center of `node` advanced by `2^(depth-2)` generations.
    ///
    /// The result has depth `depth - 1` and is memoized on `node`, so repeated calls
    /// return the same node without recomputation.
    ///
    /// # Panics
    ///
    /// Panics if the depth of `node` is less than 2.
    pub fn advance_center(&mut self, node: NodeIdx) -> NodeIdx {
        let n = *self.mem.get(node);
        assert!(
            n.depth >= 2,
            "advance_center requires depth >= 2, got {}",
            n.depth
        );
        if let Some(cache) = n.cache {
            self.memo_hits += 1;
            return cache;
        }
        self.memo_misses += 1;

        let cache = if n.depth == 2 {
            self.advance_leaves(&n)
        } else {
            self.advance_nodes(node)
        };
        self.mem.set_cache(node, cache);
        self.memo_entries += 1;
        cache
    }

    /// `n` is a 4x4 square of leaves; returns its center after one generation.
    fn advance_leaves(&mut self, n: &QuadTreeNode) -> NodeIdx {
        let [nw, ne, sw, se] = n
            .parts()
            .map(|x| self.mem.get(x).parts().map(|y| self.is_alive(y)));
        let grid = [
            [nw[0], nw[1], ne[0], ne[1]],
            [nw[2], nw[3], ne[2], ne[3]],
            [sw[0], sw[1], se[0], se[1]],
            [sw[2], sw[3], se[2], se[3]],
        ];
        let [nw, ne, sw, se] = [(1, 1), (1, 2), (2, 1), (2, 2)].map(|(y, x)| {
            let window = std::array::from_fn(|i| grid[y + i / 3 - 1][x + i % 3 - 1]);
            self.leaf_for(next_state(window))
        });
        self.mem.find_or_create_node(nw, ne, sw, se)
    }

    /// Two rounds of advancing overlapping windows, each by `2^(depth-3)` generations.
    fn advance_nodes(&mut self, node: NodeIdx) -> NodeIdx {
        let [nw, ne, sw, se] = self.mem.get(node).parts();

        // First stage
        let (p01, p10, p11, p12, p21) = (
            self.north(node),
            self.west(node),
            self.center(node),
            self.east(node),
            self.south(node),
        );
        let t00 = self.advance_center(nw);
        let t01 = self.advance_center(p01);
        let t02 = self.advance_center(ne);
        let t10 = self.advance_center(p10);
        let t11 = self.advance_center(p11);
        let t12 = self.advance_center(p12);
        let t20 = self.advance_center(sw);
        let t21 = self.advance_center(p21);
        let t22 = self.advance_center(se);

        // Second stage
        let pnw = self.mem.find_or_create_node(t00, t01, t10, t11);
        let pne = self.mem.find_or_create_node(t01, t02, t11, t12);
        let psw = self.mem.find_or_create_node(t10, t11, t20, t21);
        let pse = self.mem.find_or_create_node(t11, t12, t21, t22);
        let t_nw = self.advance_center(pnw);
        let t_ne = self.advance_center(pne);
        let t_sw = self.advance_center(psw);
        let t_se = self.advance_center(pse);
        self.mem.find_or_create_node(t_nw, t_ne, t_sw, t_se)
    }

    /// Doubles the side length of `node` while advancing it by `2^(depth-1)` generations.
    ///
    /// The rest of the plane is assumed to be empty. The original top-left corner ends
    /// up at offset `2^(depth-1)` of the result, so the content stays centered.
    ///
    /// # Panics
    ///
    /// Panics if the depth of `node` is less than 2.
    pub fn grow_double(&mut self, node: NodeIdx) -> NodeIdx {
        let depth = self.depth(node);
        assert!(depth >= 2, "grow_double requires depth >= 2, got {depth}");
        let e = self.empty_of_depth(depth);
        let windows = [
            self.mem.find_or_create_node(e, e, e, node),
            self.mem.find_or_create_node(e, e, node, e),
            self.mem.find_or_create_node(e, node, e, e),
            self.mem.find_or_create_node(node, e, e, e),
        ];
        let [nw, ne, sw, se] = windows.map(|x| self.advance_center(x));
        self.mem.find_or_create_node(nw, ne, sw, se)
    }

    /// Puts `node` in the middle of an empty square with twice the side length.
    pub fn with_blank_frame(&mut self, node: NodeIdx) -> NodeIdx {
        let n = *self.mem.get(node);
        assert!(!n.is_leaf(), "A leaf cannot be framed");
        let b = self.empty_of_depth(n.depth - 1);
        let [nw, ne, sw, se] = [
            self.mem.find_or_create_node(b, b, b, n.nw),
            self.mem.find_or_create_node(b, b, n.ne, b),
            self.mem.find_or_create_node(b, n.sw, b, b),
            self.mem.find_or_create_node(n.se, b, b, b),
        ];
        self.mem.find_or_create_node(nw, ne, sw, se)
    }

    /// Builds a node of the given depth, asking `f(x, y)` for every cell.
    ///
    /// Cells are visited in a fixed order (quadrants nw, ne, sw, se, recursively).
    pub fn build_from_cells(&mut self, depth: u32, mut f: impl FnMut(u64, u64) -> bool) -> NodeIdx {
        fn inner(
            this: &mut HashLife,
            depth: u32,
            x: u64,
            y: u64,
            f: &mut dyn FnMut(u64, u64) -> bool,
        ) -> NodeIdx {
            if depth == 0 {
                return this.leaf_for(f(x, y));
            }
            let half = 1 << (depth - 1);
            let nw = inner(this, depth - 1, x, y, f);
            let ne = inner(this, depth - 1, x + half, y, f);
            let sw = inner(this, depth - 1, x, y + half, f);
            let se = inner(this, depth - 1, x + half, y + half, f);
            this.mem.find_or_create_node(nw, ne, sw, se)
        }

        assert!(depth < u64::BITS, "Depth {depth} cannot be addressed");
        inner(self, depth, 0, 0, &mut f)
    }

    /// State of the cell in column `x` and row `y` of `node`.
    pub fn cell(&self, node: NodeIdx, x: u64, y: u64) -> bool {
        let mut n = self.mem.get(node);
        assert!(n.depth < u64::BITS, "Depth {} cannot be addressed", n.depth);
        assert!(
            x >> n.depth == 0 && y >> n.depth == 0,
            "Cell ({x}, {y}) is outside of a node of depth {}",
            n.depth
        );
        while !n.is_leaf() {
            let half = n.depth - 1;
            let i = ((((y >> half) & 1) << 1) | ((x >> half) & 1)) as usize;
            n = self.mem.get(n.parts()[i]);
        }
        n.alive
    }

    /// States of the cells in row `y` of `node`, from west to east.
    ///
    /// # Panics
    ///
    /// Panics if the depth of `node` exceeds [`MAX_MATERIALIZE_DEPTH`].
    pub fn row(&self, node: NodeIdx, y: u64) -> Vec<bool> {
        fn inner(this: &HashLife, idx: NodeIdx, y: u64, out: &mut Vec<bool>) {
            let n = this.mem.get(idx);
            if n.is_leaf() {
                out.push(n.alive);
                return;
            }
            let half = 1 << (n.depth - 1);
            if y < half {
                inner(this, n.nw, y, out);
                inner(this, n.ne, y, out);
            } else {
                inner(this, n.sw, y - half, out);
                inner(this, n.se, y - half, out);
            }
        }

        let depth = self.depth(node);
        assert!(
            depth <= MAX_MATERIALIZE_DEPTH,
            "Node of depth {depth} is too big to be materialized, the limit is {MAX_MATERIALIZE_DEPTH}"
        );
        assert!(y >> depth == 0, "Row {y} is outside of a node of depth {depth}");
        let mut out = Vec::with_capacity(1 << depth);
        inner(self, node, y, &mut out);
        out
    }

    /// Row `y` of `node` with `o` for alive cells and spaces for dead ones.
    pub fn row_string(&self, node: NodeIdx, y: u64) -> String {
        self.row(node, y)
            .into_iter()
            .map(|alive| if alive { 'o' } else { ' ' })
            .collect()
    }

    /// All rows of `node`, from north to south.
    ///
    /// # Panics
    ///
    /// Panics if the depth of `node` exceeds [`MAX_MATERIALIZE_DEPTH`].
    pub fn cells(&self, node: NodeIdx) -> Vec<Vec<bool>> {
        let depth = self.depth(node);
        assert!(
            depth <= MAX_MATERIALIZE_DEPTH,
            "Node of depth {depth} is too big to be materialized, the limit is {MAX_MATERIALIZE_DEPTH}"
        );
        (0..1u64 << depth).map(|y| self.row(node, y)).collect()
    }

    /// Counts alive cells of `node`.
    pub fn population(&self, node: NodeIdx) -> BigInt {
        fn inner(this: &HashLife, idx: NodeIdx, cache: &mut HashMap<NodeIdx, BigInt>) -> BigInt {
            if let Some(cached) = cache.get(&idx) {
                return cached.clone();
            }
            let n = this.mem.get(idx);
            let result = if n.is_leaf() {
                BigInt::from(n.alive as u8)
            } else {
                let mut result = BigInt::ZERO;
                for x in n.parts() {
                    result += inner(this, x, cache);
                }
                result
            };
            cache.insert(idx, result.clone());
            result
        }

        let mut cache = HashMap::new();
        inner(self, node, &mut cache)
    }

    /// Copies `node` of the `other` session into this one and returns its handle here.
    ///
    /// Memoized results are not copied.
    pub fn import(&mut self, other: &HashLife, node: NodeIdx) -> NodeIdx {
        fn inner(
            this: &mut HashLife,
            other: &HashLife,
            idx: NodeIdx,
            cache: &mut HashMap<NodeIdx, NodeIdx>,
        ) -> NodeIdx {
            if let Some(&cached) = cache.get(&idx) {
                return cached;
            }
            let n = *other.mem.get(idx);
            let result = if n.is_leaf() {
                this.leaf_for(n.alive)
            } else {
                let [nw, ne, sw, se] = n.parts().map(|x| inner(this, other, x, cache));
                this.mem.find_or_create_node(nw, ne, sw, se)
            };
            cache.insert(idx, result);
            result
        }

        let mut cache = HashMap::new();
        inner(self, other, node, &mut cache)
    }

    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            nodes: self.mem.len(),
            memo_entries: self.memo_entries,
            memo_hits: self.memo_hits,
            memo_misses: self.memo_misses,
            blank_depths: self.blank_nodes.len(),
        }
    }

    /// Drops every node and memoized result. All handles except the two leaves
    /// become invalid.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing session with {} nodes and {} memo entries",
            self.mem.len(),
            self.memo_entries
        );
        self.mem.clear();
        self.blank_nodes.clear();
        self.memo_entries = 0;
        self.memo_hits = 0;
        self.memo_misses = 0;
    }

    /// Approximate heap usage in bytes.
    pub fn bytes_total(&self) -> usize {
        self.mem.bytes_total() + self.blank_nodes.len() * std::mem::size_of::<NodeIdx>()
    }
}
