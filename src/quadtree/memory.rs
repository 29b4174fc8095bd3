use super::{NodeIdx, QuadTreeNode};
use ahash::AHashMap as HashMap;

/// Canonical store of the quadtree nodes.
///
/// Nodes live in an append-only arena and are addressed by [`NodeIdx`]. The hashtable
/// maps the parts of every internal node to its index, so asking twice for the same
/// parts always yields the same node.
pub(super) struct MemoryManager {
    /// all nodes ever created; slots 0 and 1 are the dead and the live leaf
    nodes: Vec<QuadTreeNode>,
    /// parts of an internal node -> its index in `nodes`
    hashtable: HashMap<[NodeIdx; 4], NodeIdx>,
}

impl MemoryManager {
    pub(super) fn new() -> Self {
        let mut mem = Self {
            nodes: Vec::new(),
            hashtable: HashMap::new(),
        };
        mem.seed_leaves();
        mem
    }

    fn seed_leaves(&mut self) {
        self.nodes.push(QuadTreeNode::leaf(false));
        self.nodes.push(QuadTreeNode::leaf(true));
        debug_assert_eq!(self.nodes.len(), 2);
    }

    /// Get a const reference to the node at the given index.
    ///
    /// Panics if `idx` was not issued by this store.
    #[inline]
    pub(super) fn get(&self, idx: NodeIdx) -> &QuadTreeNode {
        match self.nodes.get(idx.index()) {
            Some(n) => n,
            None => panic!("{idx:?} does not belong to this session"),
        }
    }

    /// Stores the advanced center of the node at the given index.
    #[inline]
    pub(super) fn set_cache(&mut self, idx: NodeIdx, result: NodeIdx) {
        let n = &mut self.nodes[idx.index()];
        debug_assert!(n.cache.map_or(true, |old| old == result));
        n.cache = Some(result);
    }

    pub(super) fn leaf(&self, alive: bool) -> NodeIdx {
        if alive {
            NodeIdx::LIVE
        } else {
            NodeIdx::DEAD
        }
    }

    /// Find a node with the given parts.
    /// If the node is not found, it is created.
    ///
    /// Panics if the parts have different depths.
    pub(super) fn find_or_create_node(
        &mut self,
        nw: NodeIdx,
        ne: NodeIdx,
        sw: NodeIdx,
        se: NodeIdx,
    ) -> NodeIdx {
        let parts = [nw, ne, sw, se];
        if let Some(&idx) = self.hashtable.get(&parts) {
            return idx;
        }

        let depth = self.get(nw).depth;
        assert!(
            parts.iter().all(|&x| self.get(x).depth == depth),
            "Parts of a node must have equal depths, got {:?}",
            parts.map(|x| self.get(x).depth)
        );
        assert!(
            self.nodes.len() < u32::MAX as usize,
            "More than 2^32 nodes are not supported"
        );

        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(QuadTreeNode::internal(parts, depth + 1));
        self.hashtable.insert(parts, idx);
        idx
    }

    /// Number of nodes in the store, both leaves included.
    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Forgets every node except the two leaves.
    pub(super) fn clear(&mut self) {
        self.nodes.clear();
        self.hashtable.clear();
        self.seed_leaves();
    }

    pub(super) fn bytes_total(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<QuadTreeNode>()
            + self.hashtable.capacity()
                * (std::mem::size_of::<([NodeIdx; 4], NodeIdx)>() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_are_preseeded() {
        let mem = MemoryManager::new();
        assert_eq!(mem.len(), 2);
        assert!(!mem.get(NodeIdx::DEAD).alive);
        assert!(mem.get(NodeIdx::LIVE).alive);
        assert_eq!(mem.leaf(true), NodeIdx::LIVE);
        assert_eq!(mem.leaf(false), NodeIdx::DEAD);
    }

    #[test]
    fn test_find_or_create_is_canonical() {
        let mut mem = MemoryManager::new();
        let (d, l) = (NodeIdx::DEAD, NodeIdx::LIVE);
        let a = mem.find_or_create_node(d, l, l, d);
        let b = mem.find_or_create_node(d, l, l, d);
        let c = mem.find_or_create_node(l, d, d, l);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(mem.len(), 4);
        assert_eq!(mem.get(a).depth, 1);
        assert_eq!(mem.get(a).parts(), [d, l, l, d]);
    }

    #[test]
    #[should_panic(expected = "equal depths")]
    fn test_mismatched_depths_panic() {
        let mut mem = MemoryManager::new();
        let d = NodeIdx::DEAD;
        let big = mem.find_or_create_node(d, d, d, d);
        mem.find_or_create_node(big, d, d, d);
    }

    #[test]
    fn test_clear_keeps_leaves() {
        let mut mem = MemoryManager::new();
        let d = NodeIdx::DEAD;
        mem.find_or_create_node(d, d, d, d);
        mem.clear();
        assert_eq!(mem.len(), 2);
        assert!(mem.get(NodeIdx::LIVE).alive);
    }
}
