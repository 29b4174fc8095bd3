/// Handle of a canonical node inside one [`HashLife`](super::HashLife) session.
///
/// Two handles are equal exactly when they refer to the same node, and since every
/// internal node is hash-consed, this also means the two regions have equal content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub(super) u32);

impl NodeIdx {
    /// The canonical dead cell.
    pub const DEAD: NodeIdx = NodeIdx(0);
    /// The canonical live cell.
    pub const LIVE: NodeIdx = NodeIdx(1);

    /// Position of the node in its session's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the quadtree.
///
/// Leaves (`depth == 0`) only carry `alive`; their parts point to [`NodeIdx::DEAD`]
/// and must not be followed.
#[derive(Clone, Copy, Debug)]
pub(super) struct QuadTreeNode {
    pub(super) nw: NodeIdx,
    pub(super) ne: NodeIdx,
    pub(super) sw: NodeIdx,
    pub(super) se: NodeIdx,
    /// center advanced by `2^(depth-2)` generations, once computed
    pub(super) cache: Option<NodeIdx>,
    pub(super) depth: u32,
    /// always false for internal nodes
    pub(super) alive: bool,
}

impl QuadTreeNode {
    pub(super) fn leaf(alive: bool) -> Self {
        Self {
            nw: NodeIdx::DEAD,
            ne: NodeIdx::DEAD,
            sw: NodeIdx::DEAD,
            se: NodeIdx::DEAD,
            cache: None,
            depth: 0,
            alive,
        }
    }

    pub(super) fn internal(parts: [NodeIdx; 4], depth: u32) -> Self {
        let [nw, ne, sw, se] = parts;
        Self {
            nw,
            ne,
            sw,
            se,
            cache: None,
            depth,
            alive: false,
        }
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.depth == 0
    }

    pub(super) fn parts(&self) -> [NodeIdx; 4] {
        [self.nw, self.ne, self.sw, self.se]
    }
}
