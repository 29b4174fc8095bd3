use super::{MemoryManager, NodeIdx};

/// Canonical all-dead nodes, indexed by depth.
pub(super) struct BlankNodes {
    data: Vec<NodeIdx>,
}

impl BlankNodes {
    pub(super) fn new() -> Self {
        Self {
            data: vec![NodeIdx::DEAD],
        }
    }

    pub(super) fn get(&mut self, depth: u32, mem: &mut MemoryManager) -> NodeIdx {
        let i = depth as usize;
        let v = &mut self.data;
        while v.len() <= i {
            let b = v[v.len() - 1];
            v.push(mem.find_or_create_node(b, b, b, b));
        }
        v[i]
    }

    /// Number of depths built so far.
    pub(super) fn len(&self) -> usize {
        self.data.len()
    }

    pub(super) fn clear(&mut self) {
        self.data.truncate(1);
    }
}
