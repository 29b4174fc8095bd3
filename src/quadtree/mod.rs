mod blank;
mod engine;
mod hashlife;
mod memory;
mod node;
mod statistics;

use blank::BlankNodes;
use memory::MemoryManager;
use node::QuadTreeNode;

pub use engine::HashLifeEngine;
pub use hashlife::HashLife;
pub use node::NodeIdx;
pub use statistics::CacheStatistics;
