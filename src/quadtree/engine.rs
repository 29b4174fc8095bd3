use super::{CacheStatistics, HashLife, NodeIdx};
use crate::{GoLEngine, MAX_MATERIALIZE_DEPTH, MIN_DEPTH};
use anyhow::{anyhow, Result};
use num_bigint::BigInt;

/// Unbounded Game of Life field driven by [`HashLife::grow_double`].
///
/// Every [`update`](GoLEngine::update) pads the field with an empty border and
/// advances it, so the side length and the number of simulated generations double
/// together. [`trim`](HashLifeEngine::trim) removes empty borders to keep the field
/// tight around the pattern.
pub struct HashLifeEngine {
    life: HashLife,
    root: NodeIdx,
    generation: BigInt,
    origin: [BigInt; 2],
}

impl HashLifeEngine {
    /// Takes over a session and a node of it as the field.
    ///
    /// Fields smaller than `2^MIN_DEPTH` are framed with dead cells.
    pub fn from_node(life: HashLife, root: NodeIdx) -> Self {
        let mut engine = Self {
            life,
            root,
            generation: BigInt::ZERO,
            origin: [BigInt::ZERO, BigInt::ZERO],
        };
        while engine.depth() < MIN_DEPTH {
            engine.add_frame();
        }
        engine
    }

    /// Session that owns every node of the field.
    pub fn session(&self) -> &HashLife {
        &self.life
    }

    /// Node holding the whole field, its north-west corner is at [`origin`](GoLEngine::origin).
    pub fn root(&self) -> NodeIdx {
        self.root
    }

    /// Counters of the underlying session.
    pub fn statistics(&self) -> CacheStatistics {
        self.life.statistics()
    }

    /// The field is a square with side length `2^depth`.
    pub fn depth(&self) -> u32 {
        self.life.depth(self.root)
    }

    fn add_frame(&mut self) {
        let depth = self.depth();
        if depth == 0 {
            // a single cell has no quadrants to spread around
            let b = self.life.leaf_for(false);
            self.root = self.life.make_node(self.root, b, b, b);
            return;
        }
        self.root = self.life.with_blank_frame(self.root);
        let shift = BigInt::from(1) << (depth - 1);
        for x in self.origin.iter_mut() {
            *x -= &shift;
        }
    }

    fn pop_frame(&mut self) {
        let shift = BigInt::from(1) << (self.depth() - 2);
        self.root = self.life.center(self.root);
        for x in self.origin.iter_mut() {
            *x += &shift;
        }
    }

    /// True if the outer quarter of the field on every side is dead.
    fn has_blank_frame(&mut self) -> bool {
        let depth = self.depth();
        if depth <= MIN_DEPTH {
            return false;
        }

        let b = self.life.empty_of_depth(depth - 2);
        let Some(parts) = self.life.parts(self.root) else {
            return false;
        };
        let [nw, ne, sw, se] = parts.map(|x| self.life.parts(x).unwrap_or([b; 4]));
        let frame_parts = [
            nw[2], nw[0], nw[1], ne[0], ne[1], ne[3], se[1], se[3], se[2], sw[3], sw[2], sw[0],
        ];
        frame_parts.iter().all(|&x| x == b)
    }

    /// Shrinks the field while its outer quarter is dead, never below `2^MIN_DEPTH`.
    ///
    /// Returns the number of halvings performed.
    pub fn trim(&mut self) -> u32 {
        let mut popped = 0;
        while self.has_blank_frame() {
            self.pop_frame();
            popped += 1;
        }
        if popped > 0 {
            log::debug!("trimmed {popped} blank frames, depth is {}", self.depth());
        }
        popped
    }
}

impl GoLEngine for HashLifeEngine {
    fn new() -> Self {
        let mut life = HashLife::new();
        let root = life.empty_of_depth(MIN_DEPTH);
        Self::from_node(life, root)
    }

    fn load_cells(&mut self, cells: &[Vec<bool>]) -> Result<()> {
        let side = cells.len();
        if !side.is_power_of_two() {
            return Err(anyhow!("Side length {side} is not a power of two"));
        }
        if let Some((y, row)) = cells.iter().enumerate().find(|(_, row)| row.len() != side) {
            return Err(anyhow!("Row {y} has {} cells, expected {side}", row.len()));
        }

        let mut life = HashLife::new();
        let root = life.build_from_cells(side.ilog2(), |x, y| cells[y as usize][x as usize]);
        *self = Self::from_node(life, root);
        Ok(())
    }

    fn current_state(&self) -> Result<Vec<Vec<bool>>> {
        let depth = self.depth();
        if depth > MAX_MATERIALIZE_DEPTH {
            return Err(anyhow!(
                "Field of depth {depth} is too big to be materialized, the limit is {MAX_MATERIALIZE_DEPTH}"
            ));
        }
        Ok(self.life.cells(self.root))
    }

    fn update(&mut self) -> BigInt {
        let depth = self.depth();
        let steps = BigInt::from(1) << (depth - 1);
        self.root = self.life.grow_double(self.root);
        for x in self.origin.iter_mut() {
            *x -= &steps;
        }
        self.generation += &steps;
        log::debug!(
            "grew field to depth {}, generation is {}",
            depth + 1,
            self.generation
        );
        steps
    }

    fn generation(&self) -> BigInt {
        self.generation.clone()
    }

    fn origin(&self) -> [BigInt; 2] {
        self.origin.clone()
    }

    fn population(&self) -> BigInt {
        self.life.population(self.root)
    }

    fn run_gc(&mut self) {
        let before = self.life.statistics().nodes;
        let mut fresh = HashLife::new();
        self.root = fresh.import(&self.life, self.root);
        self.life = fresh;
        log::debug!(
            "collected garbage: {before} -> {} nodes",
            self.life.statistics().nodes
        );
    }

    fn bytes_total(&self) -> usize {
        self.life.bytes_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::random_of_depth;
    use ahash::AHashSet as HashSet;
    const SEED: u64 = 42;

    /// Alive cells in plane coordinates, independent of the current framing.
    fn alive_cells(engine: &HashLifeEngine) -> HashSet<(i64, i64)> {
        let [x0, y0] = engine.origin().map(|v| i64::try_from(v).unwrap());
        let mut result = HashSet::new();
        for (y, row) in engine.current_state().unwrap().iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell {
                    result.insert((x as i64 + x0, y as i64 + y0));
                }
            }
        }
        result
    }

    fn glider() -> Vec<Vec<bool>> {
        let rows = [".o..", "..o.", "ooo.", "...."];
        rows.iter()
            .map(|row| row.bytes().map(|c| c == b'o').collect())
            .collect()
    }

    #[test]
    fn test_new_is_blank() {
        let engine = HashLifeEngine::new();
        assert_eq!(engine.depth(), MIN_DEPTH);
        assert_eq!(engine.population(), BigInt::ZERO);
        assert_eq!(engine.generation(), BigInt::ZERO);
    }

    #[test]
    fn test_load_rejects_bad_shapes() {
        let mut engine = HashLifeEngine::new();
        assert!(engine.load_cells(&vec![vec![false; 3]; 3]).is_err());
        assert!(engine.load_cells(&[vec![false; 4], vec![false; 4]]).is_err());
        assert!(engine.load_cells(&[]).is_err());
        assert!(engine.load_cells(&glider()).is_ok());
    }

    #[test]
    fn test_small_fields_are_framed() {
        let mut engine = HashLifeEngine::new();
        engine.load_cells(&[vec![true]]).unwrap();
        assert_eq!(engine.depth(), MIN_DEPTH);
        assert_eq!(engine.population(), BigInt::from(1));

        engine
            .load_cells(&[vec![true, false], vec![false, true]])
            .unwrap();
        assert_eq!(engine.depth(), MIN_DEPTH);
        assert_eq!(engine.origin(), [BigInt::from(-1), BigInt::from(-1)]);
        let state = engine.current_state().unwrap();
        assert!(state[1][1] && state[2][2]);
    }

    #[test]
    fn test_update_doubles_generations() {
        let mut engine = HashLifeEngine::new();
        engine.load_cells(&glider()).unwrap();
        let mut expected = BigInt::ZERO;
        for i in 0..20 {
            let steps = engine.update();
            assert_eq!(steps, BigInt::from(1) << (MIN_DEPTH + i - 1));
            expected += steps;
            assert_eq!(engine.generation(), expected);
            assert_eq!(engine.population(), BigInt::from(5));
        }
        assert!(engine.current_state().is_err());
    }

    #[test]
    fn test_glider_moves() {
        let mut cells = vec![vec![false; 8]; 8];
        for (y, row) in glider().into_iter().enumerate() {
            cells[y][..4].copy_from_slice(&row);
        }
        let mut engine = HashLifeEngine::new();
        engine.load_cells(&cells).unwrap();
        // 4 + 8 generations, three full periods
        engine.update();
        engine.update();
        assert_eq!(engine.generation(), BigInt::from(12));

        let [x0, y0] = engine.origin().map(|v| i64::try_from(v).unwrap());
        let mut alive = vec![];
        for (y, row) in engine.current_state().unwrap().iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell {
                    alive.push((x as i64 + x0, y as i64 + y0));
                }
            }
        }
        // rows are scanned north to south, so the order matches
        let expected: [(i64, i64); 5] =
            [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)].map(|(x, y)| (x + 3, y + 3));
        assert_eq!(alive, expected);
    }

    #[test]
    fn test_trim() {
        let mut engine = HashLifeEngine::new();
        engine.load_cells(&glider()).unwrap();
        for _ in 0..6 {
            engine.update();
        }
        let population = engine.population();
        let origin_before = engine.origin();
        let popped = engine.trim();
        assert!(popped > 0);
        assert_eq!(engine.population(), population);
        assert!(engine.origin()[0] > origin_before[0]);
        // trimming twice does nothing
        assert_eq!(engine.trim(), 0);
    }

    #[test]
    fn test_trim_keeps_cells_in_place() {
        for seed in SEED..SEED + 8 {
            let mut life = HashLife::new();
            let root = random_of_depth(&mut life, 3, Some(seed)).unwrap();
            let mut engine = HashLifeEngine::from_node(life, root);
            for _ in 0..6 {
                engine.update();
                let before = alive_cells(&engine);
                let popped = engine.trim();
                assert_eq!(alive_cells(&engine), before, "seed {seed}, popped {popped}");
            }
        }

        // a still block in the middle shrinks down to the smallest field
        let mut cells = vec![vec![false; 16]; 16];
        for (x, y) in [(7, 7), (8, 7), (7, 8), (8, 8)] {
            cells[y][x] = true;
        }
        let mut engine = HashLifeEngine::new();
        engine.load_cells(&cells).unwrap();
        engine.update();
        let before = alive_cells(&engine);
        assert_eq!(engine.trim(), 3);
        assert_eq!(engine.depth(), MIN_DEPTH);
        assert_eq!(alive_cells(&engine), before);
        assert_eq!(engine.origin(), [BigInt::from(6), BigInt::from(6)]);
    }

    #[test]
    fn test_run_gc_preserves_field() {
        let mut life = HashLife::new();
        let root = random_of_depth(&mut life, 4, Some(SEED)).unwrap();
        let mut engine = HashLifeEngine::from_node(life, root);
        engine.update();
        engine.update();
        let state = engine.current_state().unwrap();
        let nodes_before = engine.statistics().nodes;
        engine.run_gc();
        assert_eq!(engine.current_state().unwrap(), state);
        assert!(engine.statistics().nodes < nodes_before);
        assert_eq!(engine.statistics().memo_entries, 0);
    }
}
