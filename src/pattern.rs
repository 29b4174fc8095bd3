//! Building nodes from outside data and turning them back into text.
//!
//! Plaintext patterns use one line per row: `O`, `o` or `*` for alive cells and `.`
//! or a space for dead ones. Lines starting with `!` are comments. Short lines are
//! padded with dead cells, and the whole pattern is placed in the north-west corner
//! of the smallest square field (at least `2^MIN_DEPTH` cells wide) that holds it.
use crate::{HashLife, NodeIdx, MAX_MATERIALIZE_DEPTH, MIN_DEPTH};
use ahash::AHashSet as HashSet;
use anyhow::{anyhow, Context, Result};
use rand::{Rng, SeedableRng};

/// Creates a random field of the given depth where every cell is alive with
/// probability 1/2.
///
/// # Arguments
///
/// * `depth` - Log base 2 of the field's side length.
/// * `seed` - Optional seed for the random number generator.
///   If None, seeds from the OS.
///
/// # Errors
///
/// Returns an error if the field would have more than `2^62` cells.
pub fn random_of_depth(life: &mut HashLife, depth: u32, seed: Option<u64>) -> Result<NodeIdx> {
    if depth > 31 {
        return Err(anyhow!("depth {} is too large for a random field", depth));
    }
    let mut rng = if let Some(x) = seed {
        rand_chacha::ChaCha8Rng::seed_from_u64(x)
    } else {
        rand_chacha::ChaCha8Rng::from_os_rng()
    };
    Ok(life.build_from_cells(depth, |_, _| rng.random_bool(0.5)))
}

/// Parses a plaintext pattern, see the module documentation for the format.
pub fn from_plaintext(life: &mut HashLife, text: &str) -> Result<NodeIdx> {
    let mut rows = vec![];
    for (i, line) in text.lines().enumerate() {
        if line.starts_with('!') {
            continue;
        }
        let row = line
            .trim_end()
            .chars()
            .enumerate()
            .map(|(j, c)| match c {
                'O' | 'o' | '*' => Ok(true),
                '.' | ' ' => Ok(false),
                _ => Err(anyhow!(
                    "Unexpected character {:?} at line {}, column {}",
                    c,
                    i + 1,
                    j + 1
                )),
            })
            .collect::<Result<Vec<bool>>>()?;
        rows.push(row);
    }
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let side = width.max(rows.len()).max(1).next_power_of_two();
    let depth = side.ilog2().max(MIN_DEPTH);
    if depth > MAX_MATERIALIZE_DEPTH {
        return Err(anyhow!(
            "Pattern of {}x{} cells is too big for the plaintext format",
            width,
            rows.len()
        ));
    }
    Ok(life.build_from_cells(depth, |x, y| {
        rows.get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(false)
    }))
}

/// Reads a plaintext pattern from a file.
pub fn from_file(life: &mut HashLife, path: &str) -> Result<NodeIdx> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    from_plaintext(life, &text).with_context(|| format!("Failed to parse {path}"))
}

fn check_materializable(life: &HashLife, node: NodeIdx) -> Result<()> {
    let depth = life.depth(node);
    if depth > MAX_MATERIALIZE_DEPTH {
        return Err(anyhow!(
            "Node of depth {} is too big to be printed, the limit is {}",
            depth,
            MAX_MATERIALIZE_DEPTH
        ));
    }
    Ok(())
}

/// Serializes a node into the plaintext format, one line per row.
pub fn to_plaintext(life: &HashLife, node: NodeIdx) -> Result<String> {
    check_materializable(life, node)?;
    let mut result = String::new();
    for row in life.cells(node) {
        result.extend(row.into_iter().map(|alive| if alive { 'O' } else { '.' }));
        result.push('\n');
    }
    Ok(result)
}

/// Renders every row of the node with [`HashLife::row_string`].
pub fn render(life: &HashLife, node: NodeIdx) -> Result<String> {
    check_materializable(life, node)?;
    let mut result = String::new();
    for y in 0..1u64 << life.depth(node) {
        result += &life.row_string(node, y);
        result.push('\n');
    }
    Ok(result)
}

/// Counts distinct nodes reachable from `node`, grouped by depth.
///
/// The returned vector has `depth + 1` entries, entry `i` being the number of
/// distinct nodes of depth `i`.
pub fn depth_distribution(life: &HashLife, node: NodeIdx) -> Vec<u64> {
    fn inner(
        life: &HashLife,
        idx: NodeIdx,
        visited: &mut HashSet<NodeIdx>,
        distribution: &mut Vec<u64>,
    ) {
        if !visited.insert(idx) {
            return;
        }

        distribution[life.depth(idx) as usize] += 1;
        if let Some(parts) = life.parts(idx) {
            for child in parts {
                inner(life, child, visited, distribution);
            }
        }
    }

    let mut visited = HashSet::new();
    let mut distribution = vec![0; life.depth(node) as usize + 1];
    inner(life, node, &mut visited, &mut distribution);
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    const SEED: u64 = 42;

    const GLIDER: &str = "!Name: Glider\n.O.\n..O\nOOO\n";

    #[test]
    fn test_random_is_seeded() {
        let mut life = HashLife::new();
        let a = random_of_depth(&mut life, 5, Some(SEED)).unwrap();
        let b = random_of_depth(&mut life, 5, Some(SEED)).unwrap();
        let c = random_of_depth(&mut life, 5, Some(SEED + 1)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(life.depth(a), 5);
        // roughly half of the 1024 cells are alive
        let population = life.population(a);
        assert!(population > BigInt::from(400) && population < BigInt::from(624));
    }

    #[test]
    fn test_random_too_large() {
        let mut life = HashLife::new();
        assert!(random_of_depth(&mut life, 40, None).is_err());
    }

    #[test]
    fn test_plaintext_glider() {
        let mut life = HashLife::new();
        let node = from_plaintext(&mut life, GLIDER).unwrap();
        assert_eq!(life.depth(node), MIN_DEPTH);
        assert_eq!(life.population(node), BigInt::from(5));
        assert_eq!(
            to_plaintext(&life, node).unwrap(),
            ".O..\n..O.\nOOO.\n....\n"
        );
        assert_eq!(render(&life, node).unwrap(), " o  \n  o \nooo \n    \n");

        let text = to_plaintext(&life, node).unwrap();
        assert_eq!(from_plaintext(&mut life, &text).unwrap(), node);
    }

    #[test]
    fn test_plaintext_padding() {
        let mut life = HashLife::new();
        let node = from_plaintext(&mut life, "OOOOO\n\n*\n\n").unwrap();
        assert_eq!(life.depth(node), 3);
        assert_eq!(life.population(node), BigInt::from(6));
        assert!(life.cell(node, 0, 2));

        let empty = from_plaintext(&mut life, "").unwrap();
        assert_eq!(empty, life.empty_of_depth(MIN_DEPTH));
    }

    #[test]
    fn test_plaintext_bad_character() {
        let mut life = HashLife::new();
        let err = from_plaintext(&mut life, "..O\n.x.\n").unwrap_err();
        assert!(err.to_string().contains("line 2, column 2"));
    }

    #[test]
    fn test_render_too_big() {
        let mut life = HashLife::new();
        let e = life.empty_of_depth(MAX_MATERIALIZE_DEPTH + 1);
        assert!(render(&life, e).is_err());
        assert!(to_plaintext(&life, e).is_err());
    }

    #[test]
    fn test_depth_distribution() {
        let mut life = HashLife::new();
        let e = life.empty_of_depth(10);
        assert_eq!(depth_distribution(&life, e), vec![1; 11]);

        let node = from_plaintext(&mut life, GLIDER).unwrap();
        let distribution = depth_distribution(&life, node);
        assert_eq!(distribution[2], 1);
        assert_eq!(distribution[0], 2);
    }
}
