use anyhow::Result;
use num_bigint::BigInt;

/// Game engine for Game of Life on an unbounded plane.
pub trait GoLEngine {
    /// Creates a new engine instance with a blank field of the smallest supported size.
    fn new() -> Self
    where
        Self: Sized;

    /// Replaces the field with the given cells.
    ///
    /// # Parameters
    /// * `cells` - Rows of the pattern from north to south. The field must be square
    ///   and its side length must be a power of two. Everything outside of it is dead.
    ///
    /// # Returns
    /// A Result indicating success or failure:
    /// * `Ok(())` - Pattern was successfully loaded, generation and origin are reset
    /// * `Err(_)` - If the field is not a square with a power-of-two side
    fn load_cells(&mut self, cells: &[Vec<bool>]) -> Result<()>;

    /// Returns the current field as rows of cells.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is too big to be materialized cell by cell.
    fn current_state(&self) -> Result<Vec<Vec<bool>>>;

    /// Doubles the side length of the field and advances it by a quarter of the new
    /// side length in generations.
    ///
    /// # Returns
    ///
    /// The number of generations the field was advanced by.
    fn update(&mut self) -> BigInt;

    /// Number of generations simulated since the pattern was loaded.
    fn generation(&self) -> BigInt;

    /// Coordinates `[x, y]` of the field's north-west corner relative to the north-west
    /// corner of the loaded pattern.
    fn origin(&self) -> [BigInt; 2];

    /// Number of alive cells in the field.
    fn population(&self) -> BigInt;

    /// Frees accumulated caches that are not needed to represent the current field.
    ///
    /// The default implementation does nothing.
    fn run_gc(&mut self) {}

    /// Returns the approximate heap memory usage of the engine in bytes.
    fn bytes_total(&self) -> usize;
}
