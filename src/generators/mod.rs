use rand::{SeedableRng, rngs::StdRng};

mod recur_backtrack;

pub use recur_backtrack::recursive_backtrack;

use crate::maze::Maze;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Carves a fresh maze into `maze`, seeded when `seed` is given.
pub fn generate_maze(maze: &mut Maze, seed: Option<u64>) {
    let mut rng = get_rng(seed);
    recursive_backtrack(maze, &mut rng);
}
