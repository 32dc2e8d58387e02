//! Domain types shared across BlastUI crates

pub mod matrix;
pub mod molecule;
pub mod program;

pub use matrix::ScoringMatrix;
pub use molecule::MoleculeType;
pub use program::BlastProgram;
