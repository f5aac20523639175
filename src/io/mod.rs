pub mod fasta;
pub mod writers;

// Re-export the file adapters
pub use fasta::read_fragments;
pub use writers::{
    write_assembly, write_fragments, write_layout_csv, write_matrix, write_tour,
};
