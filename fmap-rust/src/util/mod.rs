pub mod dna;
pub mod seq;
