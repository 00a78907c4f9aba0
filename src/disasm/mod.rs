//! Disassembly module - Machine code to instruction listings
//!
//! Uses the target's Capstone-backed decoder, one instruction at a time.

pub mod engine;

#[cfg(test)]
mod tests;

pub use engine::{Disassembler, Disassembly, DisassemblyRequest, Instruction};
