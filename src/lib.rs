//! Language definitions for the 15-bit word machine targeted by the
//! [masm](../masm/index.html) assembler.
//!
//! This crate owns everything that is fixed by the machine language itself:
//! the [`Word`](type.Word.html) size, the instruction set with its
//! per-instruction [`AddressingMask`](struct.AddressingMask.html), the
//! register and directive name tables, the
//! [ARE](enum.Are.html) encoding, and the helpers that construct encoded
//! words. The assembler decides *what* to emit; this crate decides what the
//! bits look like.
//!
//! All tables here are immutable, process-wide constants, so they can be
//! shared freely between files assembled in parallel.

pub mod constants;

mod directives;
mod instructions;
mod registers;

pub use directives::*;
pub use instructions::*;
pub use registers::*;
pub use util::{EnumFromStr, ParseEnumError};

/// A single unit of emitted memory. Only the low 15 bits are ever set.
pub type Word = u16;

/// An absolute load address in the output image.
pub type Address = u16;
