//! Two-pass assembler for the 15-bit word machine defined by
//! [mcpu](../mcpu/index.html).
//!
//! The main function provided by this crate is [`assemble`](fn.assemble.html),
//! which accepts a preprocessed line stream and produces the object image
//! plus the entry and external records, ready to be written by
//! [obfile](../obfile/index.html). The [`preprocess`](fn.preprocess.html)
//! function turns a raw `.as` source into that line stream, expanding
//! macros and stripping comments.
//!
//! # Source language
//!
//! A statement line is an optional label followed by an instruction or a
//! directive:
//!
//! ```asm
//! MAIN:   mov LIST, r1
//!         add r1, r2
//! LOOP:   jmp END
//! LIST:   .data 6, -9, +15
//! STR:    .string "abcd"
//!         .entry MAIN
//!         .extern END
//!         stop
//! ```
//!
//! A label is a symbol name glued to a `:`, defining the symbol at the
//! current code or data position. Symbol names are 1..=31 characters,
//! start with an ASCII letter, continue with letters and digits, and must
//! not collide with a reserved word, a macro, or another symbol.
//!
//! ## Addressing modes
//!
//! Mode              | Operand shape | Example
//! ------------------|---------------|--------
//! Immediate         | `#` value     | `cmp #-1, r2`
//! Direct            | symbol name   | `dec COUNT`
//! Indirect register | `*` register  | `inc *r1`
//! Direct register   | register      | `clr r1`
//!
//! ## Instructions
//!
//! Mnemonic | Operands | Short description
//! ---------|----------|------------------
//! `mov`    | src, dst | Copy source to destination
//! `cmp`    | src, dst | Compare the operands
//! `add`    | src, dst | Add source to destination
//! `sub`    | src, dst | Subtract source from destination
//! `lea`    | src, dst | Load the address of a symbol
//! `clr`    | dst      | Clear the destination
//! `not`    | dst      | Bitwise-complement the destination
//! `inc`    | dst      | Increment the destination
//! `dec`    | dst      | Decrement the destination
//! `jmp`    | dst      | Jump
//! `bne`    | dst      | Branch if not equal
//! `red`    | dst      | Read a character
//! `prn`    | dst      | Print the destination
//! `jsr`    | dst      | Jump to subroutine
//! `rts`    | none     | Return from subroutine
//! `stop`   | none     | Stop the program
//!
//! ## Directives
//!
//! Directive | Parameters              | Effect
//! ----------|-------------------------|-------
//! `.data`   | integers, comma-separated | Append words to the data segment
//! `.string` | one quoted string       | Append character words plus a zero terminator
//! `.entry`  | symbols, comma-separated | Export locally defined symbols
//! `.extern` | symbols, comma-separated | Import symbols defined elsewhere
//!
//! # Passes
//!
//! The first pass lexes every line, applies the syntax checks, builds the
//! symbol table and emits all words whose value is already known; a direct
//! symbol operand gets a zero placeholder at its final position. Between
//! the passes, every data symbol is relocated behind the code segment.
//! The second pass resolves the placeholders, records each use of an
//! external symbol, and promotes `.entry` symbols. Syntax errors never
//! abort a pass: they are streamed through the injected
//! [`Reporter`](trait.Reporter.html) and counted, and any nonzero total
//! suppresses output.

mod checks;
mod data;
mod macros;
mod parser;
mod pass1;
mod pass2;
mod preprocess;
mod report;
mod symbols;


use obfile::{EntryRecord, ExternalOccurrences, ObjectImage};
use std::fmt;

pub use crate::macros::MacroTable;
pub use crate::preprocess::preprocess;
pub use crate::report::{CollectingReporter, Diagnostic, Reporter, Severity, StderrReporter};
pub use crate::symbols::{MemoryArea, Symbol, SymbolKind, SymbolTable};

/// Everything produced for one successfully assembled translation unit.
#[derive(Debug)]
pub struct Assembly {
    pub object: ObjectImage,
    pub entries: Vec<EntryRecord>,
    pub externals: ExternalOccurrences,
}

/// Failure of a whole translation unit. The individual diagnostics were
/// already streamed through the [`Reporter`]; this only carries the count.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    SyntaxErrors { count: u32 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SyntaxErrors { count } => {
                write!(f, "{} error(s) detected, no output generated", count)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Preprocesses a raw `.as` source and assembles the result in one call.
pub fn assemble_source(
    source: &str,
    file_name: &str,
    reporter: &mut dyn Reporter,
) -> Result<Assembly, Error> {
    let (expanded, macros) = preprocess(source, file_name, reporter)?;
    assemble(&expanded, file_name, &macros, reporter)
}

/// Runs both passes over a preprocessed line stream.
///
/// `file_name` is only used for diagnostics. `macros` is the table the
/// preprocessor produced for this file; symbol names are checked against
/// it. All per-file state lives in this call, so files can be assembled
/// concurrently with independent reporters.
pub fn assemble(
    input: &str,
    file_name: &str,
    macros: &MacroTable,
    reporter: &mut dyn Reporter,
) -> Result<Assembly, Error> {
    let mut symbols = SymbolTable::new();
    let mut code = Vec::new();
    let mut data_table = Vec::new();
    let mut externals = ExternalOccurrences::new();

    let mut errors = pass1::first_pass(
        input,
        file_name,
        macros,
        &mut symbols,
        &mut code,
        &mut data_table,
        reporter,
    );
    errors += pass2::second_pass(
        input,
        file_name,
        &mut symbols,
        &mut code,
        &mut externals,
        reporter,
    );

    if errors > 0 {
        return Err(Error::SyntaxErrors { count: errors });
    }

    let entries = symbols
        .iter()
        .filter(|(_, symbol)| symbol.kind == SymbolKind::Entry)
        .map(|(name, symbol)| EntryRecord {
            name: name.to_owned(),
            address: symbol.address,
        })
        .collect();

    Ok(Assembly {
        object: ObjectImage::from(code, data_table),
        entries,
        externals,
    })
}
