//! The assembler's textual output-file formats.
//!
//! Three files can be produced per translation unit:
//!
//! - `.ob`: the object image. A header line `<IC> <DC>`, then one line
//!   per word, `AAAA OOOOO`, where `AAAA` is the 4-digit decimal load
//!   address (code first, then data, starting at 100) and `OOOOO` is the
//!   15-bit word as a 5-digit octal number.
//! - `.ent`: one line per `.entry` symbol, `<name> <address>`, in symbol
//!   table insertion order. Written only when at least one entry exists.
//! - `.ext`: one line per use of an external symbol, `<name> <AAAA>`,
//!   grouped by symbol in first-reference order. Written only when at
//!   least one use was recorded.

use mcpu::constants::{INITIAL_LOAD_ADDRESS, WORD_MASK};
use mcpu::{Address, Word};
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;

/// The code and data segments of one assembled translation unit.
#[derive(Debug, PartialEq)]
pub struct ObjectImage {
    code: Vec<Word>,
    data: Vec<Word>,
}

impl ObjectImage {
    pub fn from(code: Vec<Word>, data: Vec<Word>) -> ObjectImage {
        ObjectImage { code, data }
    }

    pub fn code(&self) -> &[Word] {
        &self.code[..]
    }

    pub fn data(&self) -> &[Word] {
        &self.data[..]
    }

    /// Instruction counter: the number of code words.
    pub fn ic(&self) -> usize {
        self.code.len()
    }

    /// Data counter: the number of data words.
    pub fn dc(&self) -> usize {
        self.data.len()
    }
}

/// An `.entry` symbol and its resolved address.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryRecord {
    pub name: String,
    pub address: Address,
}

/// Every place a single external symbol was referenced.
#[derive(Clone, Debug, PartialEq)]
pub struct ExternalUsage {
    pub name: String,
    pub occurrences: Vec<Address>,
}

/// External-symbol uses collected during the second pass, grouped by
/// symbol in the order symbols were first referenced.
#[derive(Debug, Default, PartialEq)]
pub struct ExternalOccurrences {
    usages: Vec<ExternalUsage>,
}

impl ExternalOccurrences {
    pub fn new() -> ExternalOccurrences {
        ExternalOccurrences::default()
    }

    pub fn record(&mut self, name: &str, address: Address) {
        match self.usages.iter_mut().find(|usage| usage.name == name) {
            Some(usage) => usage.occurrences.push(address),
            None => self.usages.push(ExternalUsage {
                name: name.to_owned(),
                occurrences: vec![address],
            }),
        }
    }

    pub fn usages(&self) -> &[ExternalUsage] {
        &self.usages[..]
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }
}

pub fn write_object<W: Write>(writer: &mut W, image: &ObjectImage) -> io::Result<()> {
    writeln!(writer, "{} {}", image.ic(), image.dc())?;

    let words = image.code().iter().chain(image.data().iter());
    for (position, word) in words.enumerate() {
        let address = INITIAL_LOAD_ADDRESS as usize + position;
        writeln!(writer, "{:04} {:05o}", address, word & WORD_MASK)?;
    }
    Ok(())
}

pub fn write_entries<W: Write>(writer: &mut W, entries: &[EntryRecord]) -> io::Result<()> {
    for entry in entries {
        writeln!(writer, "{} {}", entry.name, entry.address)?;
    }
    Ok(())
}

pub fn write_externals<W: Write>(
    writer: &mut W,
    externals: &ExternalOccurrences,
) -> io::Result<()> {
    for usage in externals.usages() {
        for occurrence in &usage.occurrences {
            writeln!(writer, "{} {:04}", usage.name, occurrence)?;
        }
    }
    Ok(())
}

pub fn write_object_file<P: AsRef<Path>>(path: P, image: &ObjectImage) -> io::Result<()> {
    write_object(&mut BufWriter::new(File::create(path)?), image)
}

pub fn write_entries_file<P: AsRef<Path>>(path: P, entries: &[EntryRecord]) -> io::Result<()> {
    write_entries(&mut BufWriter::new(File::create(path)?), entries)
}

pub fn write_externals_file<P: AsRef<Path>>(
    path: P,
    externals: &ExternalOccurrences,
) -> io::Result<()> {
    write_externals(&mut BufWriter::new(File::create(path)?), externals)
}
