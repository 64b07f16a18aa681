#[macro_use]
extern crate clap;

use clap::Arg;
use masm::{assemble, preprocess, StderrReporter};
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug)]
enum IOErrorContext {
    ReadSource,
    WriteExpanded,
    WriteOutput,
}

#[derive(Debug)]
enum Error {
    Masm(masm::Error),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => writeln!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadSource => "Reading source",
                    IOErrorContext::WriteExpanded => "Writing expanded source",
                    IOErrorContext::WriteOutput => "Writing output",
                },
                path.display(),
                err
            ),
            Error::Masm(err) => writeln!(f, "{}", err),
        }
    }
}

fn main() {
    // Parse command line arguments
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("FILES")
                .help("Base names of the source files, without the .as extension")
                .required(true)
                .multiple(true)
                .index(1),
        )
        .get_matches();

    let mut failures = 0;
    for base in matches.values_of("FILES").unwrap() {
        if let Err(err) = assemble_base(base) {
            eprintln!("{}", err);
            failures += 1;
        }
    }

    // Exit code is the number of files that produced no output.
    process::exit(failures);
}

fn assemble_base(base: &str) -> Result<(), Error> {
    let source_path = PathBuf::from(format!("{}.as", base));
    let expanded_path = PathBuf::from(format!("{}.am", base));

    let source = read_source(&source_path)?;
    let mut reporter = StderrReporter;

    // Preprocess .as into the .am line stream.
    let (expanded, macro_table) = preprocess(
        &source,
        &source_path.to_string_lossy(),
        &mut reporter,
    )
    .map_err(Error::Masm)?;

    write_text(&expanded_path, &expanded, IOErrorContext::WriteExpanded)?;

    // Assemble the .am stream.
    let assembly = assemble(
        &expanded,
        &expanded_path.to_string_lossy(),
        &macro_table,
        &mut reporter,
    )
    .map_err(Error::Masm)?;

    // Write output files. .ent and .ext appear only when needed.
    let object_path = PathBuf::from(format!("{}.ob", base));
    obfile::write_object_file(&object_path, &assembly.object)
        .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, object_path))?;

    if !assembly.entries.is_empty() {
        let entries_path = PathBuf::from(format!("{}.ent", base));
        obfile::write_entries_file(&entries_path, &assembly.entries)
            .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, entries_path))?;
    }

    if !assembly.externals.is_empty() {
        let externals_path = PathBuf::from(format!("{}.ext", base));
        obfile::write_externals_file(&externals_path, &assembly.externals)
            .map_err(|err| Error::Io(err, IOErrorContext::WriteOutput, externals_path))?;
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String, Error> {
    let file = File::open(path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadSource, path.to_owned()))?;
    let mut source = String::new();
    BufReader::new(file)
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadSource, path.to_owned()))?;
    Ok(source)
}

fn write_text(path: &Path, text: &str, context: IOErrorContext) -> Result<(), Error> {
    File::create(path)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(text.as_bytes())?;
            writer.flush()
        })
        .map_err(|err| Error::Io(err, context, path.to_owned()))
}
