//! The second pass: resolves direct-symbol operands, records external
//! occurrences and promotes `.entry` symbols.
//!
//! The pass re-reads the same line stream with a running instruction
//! counter that mirrors the words the first pass emitted, so each
//! placeholder is patched at its known index. Lines the first pass
//! already diagnosed are skipped without re-reporting.

use crate::checks::{self, CheckConfig};
use crate::parser::{self, Statement};
use crate::report::Reporter;
use crate::symbols::{SymbolKind, SymbolTable};
use mcpu::constants::INITIAL_LOAD_ADDRESS;
use mcpu::{make_direct_word, Address, AddressingMode, Are, Directive, Opcode, Word};
use obfile::ExternalOccurrences;

pub fn second_pass(
    input: &str,
    file_name: &str,
    symbols: &mut SymbolTable,
    code: &mut Vec<Word>,
    externals: &mut ExternalOccurrences,
    reporter: &mut dyn Reporter,
) -> u32 {
    let mut errors = 0;
    let mut ic = 0;

    for (index, line) in input.lines().enumerate() {
        let cfg = CheckConfig::new(file_name, index as u32 + 1, true);

        let parsed = match parser::parse_line(line) {
            Ok(parsed) => parsed,
            Err(_) => continue,
        };

        match parsed.statement {
            None => {}
            Some(Statement::Directive { name, params }) => {
                let silent = CheckConfig::new(file_name, cfg.line_number, false);
                if checks::identify_directive(name, &silent, reporter) != Some(Directive::Entry) {
                    // Everything else was handled in the first pass.
                    continue;
                }
                errors += entry_directive(params, symbols, &cfg, reporter);
            }
            Some(Statement::Instruction { mnemonic, operands }) => {
                if mnemonic.parse::<Opcode>().is_err() {
                    continue;
                }
                errors +=
                    instruction_statement(&operands, symbols, code, externals, &mut ic, &cfg, reporter);
            }
        }
    }

    errors
}

fn entry_directive(
    params: Option<&str>,
    symbols: &mut SymbolTable,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> u32 {
    let params = match params {
        Some(params) if !params.trim().is_empty() => params,
        _ => return 0,
    };
    if checks::commas_misplaced(params, cfg, reporter) {
        return 1;
    }

    let mut errors = 0;
    for name in parser::split_parameters(params) {
        if checks::symbol_name_illegal(name, cfg, reporter) {
            errors += 1;
        } else if checks::symbol_not_defined(name, symbols, cfg, reporter) {
            errors += 1;
        } else if checks::entry_extern_conflict(name, symbols, cfg, reporter) {
            errors += 1;
        } else {
            symbols.promote_to_entry(name);
        }
    }
    errors
}

fn instruction_statement(
    operand_lexemes: &[&str],
    symbols: &SymbolTable,
    code: &mut Vec<Word>,
    externals: &mut ExternalOccurrences,
    ic: &mut usize,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> u32 {
    let mut errors = 0;

    // The instruction word itself.
    *ic += 1;

    let mut register_operands = 0;
    for &lexeme in operand_lexemes.iter().take(2) {
        match parser::detect_addressing(lexeme) {
            Some(AddressingMode::Direct) => match symbols.find(lexeme) {
                None => {
                    checks::symbol_not_defined(lexeme, symbols, cfg, reporter);
                    errors += 1;
                }
                Some(symbol) if symbol.kind == SymbolKind::Extern => {
                    // The placeholder stays zero; the loader fills it in.
                    externals.record(lexeme, *ic as Address + INITIAL_LOAD_ADDRESS);
                }
                Some(symbol) => {
                    // Indices are only meaningful when the first pass was
                    // clean, and output is suppressed otherwise.
                    if let Some(word) = code.get_mut(*ic) {
                        *word = make_direct_word(symbol.address, Are::Relocatable);
                    }
                }
            },
            Some(mode) if mode.is_register_kind() => register_operands += 1,
            _ => {}
        }
        *ic += 1;
    }

    // Two register-kind operands share a single word.
    if register_operands == 2 {
        *ic -= 1;
    }

    errors
}
