//! The first pass: builds the symbol table and the provisional code and
//! data segments.
//!
//! Direct-symbol operands are emitted as zero placeholder words at their
//! final positions; the second pass patches them once every symbol is
//! known. The pass never stops at an error, so the whole file is checked
//! in one run.

use crate::checks::{self, CheckConfig};
use crate::data;
use crate::macros::MacroTable;
use crate::parser::{self, Statement};
use crate::report::{Diagnostic, Reporter};
use crate::symbols::{MemoryArea, SymbolTable};
use mcpu::constants::INITIAL_LOAD_ADDRESS;
use mcpu::{
    make_immediate_word, make_instruction_word, make_register_pair_word, make_register_word,
    Address, AddressingMode, Directive, Opcode, OperandRole, Word,
};

/// A validated instruction operand, ready for encoding.
struct Operand<'i> {
    lexeme: &'i str,
    mode: AddressingMode,
    role: OperandRole,
}

pub fn first_pass(
    input: &str,
    file_name: &str,
    macros: &MacroTable,
    symbols: &mut SymbolTable,
    code: &mut Vec<Word>,
    data_table: &mut Vec<Word>,
    reporter: &mut dyn Reporter,
) -> u32 {
    let mut errors = 0;

    for (index, line) in input.lines().enumerate() {
        let cfg = CheckConfig::new(file_name, index as u32 + 1, true);

        if checks::line_exceeds_limit(line, &cfg, reporter) {
            errors += 1;
            continue;
        }

        let parsed = match parser::parse_line(line) {
            Ok(parsed) => parsed,
            Err(error) => {
                reporter.report(Diagnostic::error(
                    file_name,
                    cfg.line_number,
                    format!("malformed line: {}", error.variant.message()),
                ));
                errors += 1;
                continue;
            }
        };

        if let Some(label) = parsed.label {
            if label_error(label, macros, symbols, &cfg, reporter) {
                errors += 1;
                continue;
            }
        }

        match parsed.statement {
            None => {
                if let Some(label) = parsed.label {
                    checks::no_statement_after_label(label, &cfg, reporter);
                    errors += 1;
                }
            }
            Some(Statement::Directive { name, params }) => {
                if directive_statement(
                    name,
                    params,
                    parsed.label,
                    macros,
                    symbols,
                    data_table,
                    &cfg,
                    reporter,
                ) {
                    errors += 1;
                }
            }
            Some(Statement::Instruction { mnemonic, operands }) => {
                if instruction_statement(mnemonic, &operands, parsed.label, symbols, code, &cfg, reporter)
                {
                    errors += 1;
                }
            }
        }
    }

    symbols.relocate_data_symbols(code.len() as Address);
    errors
}

/// Every check a new symbol name must pass before it may be defined.
fn label_error(
    name: &str,
    macros: &MacroTable,
    symbols: &SymbolTable,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    let mut result = checks::symbol_name_illegal(name, cfg, reporter);
    if checks::reserved_name(name, cfg, reporter) {
        result = true;
    }
    if checks::symbol_used_as_macro(name, macros, cfg, reporter) {
        result = true;
    }
    if checks::symbol_defined_more_than_once(name, symbols, cfg, reporter) {
        result = true;
    }
    result
}

fn directive_statement(
    name: &str,
    params: Option<&str>,
    label: Option<&str>,
    macros: &MacroTable,
    symbols: &mut SymbolTable,
    data_table: &mut Vec<Word>,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    let directive = match checks::identify_directive(name, cfg, reporter) {
        Some(directive) => directive,
        None => return true,
    };

    match directive {
        Directive::Data | Directive::String => {
            let params = params.unwrap_or("");
            let illegal = match directive {
                Directive::Data => checks::data_parameters_illegal(params, cfg, reporter),
                _ => checks::string_parameter_illegal(params, cfg, reporter),
            };
            if illegal {
                return true;
            }

            if let Some(label) = label {
                symbols.insert(label, data_table.len() as Address, MemoryArea::Data);
            }

            match directive {
                Directive::Data => data::encode_data_parameters(params, data_table),
                _ => data::encode_string_literal(params, data_table),
            }
            false
        }
        Directive::Extern => {
            warn_about_label(label, cfg, reporter);

            let params = match params {
                Some(params) if !params.trim().is_empty() => params,
                _ => return false,
            };
            if checks::commas_misplaced(params, cfg, reporter) {
                return true;
            }

            for name in parser::split_parameters(params) {
                if checks::symbol_name_illegal(name, cfg, reporter)
                    || checks::reserved_name(name, cfg, reporter)
                    || checks::symbol_used_as_macro(name, macros, cfg, reporter)
                    || checks::symbol_defined_more_than_once(name, symbols, cfg, reporter)
                {
                    return true;
                }
                symbols.insert_extern(name);
            }
            false
        }
        Directive::Entry => {
            warn_about_label(label, cfg, reporter);
            // Entry parameters are resolved in the second pass.
            false
        }
    }
}

fn warn_about_label(label: Option<&str>, cfg: &CheckConfig, reporter: &mut dyn Reporter) {
    if label.is_some() {
        reporter.report(Diagnostic::warning(
            cfg.file_name,
            cfg.line_number,
            "label before .extern or .entry is ignored".to_owned(),
        ));
    }
}

fn instruction_statement(
    mnemonic: &str,
    operand_lexemes: &[&str],
    label: Option<&str>,
    symbols: &mut SymbolTable,
    code: &mut Vec<Word>,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    if checks::colon_misused(mnemonic, cfg, reporter) {
        return true;
    }
    if checks::instruction_unknown(mnemonic, cfg, reporter) {
        return true;
    }
    let opcode: Opcode = mnemonic.parse().unwrap();

    if checks::wrong_operand_count(mnemonic, opcode, operand_lexemes.len(), cfg, reporter) {
        return true;
    }

    let roles: &[OperandRole] = match operand_lexemes.len() {
        1 => &[OperandRole::Destination],
        _ => &[OperandRole::Source, OperandRole::Destination],
    };

    let mut operands = Vec::with_capacity(2);
    let mut invalid = false;
    for (&lexeme, &role) in operand_lexemes.iter().zip(roles.iter()) {
        let mode = parser::detect_addressing(lexeme);
        if checks::operand_invalid(lexeme, mode, cfg, reporter) {
            invalid = true;
            continue;
        }
        let mode = mode.unwrap();

        if checks::illegal_addressing(mnemonic, opcode, lexeme, role, mode, cfg, reporter) {
            invalid = true;
        } else if mode == AddressingMode::Immediate
            && checks::immediate_out_of_range(lexeme, cfg, reporter)
        {
            invalid = true;
        }

        operands.push(Operand { lexeme, mode, role });
    }
    if invalid {
        return true;
    }

    if let Some(label) = label {
        symbols.insert(
            label,
            code.len() as Address + INITIAL_LOAD_ADDRESS,
            MemoryArea::Code,
        );
    }

    emit_instruction(opcode, &operands, code);
    false
}

fn emit_instruction(opcode: Opcode, operands: &[Operand], code: &mut Vec<Word>) {
    let source = operands.iter().find(|o| o.role == OperandRole::Source);
    let dest = operands.iter().find(|o| o.role == OperandRole::Destination);

    code.push(make_instruction_word(
        opcode,
        source.map(|o| o.mode),
        dest.map(|o| o.mode),
    ));

    if let (Some(source), Some(dest)) = (source, dest) {
        if source.mode.is_register_kind() && dest.mode.is_register_kind() {
            code.push(make_register_pair_word(
                parser::operand_register(source.lexeme),
                parser::operand_register(dest.lexeme),
            ));
            return;
        }
    }

    for operand in operands {
        code.push(operand_word(operand));
    }
}

fn operand_word(operand: &Operand) -> Word {
    match operand.mode {
        AddressingMode::Immediate => make_immediate_word(parser::immediate_value(operand.lexeme)),
        // Resolved in the second pass.
        AddressingMode::Direct => 0,
        AddressingMode::IndirectRegister | AddressingMode::DirectRegister => {
            make_register_word(operand.role, parser::operand_register(operand.lexeme))
        }
    }
}
