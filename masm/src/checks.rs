//! The syntax checks shared by both passes.
//!
//! Each predicate reports at most one kind of error and returns whether it
//! occurred, so the passes can keep going and collect every error in the
//! file. A check invoked with `verbose` off stays silent, which lets the
//! second pass reuse classification checks without duplicating messages.

use crate::macros::MacroTable;
use crate::report::{Diagnostic, Reporter, Severity};
use crate::symbols::{SymbolKind, SymbolTable};
use mcpu::constants::{
    MAX_DATA_PARAMETER, MAX_IMMEDIATE, MAX_LINE_LENGTH, MIN_DATA_PARAMETER, MIN_IMMEDIATE,
    SYMBOL_CHARACTER_LIMIT,
};
use mcpu::{AddressingMode, Directive, Opcode, OperandRole, Register, DIRECTIVE_NAMES};

#[derive(Clone, Copy, Debug)]
pub struct CheckConfig<'a> {
    pub file_name: &'a str,
    pub line_number: u32,
    pub verbose: bool,
}

impl<'a> CheckConfig<'a> {
    pub fn new(file_name: &'a str, line_number: u32, verbose: bool) -> CheckConfig<'a> {
        CheckConfig {
            file_name,
            line_number,
            verbose,
        }
    }
}

fn error(cfg: &CheckConfig, reporter: &mut dyn Reporter, message: String) {
    if cfg.verbose {
        reporter.report(Diagnostic {
            severity: Severity::Error,
            file_name: cfg.file_name.to_owned(),
            line_number: cfg.line_number,
            message,
        });
    }
}

pub fn line_exceeds_limit(line: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    if line.len() < MAX_LINE_LENGTH {
        return false;
    }
    error(
        cfg,
        reporter,
        format!(
            "line exceeds the maximum length of {} characters",
            MAX_LINE_LENGTH - 1
        ),
    );
    true
}

pub fn extraneous_characters(trailing: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    if trailing.trim().is_empty() {
        return false;
    }
    error(
        cfg,
        reporter,
        format!("extraneous characters ('{}')", trailing.trim()),
    );
    true
}

pub fn reserved_name(name: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    if name.parse::<Opcode>().is_ok() {
        error(
            cfg,
            reporter,
            format!("'{}' is a reserved instruction name", name),
        );
        return true;
    }
    if DIRECTIVE_NAMES.contains(&name) {
        error(
            cfg,
            reporter,
            format!("'{}' is a reserved directive name", name),
        );
        return true;
    }
    if name.parse::<Register>().is_ok() {
        error(
            cfg,
            reporter,
            format!("'{}' is a reserved register name", name),
        );
        return true;
    }
    false
}

pub fn colon_misused(token: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    if !token.contains(':') {
        return false;
    }
    error(
        cfg,
        reporter,
        format!(
            "misplaced ':' in '{}' (a label ends with ':' followed by whitespace)",
            token
        ),
    );
    true
}

pub fn no_statement_after_label(label: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    error(
        cfg,
        reporter,
        format!("no statement after label '{}'", label),
    );
    true
}

pub fn instruction_unknown(mnemonic: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    if mnemonic.parse::<Opcode>().is_ok() {
        return false;
    }
    error(cfg, reporter, format!("unknown instruction '{}'", mnemonic));
    true
}

pub fn wrong_operand_count(
    mnemonic: &str,
    opcode: Opcode,
    given: usize,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    let required = opcode.addressing().operand_count();
    if given == required {
        return false;
    }
    error(
        cfg,
        reporter,
        format!(
            "instruction '{}' expects {} operand(s), but {} were given",
            mnemonic, required, given
        ),
    );
    true
}

pub fn operand_invalid(
    lexeme: &str,
    mode: Option<AddressingMode>,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    if mode.is_some() {
        return false;
    }
    error(cfg, reporter, format!("invalid operand '{}'", lexeme));
    true
}

fn mode_name(mode: AddressingMode) -> &'static str {
    match mode {
        AddressingMode::Immediate => "immediate",
        AddressingMode::Direct => "direct",
        AddressingMode::IndirectRegister => "indirect register",
        AddressingMode::DirectRegister => "direct register",
    }
}

fn role_name(role: OperandRole) -> &'static str {
    match role {
        OperandRole::Source => "source",
        OperandRole::Destination => "destination",
    }
}

pub fn illegal_addressing(
    mnemonic: &str,
    opcode: Opcode,
    lexeme: &str,
    role: OperandRole,
    mode: AddressingMode,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    if opcode.addressing().allows(role, mode) {
        return false;
    }
    error(
        cfg,
        reporter,
        format!(
            "operand '{}' cannot be the {} of '{}' ({} addressing is not supported there)",
            lexeme,
            role_name(role),
            mnemonic,
            mode_name(mode)
        ),
    );
    true
}

pub fn immediate_out_of_range(lexeme: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    match lexeme[1..].parse::<i32>() {
        Ok(value) if value >= MIN_IMMEDIATE && value <= MAX_IMMEDIATE => false,
        _ => {
            error(
                cfg,
                reporter,
                format!(
                    "immediate operand '{}' is out of range (min {}, max {})",
                    lexeme, MIN_IMMEDIATE, MAX_IMMEDIATE
                ),
            );
            true
        }
    }
}

pub fn symbol_name_illegal(name: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    let mut result = false;

    if !name.chars().next().map_or(false, |c| c.is_ascii_alphabetic()) {
        error(
            cfg,
            reporter,
            format!("symbol '{}' does not start with an alphabetic character", name),
        );
        result = true;
    }
    if name.len() > SYMBOL_CHARACTER_LIMIT {
        error(
            cfg,
            reporter,
            format!(
                "symbol name '{}' exceeds the {} character limit",
                name, SYMBOL_CHARACTER_LIMIT
            ),
        );
        result = true;
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        error(
            cfg,
            reporter,
            format!("illegal characters in symbol name '{}'", name),
        );
        result = true;
    }

    result
}

pub fn symbol_used_as_macro(
    name: &str,
    macros: &MacroTable,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    if !macros.contains(name) {
        return false;
    }
    error(
        cfg,
        reporter,
        format!("symbol '{}' is already defined as a macro", name),
    );
    true
}

pub fn macro_defined_more_than_once(
    name: &str,
    macros: &MacroTable,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    if !macros.contains(name) {
        return false;
    }
    error(cfg, reporter, format!("macro '{}' is already defined", name));
    true
}

pub fn symbol_defined_more_than_once(
    name: &str,
    symbols: &SymbolTable,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    if !symbols.contains(name) {
        return false;
    }
    error(cfg, reporter, format!("symbol '{}' is already defined", name));
    true
}

pub fn symbol_not_defined(
    name: &str,
    symbols: &SymbolTable,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    if symbols.contains(name) {
        return false;
    }
    error(cfg, reporter, format!("symbol '{}' was never defined", name));
    true
}

pub fn entry_extern_conflict(
    name: &str,
    symbols: &SymbolTable,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    match symbols.find(name) {
        Some(symbol) if symbol.kind == SymbolKind::Extern => {
            error(
                cfg,
                reporter,
                format!(
                    "cannot declare '{}' as entry, it is already declared as extern",
                    name
                ),
            );
            true
        }
        _ => false,
    }
}

pub fn identify_directive(
    name: &str,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> Option<Directive> {
    if let Some(directive) = Directive::identify(name) {
        return Some(directive);
    }
    if Directive::identify(&name.to_lowercase()).is_some() {
        error(
            cfg,
            reporter,
            format!("directive '{}' must be written in lowercase", name),
        );
    } else {
        error(cfg, reporter, format!("unknown directive '{}'", name));
    }
    None
}

/// Checks a comma-separated parameter list for a leading, trailing or
/// doubled comma, and for two parameters with no comma between them.
pub fn commas_misplaced(params: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    let mut comma_is_legal = false;
    let mut char_is_legal = true;
    let mut last_char_legal = true;
    let mut misplaced = false;

    for c in params.chars() {
        if c == ' ' || c == '\t' {
            // A blank after a parameter means only a comma may follow.
            if char_is_legal && comma_is_legal {
                char_is_legal = false;
            }
        } else if c == ',' {
            if !comma_is_legal {
                misplaced = true;
                break;
            }
            comma_is_legal = false;
            char_is_legal = true;
            last_char_legal = false;
        } else {
            if !char_is_legal {
                misplaced = true;
                break;
            }
            char_is_legal = true;
            comma_is_legal = true;
            last_char_legal = true;
        }
    }

    if !misplaced && last_char_legal {
        return false;
    }
    error(
        cfg,
        reporter,
        format!("misplaced commas in parameter list '{}'", params.trim()),
    );
    true
}

fn is_valid_integer(token: &str) -> bool {
    let digits = match token.strip_prefix('+').or_else(|| token.strip_prefix('-')) {
        Some(rest) => rest,
        None => token,
    };
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn data_parameters_illegal(params: &str, cfg: &CheckConfig, reporter: &mut dyn Reporter) -> bool {
    let mut result = commas_misplaced(params, cfg, reporter);

    for field in params.split(',') {
        let token = field.trim();
        if !is_valid_integer(token) {
            error(
                cfg,
                reporter,
                format!(".data parameter list '{}' is invalid", params.trim()),
            );
            return true;
        }
        match token.parse::<i32>() {
            Ok(value) if value >= MIN_DATA_PARAMETER && value <= MAX_DATA_PARAMETER => {}
            _ => {
                error(
                    cfg,
                    reporter,
                    format!(
                        ".data parameter '{}' is out of range (min {}, max {})",
                        token, MIN_DATA_PARAMETER, MAX_DATA_PARAMETER
                    ),
                );
                result = true;
            }
        }
    }

    result
}

/// A `.string` parameter is delimited by its first quote and its last
/// non-blank character, which must be a quote; interior quotes count as
/// ordinary printable characters.
pub fn string_parameter_illegal(
    params: &str,
    cfg: &CheckConfig,
    reporter: &mut dyn Reporter,
) -> bool {
    let mut result = false;

    if params.chars().any(|c| !(' '..='~').contains(&c)) {
        error(
            cfg,
            reporter,
            format!("unprintable characters in .string parameter '{}'", params),
        );
        result = true;
    }

    let trimmed = params.trim_end();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        return result;
    }
    error(
        cfg,
        reporter,
        format!(".string parameter '{}' is not a quoted string", params),
    );
    true
}
