//! Lexical analysis of one preprocessed source line.

use matches::debug_assert_matches;
use mcpu::constants::SYMBOL_CHARACTER_LIMIT;
use mcpu::{AddressingMode, Register};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "masm.pest"]
pub struct MasmParser;

pub type ParseError = pest::error::Error<Rule>;

/// One source line split into its syntactic parts. Lexemes borrow from
/// the input line.
#[derive(Debug, PartialEq)]
pub struct SourceLine<'i> {
    pub label: Option<&'i str>,
    pub statement: Option<Statement<'i>>,
}

#[derive(Debug, PartialEq)]
pub enum Statement<'i> {
    Directive {
        name: &'i str,
        params: Option<&'i str>,
    },
    Instruction {
        mnemonic: &'i str,
        operands: Vec<&'i str>,
    },
}

pub fn parse_line(line: &str) -> Result<SourceLine, ParseError> {
    let line_pair = MasmParser::parse(Rule::line, line)?.next().unwrap();
    debug_assert_matches!(line_pair.as_rule(), Rule::line);

    let mut label = None;
    let mut statement = None;

    for pair in line_pair.into_inner() {
        match pair.as_rule() {
            Rule::label => {
                label = Some(pair.into_inner().next().unwrap().as_str());
            }
            Rule::directive => {
                let mut inner = pair.into_inner();
                let name = inner.next().unwrap().as_str();
                let params = inner.next().map(|params| params.as_str());
                statement = Some(Statement::Directive { name, params });
            }
            Rule::instruction => {
                let mut inner = pair.into_inner();
                let mnemonic = inner.next().unwrap().as_str();
                let operands = inner.map(|operand| operand.as_str()).collect();
                statement = Some(Statement::Instruction { mnemonic, operands });
            }
            Rule::EOI => {}
            _ => unreachable!(),
        }
    }

    Ok(SourceLine { label, statement })
}

/// Detects the addressing mode of an operand lexeme, or `None` when the
/// lexeme fits no mode.
pub fn detect_addressing(lexeme: &str) -> Option<AddressingMode> {
    let value = MasmParser::parse(Rule::operand_value, lexeme)
        .ok()?
        .next()
        .unwrap()
        .into_inner()
        .next()
        .unwrap();

    match value.as_rule() {
        Rule::immediate => Some(AddressingMode::Immediate),
        Rule::indirect_register => Some(AddressingMode::IndirectRegister),
        Rule::register => Some(AddressingMode::DirectRegister),
        Rule::symbol if lexeme.len() <= SYMBOL_CHARACTER_LIMIT => Some(AddressingMode::Direct),
        Rule::symbol => None,
        _ => unreachable!(),
    }
}

/// The numeric value of a validated immediate lexeme (`#-12` -> -12).
pub fn immediate_value(lexeme: &str) -> i32 {
    lexeme[1..].parse().unwrap()
}

/// The register named by a validated register-kind lexeme (`r3`, `*r3`).
pub fn operand_register(lexeme: &str) -> Register {
    lexeme.trim_start_matches('*').parse().unwrap()
}

/// Splits a `.data`/`.extern`/`.entry` parameter list on the shared
/// delimiter set.
pub fn split_parameters(params: &str) -> impl Iterator<Item = &str> {
    params
        .split(|c| c == ',' || c == ' ' || c == '\t')
        .filter(|token| !token.is_empty())
}
