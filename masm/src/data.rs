//! Encoding of `.data` and `.string` parameters into the data segment.
//!
//! Both functions assume their parameter already passed the syntax checks.

use crate::parser::split_parameters;
use mcpu::{make_data_word, Word};

/// Appends one word per `.data` parameter, two's complement truncated to
/// 15 bits.
pub fn encode_data_parameters(params: &str, data_table: &mut Vec<Word>) {
    for token in split_parameters(params) {
        data_table.push(make_data_word(token.parse().unwrap()));
    }
}

/// Appends the ASCII value of every character between the outer quotes,
/// then a terminating zero word.
pub fn encode_string_literal(literal: &str, data_table: &mut Vec<Word>) {
    let trimmed = literal.trim_end();
    let interior = &trimmed[1..trimmed.len() - 1];

    for character in interior.chars() {
        data_table.push(character as Word);
    }
    data_table.push(0);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn data_parameters_truncate_to_word() {
        let mut data = Vec::new();
        encode_data_parameters("0, -1, 16384", &mut data);
        assert_eq!(data, [0x0000, 0x7FFF, 0x4000]);
    }

    #[test]
    fn data_parameters_keep_signs() {
        let mut data = Vec::new();
        encode_data_parameters("+13, 18, 0,-1,+333", &mut data);
        assert_eq!(data, [13, 18, 0, 0x7FFF, 333]);
    }

    #[test]
    fn string_characters_and_terminator() {
        let mut data = Vec::new();
        encode_string_literal("\"abc\"", &mut data);
        assert_eq!(data, [0x61, 0x62, 0x63, 0]);
    }

    #[test]
    fn empty_string_emits_one_zero_word() {
        let mut data = Vec::new();
        encode_string_literal("\"\"", &mut data);
        assert_eq!(data, [0]);
    }

    #[test]
    fn interior_quotes_are_encoded() {
        let mut data = Vec::new();
        encode_string_literal("\"a\"b\"", &mut data);
        assert_eq!(data, [0x61, 0x22, 0x62, 0]);
    }

    #[test]
    fn trailing_blanks_after_closing_quote_are_ignored() {
        let mut data = Vec::new();
        encode_string_literal("\"hi\"  ", &mut data);
        assert_eq!(data, [0x68, 0x69, 0]);
    }
}
