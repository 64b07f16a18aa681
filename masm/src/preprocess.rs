//! The macro preprocessor: turns a `.as` source into the `.am` line
//! stream consumed by the passes.
//!
//! Responsibilities:
//! 1. Collect `macr <name>` .. `endmacr` definitions into a
//!    [`MacroTable`](../macros/struct.MacroTable.html), checking the name
//!    against the reserved-word and redefinition rules.
//! 2. Substitute a line consisting of a macro name with the macro body.
//! 3. Drop comment lines (`;`) and blank lines, and trim the rest.
//!
//! Macros are never nested and are always defined before use.

use crate::checks::{self, CheckConfig};
use crate::macros::MacroTable;
use crate::report::{Diagnostic, Reporter};
use crate::Error;

const MACRO_KEYWORD: &str = "macr";
const MACRO_END_KEYWORD: &str = "endmacr";

fn is_macro_definition(line: &str) -> bool {
    line == MACRO_KEYWORD
        || line.starts_with("macr ")
        || line.starts_with("macr\t")
}

pub fn preprocess(
    source: &str,
    file_name: &str,
    reporter: &mut dyn Reporter,
) -> Result<(String, MacroTable), Error> {
    let mut macros = MacroTable::new();
    let mut output = String::new();
    let mut errors = 0;

    let mut lines = source.lines().enumerate();
    while let Some((index, raw)) = lines.next() {
        let line_number = index as u32 + 1;
        let cfg = CheckConfig::new(file_name, line_number, true);
        let line = raw.trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if is_macro_definition(line) {
            let rest = line[MACRO_KEYWORD.len()..].trim();
            let name = rest.split_whitespace().next();
            let mut invalid = false;

            match name {
                None => {
                    reporter.report(Diagnostic::error(
                        file_name,
                        line_number,
                        "macro definition is missing a name".to_owned(),
                    ));
                    invalid = true;
                }
                Some(name) => {
                    if checks::extraneous_characters(&rest[name.len()..], &cfg, reporter) {
                        invalid = true;
                    }
                    if checks::reserved_name(name, &cfg, reporter) {
                        invalid = true;
                    }
                    if checks::macro_defined_more_than_once(name, &macros, &cfg, reporter) {
                        invalid = true;
                    }
                }
            }

            let mut body = String::new();
            let mut terminated = false;
            while let Some((body_index, body_raw)) = lines.next() {
                let body_line = body_raw.trim();
                if body_line.starts_with(MACRO_END_KEYWORD) {
                    let end_cfg = CheckConfig::new(file_name, body_index as u32 + 1, true);
                    if checks::extraneous_characters(
                        &body_line[MACRO_END_KEYWORD.len()..],
                        &end_cfg,
                        reporter,
                    ) {
                        invalid = true;
                    }
                    terminated = true;
                    break;
                }
                if !body_line.is_empty() && !body_line.starts_with(';') {
                    body.push_str(body_line);
                    body.push('\n');
                }
            }

            if !terminated {
                reporter.report(Diagnostic::error(
                    file_name,
                    line_number,
                    "macro definition has no 'endmacr'".to_owned(),
                ));
                invalid = true;
            }

            if invalid {
                errors += 1;
            } else {
                macros.insert(name.unwrap(), body);
            }
        } else if let Some(body) = macros.find(line) {
            output.push_str(body);
        } else {
            output.push_str(line);
            output.push('\n');
        }
    }

    if errors > 0 {
        Err(Error::SyntaxErrors { count: errors })
    } else {
        Ok((output, macros))
    }
}
