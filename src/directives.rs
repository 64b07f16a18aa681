use crate::constants;

/// The assembler directives. Directive names are lowercase and carry a
/// leading dot; anything else is an unknown directive.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Directive {
    Data,
    Entry,
    String,
    Extern,
}

pub const DIRECTIVE_NAMES: [&str; constants::DIRECTIVE_COUNT] =
    [".data", ".entry", ".string", ".extern"];

impl Directive {
    pub fn identify(name: &str) -> Option<Directive> {
        match name {
            ".data" => Some(Directive::Data),
            ".entry" => Some(Directive::Entry),
            ".string" => Some(Directive::String),
            ".extern" => Some(Directive::Extern),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Directive::Data => ".data",
            Directive::Entry => ".entry",
            Directive::String => ".string",
            Directive::Extern => ".extern",
        }
    }
}
