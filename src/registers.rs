use crate::Word;
use num_derive::{FromPrimitive, ToPrimitive};
use util::EnumFromStr;
use util_derive::EnumFromStr;

/// The machine's eight general-purpose registers, `r0` through `r7`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ToPrimitive, FromPrimitive, EnumFromStr)]
pub enum Register {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Register {
    pub fn number(self) -> Word {
        self as Word
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_lowercase_names_only() {
        assert_eq!("r0".parse(), Ok(Register::R0));
        assert_eq!("r7".parse(), Ok(Register::R7));
        assert!("R3".parse::<Register>().is_err());
        assert!("r8".parse::<Register>().is_err());
    }

    #[test]
    fn register_numbers() {
        assert_eq!(Register::R0.number(), 0);
        assert_eq!(Register::R5.number(), 5);
    }
}
