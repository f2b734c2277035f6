use crate::{
    register::{ClassifiedRegister, MiscRegister, RegClass, RegisterClassifier, RegisterId},
    MNEMONIC_WIDTH,
};
use log::debug;
use std::fmt;

/// Printed in place of a misc register that is not part of [`MiscRegister`].
pub const UNKNOWN_REGISTER: &str = "unknown_reg";

impl fmt::Display for ClassifiedRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            RegClass::Integer => write!(f, "r{}", self.index),
            RegClass::Float => write!(f, "f{}", self.index),
            RegClass::Misc => match MiscRegister::from_index(self.index) {
                Some(reg) => f.write_str(reg.name()),
                None => {
                    debug!("no name for misc register {}", self.index);
                    f.write_str(UNKNOWN_REGISTER)
                }
            },
        }
    }
}

/// Writes the name of `reg` to `out`, after resolving it with `classifier`.
/// Unknown special purpose registers are printed as [`UNKNOWN_REGISTER`], so the only possible error is one
/// coming from the sink itself.
pub fn print_register<W, C>(out: &mut W, reg: RegisterId, classifier: &C) -> fmt::Result
where
    W: fmt::Write + ?Sized,
    C: RegisterClassifier + ?Sized,
{
    write!(out, "{}", classifier.classify(reg))
}

#[must_use]
pub fn register_name<C>(reg: RegisterId, classifier: &C) -> String
where
    C: RegisterClassifier + ?Sized,
{
    classifier.classify(reg).to_string()
}

/// Appends the names of all `regs` to `out`, separated by commas.
pub fn push_register_list<C>(out: &mut String, regs: &[RegisterId], classifier: &C)
where
    C: RegisterClassifier + ?Sized,
{
    for (i, reg) in regs.iter().enumerate() {
        if i != 0 {
            out.push_str(", ");
        }
        out.push_str(&register_name(*reg, classifier));
    }
}

/// Left-justifies the mnemonic to [`MNEMONIC_WIDTH`] and appends a single space.
/// Longer mnemonics are kept intact.
#[must_use]
pub fn pad_mnemonic(mnemonic: &str) -> String {
    format!("{mnemonic: <width$} ", width = MNEMONIC_WIDTH)
}
