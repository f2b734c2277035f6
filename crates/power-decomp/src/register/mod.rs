//! Register definitions for the Power ISA, and the mapping from raw register ids onto them.

use strum::{EnumCount, EnumIter, FromRepr, IntoStaticStr, VariantNames};

mod layout;

pub use layout::{LayoutError, RegisterClassifier, RegisterLayout};

/// The index of a register within its own class.
pub type RegIndex = u16;

// Note that these macros must be defined before the items that use them:
// https://doc.rust-lang.org/reference/macros-by-example.html#textual-scope
macro_rules! impl_try_from {
    ($ty:ident, $($num:ident),+) => {
        $(
            impl TryFrom<$num> for $ty {
                type Error = $num;

                fn try_from(v: $num) -> Result<Self, Self::Error> {
                    u8::try_from(v).ok().and_then(Self::from_repr).ok_or(v)
                }
            }

            impl From<$ty> for $num {
                fn from(v: $ty) -> Self {
                    v.to_repr() as _
                }
            }
        )+
    };
}

macro_rules! impl_reg {
    ($ty:ident) => {
        impl $ty {
            /// The index this register has within its class.
            #[must_use]
            pub const fn to_repr(self) -> usize {
                self as usize
            }

            /// The name of this register.
            #[must_use]
            pub const fn name(self) -> &'static str {
                Self::name_from_index(self.to_repr())
            }

            /// Returns the name of the register at the given index, or panics if the index is out of bounds.
            #[must_use]
            pub const fn name_from_index(index: usize) -> &'static str {
                <Self as strum::VariantNames>::VARIANTS[index]
            }

            /// The total number of registers.
            #[must_use]
            pub const fn count() -> usize {
                <Self as strum::EnumCount>::COUNT
            }

            /// Returns an iterator over all registers.
            pub fn iter() -> impl Iterator<Item = Self> {
                <Self as strum::IntoEnumIterator>::iter()
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl_try_from!($ty, u8, u16, u32, usize);
    };
}

/// The class a register belongs to. Every raw register id resolves to exactly one of these.
#[derive(EnumIter, IntoStaticStr, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum RegClass {
    /// The general purpose fixed-point registers, `r0` through `r31`.
    Integer,
    /// The floating-point registers, `f0` through `f31`.
    Float,
    /// Special purpose registers, see [`MiscRegister`].
    Misc,
}

impl RegClass {
    /// The prefix used when printing registers of this class, if the class is named by prefix and index.
    #[must_use]
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Integer => Some("r"),
            Self::Float => Some("f"),
            Self::Misc => None,
        }
    }
}

impl std::fmt::Display for RegClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        f.write_str(name)
    }
}

/// A special purpose register, which lives in the miscellaneous register class.
#[derive(EnumCount, EnumIter, VariantNames, FromRepr, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum MiscRegister {
    /// Condition Register
    Cr,
    /// Fixed-Point Exception Register
    Xer,
    /// Link Register
    Lr,
    /// Count Register
    Ctr,
}

impl_reg!(MiscRegister);

impl MiscRegister {
    /// Looks up the register with the given index within the misc class.
    #[must_use]
    pub fn from_index(index: RegIndex) -> Option<Self> {
        Self::try_from(index).ok()
    }
}

/// An opaque register reference as handed out by the decoder.
/// Its class and index are only known after running it through a [`RegisterClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RegisterId(u16);

impl RegisterId {
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for RegisterId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<RegisterId> for u16 {
    fn from(reg: RegisterId) -> Self {
        reg.0
    }
}

/// A register reference resolved to its class and its index within that class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassifiedRegister {
    pub class: RegClass,
    pub index: RegIndex,
}

impl ClassifiedRegister {
    #[must_use]
    pub const fn new(class: RegClass, index: RegIndex) -> Self {
        Self { class, index }
    }

    /// The special purpose register this refers to, if it is a known member of the misc class.
    #[must_use]
    pub fn misc(self) -> Option<MiscRegister> {
        match self.class {
            RegClass::Misc => MiscRegister::from_index(self.index),
            RegClass::Integer | RegClass::Float => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misc_register_names() {
        let names: Vec<_> = MiscRegister::iter().map(MiscRegister::name).collect();
        assert_eq!(names, ["cr", "xer", "lr", "ctr"]);
        assert_eq!(MiscRegister::count(), 4);
    }

    #[test]
    fn misc_register_from_index() {
        assert_eq!(MiscRegister::from_index(0), Some(MiscRegister::Cr));
        assert_eq!(MiscRegister::from_index(3), Some(MiscRegister::Ctr));
        assert_eq!(MiscRegister::from_index(4), None);
        // Must not wrap around when narrowing to the enum's representation.
        assert_eq!(MiscRegister::from_index(256), None);
        assert_eq!(MiscRegister::try_from(258_u32), Err(258));
    }

    #[test]
    fn misc_register_into_index() {
        assert_eq!(u16::from(MiscRegister::Lr), 2);
        assert_eq!(usize::from(MiscRegister::Xer), 1);
    }

    #[test]
    fn classified_misc_lookup() {
        assert_eq!(
            ClassifiedRegister::new(RegClass::Misc, 2).misc(),
            Some(MiscRegister::Lr)
        );
        assert_eq!(ClassifiedRegister::new(RegClass::Misc, 9).misc(), None);
        assert_eq!(ClassifiedRegister::new(RegClass::Integer, 2).misc(), None);
    }

    #[test]
    fn class_display() {
        assert_eq!(RegClass::Integer.to_string(), "integer");
        assert_eq!(RegClass::Float.to_string(), "float");
        assert_eq!(RegClass::Misc.to_string(), "misc");
    }
}
