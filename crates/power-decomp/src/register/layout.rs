use super::{ClassifiedRegister, MiscRegister, RegClass, RegIndex, RegisterId};

#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("floating-point registers start at {float_base:#x}, past the misc registers at {misc_base:#x}")]
    Overlapping { float_base: u16, misc_base: u16 },
    #[error("{class} register index {index} is out of range, the class holds {count} registers")]
    IndexOutOfRange {
        class: RegClass,
        index: RegIndex,
        count: u32,
    },
}

/// Resolves an opaque register reference into its class and index within that class.
/// Implementations must be total: every reference maps onto exactly one class.
pub trait RegisterClassifier {
    fn classify(&self, reg: RegisterId) -> ClassifiedRegister;
}

impl<F> RegisterClassifier for F
where
    F: Fn(RegisterId) -> ClassifiedRegister,
{
    fn classify(&self, reg: RegisterId) -> ClassifiedRegister {
        self(reg)
    }
}

/// A flat register file, where each class occupies a contiguous range of raw ids:
/// integer registers first, then floating-point registers, then everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterLayout {
    float_base: u16,
    misc_base: u16,
}

impl RegisterLayout {
    /// The amount of general purpose registers in the Power ISA.
    pub const INT_REGISTER_COUNT: u16 = 32;
    /// The amount of floating-point registers in the Power ISA.
    pub const FLOAT_REGISTER_COUNT: u16 = 32;

    /// The architectural layout: `r0..r31`, followed by `f0..f31`, followed by the special purpose registers.
    pub const POWER: Self = Self {
        float_base: Self::INT_REGISTER_COUNT,
        misc_base: Self::INT_REGISTER_COUNT + Self::FLOAT_REGISTER_COUNT,
    };

    /// Creates a layout where floating-point registers start at `float_base` and misc registers at `misc_base`.
    ///
    /// # Errors
    /// Returns [`LayoutError::Overlapping`] if the floating-point registers would start past the misc registers.
    pub const fn new(float_base: u16, misc_base: u16) -> Result<Self, LayoutError> {
        if float_base > misc_base {
            return Err(LayoutError::Overlapping {
                float_base,
                misc_base,
            });
        }

        Ok(Self {
            float_base,
            misc_base,
        })
    }

    /// The first raw id belonging to the floating-point class.
    #[must_use]
    pub const fn float_base(&self) -> u16 {
        self.float_base
    }

    /// The first raw id belonging to the misc class.
    #[must_use]
    pub const fn misc_base(&self) -> u16 {
        self.misc_base
    }

    const fn base(&self, class: RegClass) -> u16 {
        match class {
            RegClass::Integer => 0,
            RegClass::Float => self.float_base,
            RegClass::Misc => self.misc_base,
        }
    }

    /// The amount of raw ids the given class spans.
    #[must_use]
    pub const fn class_count(&self, class: RegClass) -> u32 {
        match class {
            RegClass::Integer => self.float_base as u32,
            RegClass::Float => (self.misc_base - self.float_base) as u32,
            RegClass::Misc => u16::MAX as u32 + 1 - self.misc_base as u32,
        }
    }

    #[must_use]
    pub const fn classify(&self, reg: RegisterId) -> ClassifiedRegister {
        let raw = reg.raw();
        if raw < self.float_base {
            ClassifiedRegister::new(RegClass::Integer, raw)
        } else if raw < self.misc_base {
            ClassifiedRegister::new(RegClass::Float, raw - self.float_base)
        } else {
            ClassifiedRegister::new(RegClass::Misc, raw - self.misc_base)
        }
    }

    /// Builds the raw register reference for the register with the given index within a class.
    /// This is the inverse of [`RegisterLayout::classify`].
    ///
    /// # Errors
    /// Returns [`LayoutError::IndexOutOfRange`] if `index` does not fit in the class.
    pub fn register(&self, class: RegClass, index: RegIndex) -> Result<RegisterId, LayoutError> {
        let count = self.class_count(class);
        if u32::from(index) >= count {
            return Err(LayoutError::IndexOutOfRange {
                class,
                index,
                count,
            });
        }

        Ok(RegisterId::new(self.base(class) + index))
    }

    /// The general purpose register `r{index}`.
    pub fn gpr(&self, index: RegIndex) -> Result<RegisterId, LayoutError> {
        self.register(RegClass::Integer, index)
    }

    /// The floating-point register `f{index}`.
    pub fn fpr(&self, index: RegIndex) -> Result<RegisterId, LayoutError> {
        self.register(RegClass::Float, index)
    }

    pub fn misc(&self, reg: MiscRegister) -> Result<RegisterId, LayoutError> {
        self.register(RegClass::Misc, reg.into())
    }
}

impl Default for RegisterLayout {
    fn default() -> Self {
        Self::POWER
    }
}

impl RegisterClassifier for RegisterLayout {
    fn classify(&self, reg: RegisterId) -> ClassifiedRegister {
        RegisterLayout::classify(self, reg)
    }
}
