//! Disassembly formatting for static Power ISA instructions.
//!
//! Decoding is left to the caller: an instruction arrives here as a mnemonic plus the raw ids of the registers it
//! operates on. Raw ids are resolved into a register class and an index within that class through a
//! [`RegisterClassifier`], usually the architectural [`RegisterLayout::POWER`].
//!
//! ```
//! use power_decomp::{RegisterLayout, RegisterOp, StaticInst};
//!
//! let layout = RegisterLayout::POWER;
//! let add = RegisterOp::new("add", [layout.gpr(3)?, layout.gpr(4)?, layout.gpr(5)?]);
//! assert_eq!(add.generate_disassembly(0x1000, None), "add        r3, r4, r5");
//! # Ok::<(), power_decomp::LayoutError>(())
//! ```

#![warn(clippy::all, clippy::pedantic)]

pub mod format;
pub mod instruction;
pub mod register;
pub mod symbol;

pub use crate::{
    format::{pad_mnemonic, print_register, register_name},
    instruction::{Immediate, ImmediateOp, MemoryOp, PowerStaticInst, RegisterOp, StaticInst},
    register::{
        ClassifiedRegister, LayoutError, MiscRegister, RegClass, RegIndex, RegisterClassifier,
        RegisterId, RegisterLayout,
    },
    symbol::SymbolTable,
};

/// A guest address.
pub type Addr = u64;

/// The minimum width a mnemonic is padded to when disassembling.
pub const MNEMONIC_WIDTH: usize = 10;
