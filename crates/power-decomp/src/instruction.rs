use crate::{
    format::{pad_mnemonic, print_register, push_register_list, register_name},
    register::{RegisterId, RegisterLayout},
    symbol::SymbolTable,
    Addr,
};
use log::trace;
use std::fmt;

/// A decoded instruction which can render itself as assembly.
pub trait StaticInst {
    /// The name of the operation, e.g. `add`.
    fn mnemonic(&self) -> &str;

    /// The registers this instruction operates on, in the order they are printed.
    fn operands(&self) -> &[RegisterId];

    fn num_operands(&self) -> usize {
        self.operands().len()
    }

    fn operand(&self, index: usize) -> Option<RegisterId> {
        self.operands().get(index).copied()
    }

    /// Renders the instruction located at `pc` as assembly.
    ///
    /// The default prints only the padded mnemonic, see [`pad_mnemonic`]. Variants that have operands append
    /// them to this prefix. `pc` and `symtab` are not used here, they are available for overrides that need
    /// to resolve addresses.
    fn generate_disassembly(&self, pc: Addr, _symtab: Option<&SymbolTable>) -> String {
        trace!("disassembling {} at {pc:#x}", self.mnemonic());
        pad_mnemonic(self.mnemonic())
    }
}

/// The state shared by every Power instruction: its mnemonic and register operands.
/// Disassembles to the mnemonic alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerStaticInst {
    mnemonic: &'static str,
    operands: Vec<RegisterId>,
    layout: RegisterLayout,
}

impl PowerStaticInst {
    #[must_use]
    pub fn new(mnemonic: &'static str, operands: impl Into<Vec<RegisterId>>) -> Self {
        Self::with_layout(mnemonic, operands, RegisterLayout::POWER)
    }

    /// Creates an instruction whose register operands are resolved using `layout`.
    #[must_use]
    pub fn with_layout(
        mnemonic: &'static str,
        operands: impl Into<Vec<RegisterId>>,
        layout: RegisterLayout,
    ) -> Self {
        Self {
            mnemonic,
            operands: operands.into(),
            layout,
        }
    }

    #[must_use]
    pub const fn layout(&self) -> &RegisterLayout {
        &self.layout
    }

    /// Writes the name of `reg`, as it is known to this instruction's register layout.
    pub fn print_reg<W: fmt::Write + ?Sized>(&self, out: &mut W, reg: RegisterId) -> fmt::Result {
        print_register(out, reg, &self.layout)
    }

    #[must_use]
    pub fn reg_name(&self, reg: RegisterId) -> String {
        register_name(reg, &self.layout)
    }

    fn push_operands(&self, out: &mut String) {
        push_register_list(out, &self.operands, &self.layout);
    }
}

impl StaticInst for PowerStaticInst {
    fn mnemonic(&self) -> &str {
        self.mnemonic
    }

    fn operands(&self) -> &[RegisterId] {
        &self.operands
    }
}

impl fmt::Display for PowerStaticInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&pad_mnemonic(self.mnemonic))
    }
}

// Every variant wraps a `PowerStaticInst` and only adds how its operands are rendered.
macro_rules! impl_static_inst {
    ($ty:ident) => {
        impl $ty {
            #[must_use]
            pub const fn base(&self) -> &PowerStaticInst {
                &self.base
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.generate_disassembly(0, None))
            }
        }
    };
}

/// An instruction with only register operands, e.g. `add r3, r4, r5` or `mtlr r0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOp {
    base: PowerStaticInst,
}

impl RegisterOp {
    #[must_use]
    pub fn new(mnemonic: &'static str, operands: impl Into<Vec<RegisterId>>) -> Self {
        Self::from(PowerStaticInst::new(mnemonic, operands))
    }
}

impl From<PowerStaticInst> for RegisterOp {
    fn from(base: PowerStaticInst) -> Self {
        Self { base }
    }
}

impl StaticInst for RegisterOp {
    fn mnemonic(&self) -> &str {
        self.base.mnemonic()
    }

    fn operands(&self) -> &[RegisterId] {
        self.base.operands()
    }

    fn generate_disassembly(&self, pc: Addr, symtab: Option<&SymbolTable>) -> String {
        let mut result = self.base.generate_disassembly(pc, symtab);
        self.base.push_operands(&mut result);
        result
    }
}

impl_static_inst!(RegisterOp);

/// An immediate operand, along with how it should be printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immediate {
    /// Printed in decimal, e.g. the `SI` field of `addi`.
    Signed(i32),
    /// Printed in hexadecimal, e.g. the `UI` field of `ori`.
    Unsigned(u32),
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(value) => write!(f, "{value}"),
            Self::Unsigned(value) => write!(f, "{value:#x}"),
        }
    }
}

/// An instruction with register operands followed by an immediate, e.g. `addi r1, r1, -16`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmediateOp {
    base: PowerStaticInst,
    immediate: Immediate,
}

impl ImmediateOp {
    #[must_use]
    pub fn new(
        mnemonic: &'static str,
        operands: impl Into<Vec<RegisterId>>,
        immediate: Immediate,
    ) -> Self {
        Self {
            base: PowerStaticInst::new(mnemonic, operands),
            immediate,
        }
    }

    #[must_use]
    pub const fn immediate(&self) -> Immediate {
        self.immediate
    }
}

impl StaticInst for ImmediateOp {
    fn mnemonic(&self) -> &str {
        self.base.mnemonic()
    }

    fn operands(&self) -> &[RegisterId] {
        self.base.operands()
    }

    fn generate_disassembly(&self, pc: Addr, symtab: Option<&SymbolTable>) -> String {
        let mut result = self.base.generate_disassembly(pc, symtab);
        self.base.push_operands(&mut result);
        if self.base.num_operands() != 0 {
            result.push_str(", ");
        }
        result.push_str(&self.immediate.to_string());
        result
    }
}

impl_static_inst!(ImmediateOp);

/// A load or store, printed as `data, displacement(base)`, e.g. `lwz r3, 8(r1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryOp {
    base: PowerStaticInst,
    displacement: i32,
}

impl MemoryOp {
    #[must_use]
    pub fn new(mnemonic: &'static str, data: RegisterId, base: RegisterId, displacement: i32) -> Self {
        Self {
            base: PowerStaticInst::new(mnemonic, [data, base]),
            displacement,
        }
    }

    #[must_use]
    pub const fn displacement(&self) -> i32 {
        self.displacement
    }
}

impl StaticInst for MemoryOp {
    fn mnemonic(&self) -> &str {
        self.base.mnemonic()
    }

    fn operands(&self) -> &[RegisterId] {
        self.base.operands()
    }

    fn generate_disassembly(&self, pc: Addr, symtab: Option<&SymbolTable>) -> String {
        let mut result = self.base.generate_disassembly(pc, symtab);
        // Always constructed with exactly two operands.
        if let [data, base] = *self.base.operands() {
            result.push_str(&format!(
                "{}, {}({})",
                self.base.reg_name(data),
                self.displacement,
                self.base.reg_name(base)
            ));
        }
        result
    }
}

impl_static_inst!(MemoryOp);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::MiscRegister;

    fn gpr(index: u16) -> RegisterId {
        RegisterLayout::POWER.gpr(index).unwrap()
    }

    fn fpr(index: u16) -> RegisterId {
        RegisterLayout::POWER.fpr(index).unwrap()
    }

    fn misc(reg: MiscRegister) -> RegisterId {
        RegisterLayout::POWER.misc(reg).unwrap()
    }

    #[test]
    fn base_prints_padded_mnemonic() {
        let inst = PowerStaticInst::new("add", [gpr(3), gpr(4), gpr(5)]);
        let text = inst.generate_disassembly(0x1000, None);
        assert_eq!(text, "add        ");
        assert_eq!(text.len(), 11);
    }

    #[test]
    fn base_ignores_pc_and_symbols() {
        let inst = PowerStaticInst::new("sync", []);
        let mut symbols = SymbolTable::new();
        symbols.insert(0x100, "entry");

        let plain = inst.generate_disassembly(0, None);
        assert_eq!(inst.generate_disassembly(0x100, Some(&symbols)), plain);
        assert_eq!(inst.generate_disassembly(0xdead_beef, None), plain);
    }

    #[test]
    fn disassembly_is_idempotent() {
        let inst = RegisterOp::new("fadd", [fpr(1), fpr(2), fpr(3)]);
        assert_eq!(
            inst.generate_disassembly(0x40, None),
            inst.generate_disassembly(0x40, None)
        );
    }

    #[test]
    fn long_mnemonic_is_kept() {
        let inst = PowerStaticInst::new("stfdpx.long", []);
        assert_eq!(inst.generate_disassembly(0, None), "stfdpx.long ");
    }

    #[test]
    fn operand_accessors() {
        let inst = PowerStaticInst::new("add", [gpr(3), gpr(4), gpr(5)]);
        assert_eq!(inst.num_operands(), 3);
        assert_eq!(inst.operand(1), Some(gpr(4)));
        assert_eq!(inst.operand(3), None);
        assert_eq!(inst.mnemonic(), "add");
    }

    #[test]
    fn print_reg_uses_layout() {
        let layout = RegisterLayout::new(16, 20).unwrap();
        let inst = PowerStaticInst::with_layout("mr", [], layout);

        let mut out = String::new();
        inst.print_reg(&mut out, RegisterId::new(17)).unwrap();
        out.push(' ');
        inst.print_reg(&mut out, RegisterId::new(22)).unwrap();
        assert_eq!(out, "f1 lr");
        assert_eq!(inst.reg_name(RegisterId::new(15)), "r15");
    }

    #[test]
    fn register_op() {
        let add = RegisterOp::new("add", [gpr(3), gpr(4), gpr(5)]);
        assert_eq!(add.generate_disassembly(0, None), "add        r3, r4, r5");

        let mtlr = RegisterOp::new("mtlr", [gpr(0)]);
        assert_eq!(mtlr.to_string(), "mtlr       r0");

        let mtspr = RegisterOp::new("mtspr", [misc(MiscRegister::Ctr), gpr(9)]);
        assert_eq!(mtspr.to_string(), "mtspr      ctr, r9");
    }

    #[test]
    fn register_op_unknown_misc() {
        let unknown = RegisterId::new(RegisterLayout::POWER.misc_base() + 42);
        let inst = RegisterOp::new("mfspr", [gpr(3), unknown]);
        assert_eq!(inst.to_string(), "mfspr      r3, unknown_reg");
    }

    #[test]
    fn register_op_without_operands_matches_base() {
        let base = PowerStaticInst::new("isync", []);
        let inst = RegisterOp::from(base.clone());
        assert_eq!(inst.to_string(), base.to_string());
        assert_eq!(inst.base(), &base);
    }

    #[test]
    fn immediate_op() {
        let addi = ImmediateOp::new("addi", [gpr(1), gpr(1)], Immediate::Signed(-16));
        assert_eq!(addi.to_string(), "addi       r1, r1, -16");

        let ori = ImmediateOp::new("ori", [gpr(3), gpr(3)], Immediate::Unsigned(0xff));
        assert_eq!(ori.to_string(), "ori        r3, r3, 0xff");
        assert_eq!(ori.immediate(), Immediate::Unsigned(0xff));

        let sc = ImmediateOp::new("sc", [], Immediate::Unsigned(0));
        assert_eq!(sc.to_string(), "sc         0x0");
    }

    #[test]
    fn memory_op() {
        let lwz = MemoryOp::new("lwz", gpr(3), gpr(1), 8);
        assert_eq!(lwz.to_string(), "lwz        r3, 8(r1)");
        assert_eq!(lwz.displacement(), 8);
        assert_eq!(lwz.operands(), [gpr(3), gpr(1)]);

        let lfd = MemoryOp::new("lfd", fpr(1), gpr(31), -8);
        assert_eq!(lfd.generate_disassembly(0x2000, None), "lfd        f1, -8(r31)");
    }

    #[test]
    fn variants_share_the_base_prefix() {
        let insts: Vec<Box<dyn StaticInst>> = vec![
            Box::new(PowerStaticInst::new("nop", [])),
            Box::new(RegisterOp::new("subf", [gpr(3), gpr(4), gpr(5)])),
            Box::new(ImmediateOp::new("cmpwi", [gpr(3)], Immediate::Signed(0))),
            Box::new(MemoryOp::new("stwu", gpr(1), gpr(1), -32)),
        ];

        for inst in &insts {
            let prefix = pad_mnemonic(inst.mnemonic());
            assert!(inst.generate_disassembly(0, None).starts_with(&prefix));
        }
    }

    #[test]
    fn instructions_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PowerStaticInst>();
        assert_send_sync::<RegisterOp>();
        assert_send_sync::<ImmediateOp>();
        assert_send_sync::<MemoryOp>();
        assert_send_sync::<SymbolTable>();

        let inst = RegisterOp::new("and", [gpr(1), gpr(2), gpr(3)]);
        let expected = inst.to_string();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| inst.to_string())).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
