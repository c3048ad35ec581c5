//! Types for representing branches and branch outcomes.

/// A branch outcome.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    /// Not taken
    N = 0,
    /// Taken
    T = 1
}

impl Outcome {
    pub fn from_bool(b: bool) -> Self {
        match b {
            true => Self::T,
            false => Self::N,
        }
    }

    /// Returns 'true' for [Outcome::T].
    pub fn is_taken(&self) -> bool {
        matches!(self, Self::T)
    }
}

impl Default for Outcome {
    fn default() -> Self { Self::N }
}

impl std::fmt::Debug for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::T => "t",
            Self::N => "n",
        };
        write!(f, "{}", s)
    }
}

impl std::ops::Not for Outcome {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Self::N => Self::T,
            Self::T => Self::N,
        }
    }
}

impl From<bool> for Outcome {
    fn from(x: bool) -> Self {
        Self::from_bool(x)
    }
}
impl From<Outcome> for bool {
    fn from(x: Outcome) -> Self {
        x.is_taken()
    }
}

/// Classification bits attached to a dynamic control transfer.
///
/// A record may carry more than one bit (ie. an indirect call).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchFlags(pub u32);
impl BranchFlags {
    pub const COND_FLAG: u32 = (1 << 0);
    pub const CALL_FLAG: u32 = (1 << 1);
    pub const RET_FLAG: u32  = (1 << 2);
    pub const IND_FLAG: u32  = (1 << 3);

    pub fn is_conditional(&self) -> bool { self.0 & Self::COND_FLAG != 0 }
    pub fn is_call(&self) -> bool { self.0 & Self::CALL_FLAG != 0 }
    pub fn is_ret(&self) -> bool { self.0 & Self::RET_FLAG != 0 }
    pub fn is_indirect(&self) -> bool { self.0 & Self::IND_FLAG != 0 }
}

/// Representing different kinds of control-flow instructions.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BranchKind {
    /// A direct conditional branch instruction.
    Conditional  = BranchFlags::COND_FLAG,

    /// A direct unconditional jump instruction.
    DirectJump   = 0,

    /// An indirect unconditional jump instruction.
    IndirectJump = BranchFlags::IND_FLAG,

    /// A direct procedure call instruction.
    DirectCall   = BranchFlags::CALL_FLAG,

    /// An indirect procedure call instruction.
    IndirectCall = BranchFlags::CALL_FLAG | BranchFlags::IND_FLAG,

    /// A return instruction.
    Return       = BranchFlags::RET_FLAG | BranchFlags::IND_FLAG,
}
impl From<BranchKind> for BranchFlags {
    fn from(kind: BranchKind) -> Self {
        Self(kind as u32)
    }
}

/// A dynamic branch, as presented to a predictor by the simulator.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BranchRecord {
    /// The instruction address of this branch
    pub pc: u32,

    pub flags: BranchFlags,
}
impl BranchRecord {
    pub fn new(pc: u32, kind: BranchKind) -> Self {
        Self { pc, flags: kind.into() }
    }

    /// Shorthand for a conditional branch at `pc`.
    pub fn conditional(pc: u32) -> Self {
        Self::new(pc, BranchKind::Conditional)
    }

    /// Returns 'true' if this is a conditional instruction.
    pub fn is_conditional(&self) -> bool {
        self.flags.is_conditional()
    }

    /// Returns 'true' if this is a "call" or "return".
    pub fn is_procedural(&self) -> bool {
        self.flags.is_call() || self.flags.is_ret()
    }

    /// Returns 'true' if this instruction indirectly specifies the target.
    pub fn is_indirect(&self) -> bool {
        self.flags.is_indirect()
    }

    /// Returns 'true' for unconditional transfers that are recorded in
    /// global history (calls, returns, and indirect jumps).
    pub fn advances_history(&self) -> bool {
        !self.is_conditional() && (self.is_procedural() || self.is_indirect())
    }

    /// The lowest bit of the instruction address (shifted into path history).
    pub fn path_bit(&self) -> bool {
        self.pc & 1 != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn history_advancing_kinds() {
        let pc = 0x0040_1000;
        assert!(!BranchRecord::new(pc, BranchKind::Conditional).advances_history());
        assert!(!BranchRecord::new(pc, BranchKind::DirectJump).advances_history());
        assert!(BranchRecord::new(pc, BranchKind::IndirectJump).advances_history());
        assert!(BranchRecord::new(pc, BranchKind::DirectCall).advances_history());
        assert!(BranchRecord::new(pc, BranchKind::IndirectCall).advances_history());
        assert!(BranchRecord::new(pc, BranchKind::Return).advances_history());
    }

    #[test]
    fn outcome_conversions() {
        assert_eq!(Outcome::from(true), Outcome::T);
        assert_eq!(!Outcome::T, Outcome::N);
        assert!(bool::from(Outcome::T));
        assert_eq!(Outcome::default(), Outcome::N);
    }
}
