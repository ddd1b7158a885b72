//! Operator, keyword and literal-kind enums with their canonical Go spelling.
//!
//! Every table is generated by `token_table!`, so `as_str` and `from_text`
//! are inverse by construction and `ALL` enumerates every value.

/// Canonical text of a small closed token set.
pub trait TokenText: Copy + Eq + 'static {
    /// Every value, in declaration order.
    const ALL: &'static [Self];
    /// What this table spells (used in error messages).
    const WHAT: &'static str;

    fn as_str(self) -> &'static str;

    fn from_text(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

macro_rules! token_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($what:literal) {
            $($variant:ident => $text:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),*
        }

        impl TokenText for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),*];
            const WHAT: &'static str = $what;

            #[inline]
            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

token_table! {
    /// Unary operator (`~` only appears in constraint terms).
    pub enum UnaryOp ("unary operator") {
        Add => "+",
        Sub => "-",
        Not => "!",
        Xor => "^",
        Deref => "*",
        Addr => "&",
        Recv => "<-",
        Tilde => "~",
    }
}

token_table! {
    /// Binary operator.
    pub enum BinaryOp ("binary operator") {
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        And => "&",
        Or => "|",
        Xor => "^",
        Shl => "<<",
        Shr => ">>",
        AndNot => "&^",
        LAnd => "&&",
        LOr => "||",
        Eq => "==",
        Ne => "!=",
        Lt => "<",
        Le => "<=",
        Gt => ">",
        Ge => ">=",
    }
}

token_table! {
    /// Assignment token, including the short variable declaration `:=`.
    pub enum AssignOp ("assignment operator") {
        Assign => "=",
        Define => ":=",
        AddAssign => "+=",
        SubAssign => "-=",
        MulAssign => "*=",
        DivAssign => "/=",
        ModAssign => "%=",
        AndAssign => "&=",
        OrAssign => "|=",
        XorAssign => "^=",
        ShlAssign => "<<=",
        ShrAssign => ">>=",
        AndNotAssign => "&^=",
    }
}

token_table! {
    pub enum IncDecOp ("increment/decrement operator") {
        Inc => "++",
        Dec => "--",
    }
}

token_table! {
    /// Keyword of a branch statement.
    pub enum BranchTok ("branch keyword") {
        Break => "break",
        Continue => "continue",
        Goto => "goto",
        Fallthrough => "fallthrough",
    }
}

token_table! {
    /// Keyword of a grouped declaration.
    pub enum GenDeclTok ("declaration keyword") {
        Import => "import",
        Const => "const",
        Type => "type",
        Var => "var",
    }
}

token_table! {
    pub enum BasicLitKind ("literal kind") {
        Int => "INT",
        Float => "FLOAT",
        Imag => "IMAG",
        Char => "CHAR",
        String => "STRING",
    }
}

token_table! {
    /// Channel direction; a bidirectional channel spells as the empty string.
    pub enum ChanDir ("channel direction") {
        Send => "SEND",
        Recv => "RECV",
        Both => "",
    }
}

impl BinaryOp {
    /// Binding strength, 1 (`||`) to 5 (multiplicative).
    pub const fn precedence(self) -> u8 {
        match self {
            Self::LOr => 1,
            Self::LAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Mul
            | Self::Div
            | Self::Mod
            | Self::Shl
            | Self::Shr
            | Self::And
            | Self::AndNot => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_inverse<T: TokenText + std::fmt::Debug>() {
        for &t in T::ALL {
            assert_eq!(T::from_text(t.as_str()), Some(t), "{} {t:?}", T::WHAT);
        }
    }

    #[test]
    fn tables_are_their_own_inverse() {
        assert_inverse::<UnaryOp>();
        assert_inverse::<BinaryOp>();
        assert_inverse::<AssignOp>();
        assert_inverse::<IncDecOp>();
        assert_inverse::<BranchTok>();
        assert_inverse::<GenDeclTok>();
        assert_inverse::<BasicLitKind>();
        assert_inverse::<ChanDir>();
    }

    #[test]
    fn unknown_text_is_rejected() {
        assert_eq!(BinaryOp::from_text("<>"), None);
        assert_eq!(AssignOp::from_text("=="), None);
        assert_eq!(ChanDir::from_text("BOTH"), None);
        assert_eq!(ChanDir::from_text(""), Some(ChanDir::Both));
    }

    #[test]
    fn precedence_orders_operators() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Lt.precedence());
        assert!(BinaryOp::LAnd.precedence() > BinaryOp::LOr.precedence());
    }
}
