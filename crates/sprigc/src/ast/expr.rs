//! Sprig expression AST nodes

use super::{QualifiedName, Type};
use crate::common::Span;

/// A Sprig expression
///
/// `ty` is the statically-known type of the node, filled at construction
/// for nodes whose type is fixed by their form (literals, array literals,
/// conditions, ranges). `None` means the type must be inferred against the
/// symbol table.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: Option<Type>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        let ty = kind.static_type();
        Self { kind, span, ty }
    }
}

/// Expression kinds
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Number literal: 42, 3.25
    Number(f64),
    /// String literal, escapes preserved verbatim
    Str(String),
    /// Boolean literal
    Bool(bool),
    /// Typed array literal: `[Number]{1, 2, 3}`
    Array { elem_ty: Type, elems: Vec<Expr> },

    /// Variable reference
    Var(QualifiedName),
    /// Assignment: `name = value`
    Assign {
        name: QualifiedName,
        value: Box<Expr>,
    },
    /// Function call
    Call {
        name: QualifiedName,
        args: Vec<Expr>,
    },

    /// Unary prefix operation: -x, +x, ~x, !x
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Arithmetic/bitwise/shift/exponent operation; `compound` marks the
    /// `+=` form of the same operator, never a distinct node kind
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        compound: bool,
    },
    /// Comparison, boolean, or membership operation; always Boolean-typed
    Cond {
        op: CondOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Range `a..b`, an eagerly materialized Array<Number>
    Range { left: Box<Expr>, right: Box<Expr> },
}

impl ExprKind {
    /// The type fixed by the node's form, if any
    fn static_type(&self) -> Option<Type> {
        match self {
            ExprKind::Number(_) => Some(Type::number()),
            ExprKind::Str(_) => Some(Type::string()),
            ExprKind::Bool(_) => Some(Type::boolean()),
            ExprKind::Array { elem_ty, .. } => Some(Type::array_of(elem_ty.clone())),
            ExprKind::Cond { .. } => Some(Type::boolean()),
            ExprKind::Range { .. } => Some(Type::array_of(Type::number())),
            _ => None,
        }
    }
}

/// Arithmetic, bitwise, shift, and exponent operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinOp {
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Shl | BinOp::Shr => 7,
            BinOp::BitOr => 8,
            BinOp::BitXor => 9,
            BinOp::BitAnd => 10,
            BinOp::Add | BinOp::Sub => 11,
            BinOp::Mul | BinOp::Div | BinOp::Rem => 12,
            BinOp::Pow => 13,
        }
    }

    /// JavaScript spelling; `Pow` is special-cased by the generator
    pub fn js_repr(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Pow => "**",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        }
    }
}

/// Operators whose result is Boolean: comparisons, `&&`/`||`, and `in`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    Or,
    And,
    In,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CondOp {
    pub fn precedence(self) -> u8 {
        match self {
            CondOp::Or => 1,
            CondOp::And => 2,
            CondOp::In => 3,
            CondOp::Eq | CondOp::Ne => 5,
            CondOp::Lt | CondOp::Le | CondOp::Gt | CondOp::Ge => 6,
        }
    }

    /// Whether both operands must themselves be Boolean
    pub fn is_boolean_op(self) -> bool {
        matches!(self, CondOp::Or | CondOp::And)
    }

    /// JavaScript spelling; `In` is special-cased by the generator
    pub fn js_repr(self) -> &'static str {
        match self {
            CondOp::Or => "||",
            CondOp::And => "&&",
            CondOp::In => "in",
            CondOp::Eq => "==",
            CondOp::Ne => "!=",
            CondOp::Lt => "<",
            CondOp::Le => "<=",
            CondOp::Gt => ">",
            CondOp::Ge => ">=",
        }
    }
}

/// Unary prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Numeric negation `-`
    Neg,
    /// Numeric plus `+`
    Plus,
    /// Bitwise complement `~`
    BitNot,
    /// Boolean negation `!`
    Not,
}

impl UnaryOp {
    pub fn js_repr(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "!",
        }
    }
}
