//! Names and type representations

use std::fmt;

/// Namespace prefix reserved for unchecked host-interop calls
pub const JS_NAMESPACE: &str = "js";

/// A dotted, non-empty name: `a`, `a.b.c`
///
/// Used for variables, functions, and types alike. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub parts: Vec<String>,
}

impl QualifiedName {
    pub fn new(parts: Vec<String>) -> Self {
        debug_assert!(!parts.is_empty());
        Self { parts }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    /// Whether this name lives in the reserved host-interop namespace
    pub fn is_js_interop(&self) -> bool {
        self.parts.first().is_some_and(|p| p == JS_NAMESPACE)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

/// A Sprig type: a name plus ordered generic parameters
///
/// Equality is structural and exact: names equal, parameter lists equal
/// element-wise and in length. The built-in `Any` type is a universal
/// wildcard equal to every type in either position, so `PartialEq` is
/// hand-written and `Eq`/`Hash` are deliberately not derived (wildcard
/// equality is not transitive).
#[derive(Debug, Clone)]
pub struct Type {
    pub name: QualifiedName,
    pub params: Vec<Type>,
}

impl Type {
    pub fn new(name: QualifiedName, params: Vec<Type>) -> Self {
        Self { name, params }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: QualifiedName::simple(name),
            params: Vec::new(),
        }
    }

    pub fn number() -> Self {
        Self::simple("Number")
    }

    pub fn string() -> Self {
        Self::simple("String")
    }

    pub fn boolean() -> Self {
        Self::simple("Boolean")
    }

    pub fn void() -> Self {
        Self::simple("Void")
    }

    pub fn any() -> Self {
        Self::simple("Any")
    }

    pub fn array_of(element: Type) -> Self {
        Self {
            name: QualifiedName::simple("Array"),
            params: vec![element],
        }
    }

    /// Whether this is the wildcard type
    pub fn is_any(&self) -> bool {
        self.params.is_empty() && self.name.parts == ["Any"]
    }

    /// First generic parameter, i.e. the element type of an array type
    pub fn element(&self) -> Option<&Type> {
        self.params.first()
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if self.is_any() || other.is_any() {
            return true;
        }
        self.name == other.name
            && self.params.len() == other.params.len()
            && self.params.iter().zip(&other.params).all(|(a, b)| a == b)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "<")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", param)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}
