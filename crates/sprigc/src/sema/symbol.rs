//! Symbol table and scope management

use std::collections::HashMap;

use crate::ast::{QualifiedName, Type};

/// A symbol in the symbol table
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: QualifiedName,
    pub kind: SymbolKind,
    /// For variables: the declared type. For functions: the return type.
    /// For builtin types: the type itself.
    pub ty: Type,
    /// Scope depth the symbol was declared at
    pub depth: usize,
}

/// Kind of symbol
#[derive(Debug, Clone)]
pub enum SymbolKind {
    Variable,
    Function { params: Vec<Type> },
    BuiltinType,
}

/// A single flat symbol table for the whole program
///
/// Every symbol is stamped with the scope depth it was declared at; leaving
/// a scope removes all symbols stamped with that depth. A flat map keeps
/// lookup a single probe, at the cost of forbidding shadowing: declaring a
/// name while a live symbol already carries it is an error.
#[derive(Debug)]
pub struct SymbolTable {
    symbols: HashMap<QualifiedName, Symbol>,
}

impl SymbolTable {
    /// A fresh table pre-seeded with the builtin types at depth 0
    pub fn new() -> Self {
        let mut table = Self {
            symbols: HashMap::new(),
        };
        for name in ["Number", "String", "Boolean", "Array", "Any", "Void"] {
            let name = QualifiedName::simple(name);
            table.symbols.insert(
                name.clone(),
                Symbol {
                    name: name.clone(),
                    kind: SymbolKind::BuiltinType,
                    ty: Type::new(name, Vec::new()),
                    depth: 0,
                },
            );
        }
        table
    }

    /// Declare a symbol. Fails if the name is already live in any scope.
    pub fn add(&mut self, symbol: Symbol) -> Result<(), String> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(format!("'{}' is already defined", symbol.name));
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Drop every symbol declared at `depth` or deeper.
    ///
    /// Names are collected first so the map is not mutated mid-iteration.
    pub fn remove_out_of_scope(&mut self, depth: usize) {
        let dead: Vec<QualifiedName> = self
            .symbols
            .values()
            .filter(|s| s.depth >= depth)
            .map(|s| s.name.clone())
            .collect();
        for name in dead {
            self.symbols.remove(&name);
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(name: &str, ty: Type, depth: usize) -> Symbol {
        Symbol {
            name: QualifiedName::simple(name),
            kind: SymbolKind::Variable,
            ty,
            depth,
        }
    }

    #[test]
    fn test_builtins_are_preseeded() {
        let table = SymbolTable::new();
        for name in ["Number", "String", "Boolean", "Array", "Any", "Void"] {
            let sym = table.get(&QualifiedName::simple(name)).unwrap();
            assert!(matches!(sym.kind, SymbolKind::BuiltinType));
            assert_eq!(sym.depth, 0);
        }
    }

    #[test]
    fn test_no_shadowing_at_any_depth() {
        let mut table = SymbolTable::new();
        table.add(variable("x", Type::number(), 0)).unwrap();
        // Same name at a deeper scope is still a collision
        assert!(table.add(variable("x", Type::string(), 2)).is_err());
    }

    #[test]
    fn test_scope_exit_removes_only_deeper_symbols() {
        let mut table = SymbolTable::new();
        table.add(variable("outer", Type::number(), 1)).unwrap();
        table.add(variable("inner", Type::number(), 2)).unwrap();

        table.remove_out_of_scope(2);
        assert!(table.get(&QualifiedName::simple("inner")).is_none());
        assert!(table.get(&QualifiedName::simple("outer")).is_some());

        // The name is reusable once its symbol is gone
        table.add(variable("inner", Type::string(), 2)).unwrap();
    }
}
