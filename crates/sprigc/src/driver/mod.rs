//! Compilation driver and pipeline orchestration

use crate::codegen;
use crate::common::CompileResult;
use crate::parser::Parser;
use crate::sema::Analyzer;

/// Compile a source string all the way to script text.
///
/// Parse, verify, emit; the first failing stage aborts the run with its
/// error.
pub fn compile(source: &str) -> CompileResult<String> {
    let program = Parser::new(source).parse_program()?;
    Analyzer::new().verify(&program)?;
    Ok(codegen::emit(&program))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::CompileError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_end_to_end() {
        let source = "\
# Count to three
func shout(n: Number): Void {
    js.console.log(n);
}

foreach (var n; 1..4;) shout(n);
";
        let js = compile(source).unwrap();
        assert_eq!(
            js,
            "function shout(n){console.log(n);}\n\
             var $l=[...new Array((4)-(1)).keys()].map(function($x){return $x+(1)});\
             for(var $i=0,n=$l[0];$i<$l.length;$i++,n=$l[$i])shout(n);\n"
        );
    }

    #[test]
    fn test_each_stage_reports_its_own_error() {
        assert!(matches!(compile("var x = @;"), Err(CompileError::Lexer { .. })));
        assert!(matches!(compile("var = 1;"), Err(CompileError::Parser { .. })));
        assert!(matches!(compile("x = 1;"), Err(CompileError::Semantic { .. })));
    }
}
