//! Stand-alone expression fragments
//!
//! Attribute values (`args={{ ... }}`) and story bodies (`{Template.bind({})}`)
//! are expressions outside any statement. They are validated by parsing
//! them as a parenthesised expression statement.

use super::swc::{module_of, parse_module};
use crate::config::ScriptDialect;
use crate::diagnostics::{StoryweldError, StoryweldResult};
use deno_ast::swc::ast as swc_ast;

/// A parsed expression and the source text it came from
#[derive(Debug, Clone)]
pub struct ParsedExpression {
    source: String,
    expr: Box<swc_ast::Expr>,
}

impl ParsedExpression {
    /// Source text, trimmed
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The expression AST
    pub fn expr(&self) -> &swc_ast::Expr {
        &self.expr
    }

    /// Whether the expression is `<reference>.bind(...)`, a function
    /// reference that can be used as a render function directly
    pub fn is_bound_function(&self) -> bool {
        let swc_ast::Expr::Call(call) = &*self.expr else {
            return false;
        };
        let swc_ast::Callee::Expr(callee) = &call.callee else {
            return false;
        };
        let swc_ast::Expr::Member(member) = &**callee else {
            return false;
        };
        matches!(&member.prop, swc_ast::MemberProp::Ident(prop) if &*prop.sym == "bind")
            && is_reference(&member.obj)
    }

    /// Whether the expression is an object literal, which needs parentheses
    /// as the body of an arrow function
    pub fn is_object_literal(&self) -> bool {
        matches!(&*self.expr, swc_ast::Expr::Object(_))
    }

    /// Arrow function with no parameters returning this expression
    pub fn to_thunk(&self) -> String {
        if self.is_object_literal() {
            format!("() => ({})", self.source)
        } else {
            format!("() => {}", self.source)
        }
    }
}

/// `a`, `a.b.c` or `this.a`
fn is_reference(expr: &swc_ast::Expr) -> bool {
    match expr {
        swc_ast::Expr::Ident(_) | swc_ast::Expr::This(_) => true,
        swc_ast::Expr::Member(member) => {
            matches!(member.prop, swc_ast::MemberProp::Ident(_)) && is_reference(&member.obj)
        }
        _ => false,
    }
}

/// Parse a single expression
///
/// Fails when the text is empty, is not an expression, or holds more than
/// one statement.
pub fn parse_expression(
    text: &str,
    dialect: ScriptDialect,
    context: &str,
) -> StoryweldResult<ParsedExpression> {
    let source = text.trim();
    if source.is_empty() {
        return Err(StoryweldError::script_parse(context, "empty expression"));
    }

    let wrapped = format!("(\n{}\n);", source);
    let parsed = parse_module(&wrapped, dialect.media_type(), context)?;
    let module = module_of(&parsed, context)?;

    let expr = match module.body.as_slice() {
        [swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Expr(stmt))] => match &*stmt.expr {
            swc_ast::Expr::Paren(paren) => paren.expr.clone(),
            other => Box::new(other.clone()),
        },
        _ => {
            return Err(StoryweldError::script_parse(
                context,
                format!("`{}` is not a single expression", source),
            ))
        }
    };

    Ok(ParsedExpression {
        source: source.to_string(),
        expr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedExpression {
        parse_expression(text, ScriptDialect::Tsx, "test").unwrap()
    }

    #[test]
    fn test_bound_function() {
        assert!(parse("Template.bind({})").is_bound_function());
        assert!(parse("stories.Template.bind(null, 1)").is_bound_function());
        assert!(!parse("Template({})").is_bound_function());
        assert!(!parse("make().bind({})").is_bound_function());
        assert!(!parse("() => Template.bind({})").is_bound_function());
    }

    #[test]
    fn test_thunk() {
        assert_eq!(parse("<Button />").to_thunk(), "() => <Button />");
        assert_eq!(parse("{ a: 1 }").to_thunk(), "() => ({ a: 1 })");
        assert_eq!(parse("  2 + 1 ").source(), "2 + 1");
    }

    #[test]
    fn test_object_with_spread() {
        let expr = parse("{\n    ...args,\n    label: 'Unchecked',\n  }");
        assert!(expr.is_object_literal());
        let swc_ast::Expr::Object(object) = expr.expr() else {
            panic!("expected object literal");
        };
        assert!(matches!(object.props[0], swc_ast::PropOrSpread::Spread(_)));
    }

    #[test]
    fn test_rejects_non_expressions() {
        assert!(parse_expression("", ScriptDialect::Tsx, "test").is_err());
        assert!(parse_expression("a); b(", ScriptDialect::Tsx, "test").is_err());
        assert!(parse_expression("const a = 1", ScriptDialect::Tsx, "test").is_err());
    }

    #[test]
    fn test_jsx_needs_jsx_dialect() {
        assert!(parse_expression("<Button />", ScriptDialect::Ts, "test").is_err());
        assert!(parse_expression("<Button />", ScriptDialect::Jsx, "test").is_ok());
    }
}
