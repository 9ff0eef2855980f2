use crate::ast::{BinOp, Expr, Spanned};
use crate::lexer::TokenKind;
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    /// Expressions are fully parenthesized, so nesting alone decides
    /// precedence: `((1 + 2) * 3)`.
    pub fn parse_expression(&mut self) -> Result<Spanned<Expr>, ParseError> {
        let Some(token) = self.current else {
            return Err(self.unexpected("an expression"));
        };

        match token.kind {
            TokenKind::Number => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.error_at(Some(token), "a valid number literal"))?;
                self.advance();
                Ok((Expr::Number(value), token.span))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok((Expr::Identifier(token.text.clone()), token.span))
            }
            TokenKind::Bracket if token.text == "(" => {
                self.advance();
                let l_value = self.parse_expression()?;

                // `(expr)` groups without adding a node
                if let Some(close) = self.current.filter(|t| t.is(TokenKind::Bracket, ")")) {
                    self.advance();
                    return Ok((l_value.0, token.span.to(close.span)));
                }

                let operator = match self.current {
                    Some(op) if op.kind == TokenKind::Operator => BinOp::from_symbol(&op.text),
                    _ => None,
                };
                let Some(operator) = operator else {
                    return Err(self.unexpected("an operator or ')'"));
                };
                self.advance();

                let r_value = self.parse_expression()?;
                let close = self.expect(TokenKind::Bracket, ")", "to close the expression")?;
                Ok((
                    Expr::BinOp {
                        operator,
                        l_value: Box::new(l_value),
                        r_value: Box::new(r_value),
                    },
                    token.span.to(close.span),
                ))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}
