use crate::ast::{Spanned, Stmt};
use crate::lexer::{Span, TokenKind};
use crate::parser::{ParseError, Parser};

impl Parser<'_> {
    pub fn parse_statement(&mut self) -> Result<Spanned<Stmt>, ParseError> {
        let Some(token) = self.current else {
            return Err(self.unexpected("a statement"));
        };

        match token.kind {
            TokenKind::Keyword => match token.text.as_str() {
                "print" => self.parse_print(),
                "var" => self.parse_declaration(),
                "if" => self.parse_if(),
                "while" => self.parse_while(),
                "for" => self.parse_for(),
                _ => Err(self.unexpected("a statement")),
            },
            TokenKind::Identifier => {
                // `x = ...` is the only statement starting with an identifier
                if !self.next.is_some_and(|t| t.kind == TokenKind::Assignment) {
                    return Err(self.error_at(
                        self.next,
                        &format!("'=' after '{}' in an assignment", token.text),
                    ));
                }
                let (stmt, span) = self.parse_assignment()?;
                let semi = self.expect(TokenKind::Separator, ";", "after assignment")?;
                Ok((stmt, span.to(semi.span)))
            }
            _ => Err(self.unexpected("a statement")),
        }
    }

    fn parse_print(&mut self) -> Result<Spanned<Stmt>, ParseError> {
        let keyword = self.expect(TokenKind::Keyword, "print", "to start a print statement")?;
        let expression = self.parse_expression()?;
        let semi = self.expect(TokenKind::Separator, ";", "after print statement")?;
        Ok((Stmt::Print { expression }, keyword.span.to(semi.span)))
    }

    fn parse_declaration(&mut self) -> Result<Spanned<Stmt>, ParseError> {
        let keyword = self.expect(TokenKind::Keyword, "var", "to start a declaration")?;
        let name = self.expect_kind(TokenKind::Identifier, "a variable name after 'var'")?;
        self.expect(TokenKind::Assignment, "=", "after the declared name")?;
        let initializer = self.parse_expression()?;
        let semi = self.expect(TokenKind::Separator, ";", "after declaration")?;
        Ok((
            Stmt::VariableDeclaration {
                name: (name.text.clone(), name.span),
                initializer,
            },
            keyword.span.to(semi.span),
        ))
    }

    /// `identifier = expression`, without the trailing `;`.
    fn parse_assignment(&mut self) -> Result<Spanned<Stmt>, ParseError> {
        let name = self.expect_kind(TokenKind::Identifier, "a variable name to assign to")?;
        self.expect(TokenKind::Assignment, "=", "in assignment")?;
        let value = self.parse_expression()?;
        let span = name.span.to(value.1);
        Ok((
            Stmt::VariableAssignment {
                name: (name.text.clone(), name.span),
                value,
            },
            span,
        ))
    }

    fn parse_block(&mut self, owner: &str) -> Result<(Vec<Spanned<Stmt>>, Span), ParseError> {
        self.expect(TokenKind::Bracket, "{", &format!("to open the '{}' body", owner))?;
        let mut body = vec![];
        loop {
            if self.current.is_none() {
                return Err(self.unexpected(&format!("'}}' to close the '{}' body", owner)));
            }
            if let Some(close) = self.current.filter(|t| t.is(TokenKind::Bracket, "}")) {
                self.advance();
                return Ok((body, close.span));
            }
            body.push(self.parse_statement()?);
        }
    }

    fn parse_if(&mut self) -> Result<Spanned<Stmt>, ParseError> {
        let keyword = self.expect(TokenKind::Keyword, "if", "to start an if statement")?;
        let condition = self.parse_expression()?;
        let (body, close) = self.parse_block("if")?;
        Ok((Stmt::If { condition, body }, keyword.span.to(close)))
    }

    fn parse_while(&mut self) -> Result<Spanned<Stmt>, ParseError> {
        let keyword = self.expect(TokenKind::Keyword, "while", "to start a while loop")?;
        let condition = self.parse_expression()?;
        let (body, close) = self.parse_block("while")?;
        Ok((Stmt::While { condition, body }, keyword.span.to(close)))
    }

    fn parse_for(&mut self) -> Result<Spanned<Stmt>, ParseError> {
        let keyword = self.expect(TokenKind::Keyword, "for", "to start a for loop")?;
        self.expect(TokenKind::Bracket, "(", "after 'for'")?;

        let initializer = self.parse_statement()?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Separator, ";", "after the loop condition")?;

        if !self.current.is_some_and(|t| t.kind == TokenKind::Identifier) {
            return Err(self.unexpected("an assignment as the loop increment"));
        }
        let increment = self.parse_assignment()?;
        self.expect(TokenKind::Bracket, ")", "to close the loop header")?;

        let (body, close) = self.parse_block("for")?;
        Ok((
            Stmt::For {
                initializer: Box::new(initializer),
                condition,
                increment: Box::new(increment),
                body,
            },
            keyword.span.to(close),
        ))
    }
}
