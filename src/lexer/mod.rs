use logos::Logos;
use thiserror::Error;
use tracing::{debug, trace};

use std::fmt::{self, Display, Formatter};


/// A region of source text. `line` and `column` are 0-based and describe `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Joins `self` with a later span, keeping the position of `self`.
    pub fn to(self, end: Span) -> Span {
        Span {
            end: end.end,
            ..self
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Whitespace,
    Number,
    Keyword,
    Operator,
    Identifier,
    Assignment,
    Bracket,
    Separator,
}

impl TokenKind {
    /// Matchers in the order they are tried. The first one matching wins,
    /// so keywords have to come before identifiers and operators before `=`.
    pub const MATCH_ORDER: [TokenKind; 9] = [
        TokenKind::Comment,
        TokenKind::Whitespace,
        TokenKind::Number,
        TokenKind::Keyword,
        TokenKind::Operator,
        TokenKind::Identifier,
        TokenKind::Assignment,
        TokenKind::Bracket,
        TokenKind::Separator,
    ];

    /// Tokens of these kinds are recognized but never emitted.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Whitespace)
    }

    /// Length of the prefix of `rest` this class matches, if any.
    /// `after_operand` is true when the previous token could end an operand.
    fn match_prefix(self, rest: &str, after_operand: bool) -> Option<usize> {
        match self {
            TokenKind::Comment => prefix_len::<CommentLexeme>(rest),
            TokenKind::Whitespace => prefix_len::<WhitespaceLexeme>(rest),
            TokenKind::Number => {
                // `x-1` is a subtraction, not `x` followed by `-1`
                if after_operand && rest.starts_with('-') {
                    return None;
                }
                prefix_len::<NumberLexeme>(rest)
            }
            TokenKind::Keyword => prefix_len::<KeywordLexeme>(rest)
                .filter(|&len| !rest[len..].starts_with(is_ident_char)),
            TokenKind::Operator => prefix_len::<OperatorLexeme>(rest),
            TokenKind::Identifier => prefix_len::<IdentifierLexeme>(rest),
            TokenKind::Assignment => prefix_len::<AssignmentLexeme>(rest),
            TokenKind::Bracket => prefix_len::<BracketLexeme>(rest),
            TokenKind::Separator => prefix_len::<SeparatorLexeme>(rest),
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Number => "number",
            TokenKind::Keyword => "keyword",
            TokenKind::Operator => "operator",
            TokenKind::Identifier => "identifier",
            TokenKind::Assignment => "assignment",
            TokenKind::Bracket => "bracket",
            TokenKind::Separator => "separator",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    fn ends_operand(&self) -> bool {
        match self.kind {
            TokenKind::Number | TokenKind::Identifier => true,
            TokenKind::Bracket => self.text == ")",
            _ => false,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.text, self.span)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unexpected character '{character}' at {line}:{column}")]
pub struct LexError {
    pub character: char,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl LexError {
    pub fn span(&self) -> Span {
        Span {
            start: self.offset,
            end: self.offset + self.character.len_utf8(),
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Logos, Debug, PartialEq)]
enum CommentLexeme {
    #[regex(r"//[^\n]*")]
    Line,
}

#[derive(Logos, Debug, PartialEq)]
enum WhitespaceLexeme {
    #[regex(r"[ \t\r\n\f]+")]
    Run,
}

#[derive(Logos, Debug, PartialEq)]
enum NumberLexeme {
    #[regex(r"-?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][+-]?[0-9]+)?")]
    Number,
}

#[derive(Logos, Debug, PartialEq)]
enum KeywordLexeme {
    #[token("print")]
    Print,

    #[token("var")]
    Var,

    #[token("if")]
    If,

    #[token("while")]
    While,

    #[token("for")]
    For,
}

#[derive(Logos, Debug, PartialEq)]
enum OperatorLexeme {
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("==")]
    Eq,

    #[token(">")]
    Greater,

    #[token("<")]
    Less,

    #[token("&&")]
    And,
}

#[derive(Logos, Debug, PartialEq)]
enum IdentifierLexeme {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
}

#[derive(Logos, Debug, PartialEq)]
enum AssignmentLexeme {
    #[token("=")]
    Assign,
}

#[derive(Logos, Debug, PartialEq)]
enum BracketLexeme {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,
}

#[derive(Logos, Debug, PartialEq)]
enum SeparatorLexeme {
    #[token(";")]
    Semicolon,
}

fn prefix_len<'s, T>(rest: &'s str) -> Option<usize>
where
    T: Logos<'s, Source = str>,
    T::Extras: Default,
{
    let mut lex = T::lexer(rest);
    match lex.next() {
        Some(Ok(_)) if lex.span().start == 0 => Some(lex.span().end),
        _ => None,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens: Vec<Token> = vec![];
    let mut offset = 0;
    let mut line = 0;
    let mut line_start = 0;

    while offset < source.len() {
        let rest = &source[offset..];
        let after_operand = tokens.last().is_some_and(Token::ends_operand);

        let Some((kind, len)) = TokenKind::MATCH_ORDER
            .iter()
            .find_map(|&kind| Some((kind, kind.match_prefix(rest, after_operand)?)))
        else {
            return Err(LexError {
                character: rest.chars().next().unwrap_or_default(),
                offset,
                line,
                column: offset - line_start,
            });
        };

        let text = &rest[..len];
        if !kind.is_trivia() {
            let span = Span {
                start: offset,
                end: offset + len,
                line,
                column: offset - line_start,
            };
            trace!(%kind, text, %span, "token");
            tokens.push(Token {
                kind,
                text: text.to_string(),
                span,
            });
        }

        for (i, c) in text.char_indices() {
            if c == '\n' {
                line += 1;
                line_start = offset + i + 1;
            }
        }
        offset += len;
    }

    debug!(count = tokens.len(), "lexed source");
    Ok(tokens)
}
