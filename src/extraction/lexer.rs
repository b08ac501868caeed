//! Tokenizer for Go source with automatic semicolon insertion.
//!
//! Only the tokens that matter for declarations are distinguished. Operators
//! that can only appear inside expressions and function bodies collapse into
//! [`Tok::Op`]; the extractor skips those regions by bracket balancing.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\x0C]+")]
#[logos(skip r"//[^\n\r]*")]
enum RawTok {
    #[regex(r"\r\n|\n|\r")]
    Newline,

    // Kept so that a comment spanning lines still ends a statement.
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"[_\p{XID_Start}][_\p{XID_Continue}]*")]
    Ident,

    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?")]
    Number,

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"'([^'\\\n\r]|\\.)+'")]
    Rune,

    #[token("...")]
    Ellipsis,
    #[token("<-")]
    Arrow,
    #[token("*")]
    Star,
    #[token("=")]
    Assign,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,

    // `++` and `--` end a statement like an identifier does.
    #[token("++")]
    #[token("--")]
    IncDec,

    #[regex(r"[-+/%&^<>!:]")]
    Op,
}

/// Token kinds seen by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok {
    Ident,
    Number,
    String,
    RawString,
    Rune,

    KwPackage,
    KwImport,
    KwType,
    KwFunc,
    KwInterface,
    KwStruct,
    KwMap,
    KwChan,
    KwVar,
    KwConst,

    Ellipsis,
    Arrow,
    Star,
    Assign,
    Tilde,
    Pipe,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Dot,
    Op,
}

impl Tok {
    /// Go inserts a semicolon when a line ends after one of these.
    fn ends_statement(self) -> bool {
        matches!(
            self,
            Tok::Ident
                | Tok::Number
                | Tok::String
                | Tok::RawString
                | Tok::Rune
                | Tok::RParen
                | Tok::RBrack
                | Tok::RBrace
        )
    }

    fn describe(self) -> &'static str {
        match self {
            Tok::Ident => "identifier",
            Tok::Number => "number",
            Tok::String | Tok::RawString => "string literal",
            Tok::Rune => "rune literal",
            Tok::KwPackage => "'package'",
            Tok::KwImport => "'import'",
            Tok::KwType => "'type'",
            Tok::KwFunc => "'func'",
            Tok::KwInterface => "'interface'",
            Tok::KwStruct => "'struct'",
            Tok::KwMap => "'map'",
            Tok::KwChan => "'chan'",
            Tok::KwVar => "'var'",
            Tok::KwConst => "'const'",
            Tok::Ellipsis => "'...'",
            Tok::Arrow => "'<-'",
            Tok::Star => "'*'",
            Tok::Assign => "'='",
            Tok::Tilde => "'~'",
            Tok::Pipe => "'|'",
            Tok::LParen => "'('",
            Tok::RParen => "')'",
            Tok::LBrack => "'['",
            Tok::RBrack => "']'",
            Tok::LBrace => "'{'",
            Tok::RBrace => "'}'",
            Tok::Comma => "','",
            Tok::Semi => "';' or newline",
            Tok::Dot => "'.'",
            Tok::Op => "operator",
        }
    }
}

impl std::fmt::Display for Tok {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub tok: Tok,
    pub span: Range<usize>,
}

/// A character sequence that is not valid Go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub text: String,
}

fn keyword(ident: &str) -> Tok {
    match ident {
        "package" => Tok::KwPackage,
        "import" => Tok::KwImport,
        "type" => Tok::KwType,
        "func" => Tok::KwFunc,
        "interface" => Tok::KwInterface,
        "struct" => Tok::KwStruct,
        "map" => Tok::KwMap,
        "chan" => Tok::KwChan,
        "var" => Tok::KwVar,
        "const" => Tok::KwConst,
        _ => Tok::Ident,
    }
}

/// Splits `source` into tokens, inserting the implicit semicolons.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = RawTok::lexer(source);
    let mut tokens: Vec<Token> = Vec::new();
    let mut can_end = false;

    while let Some(raw) = lexer.next() {
        let span = lexer.span();
        let raw = raw.map_err(|_| LexError {
            offset: span.start,
            text: lexer.slice().to_string(),
        })?;

        let tok = match raw {
            RawTok::Newline => {
                insert_semi(&mut tokens, &mut can_end, span.start);
                continue;
            }
            RawTok::BlockComment => {
                if lexer.slice().contains(['\n', '\r']) {
                    insert_semi(&mut tokens, &mut can_end, span.start);
                }
                continue;
            }
            RawTok::IncDec => {
                tokens.push(Token { tok: Tok::Op, span });
                can_end = true;
                continue;
            }
            RawTok::Ident => keyword(lexer.slice()),
            RawTok::Number => Tok::Number,
            RawTok::String => Tok::String,
            RawTok::RawString => Tok::RawString,
            RawTok::Rune => Tok::Rune,
            RawTok::Ellipsis => Tok::Ellipsis,
            RawTok::Arrow => Tok::Arrow,
            RawTok::Star => Tok::Star,
            RawTok::Assign => Tok::Assign,
            RawTok::Tilde => Tok::Tilde,
            RawTok::Pipe => Tok::Pipe,
            RawTok::LParen => Tok::LParen,
            RawTok::RParen => Tok::RParen,
            RawTok::LBrack => Tok::LBrack,
            RawTok::RBrack => Tok::RBrack,
            RawTok::LBrace => Tok::LBrace,
            RawTok::RBrace => Tok::RBrace,
            RawTok::Comma => Tok::Comma,
            RawTok::Semi => Tok::Semi,
            RawTok::Dot => Tok::Dot,
            RawTok::Op => Tok::Op,
        };
        can_end = tok.ends_statement();
        tokens.push(Token { tok, span });
    }
    insert_semi(&mut tokens, &mut can_end, source.len());

    Ok(tokens)
}

fn insert_semi(tokens: &mut Vec<Token>, can_end: &mut bool, at: usize) {
    if *can_end {
        tokens.push(Token {
            tok: Tok::Semi,
            span: at..at,
        });
        *can_end = false;
    }
}

/// 1-based line and column of a byte offset.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
