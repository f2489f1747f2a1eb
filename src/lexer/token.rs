use std::fmt::{self, Display};
use std::str::FromStr;

use strum::EnumIter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "EOF")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    MemId,
    RegId,
    Num,
    Whitespace,
    Comment,
    Reserved(Reserved),
    Punct(Punct),
    Eof,
    Error,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident => write!(f, "[ident]"),
            TokenKind::MemId => write!(f, "[mem-id]"),
            TokenKind::RegId => write!(f, "[reg-id]"),
            TokenKind::Num => write!(f, "[number]"),
            TokenKind::Whitespace => write!(f, "[whitespace]"),
            TokenKind::Comment => write!(f, "[comment]"),
            TokenKind::Reserved(word) => write!(f, "[{}]", word.as_str()),
            TokenKind::Punct(punct) => write!(f, "[{}]", punct.as_str()),
            TokenKind::Eof => write!(f, "[eof]"),
            TokenKind::Error => write!(f, "[error]"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Reserved {
    Mem,
    Reg,
    Func,
    Add,
    Addi,
    Sub,
    La,
    Li,
    Lw,
    Sw,
    Bltz,
    B,
    Nop,
    And,
    Or,
    Not,
    Bne,
}

impl Reserved {
    pub fn as_str(&self) -> &'static str {
        use self::Reserved::*;
        match self {
            Mem => "_mem",
            Reg => "_reg",
            Func => "_func",
            Add => "add",
            Addi => "addi",
            Sub => "sub",
            La => "la",
            Li => "li",
            Lw => "lw",
            Sw => "sw",
            Bltz => "bltz",
            B => "b",
            Nop => "nop",
            And => "and",
            Or => "or",
            Not => "not",
            Bne => "bne",
        }
    }
}

impl FromStr for Reserved {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use self::Reserved::*;
        match s {
            "_mem" => Ok(Mem),
            "_reg" => Ok(Reg),
            "_func" => Ok(Func),
            "add" => Ok(Add),
            "addi" => Ok(Addi),
            "sub" => Ok(Sub),
            "la" => Ok(La),
            "li" => Ok(Li),
            "lw" => Ok(Lw),
            "sw" => Ok(Sw),
            "bltz" => Ok(Bltz),
            "b" => Ok(B),
            "nop" => Ok(Nop),
            "and" => Ok(And),
            "or" => Ok(Or),
            "not" => Ok(Not),
            "bne" => Ok(Bne),
            s => Err(format!("cannot convert {} to Reserved", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Punct {
    Comma,
    LParen,
    RParen,
    Colon,
    Semicolon,
}

impl Punct {
    pub fn as_str(&self) -> &'static str {
        use self::Punct::*;
        match self {
            Comma => ",",
            LParen => "(",
            RParen => ")",
            Colon => ":",
            Semicolon => ";",
        }
    }
}

impl FromStr for Punct {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use self::Punct::*;
        match s {
            "," => Ok(Comma),
            "(" => Ok(LParen),
            ")" => Ok(RParen),
            ":" => Ok(Colon),
            ";" => Ok(Semicolon),
            s => Err(format!("cannot convert {} to Punct", s)),
        }
    }
}
