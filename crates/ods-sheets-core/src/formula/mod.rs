//! Arithmetic formulas over cell references
//!
//! A [`Formula`] is a flat list of [`Token`]s: numbers, cell references,
//! the five arithmetic operators and parentheses. It renders to the
//! OpenFormula text stored in `table:formula` and can be parsed back from
//! it. Anything outside that small language (functions, ranges, strings,
//! comparisons) is not rejected; the parsed formula carries an error
//! message instead so reading a document never fails because of it.

pub mod address;
mod parser;

use crate::error::{Error, Result};
use crate::sheet::SheetId;
use crate::value::Value;
use std::fmt;

pub use parser::parse;

/// Prefix of OpenFormula expressions in `table:formula`
pub const ODF_PREFIX: &str = "of:=";

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Op {
    pub fn symbol(&self) -> char {
        match self {
            Op::Add => '+',
            Op::Subtract => '-',
            Op::Multiply => '*',
            Op::Divide => '/',
            Op::Power => '^',
        }
    }

    pub fn from_symbol(c: char) -> Option<Op> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Subtract),
            '*' => Some(Op::Multiply),
            '/' => Some(Op::Divide),
            '^' => Some(Op::Power),
            _ => None,
        }
    }
}

/// Parenthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grouping {
    Open,
    Close,
}

/// Reference to a cell, optionally on another sheet
///
/// `sheet: None` means the sheet of the cell that owns the formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub sheet: Option<SheetId>,
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    /// Reference to (row, col) on the formula's own sheet
    pub const fn new(row: u32, col: u32) -> Self {
        Self {
            sheet: None,
            row,
            col,
        }
    }

    /// Same cell, on the given sheet
    pub const fn on(self, sheet: SheetId) -> Self {
        Self {
            sheet: Some(sheet),
            row: self.row,
            col: self.col,
        }
    }

    /// `A1`-style name without any sheet
    pub fn cell_name(&self) -> String {
        address::cell_name(self.row, self.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cell_name())
    }
}

/// One element of a formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    CellRef(CellRef),
    Op(Op),
    Open,
    Close,
}

impl From<f64> for Token {
    fn from(n: f64) -> Self {
        Token::Number(n)
    }
}

impl From<i32> for Token {
    fn from(n: i32) -> Self {
        Token::Number(n as f64)
    }
}

impl From<Op> for Token {
    fn from(op: Op) -> Self {
        Token::Op(op)
    }
}

impl From<Grouping> for Token {
    fn from(g: Grouping) -> Self {
        match g {
            Grouping::Open => Token::Open,
            Grouping::Close => Token::Close,
        }
    }
}

impl From<CellRef> for Token {
    fn from(r: CellRef) -> Self {
        Token::CellRef(r)
    }
}

/// Name lookup for the sheets of a book
pub trait SheetNames {
    fn sheet_name(&self, id: SheetId) -> Option<&str>;
    fn sheet_id(&self, name: &str) -> Option<SheetId>;
}

/// Owned snapshot of sheet ids and names
///
/// Useful when a book is being mutated while formulas referring to its
/// sheets are parsed.
#[derive(Debug, Clone, Default)]
pub struct SheetDirectory {
    entries: Vec<(SheetId, String)>,
}

impl SheetDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, id: SheetId, name: S) {
        self.entries.push((id, name.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SheetNames for SheetDirectory {
    fn sheet_name(&self, id: SheetId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, n)| n.as_str())
    }

    fn sheet_id(&self, name: &str) -> Option<SheetId> {
        self.entries.iter().find(|(_, n)| n == name).map(|(i, _)| *i)
    }
}

/// A formula with its cached result
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Formula {
    tokens: Vec<Token>,
    value: Value,
    error: Option<String>,
    /// Text the formula was parsed from when it could not be tokenized
    source: Option<String>,
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `table:formula` text; see [`parse`]
    pub fn parse(text: &str, owner: SheetId, names: &impl SheetNames) -> Formula {
        parser::parse(text, owner, names)
    }

    /// Formula that could not be tokenized, keeping its source text
    pub(crate) fn unsupported(source: &str, error: String) -> Formula {
        Formula {
            tokens: Vec::new(),
            value: Value::Unset,
            error: Some(error),
            source: Some(source.to_string()),
        }
    }

    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Formula {
        Formula {
            tokens,
            ..Default::default()
        }
    }

    /// Append a token
    pub fn add<T: Into<Token>>(&mut self, token: T) -> &mut Self {
        self.tokens.push(token.into());
        self
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.source.is_none()
    }

    /// Cached result, as read from the document or set by the caller
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value<V: Into<Value>>(&mut self, value: V) -> &mut Self {
        self.value = value.into();
        self
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error<S: Into<String>>(&mut self, error: S) -> &mut Self {
        self.error = Some(error.into());
        self
    }

    /// Original text of a formula that could not be tokenized
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Render as OpenFormula text, e.g. `of:=([.A1]+[.A2])*15`
    ///
    /// `owner` is the sheet of the cell holding the formula: references to
    /// it are written without a sheet name. A formula that could not be
    /// tokenized when read renders its original text unchanged.
    pub fn to_odf(&self, owner: SheetId, names: &impl SheetNames) -> Result<String> {
        if let Some(source) = &self.source {
            if self.tokens.is_empty() {
                return Ok(source.clone());
            }
        }

        let mut out = String::from(ODF_PREFIX);
        for token in &self.tokens {
            match token {
                Token::Number(n) => {
                    if !n.is_finite() {
                        return Err(Error::other(format!("non-finite number {} in formula", n)));
                    }
                    out.push_str(&n.to_string());
                }
                Token::CellRef(r) => {
                    out.push('[');
                    match r.sheet {
                        Some(sheet) if sheet != owner => {
                            let name = names.sheet_name(sheet).ok_or_else(|| {
                                Error::NotFound(format!("sheet #{} referenced by formula", sheet))
                            })?;
                            out.push('$');
                            out.push_str(&quote_sheet_name(name));
                        }
                        _ => {}
                    }
                    out.push('.');
                    out.push_str(&r.cell_name());
                    out.push(']');
                }
                Token::Op(op) => out.push(op.symbol()),
                Token::Open => out.push('('),
                Token::Close => out.push(')'),
            }
        }
        Ok(out)
    }
}

/// Sheet name as it appears in a reference, quoted when needed
pub fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}
