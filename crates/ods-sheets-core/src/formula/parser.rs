//! OpenFormula text to tokens
//!
//! A hand-written scanner for the arithmetic subset that [`Formula`]
//! models. It never fails: text it cannot tokenize yields a formula with
//! an error message and the original text preserved.

use super::{address, CellRef, Formula, Op, SheetNames, Token};
use crate::sheet::SheetId;

/// Parse `table:formula` text such as `of:=[.A1]+[$Sheet2.B3]*2`
///
/// Accepts the `of:` namespace prefix and a leading `=`, numbers, cell
/// references (`[.A1]`, `[$A$1]`, `[Sheet2.A1]`, `[$'My sheet'.A1]`), the
/// operators `+ - * / ^`, parentheses and whitespace.
pub fn parse(text: &str, owner: SheetId, names: &impl SheetNames) -> Formula {
    let mut scanner = Scanner::new(text, owner, names);
    match scanner.run() {
        Ok(tokens) => Formula::from_tokens(tokens),
        Err(msg) => {
            log::warn!("unsupported formula '{}': {}", text, msg);
            Formula::unsupported(text, msg)
        }
    }
}

struct Scanner<'a, N> {
    input: &'a str,
    pos: usize,
    owner: SheetId,
    names: &'a N,
    tokens: Vec<Token>,
    depth: i32,
}

impl<'a, N: SheetNames> Scanner<'a, N> {
    fn new(input: &'a str, owner: SheetId, names: &'a N) -> Self {
        Self {
            input,
            pos: 0,
            owner,
            names,
            tokens: Vec::new(),
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn strip_prefix(&mut self) -> Result<(), String> {
        self.skip_whitespace();
        let rest = self.rest();
        if let Some(colon) = rest.find(':') {
            let ns = &rest[..colon];
            if !ns.is_empty() && ns.chars().all(|c| c.is_ascii_alphanumeric()) {
                if ns != "of" {
                    return Err(format!("unsupported formula namespace '{}'", ns));
                }
                self.pos += colon + 1;
            }
        }
        self.skip_whitespace();
        if self.peek() == Some('=') {
            self.bump();
        }
        Ok(())
    }

    /// A '-' or '+' here is a sign, not a binary operator
    fn expects_operand(&self) -> bool {
        matches!(self.tokens.last(), None | Some(Token::Op(_)) | Some(Token::Open))
    }

    fn run(&mut self) -> Result<Vec<Token>, String> {
        self.strip_prefix()?;
        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else { break };
            match c {
                '0'..='9' | '.' => {
                    let n = self.number()?;
                    self.tokens.push(Token::Number(n));
                }
                '-' | '+'
                    if self.expects_operand()
                        && matches!(self.rest()[1..].chars().next(), Some('0'..='9' | '.')) =>
                {
                    self.bump();
                    let n = self.number()?;
                    self.tokens
                        .push(Token::Number(if c == '-' { -n } else { n }));
                }
                '[' => {
                    let r = self.reference()?;
                    self.tokens.push(Token::CellRef(r));
                }
                '(' => {
                    self.bump();
                    self.depth += 1;
                    self.tokens.push(Token::Open);
                }
                ')' => {
                    self.bump();
                    self.depth -= 1;
                    if self.depth < 0 {
                        return Err("unbalanced ')'".into());
                    }
                    self.tokens.push(Token::Close);
                }
                '+' | '-' | '*' | '/' | '^' => {
                    self.bump();
                    if self.expects_operand() {
                        return Err(format!("unary '{}' is not supported", c));
                    }
                    if let Some(op) = Op::from_symbol(c) {
                        self.tokens.push(Token::Op(op));
                    }
                }
                '"' => return Err("string literals are not supported".into()),
                '<' | '>' | '=' => return Err(format!("comparison operator '{}' is not supported", c)),
                '&' => return Err("text concatenation is not supported".into()),
                ';' | ',' => return Err("argument lists are not supported".into()),
                '%' => return Err("percent operator is not supported".into()),
                c if c.is_alphabetic() || c == '_' => {
                    let name: String = self
                        .rest()
                        .chars()
                        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '.')
                        .collect();
                    return Err(format!("function or name '{}' is not supported", name));
                }
                other => return Err(format!("unexpected character '{}'", other)),
            }
        }
        if self.depth != 0 {
            return Err("unbalanced '('".into());
        }
        if self.tokens.is_empty() {
            return Err("empty formula".into());
        }
        Ok(std::mem::take(&mut self.tokens))
    }

    fn number(&mut self) -> Result<f64, String> {
        let start = self.pos;
        while matches!(self.peek(), Some('0'..='9' | '.')) {
            self.bump();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let save = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if matches!(self.peek(), Some('0'..='9')) {
                while matches!(self.peek(), Some('0'..='9')) {
                    self.bump();
                }
            } else {
                self.pos = save;
            }
        }
        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map_err(|_| format!("invalid number '{}'", text))
    }

    fn reference(&mut self) -> Result<CellRef, String> {
        self.bump(); // '['
        let body_start = self.pos;
        let mut in_quote = false;
        loop {
            match self.bump() {
                None => return Err("unterminated cell reference".into()),
                Some('\'') => in_quote = !in_quote,
                Some(']') if !in_quote => break,
                Some(_) => {}
            }
        }
        let body = &self.input[body_start..self.pos - 1];
        self.resolve_reference(body)
    }

    fn resolve_reference(&self, body: &str) -> Result<CellRef, String> {
        let (sheet, cell) = split_reference(body)?;
        if cell.contains(':') {
            return Err(format!("cell ranges are not supported: [{}]", body));
        }
        let (row, col) = address::parse_cell_name(cell)
            .ok_or_else(|| format!("invalid cell reference [{}]", body))?;
        let mut r = CellRef::new(row, col);
        if let Some(name) = sheet {
            let id = self
                .names
                .sheet_id(&name)
                .ok_or_else(|| format!("unknown sheet '{}'", name))?;
            if id != self.owner {
                r = r.on(id);
            }
        }
        Ok(r)
    }
}

/// Split a reference body into an optional sheet name and the cell part
fn split_reference(body: &str) -> Result<(Option<String>, &str), String> {
    if body.contains(':') {
        return Err(format!("cell ranges are not supported: [{}]", body));
    }
    let rest = body.strip_prefix('$').unwrap_or(body);
    if let Some(quoted) = rest.strip_prefix('\'') {
        let mut name = String::new();
        let mut chars = quoted.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if matches!(chars.peek(), Some((_, '\''))) {
                    chars.next();
                    name.push('\'');
                    continue;
                }
                let after = &quoted[i + 1..];
                let cell = after
                    .strip_prefix('.')
                    .ok_or_else(|| format!("invalid cell reference [{}]", body))?;
                return Ok((Some(name), cell));
            }
            name.push(c);
        }
        return Err(format!("unterminated sheet name in [{}]", body));
    }
    match body.rfind('.') {
        Some(0) => Ok((None, &body[1..])),
        Some(dot) => {
            let sheet = &body[..dot];
            let sheet = sheet.strip_prefix('$').unwrap_or(sheet);
            Ok((Some(sheet.to_string()), &body[dot + 1..]))
        }
        None => Ok((None, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{Grouping, SheetDirectory};

    fn dir() -> (SheetDirectory, SheetId, SheetId) {
        let one = SheetId::new(0);
        let two = SheetId::new(1);
        let mut d = SheetDirectory::new();
        d.insert(one, "Sheet1");
        d.insert(two, "My 'Data'");
        (d, one, two)
    }

    #[test]
    fn test_parse_arithmetic() {
        let (d, one, _) = dir();
        let f = parse("of:=([.A1]+[.A2])*15", one, &d);
        assert!(!f.has_error(), "{:?}", f.error());
        let mut expected = Formula::new();
        expected
            .add(Grouping::Open)
            .add(CellRef::new(0, 0))
            .add(Op::Add)
            .add(CellRef::new(1, 0))
            .add(Grouping::Close)
            .add(Op::Multiply)
            .add(15);
        assert_eq!(f.tokens(), expected.tokens());
        assert_eq!(f.to_odf(one, &d).unwrap(), "of:=([.A1]+[.A2])*15");
    }

    #[test]
    fn test_parse_reference_forms() {
        let (d, one, two) = dir();
        let f = parse("=[$A$1] + [Sheet1.B2] - [$'My ''Data'''.$C$3]", one, &d);
        assert!(!f.has_error(), "{:?}", f.error());
        assert_eq!(
            f.tokens(),
            &[
                Token::CellRef(CellRef::new(0, 0)),
                Token::Op(Op::Add),
                Token::CellRef(CellRef::new(1, 1)),
                Token::Op(Op::Subtract),
                Token::CellRef(CellRef::new(2, 2).on(two)),
            ]
        );
        assert_eq!(
            f.to_odf(one, &d).unwrap(),
            "of:=[.A1]+[.B2]-[$'My ''Data'''.C3]"
        );
    }

    #[test]
    fn test_parse_numbers() {
        let (d, one, _) = dir();
        let f = parse("of:=-1.5e2^.5/(-2)", one, &d);
        assert!(!f.has_error(), "{:?}", f.error());
        assert_eq!(f.tokens()[0], Token::Number(-150.0));
        assert_eq!(f.tokens()[2], Token::Number(0.5));
        assert_eq!(f.tokens()[5], Token::Number(-2.0));
    }

    #[test]
    fn test_unsupported_constructs() {
        let (d, one, _) = dir();
        for text in [
            "of:=SUM([.A1:.A3])",
            "of:=[.A1:.B2]",
            "of:=\"abc\"",
            "of:=[.A1]>2",
            "of:=[.A1]&[.A2]",
            "of:=[Nowhere.A1]",
            "msoxl:=A1+1",
            "of:=([.A1]+1",
            "of:=",
            "of:=-[.A1]",
        ] {
            let f = parse(text, one, &d);
            assert!(f.has_error(), "expected error for {}", text);
            assert!(!f.error().unwrap().is_empty());
            assert_eq!(f.source(), Some(text));
            assert!(f.value().is_unset());
        }
    }

    #[test]
    fn test_unsupported_renders_source() {
        let (d, one, _) = dir();
        let f = parse("of:=SUM([.A1:.A3])", one, &d);
        assert_eq!(f.to_odf(one, &d).unwrap(), "of:=SUM([.A1:.A3])");
    }
}
