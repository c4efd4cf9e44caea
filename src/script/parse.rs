//! Hand-written reader for the table-of-tables script files.
//
//  Grammar (a Lua subset):
//
//      chunk  ::= stmt*
//      stmt   ::= ['local'] path '=' expr [';']
//      path   ::= NAME ( '.' NAME | '[' expr ']' )*
//      expr   ::= 'nil' | 'true' | 'false' | ['-'] NUMBER | STRING | table
//      table  ::= '{' [ field ( (','|';') field )* [','|';'] ] '}'
//      field  ::= '[' expr ']' '=' expr | NAME '=' expr | expr
//
//  Comments: `-- line` and `--[[ block ]]`.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::value::{ScriptKey, ScriptTable, ScriptValue};

/// Syntax or evaluation error, with the 1-based line it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line the error was detected on.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Int(i64),
    Float(f64),
    Str(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Comma,
    Semicolon,
    Dot,
    Minus,
    Eof,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            line: 1,
        }
    }

    fn err<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError {
            line: self.line,
            message: message.into(),
        })
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let mut prev = '\0';
        while let Some(c) = self.bump() {
            if prev == ']' && c == ']' {
                return Ok(());
            }
            prev = c;
        }
        self.err("unfinished block comment")
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('-') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.peek() != Some(&'-') {
                        return Ok(());
                    }
                    self.bump();
                    self.bump();
                    let mut ahead = self.chars.clone();
                    if ahead.next() == Some('[') && ahead.next() == Some('[') {
                        self.bump();
                        self.bump();
                        self.skip_block_comment()?;
                    } else {
                        self.skip_line();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_name(&mut self, first: char) -> String {
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        name
    }

    fn read_number(&mut self, first: char) -> Result<Token, ParseError> {
        let mut num = String::new();
        num.push(first);
        let mut is_float = first == '.';
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                num.push(c);
            } else if c == '.' || c == 'e' || c == 'E' {
                is_float = true;
                num.push(c);
            } else if (c == '-' || c == '+') && num.ends_with(|e| e == 'e' || e == 'E') {
                num.push(c);
            } else {
                break;
            }
            self.bump();
        }
        if is_float {
            match num.parse::<f64>() {
                Ok(v) => Ok(Token::Float(v)),
                Err(_) => self.err(format!("malformed number '{}'", num)),
            }
        } else {
            match num.parse::<i64>() {
                Ok(v) => Ok(Token::Int(v)),
                Err(_) => self.err(format!("malformed number '{}'", num)),
            }
        }
    }

    fn read_string(&mut self, quote: char) -> Result<String, ParseError> {
        let mut s = String::new();
        loop {
            if matches!(self.peek(), None | Some('\n')) {
                return self.err("unfinished string");
            }
            match self.bump() {
                None => return self.err("unfinished string"),
                Some(c) if c == quote => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('\\') => s.push('\\'),
                    Some('"') => s.push('"'),
                    Some('\'') => s.push('\''),
                    Some(other) => return self.err(format!("invalid escape '\\{}'", other)),
                    None => return self.err("unfinished string"),
                },
                Some(c) => s.push(c),
            }
        }
    }

    fn next_token(&mut self) -> Result<(Token, usize), ParseError> {
        self.skip_trivia()?;
        let line = self.line;
        let c = match self.bump() {
            Some(c) => c,
            None => return Ok((Token::Eof, line)),
        };
        let tok = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '=' => Token::Assign,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '-' => Token::Minus,
            '.' => match self.peek() {
                Some(d) if d.is_ascii_digit() => self.read_number('.')?,
                _ => Token::Dot,
            },
            '"' | '\'' => Token::Str(self.read_string(c)?),
            c if c.is_ascii_digit() => self.read_number(c)?,
            c if c.is_ascii_alphabetic() || c == '_' => Token::Name(self.read_name(c)),
            other => return self.err(format!("unexpected character '{}'", other)),
        };
        Ok((tok, line))
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>, ParseError> {
        let mut out = Vec::new();
        loop {
            let (tok, line) = self.next_token()?;
            let done = tok == Token::Eof;
            out.push((tok, line));
            if done {
                return Ok(out);
            }
        }
    }
}

/// Deepest table constructor nesting accepted, matching Lua's syntax level cap.
const MAX_TABLE_DEPTH: usize = 200;

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let i = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[i].0
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].1
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn err<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError {
            line: self.line(),
            message: message.into(),
        })
    }

    fn expect(&mut self, want: Token, what: &str) -> Result<(), ParseError> {
        if *self.peek() == want {
            self.advance();
            Ok(())
        } else {
            self.err(format!("expected {} near {:?}", what, self.peek()))
        }
    }

    fn chunk(&mut self) -> Result<ScriptTable, ParseError> {
        let mut globals = ScriptTable::new();
        while *self.peek() != Token::Eof {
            self.statement(&mut globals)?;
        }
        Ok(globals)
    }

    fn statement(&mut self, globals: &mut ScriptTable) -> Result<(), ParseError> {
        if *self.peek() == Token::Semicolon {
            self.advance();
            return Ok(());
        }
        if matches!(self.peek(), Token::Name(n) if n == "local") {
            self.advance();
        }
        let line = self.line();
        let path = self.path()?;
        self.expect(Token::Assign, "'='")?;
        let value = self.expr()?;
        assign(globals, &path, value).map_err(|message| ParseError { line, message })
    }

    fn path(&mut self) -> Result<Vec<ScriptKey>, ParseError> {
        let mut path = match self.advance() {
            Token::Name(n) => vec![ScriptKey::Name(n)],
            other => return self.err(format!("expected a variable name near {:?}", other)),
        };
        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    match self.advance() {
                        Token::Name(n) => path.push(ScriptKey::Name(n)),
                        other => return self.err(format!("expected a field name near {:?}", other)),
                    }
                }
                Token::LBracket => {
                    self.advance();
                    path.push(self.bracket_key()?);
                }
                _ => return Ok(path),
            }
        }
    }

    /// Parses `expr ']'` after an opening bracket.
    fn bracket_key(&mut self) -> Result<ScriptKey, ParseError> {
        let key = match self.expr()? {
            ScriptValue::Str(s) => ScriptKey::Name(s),
            v => match v.as_integer() {
                Some(i) => ScriptKey::Index(i),
                None => return self.err(format!("invalid table key of type {}", v.type_name())),
            },
        };
        self.expect(Token::RBracket, "']'")?;
        Ok(key)
    }

    fn expr(&mut self) -> Result<ScriptValue, ParseError> {
        match self.advance() {
            Token::Name(n) => match n.as_str() {
                "nil" => Ok(ScriptValue::Nil),
                "true" => Ok(ScriptValue::Bool(true)),
                "false" => Ok(ScriptValue::Bool(false)),
                _ => self.err(format!("unsupported expression '{}'", n)),
            },
            Token::Int(i) => Ok(ScriptValue::Integer(i)),
            Token::Float(f) => Ok(ScriptValue::Number(f)),
            Token::Str(s) => Ok(ScriptValue::Str(s)),
            Token::Minus => match self.advance() {
                Token::Int(i) => Ok(ScriptValue::Integer(-i)),
                Token::Float(f) => Ok(ScriptValue::Number(-f)),
                other => self.err(format!("expected a number after '-' near {:?}", other)),
            },
            Token::LBrace => self.table(),
            other => self.err(format!("unexpected {:?}", other)),
        }
    }

    fn table(&mut self) -> Result<ScriptValue, ParseError> {
        if self.depth >= MAX_TABLE_DEPTH {
            return self.err("table nesting too deep");
        }
        self.depth += 1;
        let table = self.table_fields();
        self.depth -= 1;
        table
    }

    fn table_fields(&mut self) -> Result<ScriptValue, ParseError> {
        let mut table = ScriptTable::new();
        let mut next_positional = 1i64;
        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    return Ok(ScriptValue::Table(table));
                }
                Token::LBracket => {
                    self.advance();
                    let key = self.bracket_key()?;
                    self.expect(Token::Assign, "'='")?;
                    let value = self.expr()?;
                    table.insert(key, value);
                }
                Token::Name(n) if *self.peek_at(1) == Token::Assign => {
                    let key = ScriptKey::Name(n.clone());
                    self.advance();
                    self.advance();
                    let value = self.expr()?;
                    table.insert(key, value);
                }
                _ => {
                    let value = self.expr()?;
                    table.insert(ScriptKey::Index(next_positional), value);
                    next_positional += 1;
                }
            }
            match self.peek() {
                Token::Comma | Token::Semicolon => {
                    self.advance();
                }
                Token::RBrace => {}
                other => return self.err(format!("expected ',' or '}}' near {:?}", other)),
            }
        }
    }
}

fn assign(globals: &mut ScriptTable, path: &[ScriptKey], value: ScriptValue) -> Result<(), String> {
    let (last, parents) = match path.split_last() {
        Some(split) => split,
        None => return Err("empty assignment target".to_owned()),
    };
    let mut table = globals;
    for key in parents {
        table = match table.get_mut(key).and_then(ScriptValue::as_table_mut) {
            Some(t) => t,
            None => return Err(format!("attempt to index a nil value (field '{}')", key)),
        };
    }
    table.insert(last.clone(), value);
    Ok(())
}

/// Evaluates script text into its table of globals.
pub fn parse_script(src: &str) -> Result<ScriptTable, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser {
        tokens,
        pos: 0,
        depth: 0,
    }
    .chunk()
}
