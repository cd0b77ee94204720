//! Calculator tool.
//!
//! Expressions are parsed by a small recursive-descent parser over a closed grammar
//! and evaluated directly; nothing is handed to a general-purpose evaluator.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | NAME | NAME '(' args? ')' | '(' expr ')'
//! args    := expr (',' expr)*
//! ```
//!
//! Names resolve at evaluation time against a fixed allow-list of constants
//! (`pi`, `e`) and functions (`sqrt abs sin cos tan log exp pow round min max`).

use std::fmt;

use thiserror::Error;

use crate::tools::registry::{
    str_arg, ParamType, ParameterSchema, ParameterSpec, ToolDefinition, ToolResult,
};

/// Rejected before any parsing, matched against the lowercased input.
const DANGEROUS_PATTERNS: &[&str] = &["__", "import", "exec", "eval", "open", "file", "input"];

/// Bound on parser recursion. Parentheses, call arguments, unary signs and chained
/// operators each count one level, which also bounds the depth of the tree.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Dangerous pattern '{0}' detected in expression")]
    DangerousPattern(&'static str),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid value: math domain error")]
    MathDomain,

    #[error("Invalid syntax: {0}")]
    Syntax(String),

    #[error("Calculation error: {0}")]
    Other(String),
}

pub fn definition() -> ToolDefinition {
    ToolDefinition::new(
        "calc",
        "Calculator tool - evaluates simple mathematical expressions",
        ParameterSchema::new(vec![ParameterSpec::required(
            "expression",
            ParamType::String,
            "Mathematical expression to evaluate",
        )]),
        |args| {
            Ok(match str_arg(args, "expression") {
                Some(expression) => match evaluate(expression) {
                    Ok(value) => ToolResult::ok(format_number(value)),
                    Err(e) => ToolResult::failure(e.to_string()),
                },
                None => ToolResult::failure("Expression must be a string"),
            })
        },
    )
}

/// Screens, parses and evaluates `input`.
pub fn evaluate(input: &str) -> Result<f64, CalcError> {
    let lowered = input.to_lowercase();
    if let Some(pattern) = DANGEROUS_PATTERNS.iter().find(|p| lowered.contains(*p)) {
        return Err(CalcError::DangerousPattern(*pattern));
    }

    let tokens = tokenize(input)?;
    let expr = Parser::new(tokens).parse()?;
    let value = expr.eval()?;
    if !value.is_finite() {
        return Err(CalcError::Other("math range error".into()));
    }
    Ok(value)
}

/// Integral values print without a decimal point; others to at most six places.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        if value == 0.0 {
            return "0".into();
        }
        return format!("{value:.0}");
    }
    let fixed = format!("{value:.6}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Lexer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{n}"),
            Token::Name(name) => f.write_str(name),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::Syntax(format!("invalid number '{literal}'")))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '_' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Name(input[start..end].to_string()));
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    other => {
                        return Err(CalcError::Syntax(format!(
                            "unexpected character '{other}'"
                        )))
                    }
                };
                tokens.push(token);
                chars.next();
            }
        }
    }

    Ok(tokens)
}

// ────────────────────────────────────────────────────────────────────────────
// Parser
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Num(f64),
    Name(String),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::Syntax("expression nested too deeply".into()));
        }
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn parse(mut self) -> Result<Expr, CalcError> {
        let expr = self.expr()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) => Err(CalcError::Syntax(format!("unexpected '{token}'"))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.term()?;
        let mut links = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            links += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.ascend(links);
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.unary()?;
        let mut links = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            self.descend()?;
            links += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        self.ascend(links);
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        let negate = if self.eat(&Token::Minus) {
            true
        } else if self.eat(&Token::Plus) {
            false
        } else {
            return self.primary();
        };
        self.descend()?;
        let inner = self.unary()?;
        self.ascend(1);
        Ok(if negate {
            Expr::Neg(Box::new(inner))
        } else {
            inner
        })
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(Expr::Num(value)),
            Some(Token::Name(name)) => {
                if !self.eat(&Token::LParen) {
                    return Ok(Expr::Name(name));
                }
                self.descend()?;
                let mut args = Vec::new();
                if !self.eat(&Token::RParen) {
                    loop {
                        args.push(self.expr()?);
                        if self.eat(&Token::Comma) {
                            continue;
                        }
                        if self.eat(&Token::RParen) {
                            break;
                        }
                        return Err(self.unexpected("')'"));
                    }
                }
                self.ascend(1);
                Ok(Expr::Call(name, args))
            }
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.expr()?;
                if !self.eat(&Token::RParen) {
                    return Err(self.unexpected("')'"));
                }
                self.ascend(1);
                Ok(inner)
            }
            Some(token) => Err(CalcError::Syntax(format!("unexpected '{token}'"))),
            None => Err(CalcError::Syntax("unexpected end of expression".into())),
        }
    }

    fn unexpected(&self, wanted: &str) -> CalcError {
        match self.peek() {
            Some(token) => CalcError::Syntax(format!("expected {wanted}, found '{token}'")),
            None => CalcError::Syntax(format!("expected {wanted} before end of expression")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

const FUNCTIONS: &[&str] = &[
    "sqrt", "abs", "sin", "cos", "tan", "log", "exp", "pow", "round", "min", "max",
];

impl Expr {
    fn eval(&self) -> Result<f64, CalcError> {
        match self {
            Expr::Num(value) => Ok(*value),
            Expr::Name(name) => match name.as_str() {
                "pi" => Ok(std::f64::consts::PI),
                "e" => Ok(std::f64::consts::E),
                other if FUNCTIONS.contains(&other) => Err(CalcError::Other(format!(
                    "function '{other}' used without arguments"
                ))),
                other => Err(undefined(other)),
            },
            Expr::Neg(inner) => Ok(-inner.eval()?),
            Expr::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval()?, rhs.eval()?);
                match op {
                    BinOp::Add => Ok(a + b),
                    BinOp::Sub => Ok(a - b),
                    BinOp::Mul => Ok(a * b),
                    BinOp::Div if b == 0.0 => Err(CalcError::DivisionByZero),
                    BinOp::Div => Ok(a / b),
                }
            }
            Expr::Call(name, args) => {
                if !FUNCTIONS.contains(&name.as_str()) {
                    return if matches!(name.as_str(), "pi" | "e") {
                        Err(CalcError::Other("'float' object is not callable".into()))
                    } else {
                        Err(undefined(name))
                    };
                }
                let values = args.iter().map(Expr::eval).collect::<Result<Vec<_>, _>>()?;
                call(name, &values)
            }
        }
    }
}

fn undefined(name: &str) -> CalcError {
    CalcError::Other(format!("name '{name}' is not defined"))
}

fn arity(name: &str, expected: &str, given: usize) -> CalcError {
    CalcError::Other(format!("{name}() takes {expected} ({given} given)"))
}

fn call(name: &str, args: &[f64]) -> Result<f64, CalcError> {
    match (name, args) {
        ("sqrt", &[x]) if x < 0.0 => Err(CalcError::MathDomain),
        ("sqrt", &[x]) => Ok(x.sqrt()),
        ("abs", &[x]) => Ok(x.abs()),
        ("sin", &[x]) => Ok(x.sin()),
        ("cos", &[x]) => Ok(x.cos()),
        ("tan", &[x]) => Ok(x.tan()),
        ("exp", &[x]) => Ok(x.exp()),
        ("log", &[x]) if x <= 0.0 => Err(CalcError::MathDomain),
        ("log", &[x]) => Ok(x.ln()),
        ("log", &[x, base]) if x <= 0.0 || base <= 0.0 => Err(CalcError::MathDomain),
        ("log", &[_, base]) if base == 1.0 => Err(CalcError::DivisionByZero),
        ("log", &[x, base]) => Ok(x.ln() / base.ln()),
        ("pow", &[base, exponent]) if base == 0.0 && exponent < 0.0 => Err(CalcError::DivisionByZero),
        ("pow", &[base, exponent]) if base < 0.0 && exponent.fract() != 0.0 => {
            Err(CalcError::MathDomain)
        }
        ("pow", &[base, exponent]) => Ok(base.powf(exponent)),
        ("round", &[x]) => Ok(x.round_ties_even()),
        ("round", &[x, digits]) => {
            if digits.fract() != 0.0 {
                return Err(CalcError::Other(
                    "'float' object cannot be interpreted as an integer".into(),
                ));
            }
            let scale = 10f64.powi(digits as i32);
            Ok((x * scale).round_ties_even() / scale)
        }
        ("min", [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::min)),
        ("max", [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::max)),
        ("min" | "max", []) => Err(CalcError::Other(format!(
            "{name} expected at least 1 argument, got 0"
        ))),
        ("log" | "round", _) => Err(arity(name, "1 or 2 arguments", args.len())),
        ("pow", _) => Err(arity(name, "exactly 2 arguments", args.len())),
        _ => Err(arity(name, "exactly one argument", args.len())),
    }
}
