//! Tokenizer and recursive-descent parser for formulas.

use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use super::{BinaryOp, Expr, FormulaError, Function, MAX_DEPTH, MAX_LENGTH};

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    Open,
    Close,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {n}"),
            Token::Name(name) => format!("name {name:?}"),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Open => "'('".into(),
            Token::Close => "')'".into(),
            Token::Comma => "','".into(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<CharIndices<'_>> = text.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        let token = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::Open,
            ')' => Token::Close,
            ',' => Token::Comma,
            c if c.is_ascii_digit() || c == '.' => {
                let end = take_while(&mut chars, |c| c.is_ascii_digit() || c == '.');
                let literal = &text[position..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaError::UnexpectedToken {
                        found: format!("number {literal:?}"),
                        position,
                    })?;
                tokens.push((position, Token::Number(value)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let end = take_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '_');
                tokens.push((position, Token::Name(text[position..end].to_owned())));
                continue;
            }
            found => return Err(FormulaError::UnexpectedChar { found, position }),
        };
        chars.next();
        tokens.push((position, token));
    }

    Ok(tokens)
}

/// Advance while `accept` holds; returns the byte offset just past the run.
fn take_while(chars: &mut Peekable<CharIndices<'_>>, accept: impl Fn(char) -> bool) -> usize {
    let mut end = 0;
    while let Some(&(index, c)) = chars.peek() {
        if !accept(c) {
            return index;
        }
        end = index + c.len_utf8();
        chars.next();
    }
    end
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    cursor: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(_, token)| token)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let item = self.tokens.get(self.cursor).cloned();
        if item.is_some() {
            self.cursor += 1;
        }
        item
    }

    fn unexpected(position: usize, token: &Token) -> FormulaError {
        FormulaError::UnexpectedToken {
            found: token.describe(),
            position,
        }
    }

    fn expect_close(&mut self) -> Result<(), FormulaError> {
        match self.next() {
            Some((_, Token::Close)) => Ok(()),
            Some((position, token)) => Err(Self::unexpected(position, &token)),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn descend(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep { max: MAX_DEPTH });
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        self.descend()?;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.next();
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        self.depth -= 1;
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.next();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.next();
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some((_, Token::Number(value))) => Ok(Expr::Number(value)),
            Some((_, Token::Open)) => {
                let inner = self.expr()?;
                self.expect_close()?;
                Ok(inner)
            }
            Some((_, Token::Name(name))) => {
                if !matches!(self.peek(), Some(Token::Open)) {
                    return Ok(Expr::Variable(name));
                }
                self.next();
                let function = Function::from_str(&name)
                    .map_err(|_| FormulaError::UnknownFunction(name.clone()))?;
                let args = self.arguments()?;
                Ok(Expr::Call { function, args })
            }
            Some((position, token)) => Err(Self::unexpected(position, &token)),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    /// Comma-separated arguments after an opening parenthesis.
    fn arguments(&mut self) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::Close)) {
            self.next();
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some((_, Token::Comma)) => continue,
                Some((_, Token::Close)) => return Ok(args),
                Some((position, token)) => return Err(Self::unexpected(position, &token)),
                None => return Err(FormulaError::UnexpectedEnd),
            }
        }
    }
}

/// Parse formula text into an expression tree.
pub fn parse(text: &str) -> Result<Expr, FormulaError> {
    if text.len() > MAX_LENGTH {
        return Err(FormulaError::TooLong { max: MAX_LENGTH });
    }
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = Parser {
        tokens,
        cursor: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.next() {
        None => Ok(expr),
        Some((position, token)) => Err(Parser::unexpected(position, &token)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> Box<Expr> {
        Box::new(Expr::Number(v))
    }

    #[test]
    fn precedence_binds_products_tighter() {
        let expr = parse("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: num(1.0),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: num(2.0),
                    rhs: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        let expr = parse("8 - 3 - 1").unwrap();
        let Expr::Binary { op, lhs, rhs } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Sub);
        assert_eq!(*rhs, Expr::Number(1.0));
        assert!(matches!(*lhs, Expr::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn calls_and_variables() {
        let expr = parse("max(grit, 2)").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                function: Function::Max,
                args: vec![Expr::Variable("grit".into()), Expr::Number(2.0)],
            }
        );
    }

    #[test]
    fn rejects_host_language_constructs() {
        assert!(matches!(
            parse("actor.system.level"),
            Err(FormulaError::UnexpectedChar { found: '.', .. })
                | Err(FormulaError::UnexpectedToken { .. })
        ));
        assert!(matches!(parse("level; 1"), Err(FormulaError::UnexpectedChar { found: ';', .. })));
        assert!(matches!(parse("eval(1)"), Err(FormulaError::UnknownFunction(_))));
    }

    #[test]
    fn reports_structural_errors() {
        assert_eq!(parse("   "), Err(FormulaError::Empty));
        assert_eq!(parse("(1 + 2"), Err(FormulaError::UnexpectedEnd));
        assert_eq!(parse("1 +"), Err(FormulaError::UnexpectedEnd));
        assert!(matches!(parse("1 2"), Err(FormulaError::UnexpectedToken { position: 2, .. })));
        assert!(matches!(parse("1..2"), Err(FormulaError::UnexpectedToken { .. })));
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(parse(&deep), Err(FormulaError::TooDeep { max: MAX_DEPTH }));
        let long = "1+".repeat(MAX_LENGTH);
        assert_eq!(parse(&long), Err(FormulaError::TooLong { max: MAX_LENGTH }));
    }
}
