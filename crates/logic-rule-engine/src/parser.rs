//! 方程解析器
//!
//! 词法分析 + 递归下降语法分析，把方程字符串解析为表达式树：
//!
//! ```text
//! expr    := unary ((AND | OR) unary)*
//! unary   := NOT unary | primary
//! primary := CODE | '(' expr ')'
//! ```
//!
//! `AND` 与 `OR` 同级、左结合，`NOT` 绑定更紧。关键字不区分大小写。
//! 嵌套层数受 [`MAX_NESTING_DEPTH`] 限制，超出时返回解析错误。

use crate::error::{Result, RuleError};
use crate::operators::LogicalOperator;

/// 括号与 NOT 的最大嵌套层数
pub const MAX_NESTING_DEPTH: usize = 256;

/// 词法单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Code(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Code(code) => format!("选项编码 '{}'", code),
            Self::And => "AND".to_string(),
            Self::Or => "OR".to_string(),
            Self::Not => "NOT".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
        }
    }
}

/// 带位置（字节偏移）的词法单元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// 表达式树
///
/// 相同操作符的连续链被展平为一个 `Chain`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Code(String),
    Not(Box<Expr>),
    Chain(LogicalOperator, Vec<Expr>),
}

impl Expr {
    pub fn as_code(&self) -> Option<&str> {
        match self {
            Self::Code(code) => Some(code),
            _ => None,
        }
    }
}

/// 是否为保留关键字
pub fn is_keyword(word: &str) -> bool {
    ["AND", "OR", "NOT"]
        .iter()
        .any(|k| k.eq_ignore_ascii_case(word))
}

/// 词法分析
pub fn tokenize(input: &str) -> Vec<Spanned> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch == '(' || ch == ')' {
            chars.next();
            let token = if ch == '(' { Token::LParen } else { Token::RParen };
            tokens.push(Spanned { token, position });
            continue;
        }

        let mut end = input.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() || c == '(' || c == ')' {
                end = idx;
                break;
            }
            chars.next();
        }

        let word = &input[position..end];
        let token = if word.eq_ignore_ascii_case("AND") {
            Token::And
        } else if word.eq_ignore_ascii_case("OR") {
            Token::Or
        } else if word.eq_ignore_ascii_case("NOT") {
            Token::Not
        } else {
            Token::Code(word.to_string())
        };
        tokens.push(Spanned { token, position });
    }

    tokens
}

/// 解析方程；空白输入返回 `None`
pub fn parse(input: &str) -> Result<Option<Expr>> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut parser = Parser {
        tokens,
        cursor: 0,
        end: input.len(),
        depth: 0,
    };
    let expr = parser.expr()?;

    if let Some(extra) = parser.peek() {
        return Err(RuleError::EquationParse {
            position: extra.position,
            message: format!("多余的 {}", extra.token.describe()),
        });
    }

    Ok(Some(expr))
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.cursor).cloned();
        if spanned.is_some() {
            self.cursor += 1;
        }
        spanned
    }

    fn expr(&mut self) -> Result<Expr> {
        let mut left = self.unary()?;

        loop {
            let op = match self.peek().map(|s| &s.token) {
                Some(Token::And) => LogicalOperator::And,
                Some(Token::Or) => LogicalOperator::Or,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;

            left = match left {
                Expr::Chain(chain_op, mut items) if chain_op == op => {
                    items.push(right);
                    Expr::Chain(op, items)
                }
                other => Expr::Chain(op, vec![other, right]),
            };
        }

        Ok(left)
    }

    /// 进入一层嵌套，超过上限时返回解析错误
    fn descend(&mut self, position: usize) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(RuleError::EquationParse {
                position,
                message: format!("嵌套层数超过上限 {}", MAX_NESTING_DEPTH),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn unary(&mut self) -> Result<Expr> {
        if let Some(Spanned {
            token: Token::Not,
            position,
        }) = self.peek()
        {
            let position = *position;
            self.advance();
            self.descend(position)?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.advance() {
            Some(Spanned {
                token: Token::Code(code),
                ..
            }) => Ok(Expr::Code(code)),
            Some(Spanned {
                token: Token::LParen,
                position,
            }) => {
                self.descend(position)?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(RuleError::EquationParse {
                        position: other.position,
                        message: format!("期望 ')'，实际为 {}", other.token.describe()),
                    }),
                    None => Err(RuleError::EquationParse {
                        position,
                        message: "括号未闭合".to_string(),
                    }),
                }
            }
            Some(other) => Err(RuleError::EquationParse {
                position: other.position,
                message: format!("期望选项编码或 '('，实际为 {}", other.token.describe()),
            }),
            None => Err(RuleError::EquationParse {
                position: self.end,
                message: "方程意外结束".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(c: &str) -> Expr {
        Expr::Code(c.to_string())
    }

    #[test]
    fn test_tokenize_positions() {
        let tokens = tokenize("(2 or 3) AND NOT 4");
        let positions: Vec<usize> = tokens.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0, 1, 3, 6, 7, 9, 13, 17]);
        assert_eq!(tokens[2].token, Token::Or);
        assert_eq!(tokens[7].token, Token::Code("4".to_string()));
    }

    #[test]
    fn test_tokenize_codes_with_symbols() {
        let tokens = tokenize("Q1_a AND 98.1");
        assert_eq!(tokens[0].token, Token::Code("Q1_a".to_string()));
        assert_eq!(tokens[2].token, Token::Code("98.1".to_string()));
    }

    #[test]
    fn test_parse_flattens_same_operator() {
        let expr = parse("1 OR 2 OR 3").unwrap().unwrap();
        assert_eq!(
            expr,
            Expr::Chain(LogicalOperator::Or, vec![code("1"), code("2"), code("3")])
        );
    }

    #[test]
    fn test_parse_left_associative() {
        // AND 与 OR 同级，左结合
        let expr = parse("1 OR 2 AND 3").unwrap().unwrap();
        assert_eq!(
            expr,
            Expr::Chain(
                LogicalOperator::And,
                vec![
                    Expr::Chain(LogicalOperator::Or, vec![code("1"), code("2")]),
                    code("3"),
                ]
            )
        );
    }

    #[test]
    fn test_not_binds_tighter() {
        let expr = parse("NOT 1 AND 2").unwrap().unwrap();
        assert_eq!(
            expr,
            Expr::Chain(
                LogicalOperator::And,
                vec![Expr::Not(Box::new(code("1"))), code("2")]
            )
        );
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn test_parse_errors_carry_position() {
        let err = parse("(1 OR 2").unwrap_err();
        assert!(matches!(err, RuleError::EquationParse { position: 0, .. }));

        let err = parse("1 AND").unwrap_err();
        assert!(matches!(err, RuleError::EquationParse { position: 5, .. }));

        let err = parse("1 2").unwrap_err();
        assert!(matches!(err, RuleError::EquationParse { position: 2, .. }));

        let err = parse("OR 1").unwrap_err();
        assert!(matches!(err, RuleError::EquationParse { position: 0, .. }));

        let err = parse("(1 OR 2) )").unwrap_err();
        assert!(matches!(err, RuleError::EquationParse { position: 9, .. }));
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let nested = format!(
            "{}1{}",
            "(".repeat(MAX_NESTING_DEPTH),
            ")".repeat(MAX_NESTING_DEPTH)
        );
        assert_eq!(parse(&nested).unwrap(), Some(code("1")));

        let too_deep = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        let err = parse(&too_deep).unwrap_err();
        assert!(matches!(
            err,
            RuleError::EquationParse { position, .. } if position == MAX_NESTING_DEPTH
        ));

        let negations = format!("{}1", "NOT ".repeat(20_000));
        assert!(matches!(
            parse(&negations),
            Err(RuleError::EquationParse { .. })
        ));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert!(is_keyword("and"));
        assert!(is_keyword("Not"));
        assert!(!is_keyword("NOTE"));
    }
}
