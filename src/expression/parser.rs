use crate::expression::ast::{BinaryOp, Builtin, Expr, TimeAnchor};
use crate::expression::error::ExprError;
use crate::expression::lexer::{Span, Token, TokenKind, lex};

pub(crate) fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(ExprError::new(0, "empty time expression"));
    }
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let expr = p.parse_term()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(s) => format!("identifier '{s}'"),
        TokenKind::Str(s) => format!("string \"{s}\""),
        TokenKind::Number(v, _) => format!("number {v}"),
        TokenKind::LParen => "'('".to_owned(),
        TokenKind::RParen => "')'".to_owned(),
        TokenKind::Comma => "','".to_owned(),
        TokenKind::Dot => "'.'".to_owned(),
        TokenKind::Plus => "'+'".to_owned(),
        TokenKind::Minus => "'-'".to_owned(),
        TokenKind::Star => "'*'".to_owned(),
        TokenKind::Slash => "'/'".to_owned(),
        TokenKind::Eof => "end of input".to_owned(),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!(
                    "expected {}, found {}",
                    describe(&kind),
                    describe(&self.peek().kind)
                ),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_factor()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let r = self.parse_factor()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_factor(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else {
                break;
            };
            let r = self.parse_unary()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(r),
            };
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Neg(Box::new(e)));
        }
        let e = self.parse_primary()?;
        if self.peek().kind == TokenKind::Dot {
            return Err(ExprError::new(
                self.span().start,
                "property access is only valid on scene(), cue(), mark(), prev, next and timeline",
            ));
        }
        Ok(e)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump();
        match t.kind {
            TokenKind::Number(value, unit) => Ok(Expr::Lit { value, unit }),
            TokenKind::Ident(name) => self.parse_ident(name, t.span),
            TokenKind::LParen => {
                let e = self.parse_term()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected {}", describe(&other)),
            )),
        }
    }

    fn parse_ident(&mut self, name: String, span: Span) -> Result<Expr, ExprError> {
        if self.consume(TokenKind::LParen) {
            return match name.as_str() {
                "scene" | "cue" | "mark" => self.parse_reference(&name, span),
                "min" | "max" => {
                    let args = self.parse_args()?;
                    if args.len() < 2 {
                        return Err(ExprError::new(
                            span.start,
                            format!("{name}() expects at least 2 arguments, got {}", args.len()),
                        ));
                    }
                    let func = if name == "min" {
                        Builtin::Min
                    } else {
                        Builtin::Max
                    };
                    Ok(Expr::Call { func, args })
                }
                "clamp" => self.parse_fixed_call(Builtin::Clamp, "clamp", 3, span),
                "snap" => self.parse_fixed_call(Builtin::Snap, "snap", 2, span),
                _ => Err(ExprError::new(
                    span.start,
                    format!("unknown function '{name}'"),
                )),
            };
        }

        if !matches!(name.as_str(), "prev" | "next" | "timeline") {
            return Err(ExprError::new(
                span.start,
                format!("Unknown identifier '{name}'"),
            ));
        }
        if !self.consume(TokenKind::Dot) {
            return Err(ExprError::new(
                span.start,
                format!("Unknown identifier '{name}' (expected '{name}.<property>')"),
            ));
        }
        let (prop, prop_span) = self.expect_ident()?;
        let anchor = match (name.as_str(), prop.as_str()) {
            ("prev", "start") => TimeAnchor::PrevStart,
            ("prev", "end") => TimeAnchor::PrevEnd,
            ("next", "start") => TimeAnchor::NextStart,
            ("timeline", "start") => TimeAnchor::TimelineStart,
            _ => {
                return Err(ExprError::new(
                    prop_span.start,
                    format!("unknown property '{prop}' on '{name}'"),
                ));
            }
        };
        Ok(Expr::Anchor(anchor))
    }

    fn parse_reference(&mut self, func: &str, span: Span) -> Result<Expr, ExprError> {
        let t = self.bump();
        let id = match t.kind {
            TokenKind::Ident(s) | TokenKind::Str(s) if !s.is_empty() => s,
            other => {
                return Err(ExprError::new(
                    t.span.start,
                    format!("{func}() expects an id, found {}", describe(&other)),
                ));
            }
        };
        if self.peek().kind == TokenKind::Comma {
            return Err(ExprError::new(
                span.start,
                format!("{func}() expects exactly 1 argument"),
            ));
        }
        self.expect(TokenKind::RParen)?;

        let prop = if self.consume(TokenKind::Dot) {
            let (prop, prop_span) = self.expect_ident()?;
            Some((prop, prop_span))
        } else {
            None
        };

        let anchor = match (func, prop.as_ref().map(|(p, _)| p.as_str())) {
            ("scene", None | Some("start")) => TimeAnchor::SceneStart(id),
            ("scene", Some("end")) => TimeAnchor::SceneEnd(id),
            ("cue", None | Some("start")) => TimeAnchor::CueStart(id),
            ("cue", Some("end")) => TimeAnchor::CueEnd(id),
            ("mark", None | Some("start")) => TimeAnchor::MarkStart(id),
            (_, Some(p)) => {
                let at = prop.as_ref().map(|(_, s)| s.start).unwrap_or(span.start);
                return Err(ExprError::new(
                    at,
                    format!("unknown property '{p}' on {func}()"),
                ));
            }
            (_, None) => {
                return Err(ExprError::new(
                    span.start,
                    format!("unknown function '{func}'"),
                ));
            }
        };
        Ok(Expr::Anchor(anchor))
    }

    fn parse_fixed_call(
        &mut self,
        func: Builtin,
        name: &str,
        arity: usize,
        span: Span,
    ) -> Result<Expr, ExprError> {
        let args = self.parse_args()?;
        if args.len() != arity {
            return Err(ExprError::new(
                span.start,
                format!("{name}() expects {arity} arguments, got {}", args.len()),
            ));
        }
        Ok(Expr::Call { func, args })
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_term()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn expect_ident(&mut self) -> Result<(String, Span), ExprError> {
        let t = self.bump();
        match t.kind {
            TokenKind::Ident(s) => Ok((s, t.span)),
            other => Err(ExprError::new(
                t.span.start,
                format!("expected property name after '.', found {}", describe(&other)),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
