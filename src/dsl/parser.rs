//! Parser for the schematic DSL.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{Result, WirelabError};
use crate::schematic::Point;

/// Parser for schematic DSL.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser, reading the first token.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire snapshot description.
    pub fn parse(&mut self) -> Result<SchematicAst> {
        let mut ast = SchematicAst::default();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let element = self.parse_element()?;
                    ast.elements.push(element);
                }
                _ => {
                    return Err(WirelabError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(WirelabError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ))
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(WirelabError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn number(&mut self) -> Result<f64> {
        let tok = self.expect(TokenKind::Number)?;
        parse_value(&tok.text)
            .ok_or_else(|| WirelabError::parse(tok.line, format!("invalid number: {}", tok.text)))
    }

    fn parse_directive(&mut self, ast: &mut SchematicAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".grid" => {
                let grid = self.number()?;
                if !(grid.is_finite() && grid > 0.0) {
                    return Err(WirelabError::parse(line, "grid must be positive"));
                }
                ast.grid = Some(grid);
            }
            _ => {
                return Err(WirelabError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    /// `( x , y )`
    fn parse_point(&mut self) -> Result<Point> {
        self.expect(TokenKind::OpenParen)?;
        let x = self.number()?;
        self.expect(TokenKind::Comma)?;
        let y = self.number()?;
        self.expect(TokenKind::CloseParen)?;
        Ok(Point::new(x, y))
    }

    fn parse_element(&mut self) -> Result<ElementDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = ElementKind::from_keyword(&keyword).ok_or_else(|| {
            WirelabError::UnknownElementKind {
                kind: keyword.clone(),
                line,
            }
        })?;

        let name = if self.current.kind == TokenKind::Identifier {
            Some(self.expect(TokenKind::Identifier)?.text)
        } else {
            None
        };

        let mut points = Vec::with_capacity(kind.point_count());
        while self.current.kind == TokenKind::OpenParen {
            points.push(self.parse_point()?);
        }

        let mut value = None;
        let mut params = HashMap::new();

        // Optional value, then key=value parameters until end of line
        while self.current.kind != TokenKind::Newline && self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Number if value.is_none() && params.is_empty() => {
                    value = Some(self.number()?);
                }
                TokenKind::Identifier => {
                    let key = self.expect(TokenKind::Identifier)?.text;
                    self.expect(TokenKind::Equals)?;
                    let v = self.number()?;
                    params.insert(key.to_lowercase(), v);
                }
                _ => {
                    return Err(WirelabError::parse(
                        line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
        }

        let label = name.clone().unwrap_or_else(|| keyword.clone());
        if name.is_none() && kind != ElementKind::Wire {
            return Err(WirelabError::invalid_element(label, line, "missing name"));
        }
        if points.len() != kind.point_count() {
            return Err(WirelabError::invalid_element(
                label,
                line,
                format!("expected {} points, got {}", kind.point_count(), points.len()),
            ));
        }
        if kind.takes_value() && value.is_none() {
            return Err(WirelabError::invalid_element(label, line, "missing value"));
        }

        Ok(ElementDef {
            kind,
            name,
            points,
            value,
            params,
            line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;
    use crate::components::GateKind;

    #[test]
    fn test_parse_resistor() {
        let ast = parse("R R1 (0,0) (40, 0) 10k").unwrap();
        assert_eq!(ast.elements.len(), 1);
        let r = &ast.elements[0];
        assert_eq!(r.kind, ElementKind::Resistor);
        assert_eq!(r.name.as_deref(), Some("R1"));
        assert_eq!(r.points, vec![Point::new(0.0, 0.0), Point::new(40.0, 0.0)]);
        assert_eq!(r.value, Some(10_000.0));
    }

    #[test]
    fn test_parse_params_and_grid() {
        let ast = parse(".grid 20\nBAT B1 (0,0) (0,-40) 9 r=0.5\nSW S1 (0,0) (20,0) closed=1").unwrap();
        assert_eq!(ast.grid, Some(20.0));
        assert_eq!(ast.elements[0].params["r"], 0.5);
        assert_eq!(ast.elements[1].params["closed"], 1.0);
        assert_eq!(ast.elements[0].points[1], Point::new(0.0, -40.0));
    }

    #[test]
    fn test_parse_gate_and_unnamed_wire() {
        let ast = parse("AND U1 (0,0) (0,20) (40,10)\nWIRE (40,10) (80,10)\nWIRE bus (80,10) (80,40)")
            .unwrap();
        assert_eq!(ast.elements[0].kind, ElementKind::Gate(GateKind::And));
        assert_eq!(ast.elements[1].name, None);
        assert_eq!(ast.elements[2].name.as_deref(), Some("bus"));
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# a lamp\nBULB L1 (0,0) (40,0) 12 rated=5 ; inline comment\n\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.elements.len(), 1);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("CAP C1 (0,0) (1,0) 1u"),
            Err(WirelabError::UnknownElementKind { line: 1, .. })
        ));
        assert!(matches!(
            parse("\nNOT U1 (0,0) (1,0) (2,0)"),
            Err(WirelabError::InvalidElement { line: 2, .. })
        ));
        assert!(matches!(
            parse("R R1 (0,0) (1,0)"),
            Err(WirelabError::InvalidElement { .. })
        ));
        assert!(matches!(parse("R (0,0) (1,0) 5"), Err(WirelabError::InvalidElement { .. })));
        assert!(matches!(parse(".grid 0"), Err(WirelabError::ParseError { .. })));
        assert!(matches!(parse("R R1 (0 0) (1,0) 5"), Err(WirelabError::ParseError { .. })));
    }
}
