//! DSL parser for schematic snapshots.
//!
//! A line-oriented text format for handing the engine a sheet without an
//! editor: one element per line, placed by world-space points.
//!
//! # Grammar Overview
//!
//! ```text
//! snapshot    = { line }
//! line        = comment | directive | element | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".grid" number
//! element     = kind [name] point+ [value] { param }
//! point       = '(' number ',' number ')'
//! param       = identifier '=' number
//!
//! number      = ['-'|'+'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+] [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! Every element except `WIRE` needs a name.
//!
//! # Element Kinds
//!
//! | Kind | Description | Syntax |
//! |------|-------------|--------|
//! | BAT | Battery | `BAT <name> <neg> <pos> <volts> [r=<ohms>]` |
//! | R | Resistor | `R <name> <a> <b> <ohms>` |
//! | BULB | Light bulb | `BULB <name> <a> <b> <ohms> [rated=<W>] [burnt=1]` |
//! | LOAD | Power user | `LOAD <name> <a> <b> <ohms> [rated=<W>]` |
//! | AM | Ammeter | `AM <name> <a> <b>` |
//! | VM | Voltmeter | `VM <name> <a> <b>` |
//! | SW | Switch | `SW <name> <a> <b> [closed=1]` |
//! | BTN | Push button | `BTN <name> <a> <b> [closed=1]` |
//! | GND | Ground | `GND <name> <p>` |
//! | IN | Toggle source | `IN <name> <p> [active=1]` |
//! | PORTIN | Custom input port | `PORTIN <name> <p> [active=1]` |
//! | OUT | Output port | `OUT <name> <p>` |
//! | AND, OR, XOR, NAND | Two-input gate | `AND <name> <in0> <in1> <out>` |
//! | NOT | Inverter | `NOT <name> <in> <out>` |
//! | WIRE | Wire segment | `WIRE [label] <a> <b>` |
//!
//! # Example
//!
//! ```text
//! # Lamp with a switch
//! BAT  B1 (0,40) (0,0)  9
//! SW   S1 (0,0) (40,0) closed=1
//! BULB L1 (40,0) (40,40) 12 rated=5
//! WIRE    (40,40) (0,40)
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;
use crate::schematic::Schematic;

/// Parse a schematic DSL string into an AST.
pub fn parse(input: &str) -> Result<SchematicAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a schematic DSL string straight into a snapshot.
pub fn parse_schematic(input: &str) -> Result<Schematic> {
    Schematic::from_ast(parse(input)?)
}

/// Parse a schematic DSL file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<SchematicAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::WirelabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
