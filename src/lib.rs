pub mod codegen;
pub mod emit;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod report;

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::report::Reporter;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] lexer::Error),

    #[error("{0}")]
    Parse(#[from] parser::Error),

    #[error("{0}")]
    Alloc(#[from] codegen::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Runs the whole pipeline: scan, parse, allocate registers, and write the
/// assembly into `output`. Phase results are surfaced through `reporter`.
pub fn compile<R, W>(mut input: R, mut output: W, reporter: &mut dyn Reporter) -> Result<(), Error>
where
    R: Read,
    W: Write,
{
    let mut source = Vec::new();
    input.read_to_end(&mut source)?;

    let tokens = lexer::tokenize(&source)?;
    reporter.tokens(&tokens);

    let mut program = parser::parse(&tokens)?;
    reporter.parsed(&program);

    codegen::alloc(&mut program, reporter)?;

    output.write_all(emit::assembly(&program).as_bytes())?;

    Ok(())
}
