mod color;
mod flow;
mod graph;
mod liveness;

pub use graph::Matrix;

use thiserror::Error;

use crate::{ir::Program, report::Reporter};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("not enough registers: the interference graph needs more than {0} colors")]
    NotEnoughRegisters(usize),
}

/// The whole back end over a parsed program: control-flow edges, liveness,
/// the interference graph, and the register assignment itself.
pub fn alloc(program: &mut Program, reporter: &mut dyn Reporter) -> Result<(), Error> {
    flow::build(program);
    liveness::analyze(program, reporter);

    let matrix = graph::interference(program);
    reporter.interference(&matrix);

    color::color(program, &matrix)?;
    reporter.allocation(program);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::Reg,
        lexer::tokenize,
        parser,
        report::Silent,
    };

    fn alloc_source(source: &str) -> Result<Program, Error> {
        let mut program = parser::parse(&tokenize(source.as_bytes()).unwrap()).unwrap();
        alloc(&mut program, &mut Silent)?;
        Ok(program)
    }

    #[test]
    fn three_overlapping_values_get_three_registers() {
        let program = alloc_source(
            "_func main;\n\
             _reg r1; _reg r2; _reg r3;\n\
             li r1, 1;\n\
             li r2, 2;\n\
             li r3, 3;\n\
             add r1, r1, r2;\n\
             add r1, r1, r3;\n",
        )
        .unwrap();

        let assigned: Vec<_> = program
            .reg_vars()
            .iter()
            .map(|&id| program.assignment(id).unwrap())
            .collect();
        assert_eq!(3, assigned.iter().collect::<std::collections::HashSet<_>>().len());
        assert!(!assigned.contains(&Reg::T3));
    }

    #[test]
    fn five_simultaneously_live_values_overflow_the_pool() {
        let err = alloc_source(
            "_func main;\n\
             _reg r1; _reg r2; _reg r3; _reg r4; _reg r5;\n\
             li r1, 1;\n\
             li r2, 2;\n\
             li r3, 3;\n\
             li r4, 4;\n\
             li r5, 5;\n\
             add r1, r1, r2;\n\
             add r1, r1, r3;\n\
             add r1, r1, r4;\n\
             add r1, r1, r5;\n",
        )
        .unwrap_err();

        assert_eq!(Error::NotEnoughRegisters(4), err);
    }

    #[test]
    fn single_value_lands_in_the_first_register() {
        let program = alloc_source("_func main;\n_reg r1;\nli r1, 0;\nnop;\n").unwrap();
        let id = program.reg_vars()[0];
        assert_eq!(Some(Reg::T0), program.assignment(id));
    }

    #[test]
    fn colored_neighbors_differ_across_every_edge() {
        let program = alloc_source(
            "_func main;\n\
             _reg r1; _reg r2; _reg r3; _reg r4;\n\
             li r1, 1;\n\
             li r2, 2;\n\
             li r3, 3;\n\
             li r4, 4;\n\
             add r1, r2, r3;\n\
             add r2, r3, r4;\n\
             add r1, r1, r2;\n",
        )
        .unwrap();

        let matrix = graph::interference(&program);
        for one in 0..matrix.len() {
            for other in 0..one {
                if matrix.is_adj(one, other) {
                    assert_ne!(
                        program.assignment(program.reg_at(one)),
                        program.assignment(program.reg_at(other))
                    );
                }
            }
        }
    }
}
