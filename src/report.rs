//! Human-readable phase dumps for verbose runs.
//!
//! The pipeline never prints on its own; it hands each phase result to a
//! [`Reporter`]. [`Console`] renders the dumps, [`Silent`] swallows them, and
//! tests run against [`Silent`] so the algorithms stay quiet.

use std::collections::HashSet;

use itertools::Itertools;

use crate::{
    codegen::Matrix,
    ir::{Instruction, Program, VarId, Variable},
    lexer::Token,
};

pub trait Reporter {
    fn tokens(&mut self, _tokens: &[Token]) {}

    fn parsed(&mut self, _program: &Program) {}

    fn liveness_pass(&mut self, _pass: usize, _program: &Program) {}

    fn interference(&mut self, _matrix: &Matrix) {}

    fn allocation(&mut self, _program: &Program) {}

    fn warning(&mut self, message: &str) {
        eprintln!("warning: {}", message);
    }
}

/// Discards every dump.
pub struct Silent;

impl Reporter for Silent {}

/// Prints every phase to stdout.
pub struct Console;

impl Reporter for Console {
    fn tokens(&mut self, tokens: &[Token]) {
        println!("{:<20}{:>25}", "Type:", "Value:");
        println!("{:->46}", " ");
        for token in tokens {
            println!("{:<20}{:>25}", token.kind.to_string(), token.text);
        }
    }

    fn parsed(&mut self, program: &Program) {
        println!(">>>>>======------");
        println!("| Instructions :");
        println!(">>>>>======------");
        for instr in program.instrs() {
            print_instruction(program, instr);
        }

        println!(">>>>>=====-----");
        println!("|  Variables : ");
        println!(">>>>>=====-----");
        for &id in program.mem_vars() {
            print_variable(program, id);
        }
        for &id in program.reg_vars() {
            print_variable(program, id);
        }
        for &id in program.const_vars() {
            print_variable(program, id);
        }
    }

    fn liveness_pass(&mut self, pass: usize, program: &Program) {
        println!(">>>>>=====-----");
        println!("| Iteration {}:", pass);
        println!(">>>>>=====-----");
        for instr in program.instrs() {
            print_instruction(program, instr);
        }
    }

    fn interference(&mut self, matrix: &Matrix) {
        println!("=---===============---=");
        println!("| Interference Matrix |");
        println!("=---===============---=");
        for row in 0..matrix.len() {
            print!("[");
            for col in 0..matrix.len() {
                print!(" {}", u8::from(matrix.is_adj(row, col)));
            }
            println!(" ]");
        }
    }

    fn allocation(&mut self, program: &Program) {
        println!(">>>>>=====-----");
        println!("|  Registers : ");
        println!(">>>>>=====-----");
        for &id in program.reg_vars() {
            print_variable(program, id);
        }
    }
}

fn print_instruction(program: &Program, instr: &Instruction) {
    println!("=------===============------=");
    println!("|      | Instruction |      |");
    println!("=------===============------=");
    println!("|  pos | {}", instr.pos);
    println!("| type | {}", instr.opcode.template());
    println!("|  use |{}", var_names(program, &instr.uses));
    println!("|  def |{}", var_names(program, &instr.defs));
    println!("| succ |{}", positions(&instr.succ.iter().map(|i| i.index()).collect::<Vec<_>>()));
    println!("| pred |{}", positions(&instr.pred.iter().map(|i| i.index()).collect::<Vec<_>>()));
    println!("|   in |{}", var_names(program, &instr.live_in));
    println!("|  out |{}", var_names(program, &instr.live_out));
}

/// Register names sorted by matrix position, each with a leading space.
fn var_names(program: &Program, vars: &HashSet<VarId>) -> String {
    vars.iter()
        .sorted_by_key(|&&id| program.position(id))
        .map(|&id| format!(" {}", program.var(id).name()))
        .collect()
}

fn positions(indices: &[usize]) -> String {
    indices
        .iter()
        .sorted()
        .map(|index| format!(" {}", index))
        .collect()
}

fn print_variable(program: &Program, id: VarId) {
    let var = program.var(id);
    println!(">-------<==========>-------<");
    println!("|       | Variable |       |");
    println!(">-------<==========>-------<");
    println!("> Name : {}", var.name());
    println!("> Type : {}", var.kind_name());
    match var {
        Variable::Register { assignment, .. } => {
            let value = assignment
                .map(|reg| reg.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("> Value: {}", value);
        }
        Variable::Memory { init, .. } => println!("> Value: {}", init),
        Variable::Constant { value } => println!("> Value: {}", value),
        Variable::Label { defined, .. } => println!("> Value: {}", defined),
    }
}
