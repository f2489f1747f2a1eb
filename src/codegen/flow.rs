use std::collections::HashSet;

use crate::ir::{InstrId, Opcode, Program, VarId};

/// Annotates every instruction with control-flow edges and its USE/DEF sets.
pub fn build(program: &mut Program) {
    set_edges(program);
    set_use_def(program);
}

fn set_edges(program: &mut Program) {
    let count = program.instrs().len();
    if count < 2 {
        return;
    }

    // `fall_through` goes false for exactly one step after an unconditional
    // branch; a function header never receives the fall-through edge either.
    let mut fall_through = true;
    let mut prev = 0;
    let mut curr = 1;
    while curr < count {
        if !program.instr(InstrId::new(prev)).is_func() && fall_through {
            program.link(InstrId::new(prev), InstrId::new(curr));
        }
        fall_through = true;

        match program.instr(InstrId::new(curr)).opcode {
            Opcode::B => {
                fall_through = false;
                link_branch_target(program, curr);
            }
            Opcode::Bltz | Opcode::Bne => link_branch_target(program, curr),
            _ => {}
        }

        prev = curr;
        curr += 1;
        // A function header does not fall through from the instruction
        // before it.
        if curr < count && program.instr(InstrId::new(curr)).is_func() {
            curr += 1;
        }
    }
}

fn link_branch_target(program: &mut Program, from: usize) {
    let label = *program
        .instr(InstrId::new(from))
        .src
        .last()
        .expect("a branch carries its label as the last source");
    let mut target = program
        .labeled_instr(label)
        .expect("every referenced label is defined after parsing");
    if program.instr(target).is_func() {
        let next = target.index() + 1;
        if next >= program.instrs().len() {
            return;
        }
        target = InstrId::new(next);
    }
    program.link(InstrId::new(from), target);
}

fn set_use_def(program: &mut Program) {
    for id in program.instr_ids().collect::<Vec<_>>() {
        let instr = program.instr(id);
        let defs: HashSet<VarId> = instr
            .dst
            .iter()
            .copied()
            .filter(|&var| program.var(var).is_register())
            .collect();
        let uses: HashSet<VarId> = instr
            .src
            .iter()
            .copied()
            .filter(|&var| program.var(var).is_register())
            .collect();

        let instr = program.instr_mut(id);
        instr.defs = defs;
        instr.uses = uses;
    }
}
