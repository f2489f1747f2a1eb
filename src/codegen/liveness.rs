use std::collections::HashSet;

use crate::{
    ir::{InstrId, Program, VarId},
    report::Reporter,
};

/// Passes after which a warning is raised. The dataflow still runs to its
/// fixpoint; the limit only surfaces inputs that take suspiciously long.
const PASS_WARN_LIMIT: usize = 10;

/// Backward liveness: IN = USE ∪ (OUT \ DEF), OUT = ∪ IN(succ), recomputed
/// over the instruction list in reverse until a full pass changes nothing.
pub fn analyze(program: &mut Program, reporter: &mut dyn Reporter) {
    let count = program.instrs().len();
    let mut pass = 0;
    loop {
        pass += 1;
        let mut changed = false;

        for index in (0..count).rev() {
            let id = InstrId::new(index);
            let out: HashSet<VarId> = program
                .instr(id)
                .succ
                .iter()
                .flat_map(|&succ| program.instr(succ).live_in.iter().copied())
                .collect();

            let instr = program.instr(id);
            let new_in: HashSet<VarId> =
                instr.uses.union(&(&out - &instr.defs)).copied().collect();

            changed |= out != instr.live_out || new_in != instr.live_in;

            let instr = program.instr_mut(id);
            instr.live_out = out;
            instr.live_in = new_in;
        }

        reporter.liveness_pass(pass, program);

        if !changed {
            break;
        }
        if pass == PASS_WARN_LIMIT {
            reporter.warning(&format!(
                "liveness did not settle within {} passes",
                PASS_WARN_LIMIT
            ));
        }
    }
}
