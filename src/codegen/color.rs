use std::collections::HashSet;

use crate::ir::{Program, Reg};

use super::{graph::Matrix, Error};

/// Chaitin-style assignment: build the simplification stack, then pop and
/// give every variable the lowest register its already-colored neighbors
/// leave free. There is no spilling; an uncolorable graph is an error.
pub fn color(program: &mut Program, matrix: &Matrix) -> Result<(), Error> {
    let mut stack = simplification_stack(matrix)?;

    let mut colored: Vec<usize> = Vec::new();
    while let Some(pos) = stack.pop() {
        let forbidden: HashSet<Reg> = colored
            .iter()
            .copied()
            .filter(|&other| matrix.is_adj(pos, other))
            .map(|other| {
                program
                    .assignment(program.reg_at(other))
                    .expect("popped variables are already colored")
            })
            .collect();

        let reg = Reg::ALL
            .into_iter()
            .find(|reg| !forbidden.contains(reg))
            .ok_or(Error::NotEnoughRegisters(Reg::ALL.len()))?;

        program.assign(program.reg_at(pos), reg);
        colored.push(pos);
    }

    Ok(())
}

/// Repeatedly removes a colorable node (degree < K) from a working copy of
/// the graph, preferring the most-constrained one; ties go to the lowest
/// position. Fails as soon as no node is colorable.
fn simplification_stack(matrix: &Matrix) -> Result<Vec<usize>, Error> {
    let k = Reg::ALL.len();
    let n = matrix.len();
    let mut alive = vec![true; n];
    let mut stack = Vec::with_capacity(n);

    for _ in 0..n {
        let mut best: Option<(usize, usize)> = None;
        for pos in 0..n {
            if !alive[pos] {
                continue;
            }
            let degree = (0..n)
                .filter(|&other| alive[other] && other != pos && matrix.is_adj(pos, other))
                .count();
            if degree >= k {
                continue;
            }
            if best.map_or(true, |(_, best_degree)| degree > best_degree) {
                best = Some((pos, degree));
            }
        }

        let (pick, _) = best.ok_or(Error::NotEnoughRegisters(k))?;
        alive[pick] = false;
        stack.push(pick);
    }

    Ok(stack)
}
