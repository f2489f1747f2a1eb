use crate::ir::Program;

/// Undirected adjacency matrix over register-variable positions. Always
/// symmetric with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix(Vec<Vec<bool>>);

impl Matrix {
    pub fn new(n: usize) -> Self {
        Self(vec![vec![false; n]; n])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn link(&mut self, one: usize, other: usize) {
        assert_ne!(one, other, "a node never interferes with itself");
        self.0[one][other] = true;
        self.0[other][one] = true;
    }

    pub fn is_adj(&self, one: usize, other: usize) -> bool {
        assert_eq!(self.0[one][other], self.0[other][one]);
        self.0[one][other]
    }
}

/// A destination that is live-out conflicts with everything else that is
/// live-out across the same instruction.
pub fn interference(program: &Program) -> Matrix {
    let mut matrix = Matrix::new(program.reg_count());
    for instr in program.instrs() {
        for &def in &instr.defs {
            if !instr.live_out.contains(&def) {
                continue;
            }
            for &live in &instr.live_out {
                if live != def {
                    matrix.link(program.position(live), program.position(def));
                }
            }
        }
    }
    matrix
}
