//! Renders an allocated program as MIPS-compatible assembly text.

use crate::ir::{Instruction, Program, Variable};

pub fn assembly(program: &Program) -> String {
    let entry = program
        .entry_label()
        .expect("the first instruction is the entry function");

    let mut out = String::new();
    out.push_str(&format!(".globl {}\n\n", entry));

    out.push_str(".data\n");
    for &id in program.mem_vars() {
        if let Variable::Memory { name, init } = program.var(id) {
            out.push_str(&format!("{}:\t.word {}\n", name, init));
        }
    }
    out.push('\n');

    out.push_str(".text\n");
    for instr in program.instrs() {
        out.push_str(&render(program, instr));
        out.push('\n');
    }
    out.push_str("\tjr $ra");

    out
}

/// One source line (two for a labeled instruction). Placeholders are filled
/// left to right from the destination list, then the source list.
fn render(program: &Program, instr: &Instruction) -> String {
    let mut body = instr.opcode.template().to_string();
    for &var in instr.dst.iter().chain(instr.src.iter()) {
        substitute(&mut body, &program.var(var).render());
    }

    match instr.label {
        Some(label) => {
            let label = program.var(label).name();
            if instr.is_func() {
                format!("{}:", label)
            } else {
                format!("{}:\n\t{}", label, body)
            }
        }
        None => format!("\t{}", body),
    }
}

/// Replaces the leftmost two-character `'x` placeholder.
fn substitute(template: &mut String, with: &str) {
    if let Some(at) = template.find('\'') {
        template.replace_range(at..at + 2, with);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{codegen, lexer::tokenize, parser, report::Silent};

    fn compile(source: &str) -> String {
        let mut program = parser::parse(&tokenize(source.as_bytes()).unwrap()).unwrap();
        codegen::alloc(&mut program, &mut Silent).unwrap();
        assembly(&program)
    }

    #[test]
    fn smoke_layout() {
        let asm = compile("_func main;\n_reg r1;\nli r1, 0;\nnop;\n");
        assert_eq!(
            ".globl main\n\
             \n\
             .data\n\
             \n\
             .text\n\
             main:\n\
             \tli $t0, 0\n\
             \tnop\n\
             \tjr $ra",
            asm
        );
    }

    #[test]
    fn data_section_lists_memory_cells_in_declaration_order() {
        let asm = compile(
            "_func main;\n\
             _mem m1 5;\n\
             _mem m2 -3;\n\
             _reg r1;\n\
             la r1, m1;\n",
        );
        assert!(asm.contains(".data\nm1:\t.word 5\nm2:\t.word -3\n"));
    }

    #[test]
    fn labeled_instruction_gets_its_own_label_line() {
        let asm = compile(
            "_func main;\n\
             _reg r1;\n\
             li r1, -1;\n\
             bltz r1, done;\n\
             li r1, 0;\n\
             done: nop;\n",
        );
        assert_eq!(
            ".globl main\n\
             \n\
             .data\n\
             \n\
             .text\n\
             main:\n\
             \tli $t0, -1\n\
             \tbltz $t0, done\n\
             \tli $t0, 0\n\
             done:\n\
             \tnop\n\
             \tjr $ra",
            asm
        );
    }

    #[test]
    fn memory_and_offset_operands_render_by_position() {
        let asm = compile(
            "_func main;\n\
             _reg r1; _reg r2;\n\
             _mem m1 0;\n\
             la r1, m1;\n\
             lw r2, 4(r1);\n\
             sw r2, 8(r1);\n",
        );
        // r1 and r2 overlap across the loads, so they sit in different
        // registers; the popping order hands r2 the first color.
        assert!(asm.contains("\tla $t1, m1\n"));
        assert!(asm.contains("\tlw $t0, 4($t1)\n"));
        assert!(asm.contains("\tsw $t0, 8($t1)\n"));
    }

    #[test]
    fn bne_renders_both_registers_and_the_label() {
        let asm = compile(
            "_func main;\n\
             _reg r1; _reg r2;\n\
             li r1, 0;\n\
             li r2, 1;\n\
             loop: addi r1, r1, 1;\n\
             bne r1, r2, loop;\n\
             nop;\n",
        );
        assert!(asm.contains("loop:\n\taddi "));
        let bne = asm
            .lines()
            .find(|line| line.contains("bne"))
            .expect("bne line emitted");
        assert!(bne.starts_with("\tbne $t"));
        assert!(bne.ends_with(", loop"));
    }

    #[test]
    fn ends_without_trailing_newline() {
        let asm = compile("_func main;\nnop;\n");
        assert!(asm.ends_with("\tjr $ra"));
    }
}
