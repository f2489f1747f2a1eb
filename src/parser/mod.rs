use thiserror::Error;

use crate::{
    ir::{Opcode, Program, VarId},
    lexer::{Punct, Reserved, Token, TokenKind},
};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("expected {expected}, found {found}")]
    WrongToken { expected: String, found: String },

    #[error("memory variable `{0}` already exists")]
    MemoryVarExists(String),

    #[error("register variable `{0}` already exists")]
    RegisterVarExists(String),

    #[error("label `{0}` already exists")]
    LabelExists(String),

    #[error("variable `{0}` doesn't exist")]
    VariableDoesntExist(String),

    #[error("label `{0}` doesn't exist")]
    LabelDoesntExist(String),

    #[error("invalid integer literal `{0}`")]
    InvalidLiteral(String),

    #[error("program doesn't start with a function")]
    NoMainFunc,

    #[error("more than one function in program")]
    TooManyFuncs,
}

pub fn parse(tokens: &[Token]) -> Result<Program> {
    Parser::new(tokens).parse()
}

struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
    program: Program,
    pending_label: Option<VarId>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            program: Program::new(),
            pending_label: None,
        }
    }

    fn parse(mut self) -> Result<Program> {
        loop {
            match self.peek().kind {
                TokenKind::Eof => {
                    self.bump();
                    break;
                }
                TokenKind::Comment => {
                    self.bump();
                }
                _ => {
                    self.statement()?;
                    self.eat(TokenKind::Punct(Punct::Semicolon))?;
                }
            }
        }
        self.check_labels()?;
        self.check_functions()?;
        Ok(self.program)
    }

    fn peek(&self) -> &'a Token {
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> &'a Token {
        let token = self.peek();
        self.cursor += 1;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> Result<&'a Token> {
        let token = self.peek();
        if token.kind == kind {
            Ok(self.bump())
        } else {
            Err(Error::WrongToken {
                expected: kind.to_string(),
                found: token.kind.to_string(),
            })
        }
    }

    fn statement(&mut self) -> Result<()> {
        self.pending_label = None;
        match self.peek().kind {
            TokenKind::Reserved(Reserved::Mem) => {
                self.bump();
                self.declare_mem()
            }
            TokenKind::Reserved(Reserved::Reg) => {
                self.bump();
                self.declare_reg()
            }
            TokenKind::Reserved(Reserved::Func) => {
                self.bump();
                self.declare_func()
            }
            TokenKind::Ident => self.labeled_instruction(),
            _ => self.instruction(),
        }
    }

    fn declare_mem(&mut self) -> Result<()> {
        let name = self.eat(TokenKind::MemId)?.text.clone();
        if self.program.find_mem(&name).is_some() {
            return Err(Error::MemoryVarExists(name));
        }
        let init = self.int_literal()?;
        self.program.new_mem(name, init);
        Ok(())
    }

    fn declare_reg(&mut self) -> Result<()> {
        let name = self.eat(TokenKind::RegId)?.text.clone();
        if self.program.find_reg(&name).is_some() {
            return Err(Error::RegisterVarExists(name));
        }
        self.program.new_reg(name);
        Ok(())
    }

    fn declare_func(&mut self) -> Result<()> {
        let label = self.define_label()?;
        self.program
            .push_instr(Opcode::Func, Some(label), Vec::new(), Vec::new());
        Ok(())
    }

    fn labeled_instruction(&mut self) -> Result<()> {
        let label = self.define_label()?;
        self.pending_label = Some(label);
        self.eat(TokenKind::Punct(Punct::Colon))?;
        self.instruction()
    }

    /// Flips the label's `defined` flag, reusing the entry a forward branch
    /// may already have created.
    fn define_label(&mut self) -> Result<VarId> {
        let name = self.eat(TokenKind::Ident)?.text.clone();
        match self.program.find_label(&name) {
            Some(id) if self.program.is_label_defined(id) => Err(Error::LabelExists(name)),
            Some(id) => {
                self.program.mark_label_defined(id);
                Ok(id)
            }
            None => Ok(self.program.new_label(name, true)),
        }
    }

    fn instruction(&mut self) -> Result<()> {
        let found = self.peek().kind;
        let word = match found {
            TokenKind::Reserved(word) => word,
            _ => {
                return Err(Error::WrongToken {
                    expected: "an instruction".to_string(),
                    found: found.to_string(),
                })
            }
        };
        self.bump();

        let (opcode, dst, src) = match word {
            Reserved::Add => self.reg_reg_reg(Opcode::Add)?,
            Reserved::Sub => self.reg_reg_reg(Opcode::Sub)?,
            Reserved::And => self.reg_reg_reg(Opcode::And)?,
            Reserved::Or => self.reg_reg_reg(Opcode::Or)?,
            Reserved::Addi => {
                let dst = self.reg_operand()?;
                self.comma()?;
                let src = self.reg_operand()?;
                self.comma()?;
                let imm = self.const_operand()?;
                (Opcode::Addi, vec![dst], vec![src, imm])
            }
            Reserved::Not => {
                let dst = self.reg_operand()?;
                self.comma()?;
                let src = self.reg_operand()?;
                (Opcode::Not, vec![dst], vec![src])
            }
            Reserved::La => {
                let dst = self.reg_operand()?;
                self.comma()?;
                let cell = self.mem_operand()?;
                (Opcode::La, vec![dst], vec![cell])
            }
            Reserved::Li => {
                let dst = self.reg_operand()?;
                self.comma()?;
                let imm = self.const_operand()?;
                (Opcode::Li, vec![dst], vec![imm])
            }
            Reserved::Lw => {
                let dst = self.reg_operand()?;
                self.comma()?;
                let (offset, base) = self.address_operand()?;
                (Opcode::Lw, vec![dst], vec![offset, base])
            }
            Reserved::Sw => {
                let value = self.reg_operand()?;
                self.comma()?;
                let (offset, base) = self.address_operand()?;
                (Opcode::Sw, Vec::new(), vec![value, offset, base])
            }
            Reserved::B => {
                let target = self.label_operand()?;
                (Opcode::B, Vec::new(), vec![target])
            }
            Reserved::Bltz => {
                let src = self.reg_operand()?;
                self.comma()?;
                let target = self.label_operand()?;
                (Opcode::Bltz, Vec::new(), vec![src, target])
            }
            Reserved::Bne => {
                let lhs = self.reg_operand()?;
                self.comma()?;
                let rhs = self.reg_operand()?;
                self.comma()?;
                let target = self.label_operand()?;
                (Opcode::Bne, Vec::new(), vec![lhs, rhs, target])
            }
            Reserved::Nop => (Opcode::Nop, Vec::new(), Vec::new()),
            Reserved::Mem | Reserved::Reg | Reserved::Func => {
                return Err(Error::WrongToken {
                    expected: "an instruction".to_string(),
                    found: found.to_string(),
                })
            }
        };

        let label = self.pending_label.take();
        self.program.push_instr(opcode, label, dst, src);
        Ok(())
    }

    fn reg_reg_reg(&mut self, opcode: Opcode) -> Result<(Opcode, Vec<VarId>, Vec<VarId>)> {
        let dst = self.reg_operand()?;
        self.comma()?;
        let lhs = self.reg_operand()?;
        self.comma()?;
        let rhs = self.reg_operand()?;
        Ok((opcode, vec![dst], vec![lhs, rhs]))
    }

    /// `intLit '(' regId ')'`, the base register is a source.
    fn address_operand(&mut self) -> Result<(VarId, VarId)> {
        let offset = self.const_operand()?;
        self.eat(TokenKind::Punct(Punct::LParen))?;
        let base = self.reg_operand()?;
        self.eat(TokenKind::Punct(Punct::RParen))?;
        Ok((offset, base))
    }

    fn reg_operand(&mut self) -> Result<VarId> {
        let name = self.eat(TokenKind::RegId)?.text.clone();
        self.program
            .find_reg(&name)
            .ok_or(Error::VariableDoesntExist(name))
    }

    fn mem_operand(&mut self) -> Result<VarId> {
        let name = self.eat(TokenKind::MemId)?.text.clone();
        self.program
            .find_mem(&name)
            .ok_or(Error::VariableDoesntExist(name))
    }

    fn const_operand(&mut self) -> Result<VarId> {
        let value = self.int_literal()?;
        Ok(self.program.const_var(value))
    }

    fn label_operand(&mut self) -> Result<VarId> {
        let name = self.eat(TokenKind::Ident)?.text.clone();
        Ok(self.program.label_ref(name))
    }

    fn int_literal(&mut self) -> Result<i32> {
        let text = self.eat(TokenKind::Num)?.text.clone();
        text.parse().map_err(|_| Error::InvalidLiteral(text))
    }

    fn comma(&mut self) -> Result<()> {
        self.eat(TokenKind::Punct(Punct::Comma))?;
        Ok(())
    }

    fn check_labels(&self) -> Result<()> {
        for &id in self.program.label_vars() {
            if !self.program.is_label_defined(id) {
                return Err(Error::LabelDoesntExist(self.program.var(id).name()));
            }
        }
        Ok(())
    }

    fn check_functions(&self) -> Result<()> {
        match self.program.instrs().first() {
            Some(first) if first.is_func() => {}
            _ => return Err(Error::NoMainFunc),
        }
        let funcs = self
            .program
            .instrs()
            .iter()
            .filter(|instr| instr.is_func())
            .count();
        if funcs != 1 {
            return Err(Error::TooManyFuncs);
        }
        Ok(())
    }
}
