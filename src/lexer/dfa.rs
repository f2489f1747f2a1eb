//! State tables for the scanner.
//!
//! The automaton has 52 states over a 47-character alphabet. State 0 is the
//! idle state ("no further transition"), state 1 the start state. Every other
//! state accepts some token: keyword prefixes accept as plain identifiers
//! until the full word is read, so maximal munch falls out of the table
//! shape. Unsupported bytes have no column and drive the machine to
//! [`INVALID`].

use once_cell::sync::Lazy;

use super::token::{Punct, Reserved, TokenKind};

pub(crate) const NUM_STATES: usize = 52;
pub(crate) const NUM_CHARACTERS: usize = 47;

pub(crate) type State = u8;

pub(crate) const IDLE: State = 0;
pub(crate) const START: State = 1;
/// Out-of-range sentinel: end of input or a byte outside the alphabet.
pub(crate) const INVALID: State = NUM_STATES as State;

const IDENT: State = 2;
const NUM: State = 3;
const WHITESPACE: State = 4;
const COMMENT: State = 5;
const COMMA: State = 6;
const LPAREN: State = 7;
const RPAREN: State = 8;
const COLON: State = 9;
const SEMICOLON: State = 10;
const M: State = 11;
const M_ID: State = 12;
const R: State = 13;
const R_ID: State = 14;
const UNDER: State = 15;
const U_M: State = 16;
const U_ME: State = 17;
const U_MEM: State = 18;
const U_R: State = 19;
const U_RE: State = 20;
const U_REG: State = 21;
const U_F: State = 22;
const U_FU: State = 23;
const U_FUN: State = 24;
const U_FUNC: State = 25;
const A: State = 26;
const AD: State = 27;
const ADD: State = 28;
const ADDI: State = 29;
const AN: State = 30;
const AND: State = 31;
const B: State = 32;
const BL: State = 33;
const BLT: State = 34;
const BLTZ: State = 35;
const BN: State = 36;
const BNE: State = 37;
const L: State = 38;
const LA: State = 39;
const LI: State = 40;
const LW: State = 41;
const N: State = 42;
const NO: State = 43;
const NOP: State = 44;
const NOT: State = 45;
const O: State = 46;
const OR: State = 47;
const S: State = 48;
const SU: State = 49;
const SUB: State = 50;
const SW: State = 51;

/// Column of `byte` in the transition matrix, or `None` outside the
/// alphabet.
pub(crate) fn char_class(byte: u8) -> Option<usize> {
    match byte {
        b'a'..=b'z' => Some((byte - b'a') as usize),
        b'0'..=b'9' => Some(26 + (byte - b'0') as usize),
        b'_' => Some(36),
        b'-' => Some(37),
        b',' => Some(38),
        b'(' => Some(39),
        b')' => Some(40),
        b':' => Some(41),
        b';' => Some(42),
        b'#' => Some(43),
        b' ' => Some(44),
        b'\t' => Some(45),
        b'\n' => Some(46),
        _ => None,
    }
}

pub(crate) fn next_state(state: State, byte: u8) -> State {
    match char_class(byte) {
        Some(class) => TRANSITIONS[state as usize][class],
        None => INVALID,
    }
}

/// Token accepted in `state`, or `None` for the two non-final states.
pub(crate) fn state_token(state: State) -> Option<TokenKind> {
    let kind = match state {
        IDENT | M | R | UNDER | U_M | U_ME | U_R | U_RE | U_F | U_FU | U_FUN | A | AD | AN
        | BL | BLT | BN | L | N | NO | O | S | SU => TokenKind::Ident,
        M_ID => TokenKind::MemId,
        R_ID => TokenKind::RegId,
        NUM => TokenKind::Num,
        WHITESPACE => TokenKind::Whitespace,
        COMMENT => TokenKind::Comment,
        COMMA => TokenKind::Punct(Punct::Comma),
        LPAREN => TokenKind::Punct(Punct::LParen),
        RPAREN => TokenKind::Punct(Punct::RParen),
        COLON => TokenKind::Punct(Punct::Colon),
        SEMICOLON => TokenKind::Punct(Punct::Semicolon),
        U_MEM => TokenKind::Reserved(Reserved::Mem),
        U_REG => TokenKind::Reserved(Reserved::Reg),
        U_FUNC => TokenKind::Reserved(Reserved::Func),
        ADD => TokenKind::Reserved(Reserved::Add),
        ADDI => TokenKind::Reserved(Reserved::Addi),
        AND => TokenKind::Reserved(Reserved::And),
        B => TokenKind::Reserved(Reserved::B),
        BLTZ => TokenKind::Reserved(Reserved::Bltz),
        BNE => TokenKind::Reserved(Reserved::Bne),
        LA => TokenKind::Reserved(Reserved::La),
        LI => TokenKind::Reserved(Reserved::Li),
        LW => TokenKind::Reserved(Reserved::Lw),
        NOP => TokenKind::Reserved(Reserved::Nop),
        NOT => TokenKind::Reserved(Reserved::Not),
        OR => TokenKind::Reserved(Reserved::Or),
        SUB => TokenKind::Reserved(Reserved::Sub),
        SW => TokenKind::Reserved(Reserved::Sw),
        _ => return None,
    };
    Some(kind)
}

type Table = [[State; NUM_CHARACTERS]; NUM_STATES];

static TRANSITIONS: Lazy<Table> = Lazy::new(build_table);

fn set(table: &mut Table, from: State, byte: u8, to: State) {
    let class = char_class(byte).expect("byte belongs to the alphabet");
    table[from as usize][class] = to;
}

fn word_bytes() -> impl Iterator<Item = u8> {
    (b'a'..=b'z').chain(b'0'..=b'9').chain([b'_'])
}

fn build_table() -> Table {
    let mut table = [[IDLE; NUM_CHARACTERS]; NUM_STATES];

    // Every keyword-prefix state behaves as an identifier on word
    // characters; specific keyword steps overwrite these defaults below.
    let ident_like = [
        IDENT, M, M_ID, R, R_ID, UNDER, U_M, U_ME, U_MEM, U_R, U_RE, U_REG, U_F, U_FU, U_FUN,
        U_FUNC, A, AD, ADD, ADDI, AN, AND, B, BL, BLT, BLTZ, BN, BNE, L, LA, LI, LW, N, NO,
        NOP, NOT, O, OR, S, SU, SUB, SW,
    ];
    for state in ident_like {
        for byte in word_bytes() {
            set(&mut table, state, byte, IDENT);
        }
    }

    // Start dispatch.
    for byte in b'a'..=b'z' {
        set(&mut table, START, byte, IDENT);
    }
    set(&mut table, START, b'a', A);
    set(&mut table, START, b'b', B);
    set(&mut table, START, b'l', L);
    set(&mut table, START, b'm', M);
    set(&mut table, START, b'n', N);
    set(&mut table, START, b'o', O);
    set(&mut table, START, b'r', R);
    set(&mut table, START, b's', S);
    set(&mut table, START, b'_', UNDER);
    for byte in b'0'..=b'9' {
        set(&mut table, START, byte, NUM);
    }
    set(&mut table, START, b'-', NUM);
    set(&mut table, START, b'#', COMMENT);
    for byte in [b' ', b'\t', b'\n'] {
        set(&mut table, START, byte, WHITESPACE);
        set(&mut table, WHITESPACE, byte, WHITESPACE);
    }
    set(&mut table, START, b',', COMMA);
    set(&mut table, START, b'(', LPAREN);
    set(&mut table, START, b')', RPAREN);
    set(&mut table, START, b':', COLON);
    set(&mut table, START, b';', SEMICOLON);

    // Numbers.
    for byte in b'0'..=b'9' {
        set(&mut table, NUM, byte, NUM);
        set(&mut table, M, byte, M_ID);
        set(&mut table, M_ID, byte, M_ID);
        set(&mut table, R, byte, R_ID);
        set(&mut table, R_ID, byte, R_ID);
    }

    // Comments run to end of line.
    for class in 0..NUM_CHARACTERS {
        table[COMMENT as usize][class] = COMMENT;
    }
    set(&mut table, COMMENT, b'\n', IDLE);

    // Keyword trie.
    set(&mut table, UNDER, b'm', U_M);
    set(&mut table, UNDER, b'r', U_R);
    set(&mut table, UNDER, b'f', U_F);
    set(&mut table, U_M, b'e', U_ME);
    set(&mut table, U_ME, b'm', U_MEM);
    set(&mut table, U_R, b'e', U_RE);
    set(&mut table, U_RE, b'g', U_REG);
    set(&mut table, U_F, b'u', U_FU);
    set(&mut table, U_FU, b'n', U_FUN);
    set(&mut table, U_FUN, b'c', U_FUNC);
    set(&mut table, A, b'd', AD);
    set(&mut table, A, b'n', AN);
    set(&mut table, AD, b'd', ADD);
    set(&mut table, ADD, b'i', ADDI);
    set(&mut table, AN, b'd', AND);
    set(&mut table, B, b'l', BL);
    set(&mut table, B, b'n', BN);
    set(&mut table, BL, b't', BLT);
    set(&mut table, BLT, b'z', BLTZ);
    set(&mut table, BN, b'e', BNE);
    set(&mut table, L, b'a', LA);
    set(&mut table, L, b'i', LI);
    set(&mut table, L, b'w', LW);
    set(&mut table, N, b'o', NO);
    set(&mut table, NO, b'p', NOP);
    set(&mut table, NO, b't', NOT);
    set(&mut table, O, b'r', OR);
    set(&mut table, S, b'u', SU);
    set(&mut table, S, b'w', SW);

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_beyond_start_accepts() {
        for state in 2..NUM_STATES as State {
            assert!(state_token(state).is_some(), "state {} is not final", state);
        }
        assert!(state_token(IDLE).is_none());
        assert!(state_token(START).is_none());
    }

    #[test]
    fn no_transition_reenters_start() {
        for row in TRANSITIONS.iter() {
            assert!(row.iter().all(|&next| next != START));
        }
    }

    #[test]
    fn alphabet_has_47_distinct_columns() {
        let mut seen = [false; NUM_CHARACTERS];
        for byte in 0..=u8::MAX {
            if let Some(class) = char_class(byte) {
                assert!(!seen[class], "column {} mapped twice", class);
                seen[class] = true;
            }
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn keyword_paths_reach_their_states() {
        let walk = |word: &str| {
            word.bytes()
                .fold(START, |state, byte| next_state(state, byte))
        };
        assert_eq!(Some(TokenKind::Reserved(Reserved::Mem)), state_token(walk("_mem")));
        assert_eq!(Some(TokenKind::Reserved(Reserved::Bltz)), state_token(walk("bltz")));
        assert_eq!(Some(TokenKind::Reserved(Reserved::Bne)), state_token(walk("bne")));
        assert_eq!(Some(TokenKind::Ident), state_token(walk("blt")));
        assert_eq!(Some(TokenKind::Ident), state_token(walk("bltza")));
        assert_eq!(Some(TokenKind::RegId), state_token(walk("r12")));
        assert_eq!(Some(TokenKind::MemId), state_token(walk("m0")));
        assert_eq!(Some(TokenKind::Ident), state_token(walk("m0x")));
        assert_eq!(Some(TokenKind::Num), state_token(walk("-41")));
    }
}
