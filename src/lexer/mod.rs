mod dfa;
mod error;
mod token;

pub use error::Error;
pub use token::{Punct, Reserved, Token, TokenKind};

type Result<T> = std::result::Result<T, Error>;

/// Maximal-munch scanner over an in-memory byte buffer.
pub struct Lexer<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Longest-prefix token at the current offset. Produces a one-byte
    /// [`TokenKind::Error`] token when no prefix is accepted, and the EOF
    /// sentinel once the buffer is exhausted.
    pub fn next_token(&mut self) -> Token {
        if self.offset >= self.buffer.len() {
            return Token::eof();
        }

        let mut state = dfa::START;
        let mut last_accepting: Option<(TokenKind, usize)> = None;
        let mut cursor = self.offset;

        loop {
            let next = match self.buffer.get(cursor) {
                Some(&byte) => dfa::next_state(state, byte),
                None => dfa::INVALID,
            };
            cursor += 1;

            if next != dfa::IDLE && next != dfa::INVALID {
                // A transition back into the start state would never make
                // progress again.
                assert_ne!(next, dfa::START, "scanner re-entered its start state");
                state = next;
                if let Some(kind) = dfa::state_token(state) {
                    last_accepting = Some((kind, cursor));
                }
            } else {
                return match last_accepting {
                    Some((kind, end)) => {
                        let text = String::from_utf8_lossy(&self.buffer[self.offset..end]);
                        let token = Token::new(kind, text);
                        self.offset = end;
                        token
                    }
                    None => {
                        let byte = self.buffer[self.offset];
                        self.offset += 1;
                        Token::new(TokenKind::Error, char::from(byte).to_string())
                    }
                };
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token {
                kind: TokenKind::Eof,
                ..
            } => None,
            token => Some(token),
        }
    }
}

/// Scans the whole buffer, dropping whitespace and stopping at the first
/// unrecognized byte. The returned stream always ends with the EOF token.
pub fn tokenize(source: &[u8]) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let at = lexer.offset();
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Whitespace => continue,
            TokenKind::Error => {
                return Err(Error {
                    byte: source[at],
                    offset: at,
                })
            }
            TokenKind::Eof => {
                tokens.push(token);
                return Ok(tokens);
            }
            _ => tokens.push(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source.as_bytes())
            .filter(|token| token.kind != TokenKind::Whitespace)
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn reserved_words() {
        let source = "_mem _reg _func add addi sub la li lw sw bltz b nop and or not bne";
        let expected: Vec<_> = Reserved::iter().map(TokenKind::Reserved).collect();
        assert_eq!(expected, kinds(source));
    }

    #[test]
    fn punctuation() {
        let expected: Vec<_> = Punct::iter().map(TokenKind::Punct).collect();
        assert_eq!(expected, kinds(",():;"));
    }

    #[test]
    fn identifiers_split_by_leading_character() {
        assert_eq!(vec![TokenKind::MemId], kinds("m12"));
        assert_eq!(vec![TokenKind::RegId], kinds("r3"));
        assert_eq!(vec![TokenKind::Ident], kinds("m12x"));
        assert_eq!(vec![TokenKind::Ident], kinds("main"));
        assert_eq!(vec![TokenKind::Ident], kinds("_memx"));
        assert_eq!(vec![TokenKind::Ident], kinds("addx"));
    }

    #[test]
    fn longest_prefix_wins() {
        let tokens: Vec<_> = Lexer::new(b"addi".as_slice()).collect();
        assert_eq!(1, tokens.len());
        assert_eq!(TokenKind::Reserved(Reserved::Addi), tokens[0].kind);

        let tokens: Vec<_> = Lexer::new(b"123main".as_slice()).collect();
        assert_eq!(
            vec![TokenKind::Num, TokenKind::Ident],
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>()
        );
        assert_eq!("123", tokens[0].text);
        assert_eq!("main", tokens[1].text);
    }

    #[test]
    fn negative_literals() {
        let tokens: Vec<_> = Lexer::new(b"-17".as_slice()).collect();
        assert_eq!(1, tokens.len());
        assert_eq!(TokenKind::Num, tokens[0].kind);
        assert_eq!("-17", tokens[0].text);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let tokens: Vec<_> = Lexer::new(b"# add r1, r2\nnop".as_slice())
            .filter(|t| t.kind != TokenKind::Whitespace)
            .collect();
        assert_eq!(TokenKind::Comment, tokens[0].kind);
        assert_eq!("# add r1, r2", tokens[0].text);
        assert_eq!(TokenKind::Reserved(Reserved::Nop), tokens[1].kind);
    }

    #[test]
    fn spans_cover_the_buffer() {
        let sources = [
            "begin: addi r10, r1, -42; # note\nnop;",
            "_func main;_reg r1;li r1, 0;",
            "123main m1x r2z ??? \t\n_me",
        ];
        for source in sources {
            let mut lexer = Lexer::new(source.as_bytes());
            let mut covered = String::new();
            loop {
                let token = lexer.next_token();
                if token.kind == TokenKind::Eof {
                    break;
                }
                covered.push_str(&token.text);
            }
            assert_eq!(source, covered);
        }
    }

    #[test]
    fn error_token_consumes_one_byte() {
        let mut lexer = Lexer::new(b"r1 $x".as_slice());
        let mut seen = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            seen.push(token);
        }
        assert_eq!(TokenKind::Error, seen[2].kind);
        assert_eq!("$", seen[2].text);
        assert_eq!(TokenKind::Ident, seen[3].kind);
        assert_eq!("x", seen[3].text);
    }

    #[test]
    fn tokenize_reports_the_offending_byte() {
        let err = tokenize(b"nop @".as_slice()).unwrap_err();
        assert_eq!(b'@', err.byte);
        assert_eq!(4, err.offset);
    }

    #[test]
    fn tokenize_keeps_comments_and_ends_with_eof() {
        let tokens = tokenize(b"# header\nnop;".as_slice()).unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            vec![
                TokenKind::Comment,
                TokenKind::Reserved(Reserved::Nop),
                TokenKind::Punct(Punct::Semicolon),
                TokenKind::Eof,
            ],
            kinds
        );
    }
}
