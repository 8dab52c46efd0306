//! # toksim-lang
//!
//! Lexical front-ends: they turn file contents into the token stream the
//! comparison engine consumes, plus newline events for source-line
//! recovery.
//!
//! Two scanners are provided. The *text* scanner interns every word and
//! skips everything else. The *code* scanner handles the C family loosely:
//! comments and whitespace vanish, literals fold to one token per class,
//! identifiers fold to a single generic token (so renamed variables still
//! match) while keywords keep their identity. `-F` additionally keeps the
//! identity of identifiers that name calls; `-f` drops everything outside
//! brace-delimited bodies.
//!
//! Interning is corpus-global: the same lexeme maps to the same token id in
//! every file of one invocation, and ids are assigned in first-encounter
//! order, so identical inputs yield identical token streams.

use rustc_hash::FxHashMap;
use toksim_tokens::Token;

/// Token id of a folded number literal.
const ID_NUMBER: u32 = 250;
/// Token id of a folded string literal.
const ID_STRING: u32 = 251;
/// Token id of a folded character literal.
const ID_CHAR: u32 = 252;
/// Token id of a folded identifier.
const ID_IDENT: u32 = 253;
/// First id handed out by the interner; below this live the fixed ids
/// (single-character tokens, operators, folded classes).
const FIRST_INTERNED: u32 = 0x100;

/// Base id for the multi-character operator table.
const ID_OPERATOR_BASE: u32 = 0x80;

/// Multi-character operators, longest first so a linear scan finds the
/// longest match.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "...", "->", "=>", "::", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&",
    "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=",
];

/// Keywords keep their identity even though plain identifiers fold; this is
/// what preserves program structure in the comparison. One shared table
/// covers the C family broadly.
const KEYWORDS: &[&str] = &[
    "auto", "break", "case", "catch", "char", "class", "const", "continue", "def", "default",
    "delete", "do", "double", "elif", "else", "enum", "extern", "finally", "float", "fn", "for",
    "from", "func", "goto", "if", "impl", "import", "int", "interface", "lambda", "let", "long",
    "loop", "match", "mod", "mut", "new", "package", "pass", "private", "protected", "pub",
    "public", "return", "self", "short", "signed", "sizeof", "static", "struct", "super",
    "switch", "this", "throw", "trait", "try", "type", "typedef", "union", "unsigned", "use",
    "var", "void", "volatile", "while", "yield",
];

/// Lexer toggles taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexOptions {
    /// `-f`: keep only tokens inside brace-delimited bodies.
    pub functions_only: bool,
    /// `-F`: identifiers that name calls keep their identity.
    pub keep_call_identifiers: bool,
}

/// Which scanner to run over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Text,
    Code,
}

/// Scanner choice per file extension; anything that is not a known code
/// extension is compared as plain text.
pub fn language_for_path(path: &str) -> Language {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext {
        "c" | "h" | "cc" | "cpp" | "cxx" | "hpp" | "hh" | "cs" | "java" | "js" | "jsx" | "ts"
        | "tsx" | "go" | "rs" | "py" => Language::Code,
        _ => Language::Text,
    }
}

/// The corpus-global symbol table. Ids are dense from [`FIRST_INTERNED`]
/// in first-encounter order.
#[derive(Debug, Default)]
pub struct Interner {
    map: FxHashMap<String, u32>,
    next: u32,
}

impl Interner {
    pub fn new() -> Interner {
        Interner {
            map: FxHashMap::default(),
            next: FIRST_INTERNED,
        }
    }

    pub fn intern(&mut self, lexeme: &str) -> u32 {
        if let Some(&id) = self.map.get(lexeme) {
            return id;
        }
        let id = self.next;
        self.next += 1;
        self.map.insert(lexeme.to_string(), id);
        id
    }

    /// Number of distinct interned symbols.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// One scanner result. `Newline` events drive the line tables and are
/// emitted even for lines whose tokens were all suppressed.
#[derive(Debug)]
pub enum LexEvent<'a> {
    Token { token: Token, lexeme: &'a str },
    Newline,
}

/// Runs the scanner for `language` over `source`, feeding `sink` one event
/// at a time.
pub fn lex(
    source: &str,
    language: Language,
    opts: &LexOptions,
    interner: &mut Interner,
    sink: &mut dyn FnMut(LexEvent<'_>),
) {
    match language {
        Language::Text => lex_text(source, interner, sink),
        Language::Code => CodeLexer::new(source, *opts).run(interner, sink),
    }
}

/// One row of the `--` lexical dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexRow {
    pub line: usize,
    pub lexeme: String,
}

/// Collects the token stream as printable rows (the `--` mode).
pub fn dump(
    source: &str,
    language: Language,
    opts: &LexOptions,
    interner: &mut Interner,
) -> Vec<LexRow> {
    let mut rows = Vec::new();
    let mut line = 1usize;
    lex(source, language, opts, interner, &mut |ev| match ev {
        LexEvent::Token { lexeme, .. } => rows.push(LexRow {
            line,
            lexeme: lexeme.to_string(),
        }),
        LexEvent::Newline => line += 1,
    });
    rows
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Words are interned, newlines reported, everything else skipped. Every
/// word may start a run.
fn lex_text(source: &str, interner: &mut Interner, sink: &mut dyn FnMut(LexEvent<'_>)) {
    let mut chars = source.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c == '\n' {
            sink(LexEvent::Newline);
        } else if is_word_char(c) {
            let mut end = start + c.len_utf8();
            while let Some(&(i, c2)) = chars.peek() {
                if is_word_char(c2) {
                    end = i + c2.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let lexeme = &source[start..end];
            let token = Token::starter(interner.intern(lexeme));
            sink(LexEvent::Token { token, lexeme });
        }
    }
}

struct CodeLexer<'a> {
    src: &'a [u8],
    text: &'a str,
    pos: usize,
    depth: u32,
    opts: LexOptions,
}

impl<'a> CodeLexer<'a> {
    fn new(text: &'a str, opts: LexOptions) -> CodeLexer<'a> {
        CodeLexer {
            src: text.as_bytes(),
            text,
            pos: 0,
            depth: 0,
            opts,
        }
    }

    fn byte(&self, at: usize) -> u8 {
        if at < self.src.len() {
            self.src[at]
        } else {
            0
        }
    }

    fn is_ident_byte(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
    }

    fn run(&mut self, interner: &mut Interner, sink: &mut dyn FnMut(LexEvent<'_>)) {
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            match b {
                b'\n' => {
                    sink(LexEvent::Newline);
                    self.pos += 1;
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                b'/' if self.byte(self.pos + 1) == b'/' => self.skip_line_comment(),
                b'#' => self.skip_line_comment(),
                b'/' if self.byte(self.pos + 1) == b'*' => self.skip_block_comment(sink),
                b'"' => self.quoted(b'"', ID_STRING, sink),
                b'\'' => self.quoted(b'\'', ID_CHAR, sink),
                b if b.is_ascii_digit() => self.number(sink),
                b if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 => {
                    self.word(interner, sink)
                }
                b'{' => {
                    self.depth += 1;
                    self.punct(sink);
                }
                b'}' => {
                    self.punct(sink);
                    self.depth = self.depth.saturating_sub(1);
                }
                _ => self.operator(sink),
            }
        }
    }

    /// Suppression point for `-f`: only tokens inside a brace body survive.
    fn emit(&self, token: Token, start: usize, end: usize, sink: &mut dyn FnMut(LexEvent<'_>)) {
        if self.opts.functions_only && self.depth == 0 {
            return;
        }
        sink(LexEvent::Token {
            token,
            lexeme: &self.text[start..end],
        });
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self, sink: &mut dyn FnMut(LexEvent<'_>)) {
        self.pos += 2;
        while self.pos < self.src.len() {
            match self.src[self.pos] {
                b'\n' => {
                    sink(LexEvent::Newline);
                    self.pos += 1;
                }
                b'*' if self.byte(self.pos + 1) == b'/' => {
                    self.pos += 2;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// String and character literals fold to one token per class. An
    /// unterminated literal closes at end of line.
    fn quoted(&mut self, quote: u8, id: u32, sink: &mut dyn FnMut(LexEvent<'_>)) {
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.src.len() {
            match self.src[self.pos] {
                b'\\' => {
                    if self.byte(self.pos + 1) == b'\n' {
                        sink(LexEvent::Newline);
                    }
                    self.pos = (self.pos + 2).min(self.src.len());
                }
                b'\n' => break,
                b if b == quote => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }
        self.emit(Token::starter(id), start, self.pos, sink);
    }

    /// Numbers fold to one token; the scan is deliberately loose (hex,
    /// suffixes, fractions all fall in).
    fn number(&mut self, sink: &mut dyn FnMut(LexEvent<'_>)) {
        let start = self.pos;
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.emit(Token::starter(ID_NUMBER), start, self.pos, sink);
    }

    fn word(&mut self, interner: &mut Interner, sink: &mut dyn FnMut(LexEvent<'_>)) {
        let start = self.pos;
        while self.pos < self.src.len() && Self::is_ident_byte(self.src[self.pos]) {
            self.pos += 1;
        }
        let lexeme = &self.text[start..self.pos];
        let token = if KEYWORDS.binary_search(&lexeme).is_ok() {
            Token::starter(interner.intern(lexeme))
        } else if self.opts.keep_call_identifiers && self.next_is_call() {
            Token::starter(interner.intern(lexeme))
        } else {
            Token::starter(ID_IDENT)
        };
        self.emit(token, start, self.pos, sink);
    }

    /// Whether the identifier just scanned names a call: `(` follows,
    /// allowing blanks in between.
    fn next_is_call(&self) -> bool {
        let mut at = self.pos;
        while at < self.src.len() && (self.src[at] == b' ' || self.src[at] == b'\t') {
            at += 1;
        }
        at < self.src.len() && self.src[at] == b'('
    }

    fn punct(&mut self, sink: &mut dyn FnMut(LexEvent<'_>)) {
        let b = self.src[self.pos];
        self.emit(Token::plain(u32::from(b)), self.pos, self.pos + 1, sink);
        self.pos += 1;
    }

    fn operator(&mut self, sink: &mut dyn FnMut(LexEvent<'_>)) {
        for (n, op) in OPERATORS.iter().enumerate() {
            if self.src[self.pos..].starts_with(op.as_bytes()) {
                let start = self.pos;
                self.pos += op.len();
                self.emit(Token::plain(ID_OPERATOR_BASE + n as u32), start, self.pos, sink);
                return;
            }
        }
        if self.src[self.pos].is_ascii_graphic() {
            self.punct(sink);
        } else {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(source: &str, language: Language, opts: LexOptions) -> Vec<Token> {
        let mut interner = Interner::new();
        let mut out = Vec::new();
        lex(source, language, &opts, &mut interner, &mut |ev| {
            if let LexEvent::Token { token, .. } = ev {
                out.push(token);
            }
        });
        out
    }

    #[test]
    fn keyword_table_is_sorted() {
        let mut sorted = KEYWORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KEYWORDS);
    }

    #[test]
    fn text_words_intern_stably() {
        let a = tokens_of("the cat saw the cat", Language::Text, LexOptions::default());
        assert_eq!(a.len(), 5);
        assert_eq!(a[0], a[3]);
        assert_eq!(a[1], a[4]);
        assert_ne!(a[0], a[1]);
        assert!(a.iter().all(|t| t.may_start_run()));
    }

    #[test]
    fn text_skips_punctuation() {
        let a = tokens_of("one, two; three!", Language::Text, LexOptions::default());
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn identifiers_fold_keywords_do_not() {
        let a = tokens_of("while alpha", Language::Code, LexOptions::default());
        let b = tokens_of("while beta", Language::Code, LexOptions::default());
        // folded identifiers make the streams equal
        assert_eq!(a, b);
        let c = tokens_of("if alpha", Language::Code, LexOptions::default());
        assert_ne!(a, c);
    }

    #[test]
    fn keep_call_identifiers() {
        let opts = LexOptions {
            keep_call_identifiers: true,
            ..LexOptions::default()
        };
        let a = tokens_of("foo(x)", Language::Code, opts);
        let b = tokens_of("bar(x)", Language::Code, opts);
        assert_ne!(a, b);
        // plain uses still fold
        let c = tokens_of("foo + y", Language::Code, opts);
        let d = tokens_of("bar + y", Language::Code, opts);
        assert_eq!(c, d);
    }

    #[test]
    fn functions_only_drops_toplevel_tokens() {
        let opts = LexOptions {
            functions_only: true,
            ..LexOptions::default()
        };
        let with = tokens_of("x;\ny = 1;\nf() { return x; }", Language::Code, opts);
        let without = tokens_of("{ return x; }", Language::Code, LexOptions::default());
        assert_eq!(with, without);
    }

    #[test]
    fn comments_and_literals() {
        let a = tokens_of(
            "a = \"some text\"; // trailing\n/* b */ c = 'x';",
            Language::Code,
            LexOptions::default(),
        );
        // ident = string ; ident = char ;
        assert_eq!(a.len(), 8);
        assert_eq!(a[2].id(), ID_STRING);
        assert_eq!(a[6].id(), ID_CHAR);
        assert!(!a[1].may_start_run());
    }

    #[test]
    fn numbers_fold() {
        let a = tokens_of("x = 42", Language::Code, LexOptions::default());
        let b = tokens_of("x = 0x1f", Language::Code, LexOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn multi_char_operators_are_single_tokens() {
        let a = tokens_of("a <<= b", Language::Code, LexOptions::default());
        assert_eq!(a.len(), 3);
        assert!(!a[1].may_start_run());
    }

    #[test]
    fn newlines_are_counted_in_dump() {
        let mut interner = Interner::new();
        let rows = dump(
            "one\ntwo three\n\nfour",
            Language::Text,
            &LexOptions::default(),
            &mut interner,
        );
        let lines: Vec<usize> = rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![1, 2, 2, 4]);
        assert_eq!(rows[3].lexeme, "four");
    }

    #[test]
    fn block_comment_newlines_still_count() {
        let mut interner = Interner::new();
        let rows = dump(
            "a /* x\ny */ b",
            Language::Code,
            &LexOptions::default(),
            &mut interner,
        );
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[1].line, 2);
    }
}
