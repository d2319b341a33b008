//! Lexer (token source) for quad source code
//!
//! Produces one [`Token`] at a time on demand; the parser never holds more
//! than a single token of lookahead.  The current line is tracked by the
//! lexer itself rather than stored on each token, so diagnostics report the
//! line the scanner has reached.
//!
//! Every reserved word has two spellings: the ASCII word and an emoji alias.
//! Both produce the same token with the ASCII lexeme.

use std::fmt;

/// Token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    // Literals and names
    Id,
    Integer,
    Floating,
    True,
    False,

    // Keywords
    Type,
    Main,
    If,
    While,
    Do,
    For,
    Func,
    Return,

    // Operators
    Or,     // ||
    And,    // &&
    EqEq,   // ==
    NotEq,  // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Bang,   // !
    Assign, // =

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,

    Eof,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Tag::Id => "identifier",
            Tag::Integer => "integer literal",
            Tag::Floating => "float literal",
            Tag::True => "'true'",
            Tag::False => "'false'",
            Tag::Type => "type name",
            Tag::Main => "'main'",
            Tag::If => "'if'",
            Tag::While => "'while'",
            Tag::Do => "'do'",
            Tag::For => "'for'",
            Tag::Func => "'func'",
            Tag::Return => "'return'",
            Tag::Or => "'||'",
            Tag::And => "'&&'",
            Tag::EqEq => "'=='",
            Tag::NotEq => "'!='",
            Tag::Lt => "'<'",
            Tag::Le => "'<='",
            Tag::Gt => "'>'",
            Tag::Ge => "'>='",
            Tag::Plus => "'+'",
            Tag::Minus => "'-'",
            Tag::Star => "'*'",
            Tag::Slash => "'/'",
            Tag::Bang => "'!'",
            Tag::Assign => "'='",
            Tag::LParen => "'('",
            Tag::RParen => "')'",
            Tag::LBrace => "'{'",
            Tag::RBrace => "'}'",
            Tag::LBracket => "'['",
            Tag::RBracket => "']'",
            Tag::Semicolon => "';'",
            Tag::Colon => "':'",
            Tag::Comma => "','",
            Tag::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A token: its category plus the literal text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub tag: Tag,
    pub lexeme: String,
}

impl Token {
    pub fn new(tag: Tag, lexeme: impl Into<String>) -> Self {
        Token {
            tag,
            lexeme: lexeme.into(),
        }
    }

    pub fn eof() -> Self {
        Token::new(Tag::Eof, "")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            Tag::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lexer error at line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for LexError {}

/// Anything the parser can pull tokens from.
pub trait TokenSource {
    /// Scan and return the next token. At end of input this keeps returning
    /// a [`Tag::Eof`] token.
    fn next_token(&mut self) -> Result<Token, LexError>;

    /// Line the scanner is currently on (1-based).
    fn current_line(&self) -> usize;
}

/// Reserved words in both spellings.
const KEYWORDS: &[(&str, Tag, &str)] = &[
    ("main", Tag::Main, "main"),
    ("int", Tag::Type, "int"),
    ("float", Tag::Type, "float"),
    ("bool", Tag::Type, "bool"),
    ("true", Tag::True, "true"),
    ("false", Tag::False, "false"),
    ("if", Tag::If, "if"),
    ("while", Tag::While, "while"),
    ("do", Tag::Do, "do"),
    ("for", Tag::For, "for"),
    ("func", Tag::Func, "func"),
    ("return", Tag::Return, "return"),
    ("\u{1F451}", Tag::Main, "main"),    // 👑
    ("\u{1F522}", Tag::Type, "int"),     // 🔢
    ("\u{1F30A}", Tag::Type, "float"),   // 🌊
    ("\u{1F9D0}", Tag::Type, "bool"),    // 🧐
    ("\u{1F44D}", Tag::True, "true"),    // 👍
    ("\u{1F44E}", Tag::False, "false"),  // 👎
    ("\u{1F914}", Tag::If, "if"),        // 🤔
    ("\u{1F501}", Tag::While, "while"),  // 🔁
    ("\u{1F447}", Tag::Do, "do"),        // 👇
    ("\u{1F9EC}", Tag::For, "for"),      // 🧬
    ("\u{1F47B}", Tag::Func, "func"),    // 👻
    ("\u{1F98B}", Tag::Return, "return"), // 🦋
];

fn keyword(word: &str) -> Option<Token> {
    KEYWORDS
        .iter()
        .find(|(spelling, _, _)| *spelling == word)
        .map(|(_, tag, lexeme)| Token::new(*tag, *lexeme))
}

/// Lexer for quad source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
        }
    }

    /// Tokenize the entire input, end marker included.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.tag == Tag::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        if !self.skip_whitespace_and_comments() {
            return Ok(Token::eof());
        }

        let ch = match self.advance() {
            Some(ch) => ch,
            None => return Ok(Token::eof()),
        };

        match ch {
            '0'..='9' => Ok(self.number_literal(ch)),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch)),

            '&' => self.pair('&', Tag::And, "&&"),
            '|' => self.pair('|', Tag::Or, "||"),
            '=' => Ok(self.either('=', Tag::EqEq, "==", Tag::Assign, "=")),
            '!' => Ok(self.either('=', Tag::NotEq, "!=", Tag::Bang, "!")),
            '<' => Ok(self.either('=', Tag::Le, "<=", Tag::Lt, "<")),
            '>' => Ok(self.either('=', Tag::Ge, ">=", Tag::Gt, ">")),

            '+' => Ok(Token::new(Tag::Plus, "+")),
            '-' => Ok(Token::new(Tag::Minus, "-")),
            '*' => Ok(Token::new(Tag::Star, "*")),
            '/' => Ok(Token::new(Tag::Slash, "/")),
            '(' => Ok(Token::new(Tag::LParen, "(")),
            ')' => Ok(Token::new(Tag::RParen, ")")),
            '{' => Ok(Token::new(Tag::LBrace, "{")),
            '}' => Ok(Token::new(Tag::RBrace, "}")),
            '[' => Ok(Token::new(Tag::LBracket, "[")),
            ']' => Ok(Token::new(Tag::RBracket, "]")),
            ';' => Ok(Token::new(Tag::Semicolon, ";")),
            ':' => Ok(Token::new(Tag::Colon, ":")),
            ',' => Ok(Token::new(Tag::Comma, ",")),

            _ => keyword(&ch.to_string()).ok_or_else(|| LexError {
                message: format!("Unexpected character: '{}'", ch),
                line: self.line,
            }),
        }
    }

    /// Two-character operator whose first character has no meaning alone.
    fn pair(&mut self, second: char, tag: Tag, lexeme: &str) -> Result<Token, LexError> {
        if self.peek() == Some(second) {
            self.advance();
            Ok(Token::new(tag, lexeme))
        } else {
            Err(LexError {
                message: format!("Expected '{}' to complete '{}'", second, lexeme),
                line: self.line,
            })
        }
    }

    fn either(
        &mut self,
        second: char,
        long: Tag,
        long_lexeme: &str,
        short: Tag,
        short_lexeme: &str,
    ) -> Token {
        if self.peek() == Some(second) {
            self.advance();
            Token::new(long, long_lexeme)
        } else {
            Token::new(short, short_lexeme)
        }
    }

    /// Digits with at most one '.'; a dot makes it a float literal.
    fn number_literal(&mut self, first_digit: char) -> Token {
        let mut text = String::new();
        text.push(first_digit);
        let mut dot = false;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else if ch == '.' && !dot {
                dot = true;
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if dot {
            Token::new(Tag::Floating, text)
        } else {
            Token::new(Tag::Integer, text)
        }
    }

    fn identifier_or_keyword(&mut self, first_char: char) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        keyword(&ident).unwrap_or_else(|| Token::new(Tag::Id, ident))
    }

    /// Skip whitespace and comments. Returns false when an unterminated block
    /// comment swallowed the rest of the input.
    fn skip_whitespace_and_comments(&mut self) -> bool {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    self.skip_line_comment();
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    if !self.skip_block_comment() {
                        return false;
                    }
                }
                _ => return true,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> bool {
        self.advance(); // '/'
        self.advance(); // '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return true;
            }
            self.advance();
        }
        false
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Result<Token, LexError> {
        self.scan()
    }

    fn current_line(&self) -> usize {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(source: &str) -> Vec<Tag> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.tag)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = Lexer::new("int a; a = 1 + 2;").tokenize().unwrap();

        assert_eq!(tokens[0], Token::new(Tag::Type, "int"));
        assert_eq!(tokens[1], Token::new(Tag::Id, "a"));
        assert_eq!(tokens[2].tag, Tag::Semicolon);
        assert_eq!(tokens[3], Token::new(Tag::Id, "a"));
        assert_eq!(tokens[4].tag, Tag::Assign);
        assert_eq!(tokens[5], Token::new(Tag::Integer, "1"));
        assert_eq!(tokens[6].tag, Tag::Plus);
        assert_eq!(tokens[7], Token::new(Tag::Integer, "2"));
        assert_eq!(tokens[8].tag, Tag::Semicolon);
        assert_eq!(tokens[9].tag, Tag::Eof);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            tags("&& || == != <= >= < > = !"),
            vec![
                Tag::And,
                Tag::Or,
                Tag::EqEq,
                Tag::NotEq,
                Tag::Le,
                Tag::Ge,
                Tag::Lt,
                Tag::Gt,
                Tag::Assign,
                Tag::Bang,
                Tag::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::new("42 3.14").tokenize().unwrap();
        assert_eq!(tokens[0], Token::new(Tag::Integer, "42"));
        assert_eq!(tokens[1], Token::new(Tag::Floating, "3.14"));

        // a second dot ends the literal
        let mut lexer = Lexer::new("1.2.3");
        assert_eq!(lexer.next_token().unwrap(), Token::new(Tag::Floating, "1.2"));
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_emoji_keywords() {
        let tokens = Lexer::new("\u{1F522} x \u{1F914} \u{1F44D}").tokenize().unwrap();
        assert_eq!(tokens[0], Token::new(Tag::Type, "int"));
        assert_eq!(tokens[1], Token::new(Tag::Id, "x"));
        assert_eq!(tokens[2], Token::new(Tag::If, "if"));
        assert_eq!(tokens[3], Token::new(Tag::True, "true"));
    }

    #[test]
    fn test_comments_and_lines() {
        let mut lexer = Lexer::new("a // comment\n/* block\ncomment */ b");
        assert_eq!(lexer.next_token().unwrap(), Token::new(Tag::Id, "a"));
        assert_eq!(lexer.current_line(), 1);
        assert_eq!(lexer.next_token().unwrap(), Token::new(Tag::Id, "b"));
        assert_eq!(lexer.current_line(), 3);
        assert_eq!(lexer.next_token().unwrap().tag, Tag::Eof);
        assert_eq!(lexer.next_token().unwrap().tag, Tag::Eof);
    }

    #[test]
    fn test_unterminated_block_comment_is_end_of_input() {
        assert_eq!(tags("x /* never closed"), vec![Tag::Id, Tag::Eof]);
    }

    #[test]
    fn test_unexpected_character() {
        let err = Lexer::new("a\n$").tokenize().unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains('$'));
    }
}
