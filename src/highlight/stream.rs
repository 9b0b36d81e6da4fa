use regex::Regex;

/// Cursor over a single line of text, consumed token by token.
///
/// Offsets are byte offsets into the line. `start` marks where the token
/// currently being scanned began; `current()` is the text consumed since.
#[derive(Debug, Clone)]
pub struct LineStream<'a> {
    line: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> LineStream<'a> {
    pub fn new(line: &'a str) -> Self {
        LineStream {
            line,
            pos: 0,
            start: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Marks the current position as the start of the next token.
    pub fn begin_token(&mut self) {
        self.start = self.pos;
    }

    pub fn eol(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Text not yet consumed.
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Text consumed since the token started.
    pub fn current(&self) -> &'a str {
        &self.line[self.start..self.pos]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the next one.
    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Consumes and returns the next character.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consumes characters while `pred` holds; returns whether any were consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let before = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.pos > before
    }

    pub fn eat_space(&mut self) -> bool {
        self.eat_while(char::is_whitespace)
    }

    /// Consumes `text` if the stream continues with it.
    pub fn match_str(&mut self, text: &str) -> bool {
        if !text.is_empty() && self.rest().starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    /// Consumes a non-empty match of `re` that begins at the current position.
    pub fn match_regex(&mut self, re: &Regex) -> Option<&'a str> {
        let rest = self.rest();
        let found = re.find(rest).filter(|m| m.start() == 0 && !m.is_empty())?;
        self.pos += found.end();
        Some(&rest[..found.end()])
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.line.len();
    }
}

#[test]
fn test_stream_tracks_token_text() {
    let mut stream = LineStream::new("abc  déf");
    assert!(stream.eat_while(|c| c.is_alphabetic()));
    assert_eq!(stream.current(), "abc");
    assert!(stream.eat_space());
    stream.begin_token();
    assert!(stream.eat_while(|c| c.is_alphabetic()));
    assert_eq!(stream.current(), "déf");
    assert!(stream.eol());
    assert_eq!(stream.advance(), None);
}

#[test]
fn test_match_regex_is_anchored() {
    let re = Regex::new(r"\d+").unwrap();
    let mut stream = LineStream::new("ab12");
    assert_eq!(stream.match_regex(&re), None);
    assert_eq!(stream.pos(), 0);
    stream.advance();
    stream.advance();
    assert_eq!(stream.match_regex(&re), Some("12"));
}
