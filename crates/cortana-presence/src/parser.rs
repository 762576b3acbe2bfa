//! Chat command parsing.
//!
//! Three input shapes normalize to the same [`ParsedCommand`]:
//!
//! - direct: `.open back in 10` (an empty command prefix accepts bare keywords)
//! - addressed: `Hey, Cortana, open back in 10` / `Cortana: open`
//! - relayed: `<matrixuser> Hey, Cortana, open back in 10`
//!
//! Anything else is not a command for us and yields `None`.

/// Recognized command keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `open`, `auki`
    Open,
    /// `closed`, `kiinni`
    Closed,
    /// `status`, `reporting`
    Status,
    /// `reserved`, `varattu`
    Reserved,
}

impl Keyword {
    /// Match a single token, case-insensitively, ignoring one trailing
    /// `,` or `:`.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token
            .strip_suffix(',')
            .or_else(|| token.strip_suffix(':'))
            .unwrap_or(token);
        match token.to_lowercase().as_str() {
            "open" | "auki" => Some(Self::Open),
            "closed" | "kiinni" => Some(Self::Closed),
            "status" | "reporting" => Some(Self::Status),
            "reserved" | "varattu" => Some(Self::Reserved),
            _ => None,
        }
    }
}

/// A recognized command: keyword plus the free-text tail, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub keyword: Keyword,
    pub remainder: Option<String>,
}

/// Turns raw chat lines into [`ParsedCommand`]s.
#[derive(Debug, Clone)]
pub struct CommandParser {
    /// Nick and aliases, longest first so `Cortana-bot` wins over `Cortana`.
    names: Vec<String>,
    command_prefix: String,
}

impl CommandParser {
    pub fn new(names: &[String], command_prefix: &str) -> Self {
        let mut names: Vec<String> = names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));
        Self {
            names,
            command_prefix: command_prefix.to_string(),
        }
    }

    /// Parse a line in direct or addressed form.
    pub fn parse(&self, text: &str) -> Option<ParsedCommand> {
        let text = strip_formatting(text);
        self.parse_direct(&text)
            .or_else(|| self.parse_addressed(&text))
    }

    /// Parse a line forwarded by a relay bridge: `<sender> <addressed form>`.
    pub fn parse_relayed(&self, text: &str) -> Option<ParsedCommand> {
        let text = strip_formatting(text);
        let inner = strip_sender(&text)?;
        self.parse_addressed(inner)
    }

    fn parse_direct(&self, text: &str) -> Option<ParsedCommand> {
        let text = text.trim().strip_prefix(self.command_prefix.as_str())?;
        split_keyword(text)
    }

    fn parse_addressed(&self, text: &str) -> Option<ParsedCommand> {
        let mut rest = text.trim_start();

        // Optional greeting: "Hey", "Hey,".
        if let Some(after) = strip_prefix_ignore_case(rest, "hey") {
            let after = after.strip_prefix(',').unwrap_or(after);
            if after.len() < rest.len() - 3 || after.starts_with(char::is_whitespace) {
                rest = after.trim_start();
            }
        }

        let after_name = self.names.iter().find_map(|name| {
            let after = strip_prefix_ignore_case(rest, name)?;
            match after.chars().next() {
                None => Some(after),
                Some(c) if c == ',' || c == ':' || c.is_whitespace() => Some(after),
                Some(_) => None,
            }
        })?;

        let tail = after_name
            .strip_prefix(',')
            .or_else(|| after_name.strip_prefix(':'))
            .unwrap_or(after_name);
        split_keyword(tail.trim())
    }
}

/// Split `keyword remainder...` into a command.
fn split_keyword(text: &str) -> Option<ParsedCommand> {
    let text = text.trim();
    let (token, rest) = match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim()),
        None => (text, ""),
    };
    let keyword = Keyword::from_token(token)?;
    Some(ParsedCommand {
        keyword,
        remainder: if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        },
    })
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Drop the sender wrapper a relay puts in front of forwarded lines:
/// `<name>`, `[name]` (names may contain spaces), or a bare first token.
fn strip_sender(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let close = match text.chars().next()? {
        '<' => Some('>'),
        '[' => Some(']'),
        _ => None,
    };
    let rest = match close {
        Some(close) => {
            let end = text.find(close)?;
            &text[end + close.len_utf8()..]
        }
        None => {
            let end = text.find(char::is_whitespace)?;
            &text[end..]
        }
    };
    let rest = rest.trim_start();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Remove mIRC formatting codes (bold, colors, italics, ...) and zero-width
/// spaces that bridges like to sprinkle into nicknames.
fn strip_formatting(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x02' | '\x0f' | '\x11' | '\x16' | '\x1d' | '\x1e' | '\x1f' | '\u{200b}' => {}
            '\x03' => {
                // Up to two foreground digits, optionally ",NN" background.
                for _ in 0..2 {
                    if chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                        chars.next();
                    }
                }
                let mut lookahead = chars.clone();
                if lookahead.next() == Some(',')
                    && lookahead.peek().is_some_and(|d| d.is_ascii_digit())
                {
                    chars.next();
                    for _ in 0..2 {
                        if chars.peek().is_some_and(|d| d.is_ascii_digit()) {
                            chars.next();
                        }
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}
