//! IRC line parsing and formatting (RFC 1459 / 2812 message framing).

/// One parsed IRC line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    /// Source, e.g. `nick!user@host` or a server name.
    pub prefix: Option<String>,
    /// Command or three-digit numeric, uppercased.
    pub command: String,
    /// Middle params followed by the trailing param, if any.
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Parse a raw line. IRCv3 message tags are skipped. Returns `None` for
    /// empty or malformed lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        if let Some(tagged) = rest.strip_prefix('@') {
            let (_, after) = tagged.split_once(' ')?;
            rest = after.trim_start();
        }

        let prefix = match rest.strip_prefix(':') {
            Some(prefixed) => {
                let (prefix, after) = prefixed.split_once(' ')?;
                rest = after.trim_start();
                Some(prefix.to_string())
            }
            None => None,
        };

        let (command, mut rest) = match rest.split_once(' ') {
            Some((cmd, after)) => (cmd, after),
            None => (rest, ""),
        };
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing.to_string());
                break;
            }
            match rest.split_once(' ') {
                Some((param, after)) => {
                    params.push(param.to_string());
                    rest = after;
                }
                None => {
                    params.push(rest.to_string());
                    break;
                }
            }
        }

        Some(Self {
            prefix,
            command: command.to_uppercase(),
            params,
        })
    }

    /// Nickname part of the prefix.
    pub fn nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split('!').next().unwrap_or(prefix))
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// Format a line whose last argument is sent as a trailing param.
/// CR/LF are stripped so user text cannot smuggle extra commands.
pub fn format_line(command: &str, middle: &[&str], trailing: Option<&str>) -> String {
    let mut line = command.to_string();
    for param in middle {
        line.push(' ');
        line.push_str(&strip_newlines(param));
    }
    if let Some(trailing) = trailing {
        line.push_str(" :");
        line.push_str(&strip_newlines(trailing));
    }
    line
}

fn strip_newlines(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

/// Whether `target` names a channel rather than a user.
pub fn is_channel(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_privmsg() {
        let msg =
            IrcMessage::parse(":alice!~a@host PRIVMSG #polygame :Hey, Cortana, open back in 10\r\n")
                .unwrap();
        assert_eq!(msg.prefix.as_deref(), Some("alice!~a@host"));
        assert_eq!(msg.nick(), Some("alice"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(
            msg.params,
            vec!["#polygame", "Hey, Cortana, open back in 10"]
        );
    }

    #[test]
    fn test_parse_ping_without_prefix() {
        let msg = IrcMessage::parse("PING :irc.example.org").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.param(0), Some("irc.example.org"));
    }

    #[test]
    fn test_parse_numeric_with_middle_params() {
        let msg =
            IrcMessage::parse(":irc.example.org 332 Cortana #polygame :JMT11CD: open |news")
                .unwrap();
        assert_eq!(msg.command, "332");
        assert_eq!(msg.param(1), Some("#polygame"));
        assert_eq!(msg.param(2), Some("JMT11CD: open |news"));
    }

    #[test]
    fn test_parse_tags_and_no_trailing() {
        let msg = IrcMessage::parse("@time=2024-01-01T00:00:00Z :bob!b@h JOIN #polygame").unwrap();
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.nick(), Some("bob"));
        assert_eq!(msg.params, vec!["#polygame"]);
    }

    #[test]
    fn test_parse_empty_trailing() {
        let msg = IrcMessage::parse(":bob!b@h TOPIC #polygame :").unwrap();
        assert_eq!(msg.params, vec!["#polygame", ""]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(IrcMessage::parse(""), None);
        assert_eq!(IrcMessage::parse(":onlyprefix"), None);
        assert_eq!(IrcMessage::parse("@tagsonly"), None);
    }

    #[test]
    fn test_format_line_strips_newlines() {
        assert_eq!(
            format_line("TOPIC", &["#polygame"], Some("a\r\nQUIT :bye")),
            "TOPIC #polygame :a  QUIT :bye"
        );
        assert_eq!(format_line("JOIN", &["#polygame"], None), "JOIN #polygame");
    }

    #[test]
    fn test_is_channel() {
        assert!(is_channel("#polygame"));
        assert!(is_channel("&local"));
        assert!(!is_channel("Cortana"));
    }
}
