use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;

const COMMANDS: &[&str] = &["help", "exit", "quit", "sheet", "set", "cache", "clear"];

const SET_OPTIONS: &[&str] = &["output", "file", "expiry"];

const OUTPUT_FORMATS: &[&str] = &["human", "csv", "json"];

const TOGGLES: &[&str] = &["on", "off"];

const CACHE_ACTIONS: &[&str] = &["clear", "stats"];

/// Completion candidates for the text left of the cursor: the byte offset
/// the replacement starts at and the matching words.
fn candidates(line_to_cursor: &str) -> (usize, Vec<&'static str>) {
    let words: Vec<&str> = line_to_cursor.split_whitespace().collect();
    let completing_new_word = line_to_cursor.ends_with(' ') || words.is_empty();
    let current_word = if completing_new_word {
        ""
    } else {
        words.last().copied().unwrap_or("")
    };
    // Index of the word being completed
    let position = if completing_new_word {
        words.len()
    } else {
        words.len() - 1
    };

    let pool: &[&'static str] = match (position, words.first().map(|w| w.to_lowercase())) {
        (0, _) => COMMANDS,
        (1, Some(cmd)) if cmd == "set" => SET_OPTIONS,
        (1, Some(cmd)) if cmd == "cache" => CACHE_ACTIONS,
        (2, Some(cmd)) if cmd == "set" => match words.get(1).copied() {
            Some("output") => OUTPUT_FORMATS,
            Some("expiry") => TOGGLES,
            _ => &[],
        },
        _ => &[],
    };

    let matches = pool
        .iter()
        .copied()
        .filter(|word| word.starts_with(current_word))
        .collect();
    (line_to_cursor.len() - current_word.len(), matches)
}

pub struct DashCompleter;

impl DashCompleter {
    pub fn new() -> Self {
        Self
    }
}

impl Completer for DashCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for DashCompleter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if line.is_empty() || pos < line.len() || !line.ends_with(' ') {
            return None;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() != 1 {
            return None;
        }

        match words[0].to_lowercase().as_str() {
            "sheet" => Some("<file.csv|file.tsv>".to_string()),
            "set" => Some("output <human|csv|json>".to_string()),
            "cache" => Some("[clear|stats]".to_string()),
            _ => None,
        }
    }
}

impl Highlighter for DashCompleter {}
impl Validator for DashCompleter {}
impl Helper for DashCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_command() {
        assert_eq!(candidates("se"), (0, vec!["set"]));
        assert_eq!(candidates("c"), (0, vec!["cache", "clear"]));
        assert_eq!(candidates("").1.len(), COMMANDS.len());
    }

    #[test]
    fn test_complete_arguments() {
        assert_eq!(candidates("set "), (4, vec!["output", "file", "expiry"]));
        assert_eq!(candidates("set output c"), (11, vec!["csv"]));
        assert_eq!(candidates("set expiry "), (11, vec!["on", "off"]));
        assert_eq!(candidates("cache c"), (6, vec!["clear"]));
    }

    #[test]
    fn test_domains_get_no_candidates() {
        assert_eq!(candidates("a.com|b.com ").1, Vec::<&str>::new());
        assert_eq!(candidates("sheet dom").1, Vec::<&str>::new());
    }
}
