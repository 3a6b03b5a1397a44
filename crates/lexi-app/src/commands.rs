use lexi_core::preprocess::normalize_word;

pub const WELCOME: &str = "Welcome to lexi! 📚

I help you grow your English vocabulary:
- send any English word to see its definition and pronunciation
- save words to your personal dictionary
- practise them with multiple-choice quizzes

Type /help to see every command.";

pub const HELP: &str = "Here are the available commands:
/start - welcome message
/add <word> - save a word to your dictionary (without a word: the last one you looked up)
/remove <word> - remove a word from your dictionary
/words [page] [alpha] - list your saved words, optionally sorted alphabetically
/count - how many words you have saved
/reminder - a random word from your dictionary with its definition
/quiz - a multiple-choice question about one of your words
/answer <number> - answer the current question (a bare number works too)
/help - show this message

Any other text is looked up in the dictionary.";

/// One parsed chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// `None` means the last looked-up word
    Add(Option<String>),
    Remove(Option<String>),
    Words { page: usize, alphabetical: bool },
    Count,
    Reminder,
    Quiz,
    /// `None` when the argument is missing or not a number
    Answer(Option<usize>),
    Lookup(String),
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Command::Empty;
        }

        let Some(rest) = text.strip_prefix('/') else {
            return Command::Lookup(normalize_word(text));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        // Group chats address commands as /cmd@botname
        let name = name.split('@').next().unwrap_or(name).to_lowercase();

        match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "add" => Command::Add(word_arg(args)),
            "remove" => Command::Remove(word_arg(args)),
            "words" | "showwords" => parse_words(args),
            "count" => Command::Count,
            "reminder" => Command::Reminder,
            "quiz" => Command::Quiz,
            "answer" => Command::Answer(args.parse().ok()),
            _ => Command::Unknown(name),
        }
    }
}

/// Bare number typed as a quiz answer
pub fn bare_choice(text: &str) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn word_arg(args: &str) -> Option<String> {
    let word = normalize_word(args);
    (!word.is_empty()).then_some(word)
}

fn parse_words(args: &str) -> Command {
    let mut page = 1;
    let mut alphabetical = false;

    for arg in args.split_whitespace() {
        match arg.to_lowercase().as_str() {
            "alpha" | "alphabetical" | "abc" | "a-z" => alphabetical = true,
            other => {
                if let Ok(n) = other.parse::<usize>() {
                    page = n.max(1);
                }
            }
        }
    }

    Command::Words { page, alphabetical }
}
