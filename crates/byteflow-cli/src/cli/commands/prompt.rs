use dialoguer::{theme::ColorfulTheme, Input};
use std::io::{BufRead, IsTerminal, Write};

const VERDICT_PROMPT: &str = "Is this prediction correct? (y/n)";
const LABEL_PROMPT: &str = "Enter correct label";

/// Source of human feedback. Blocks until an answer is available.
pub(crate) trait FeedbackPrompt {
    fn ask(&mut self, prompt: &str) -> anyhow::Result<String>;

    fn verdict(&mut self) -> anyhow::Result<String> {
        self.ask(VERDICT_PROMPT)
    }

    fn correct_label(&mut self) -> anyhow::Result<String> {
        self.ask(LABEL_PROMPT)
    }
}

/// Interactive themed prompt on a terminal.
pub(crate) struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl FeedbackPrompt for TerminalPrompt {
    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

/// One answer per line, for piped or scripted input. EOF is an empty answer.
pub(crate) struct LinePrompt<R> {
    reader: R,
}

impl<R: BufRead> LinePrompt<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> FeedbackPrompt for LinePrompt<R> {
    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{prompt}: ")?;
        stderr.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

pub(crate) fn for_stdin() -> Box<dyn FeedbackPrompt> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        Box::new(TerminalPrompt {
            theme: ColorfulTheme::default(),
        })
    } else {
        Box::new(LinePrompt::new(stdin.lock()))
    }
}
