//! Local REPL that talks to the router as a single user.
//!
//! Keyboard buttons are hard to type, so `:token` (e.g. `:en-ru`) stands in
//! for pressing the matching direction button.

use std::sync::Arc;

use anyhow::Result;
use inquire::autocompletion::{Autocomplete, Replacement};
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Text};

use crate::bot::command::SLASH_COMMANDS;
use crate::bot::{EventRouter, Reply};
use crate::pipeline::UserRef;
use crate::session::Direction;
use crate::ui::{Spinner, Style};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const QUIT_COMMANDS: &[&str] = &["/quit", "/exit", "/q"];

/// Suggests slash commands after `/` and direction shortcuts after `:`.
#[derive(Clone, Default)]
pub struct InputCompleter;

impl Autocomplete for InputCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        let suggestions = if input.starts_with('/') {
            SLASH_COMMANDS
                .iter()
                .chain(&[("/quit", "Leave the console")])
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| format!("{cmd}  {desc}"))
                .collect()
        } else if input.starts_with(':') {
            Direction::ALL
                .iter()
                .map(|d| (format!(":{}", d.token()), d.label()))
                .filter(|(shortcut, _)| shortcut.starts_with(input))
                .map(|(shortcut, label)| format!("{shortcut}  {label}"))
                .collect()
        } else {
            Vec::new()
        };

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// Rewrites `:token` shortcuts into the button label the router expects.
pub fn expand_shortcut(line: &str) -> String {
    line.trim()
        .strip_prefix(':')
        .and_then(Direction::from_token)
        .map_or_else(|| line.to_string(), |d| d.label().to_string())
}

pub struct ConsoleTransport {
    router: Arc<EventRouter>,
    user: UserRef,
}

impl ConsoleTransport {
    pub const fn new(router: Arc<EventRouter>, user: UserRef) -> Self {
        Self { router, user }
    }

    pub async fn run(&self) -> Result<()> {
        print_header(&self.user);

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(InputCompleter)
                .with_help_message("Send text or /start, :en-ru picks a direction, Ctrl+C to quit")
                .prompt();

            match input {
                Ok(line) if QUIT_COMMANDS.contains(&line.trim()) => break,
                Ok(line) => self.dispatch(&expand_shortcut(&line)).await,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        println!("{}", Style::success("Goodbye!"));
        Ok(())
    }

    async fn dispatch(&self, line: &str) {
        let spinner = Spinner::new("Thinking...");
        let reply = self.router.handle(&self.user, line).await;
        spinner.stop();

        match reply {
            Some(reply) => print_reply(&reply),
            None => println!("{}", Style::hint("(no reply; pick a direction first)")),
        }
        println!();
    }
}

fn print_header(user: &UserRef) {
    println!(
        "{} {} - Console Mode",
        Style::header("elarion"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "  {} {} ({})",
        Style::label("chatting as"),
        Style::value(&user.display_name),
        Style::secondary(user.id)
    );
    println!();
}

fn print_reply(reply: &Reply) {
    println!("{}", Style::reply(&reply.text));

    if let Some(keyboard) = &reply.keyboard {
        println!();
        for row in &keyboard.rows {
            let buttons: Vec<String> = row
                .iter()
                .map(|label| {
                    let shortcut = Direction::from_label(label)
                        .map(|d| format!(" :{}", d.token()))
                        .unwrap_or_default();
                    format!("{}{}", Style::button(label), Style::hint(shortcut))
                })
                .collect();
            println!("  {}", buttons.join("   "));
        }
    }
}
