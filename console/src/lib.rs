//! Line-oriented front end for the todo list controller.
//!
//! Each input line is one `Command`. Positions are 1-based and refer to the
//! list as last rendered.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;
use todo_core::{ApiError, Confirm, ListController, Notice, RemoteFacade, Todo};

pub const HELP: &str = "\
commands:
  list          reload the list from the store
  add <text>    add a new todo
  done <n>      complete the n-th todo (open todos only)
  rm <n>        remove the n-th todo (completed todos only)
  clear         remove all completed todos (asks first)
  dismiss       hide the current notice
  help          show this text
  quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add(String),
    Done(usize),
    Remove(usize),
    Clear,
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs a position, e.g. `{0} 1`")]
    MissingPosition(&'static str),
    #[error("`{0}` is not a position")]
    BadPosition(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start().trim_end_matches(['\r', '\n']);
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word {
            "" => Err(ParseCommandError::Empty),
            "list" | "ls" => Ok(Command::List),
            // Sent as typed; the controller ignores blank text.
            "add" => Ok(Command::Add(rest.to_string())),
            "done" => parse_position("done", rest).map(Command::Done),
            "rm" => parse_position("rm", rest).map(Command::Remove),
            "clear" => Ok(Command::Clear),
            "dismiss" => Ok(Command::Dismiss),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_position(word: &'static str, rest: &str) -> Result<usize, ParseCommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ParseCommandError::MissingPosition(word));
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseCommandError::BadPosition(rest.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("there is no todo at position {0}")]
    NoSuchItem(usize),
    #[error("todo {0} is already done")]
    AlreadyDone(usize),
    #[error("todo {0} is not done yet; complete it before removing it")]
    NotCompleted(usize),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Run one command against the controller.
///
/// Open items can only be completed and completed items can only be
/// removed; the controller itself accepts either.
pub async fn execute<F, C>(controller: &ListController<F, C>, command: Command) -> Result<Flow, CommandError>
where
    F: RemoteFacade,
    C: Confirm,
{
    match command {
        Command::List => {
            controller.refresh().await?;
        }
        Command::Add(text) => {
            controller.set_pending_text(text).await;
            controller.submit_new().await?;
        }
        Command::Done(n) => {
            let todo = nth(controller, n).await?;
            if todo.is_done {
                return Err(CommandError::AlreadyDone(n));
            }
            controller.complete(&todo).await?;
        }
        Command::Remove(n) => {
            let todo = nth(controller, n).await?;
            if !todo.is_done {
                return Err(CommandError::NotCompleted(n));
            }
            controller.remove_one(todo.id).await?;
        }
        Command::Clear => {
            controller.remove_all_completed().await;
        }
        Command::Dismiss => controller.dismiss_notice().await,
        Command::Help => return Ok(Flow::ShowHelp),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

async fn nth<F: RemoteFacade, C: Confirm>(controller: &ListController<F, C>, n: usize) -> Result<Todo, CommandError> {
    controller
        .items()
        .await
        .into_iter()
        .nth(n - 1)
        .ok_or(CommandError::NoSuchItem(n))
}

/// Render the list, followed by the notice if there is one.
pub fn render(items: &[Todo], notice: Option<&Notice>) -> String {
    let mut out = String::new();
    if items.is_empty() {
        out.push_str("No todos available\n");
    }
    for (i, todo) in items.iter().enumerate() {
        let mark = if todo.is_done { 'x' } else { ' ' };
        let _ = writeln!(out, "{:>3}. [{mark}] {}", i + 1, todo.description);
    }
    if let Some(notice) = notice {
        let _ = writeln!(out, "! {} (type `dismiss` to hide)", notice.message);
    }
    out
}

/// `y`/`yes` in any case confirms; everything else declines.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
