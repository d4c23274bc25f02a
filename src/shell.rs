// Interactive single-screen session over a TaskListController

use crate::controller::TaskListController;
use crate::models::Task;
use crate::view;
use eyre::Result;
use std::io::{BufRead, Write};
use tracing::warn;

const HELP: &str = "\
commands:
  add <description>        add a pending task
  toggle <id>              mark done / not done
  edit <id> <description>  change a description
  delete <id>              delete one task
  clear                    delete every task
  pending | completed      switch view
  list                     show the current view
  help                     this text
  quit | exit              leave
";

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(String),
    Toggle(i64),
    Edit(i64, String),
    Delete(i64),
    Clear,
    ShowPending,
    ShowCompleted,
    List,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line.trim_end(), ""));
        let rest = rest.trim_end_matches(['\r', '\n']);

        match word {
            "add" => Ok(ShellCommand::Add(rest.to_string())),
            "toggle" => parse_id(rest).map(ShellCommand::Toggle),
            "edit" => {
                let (id, description) = rest.split_once(' ').unwrap_or((rest, ""));
                Ok(ShellCommand::Edit(parse_id(id)?, description.to_string()))
            }
            "delete" => parse_id(rest).map(ShellCommand::Delete),
            "clear" => Ok(ShellCommand::Clear),
            "pending" => Ok(ShellCommand::ShowPending),
            "completed" => Ok(ShellCommand::ShowCompleted),
            "list" => Ok(ShellCommand::List),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("unknown command: {} (try help)", other)),
        }
    }
}

fn parse_id(s: &str) -> std::result::Result<i64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("missing task id".to_string());
    }
    s.parse().map_err(|_| format!("invalid task id: {}", s))
}

/// Run commands from `input` until EOF or `quit`
///
/// Every published snapshot is rendered in the current view; storage errors are
/// printed and the session continues.
pub fn run<R: BufRead, W: Write>(controller: &mut TaskListController, input: R, out: &mut W) -> Result<()> {
    let updates = controller.subscribe();
    write!(out, "{}", view::render_view(controller.tasks(), controller.show_completed()))?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                writeln!(out, "{}", msg)?;
                continue;
            }
        };

        match execute(controller, command) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Render) => {
                write!(out, "{}", view::render_view(controller.tasks(), controller.show_completed()))?;
            }
            Ok(Outcome::Help) => write!(out, "{}", HELP)?,
            Ok(Outcome::Done) => {}
            Err(e) => {
                warn!(error = %e, "Shell command failed");
                writeln!(out, "error: {}", e)?;
            }
        }

        // Only the newest snapshot matters once a command has finished
        if let Some(snapshot) = updates.try_iter().last() {
            write!(out, "{}", view::render_view(&snapshot, controller.show_completed()))?;
        }
    }

    Ok(())
}

enum Outcome {
    Done,
    Render,
    Help,
    Quit,
}

fn execute(controller: &mut TaskListController, command: ShellCommand) -> Result<Outcome> {
    match command {
        ShellCommand::Add(description) => controller.add_task(&description)?,
        ShellCommand::Toggle(id) => {
            let task = lookup(controller, id)?;
            controller.toggle_task_completion(&task)?;
        }
        ShellCommand::Edit(id, description) => {
            let task = lookup(controller, id)?;
            controller.edit_task(&task, &description)?;
        }
        ShellCommand::Delete(id) => {
            let task = lookup(controller, id)?;
            controller.delete_task(&task)?;
        }
        ShellCommand::Clear => controller.delete_all_tasks()?,
        ShellCommand::ShowPending => {
            controller.filter_tasks(false);
            return Ok(Outcome::Render);
        }
        ShellCommand::ShowCompleted => {
            controller.filter_tasks(true);
            return Ok(Outcome::Render);
        }
        ShellCommand::List => return Ok(Outcome::Render),
        ShellCommand::Help => return Ok(Outcome::Help),
        ShellCommand::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Done)
}

fn lookup(controller: &TaskListController, id: i64) -> Result<Task> {
    controller
        .find(id)
        .cloned()
        .ok_or_else(|| eyre::eyre!("task {} not found", id))
}
