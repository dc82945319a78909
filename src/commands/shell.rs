use std::io::{BufRead, IsTerminal, Write};

use todo_client::api::ApiClient;
use todo_client::controller::{ControllerError, DeleteOutcome, EditState, TaskListController};
use todo_client::models::Filter;

use super::{Context, describe, is_yes, print_view, route_hint};

const HELP: &str = "\
commands:
  list                    show tasks for the current filter
  filter <all|pending|completed>
  add <title> [| <description>]
  toggle <id>             flip completed/pending
  delete <id>             asks for confirmation
  edit <id>               open the inline editor
  title <text>            change the draft title
  desc <text>             change the draft description
  save | cancel           close the editor
  refresh                 reload from the server
  logout | quit";

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    List,
    Filter(Filter),
    Add { title: String, description: String },
    Toggle(i64),
    Delete(i64),
    Edit(i64),
    Title(String),
    Desc(String),
    Save,
    Cancel,
    Refresh,
    Logout,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let id = || {
        rest.parse::<i64>()
            .map_err(|_| format!("{word}: expected a task id, got {rest:?}"))
    };

    let input = match word.to_lowercase().as_str() {
        "list" | "ls" => Input::List,
        "filter" => Input::Filter(Filter::from_str(rest)?),
        "add" => {
            let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
            Input::Add {
                title: title.trim().to_string(),
                description: description.trim().to_string(),
            }
        }
        "toggle" => Input::Toggle(id()?),
        "delete" | "rm" => Input::Delete(id()?),
        "edit" => Input::Edit(id()?),
        "title" => Input::Title(rest.to_string()),
        "desc" | "description" => Input::Desc(rest.to_string()),
        "save" => Input::Save,
        "cancel" => Input::Cancel,
        "refresh" => Input::Refresh,
        "logout" => Input::Logout,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Some(input))
}

/// Run the interactive task view until `quit`, `logout`, end of input, or a lost session.
pub async fn run(ctx: &Context) -> Result<(), String> {
    let mut controller = ctx.mounted().await?;
    print_view(&controller, ctx.json)?;

    let interactive = std::io::stdin().is_terminal();
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("{}> ", prompt_label(&controller));
            let _ = std::io::stdout().flush();
        }
        let Some(line) = lines.next() else { break };
        let line = line.map_err(|e| format!("failed to read input: {e}"))?;

        let input = match parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };

        let result = match input {
            Input::Quit => break,
            Input::Help => {
                println!("{HELP}");
                Ok(())
            }
            Input::Logout => {
                let route = controller
                    .logout(ctx.session.as_ref())
                    .map_err(|e| e.to_string())?;
                println!("Logged out; {}", route_hint(&route));
                break;
            }
            Input::Delete(id) => {
                if interactive {
                    print!("{} [y/N] ", controller.delete_prompt(id));
                    let _ = std::io::stdout().flush();
                }
                let answer = match lines.next() {
                    Some(Ok(answer)) => answer,
                    _ => String::new(),
                };
                let confirmed = is_yes(&answer);
                match controller.delete(id, |_| confirmed).await {
                    Ok(DeleteOutcome::Declined) => {
                        println!("Cancelled.");
                        continue;
                    }
                    Ok(_) => Ok(()),
                    Err(e) => Err(e),
                }
            }
            other => apply(&mut controller, other).await,
        };

        match result {
            Ok(()) => print_view(&controller, ctx.json)?,
            Err(e @ ControllerError::Unauthorized) => return Err(describe(&e)),
            Err(e) => eprintln!("error: {}", describe(&e)),
        }
    }
    Ok(())
}

async fn apply(
    controller: &mut TaskListController<ApiClient>,
    input: Input,
) -> Result<(), ControllerError> {
    match input {
        Input::List => Ok(()),
        Input::Filter(f) => {
            controller.set_filter(f);
            Ok(())
        }
        Input::Add { title, description } => controller.create(&title, &description).await,
        Input::Toggle(id) => controller.toggle(id).await,
        Input::Edit(id) => {
            let draft = controller.begin_edit(id)?;
            println!("editing {id}: {:?} / {:?}", draft.title, draft.description);
            Ok(())
        }
        Input::Title(t) => controller.edit_draft(Some(&t), None),
        Input::Desc(d) => controller.edit_draft(None, Some(&d)),
        Input::Save => controller.save_edit().await,
        Input::Cancel => {
            controller.cancel_edit();
            Ok(())
        }
        Input::Refresh => controller.refresh().await,
        Input::Delete(_) | Input::Logout | Input::Help | Input::Quit => Ok(()),
    }
}

fn prompt_label(controller: &TaskListController<ApiClient>) -> String {
    match controller.edit_state() {
        EditState::Editing { id, .. } => format!("todo[{}|edit {id}]", controller.filter()),
        EditState::Viewing => format!("todo[{}]", controller.filter()),
    }
}
