use todo_client::controller::DeleteOutcome;

use super::{Context, confirm_stdin, describe, print_view};

pub async fn run(ctx: &Context, id: i64, yes: bool) -> Result<(), String> {
    let mut controller = ctx.mounted().await?;
    let outcome = controller
        .delete(id, |prompt| yes || confirm_stdin(prompt))
        .await
        .map_err(|e| describe(&e))?;

    match outcome {
        DeleteOutcome::Declined => {
            println!("Cancelled.");
            return Ok(());
        }
        DeleteOutcome::Deleted if !ctx.json => println!("Deleted task {id}"),
        DeleteOutcome::AlreadyGone if !ctx.json => println!("Task {id} was already gone"),
        _ => {}
    }
    print_view(&controller, ctx.json)
}
