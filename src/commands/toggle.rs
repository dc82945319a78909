use super::{Context, describe, print_view};

pub async fn run(ctx: &Context, id: i64) -> Result<(), String> {
    let mut controller = ctx.mounted().await?;
    controller.toggle(id).await.map_err(|e| describe(&e))?;

    if !ctx.json {
        let state = match controller.task(id) {
            Some(t) if t.completed => "completed",
            Some(_) => "pending",
            None => "toggled",
        };
        println!("Task {id} marked {state}");
    }
    print_view(&controller, ctx.json)
}
