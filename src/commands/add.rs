use super::{Context, describe, print_view};

pub async fn run(ctx: &Context, title: &str, description: Option<&str>) -> Result<(), String> {
    let mut controller = ctx.mounted().await?;
    controller
        .create(title, description.unwrap_or(""))
        .await
        .map_err(|e| describe(&e))?;

    if !ctx.json {
        println!("Added task: {title}");
    }
    print_view(&controller, ctx.json)
}
