use super::{Context, describe, print_view};

pub async fn run(
    ctx: &Context,
    id: i64,
    title: Option<&str>,
    description: Option<&str>,
) -> Result<(), String> {
    if title.is_none() && description.is_none() {
        return Err("nothing to change: pass --title and/or --description".to_string());
    }

    let mut controller = ctx.mounted().await?;
    controller.begin_edit(id).map_err(|e| describe(&e))?;
    controller
        .edit_draft(title, description)
        .map_err(|e| describe(&e))?;
    controller.save_edit().await.map_err(|e| describe(&e))?;

    if !ctx.json {
        println!("Updated task {id}");
    }
    print_view(&controller, ctx.json)
}
