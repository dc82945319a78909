use todo_client::models::Filter;

use super::{Context, print_view};

pub async fn run(ctx: &Context, filter: Filter) -> Result<(), String> {
    let mut controller = ctx.mounted().await?;
    controller.set_filter(filter);
    print_view(&controller, ctx.json)
}
