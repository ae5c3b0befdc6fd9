use crate::app::AppContext;
use crate::output::render_table;

pub async fn handle_watch(ctx: &AppContext<'_>) -> anyhow::Result<()> {
    let store = ctx.store().await?;
    let mut live = store.observe_contacts();

    if !ctx.quiet() {
        println!("Watching the address book (press Ctrl-C to stop)");
    }

    loop {
        println!("{}", render_table(&live.current()));
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = live.changed() => changed?,
        }
    }

    Ok(())
}
