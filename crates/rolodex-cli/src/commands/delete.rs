use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::helpers::wait_for_live;

pub async fn handle_delete(ctx: &AppContext<'_>, args: &DeleteArgs) -> anyhow::Result<()> {
    let contact = ctx.find_contact(args.id).await?;
    let store = ctx.store().await?;

    let mut live = store.observe_contacts();
    store.remove(contact.id)?;
    wait_for_live(&mut live, |c| c.iter().all(|x| x.id != contact.id)).await?;

    if !ctx.quiet() {
        println!("Deleted contact {} ({})", contact.id, contact.first_name);
    }
    Ok(())
}
