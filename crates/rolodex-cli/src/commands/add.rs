use std::collections::HashSet;

use dialoguer::Input;

use rolodex_core::NewContact;

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::helpers::wait_for_live;

pub async fn handle_add(ctx: &AppContext<'_>, args: &AddArgs) -> anyhow::Result<()> {
    let first = field_value(args.first.clone(), "First name", args.no_input)?;
    let phone = field_value(args.phone.clone(), "Phone number", args.no_input)?;
    let last = args.last.clone().unwrap_or_default();

    let store = ctx.store().await?;
    let mut live = store.observe_contacts();
    let known: HashSet<_> = live.current().iter().map(|c| c.id).collect();

    store.add(NewContact::new(first, phone).with_last_name(last))?;

    let contacts = wait_for_live(&mut live, |c| c.iter().any(|x| !known.contains(&x.id))).await?;
    if !ctx.quiet() {
        if let Some(added) = contacts.iter().find(|c| !known.contains(&c.id)) {
            println!("Added contact {} ({})", added.id, added.first_name);
        }
    }
    Ok(())
}

fn field_value(flag: Option<String>, prompt: &str, no_input: bool) -> anyhow::Result<String> {
    if let Some(value) = flag {
        return Ok(value);
    }
    if no_input {
        return Err(anyhow::anyhow!("{} is required with --no-input", prompt));
    }
    Ok(Input::<String>::new().with_prompt(prompt).interact_text()?)
}
