use dialoguer::{Input, Select};

use rolodex_core::{Contact, DraftField, EditSession};

use crate::app::AppContext;
use crate::cli::EditArgs;
use crate::helpers::wait_for_live;

enum EditAction {
    Save,
    Delete,
    Cancel,
}

pub async fn handle_edit(ctx: &AppContext<'_>, args: &EditArgs) -> anyhow::Result<()> {
    let contact = ctx.find_contact(args.id).await?;
    let store = ctx.store().await?;

    let mut session = EditSession::new(store.clone());
    session.begin_edit(&contact);

    let interactive = !args.no_input && args.first.is_none() && args.phone.is_none();
    let (first, phone, action) = if interactive {
        let first = Input::<String>::new()
            .with_prompt("First name")
            .with_initial_text(&contact.first_name)
            .interact_text()?;
        let phone = Input::<String>::new()
            .with_prompt("Phone number")
            .with_initial_text(&contact.phone)
            .interact_text()?;
        let choice = Select::new()
            .with_prompt("Action")
            .items(&["Save", "Delete", "Cancel"])
            .default(0)
            .interact()?;
        let action = match choice {
            0 => EditAction::Save,
            1 => EditAction::Delete,
            _ => EditAction::Cancel,
        };
        (first, phone, action)
    } else {
        let first = args.first.clone().unwrap_or_else(|| contact.first_name.clone());
        let phone = args.phone.clone().unwrap_or_else(|| contact.phone.clone());
        (first, phone, EditAction::Save)
    };

    session.update_draft(DraftField::FirstName, first.clone());
    session.update_draft(DraftField::Phone, phone.clone());

    let mut live = store.observe_contacts();
    match action {
        EditAction::Save => {
            session.commit()?;
            let expected = Contact {
                id: contact.id,
                first_name: first.trim().to_string(),
                last_name: contact.last_name.clone(),
                phone: phone.trim().to_string(),
            };
            wait_for_live(&mut live, |c| c.contains(&expected)).await?;
            if !ctx.quiet() {
                println!("Updated contact {} ({})", expected.id, expected.first_name);
            }
        }
        EditAction::Delete => {
            session.delete(&contact)?;
            wait_for_live(&mut live, |c| c.iter().all(|x| x.id != contact.id)).await?;
            if !ctx.quiet() {
                println!("Deleted contact {} ({})", contact.id, contact.first_name);
            }
        }
        EditAction::Cancel => {
            session.cancel();
            if !ctx.quiet() {
                println!("Left contact {} unchanged", contact.id);
            }
        }
    }

    Ok(())
}
