use rolodex_core::ContactOrder;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::helpers::parse_sort_field;
use crate::output::{parse_output_format, print_contacts};

pub async fn handle_list(ctx: &AppContext<'_>, args: &ListArgs) -> anyhow::Result<()> {
    let order = parse_sort_field(args.sort.as_deref())?;
    let format = match parse_output_format(args.format.as_deref())? {
        Some(chosen) => Some(chosen),
        // A configured default format never conflicts with --json.
        None if args.json => None,
        None => parse_output_format(ctx.ui_format()?)?,
    };

    let store = ctx.store().await?;
    let contacts = match order {
        ContactOrder::FirstName => store.observe_contacts().current(),
        other => store.watch_ordered_by(other).borrow().clone(),
    };

    print_contacts(&contacts, args.json, format, ctx.quiet())
}
