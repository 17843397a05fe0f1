//! Wishlist command handlers.

use tabled::Tabled;
use wishstore_core::{DialogViewModel, Owned, RouteKind, Storefront, Wishlist};

use crate::cli::{GlobalOpts, WishlistsArgs, WishlistsCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WishlistRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Hidden")]
    hidden: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

impl From<&Wishlist> for WishlistRow {
    fn from(w: &Wishlist) -> Self {
        Self {
            id: or_dash(w.id),
            name: w.name.clone().unwrap_or_default(),
            created: or_dash(w.creation_date),
            hidden: match w.hidden {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => "-".into(),
            },
            owner: w.owner_label(),
        }
    }
}

fn detail(w: &Wishlist) -> String {
    output::detail_block(&[
        ("ID", or_dash(w.id)),
        ("Name", or_dash(w.name.as_deref())),
        ("Created", or_dash(w.creation_date)),
        ("Hidden", or_dash(w.hidden)),
        ("Owner", w.owner_label()),
    ])
}

fn id_of(w: &Wishlist) -> String {
    or_dash(w.id)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &Storefront,
    args: WishlistsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WishlistsCommand::List(list) => {
            let items = util::list::<Wishlist>(store, &list).await?;
            let out = output::render_list(&global.output, &items, |w| WishlistRow::from(w), id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishlistsCommand::Get { id } => {
            let (_nav, wishlist) = util::open::<Wishlist>(store, RouteKind::Detail, Some(id)).await?;
            let out = output::render_single(&global.output, &wishlist, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishlistsCommand::Create {
            name,
            creation_date,
            hidden,
            owner,
        } => {
            let creation_date = creation_date.as_deref().map(util::parse_date).transpose()?;
            let (nav, draft) = util::open::<Wishlist>(store, RouteKind::New, None).await?;

            let mut dialog = DialogViewModel::new(draft);
            if let Some(draft) = dialog.draft_mut() {
                draft.name = Some(name);
                draft.creation_date = creation_date;
                draft.hidden = Some(hidden);
            }
            util::select_owner(store, &mut dialog, owner, false).await?;

            let saved = util::save(store, &nav, dialog, global).await?;
            let out = output::render_single(&global.output, &saved, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishlistsCommand::Update {
            id,
            name,
            creation_date,
            hidden,
            owner,
            clear_owner,
        } => {
            let creation_date = creation_date.as_deref().map(util::parse_date).transpose()?;
            let (nav, current) = util::open::<Wishlist>(store, RouteKind::Edit, Some(id)).await?;

            let mut dialog = DialogViewModel::new(current);
            if let Some(draft) = dialog.draft_mut() {
                if name.is_some() {
                    draft.name = name;
                }
                if creation_date.is_some() {
                    draft.creation_date = creation_date;
                }
                if hidden.is_some() {
                    draft.hidden = hidden;
                }
            }
            util::select_owner(store, &mut dialog, owner, clear_owner).await?;

            let saved = util::save(store, &nav, dialog, global).await?;
            let out = output::render_single(&global.output, &saved, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishlistsCommand::Delete { id } => util::delete::<Wishlist>(store, id, global).await,
    }
}
