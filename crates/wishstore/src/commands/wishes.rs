//! Wish command handlers.

use tabled::Tabled;
use wishstore_core::{DialogViewModel, Owned, RouteKind, Storefront, Wish};

use crate::cli::{GlobalOpts, WishesArgs, WishesCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WishRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Wishlist")]
    wishlist: String,
}

impl From<&Wish> for WishRow {
    fn from(w: &Wish) -> Self {
        Self {
            id: or_dash(w.id),
            product: or_dash(w.product_id),
            price: price_label(w),
            wishlist: w.owner_label(),
        }
    }
}

fn price_label(w: &Wish) -> String {
    w.price.map_or_else(|| "-".into(), |p| format!("{p:.2}"))
}

fn detail(w: &Wish) -> String {
    output::detail_block(&[
        ("ID", or_dash(w.id)),
        ("Product", or_dash(w.product_id)),
        ("Price", price_label(w)),
        ("Wishlist", w.owner_label()),
    ])
}

fn id_of(w: &Wish) -> String {
    or_dash(w.id)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    store: &Storefront,
    args: WishesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        WishesCommand::List(list) => {
            let items = util::list::<Wish>(store, &list).await?;
            let out = output::render_list(&global.output, &items, |w| WishRow::from(w), id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishesCommand::Get { id } => {
            let (_nav, wish) = util::open::<Wish>(store, RouteKind::Detail, Some(id)).await?;
            let out = output::render_single(&global.output, &wish, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishesCommand::Create {
            product_id,
            price,
            wishlist,
        } => {
            let (nav, draft) = util::open::<Wish>(store, RouteKind::New, None).await?;

            let mut dialog = DialogViewModel::new(draft);
            if let Some(draft) = dialog.draft_mut() {
                draft.product_id = Some(product_id);
                draft.price = Some(price);
            }
            util::select_owner(store, &mut dialog, wishlist, false).await?;

            let saved = util::save(store, &nav, dialog, global).await?;
            let out = output::render_single(&global.output, &saved, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishesCommand::Update {
            id,
            product_id,
            price,
            wishlist,
            clear_wishlist,
        } => {
            let (nav, current) = util::open::<Wish>(store, RouteKind::Edit, Some(id)).await?;

            let mut dialog = DialogViewModel::new(current);
            if let Some(draft) = dialog.draft_mut() {
                if product_id.is_some() {
                    draft.product_id = product_id;
                }
                if price.is_some() {
                    draft.price = price;
                }
            }
            util::select_owner(store, &mut dialog, wishlist, clear_wishlist).await?;

            let saved = util::save(store, &nav, dialog, global).await?;
            let out = output::render_single(&global.output, &saved, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WishesCommand::Delete { id } => util::delete::<Wish>(store, id, global).await,
    }
}
