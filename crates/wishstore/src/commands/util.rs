//! Shared helpers for command handlers.
//!
//! Entity commands run through the same states the interactive client uses:
//! `go` + resolve to load, a dialog view-model to save, a delete view-model
//! to delete. The CLI is just a front end with no screen.

use std::io::IsTerminal;

use tracing::debug;
use wishstore_core::{
    CoreError, DeleteViewModel, DialogViewModel, Entity, Navigator, Owned, PageRequest, RouteKind,
    StateParams, Storefront, resolve_entity,
};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::{CliError, list_command_for};
use crate::output;

/// Build a storefront from config + flags and sign in.
pub async fn connect(global: &GlobalOpts) -> Result<Storefront, CliError> {
    let config = crate::config::build_client_config(global)?;
    let store = Storefront::new(config)?;
    store.connect().await?;
    Ok(store)
}

/// Fetch the page(s) `args` asks for.
pub async fn list<T: Entity>(store: &Storefront, args: &ListArgs) -> Result<Vec<T>, CliError> {
    let service = store.resource::<T>();
    let mut request = args
        .sort
        .iter()
        .fold(PageRequest::new(args.page, args.size), |req, s| req.sorted_by(s.clone()));

    let mut items = Vec::new();
    loop {
        let page = service.query_page(&request).await.map_err(CoreError::from)?;
        debug!(
            page = request.page,
            count = page.items.len(),
            total = ?page.total_count,
            "fetched {}",
            T::COLLECTION
        );
        items.extend(page.items);

        match page.links.next {
            Some(next) if args.all && next > request.page => request.page = next,
            _ => break,
        }
    }
    Ok(items)
}

/// Enter the `kind` state of `T` and return the navigator with its resolved entity.
pub async fn open<T: Entity>(
    store: &Storefront,
    kind: RouteKind,
    id: Option<i64>,
) -> Result<(Navigator, T), CliError> {
    let mut nav = store.navigator();
    let state = kind.state_name(T::NAME);
    let pending = nav.go(&state, id.map(StateParams::id).unwrap_or_default())?;

    let entity = resolve_entity(&store.resource::<T>(), &pending)
        .await?
        .ok_or_else(|| CliError::Routing {
            message: format!("'{state}' resolves no {}", T::NAME),
        })?;
    nav.commit(&pending);
    Ok((nav, entity))
}

/// Point the dialog's draft at owner `owner`, or detach it with `clear`.
pub async fn select_owner<T: Owned>(
    store: &Storefront,
    dialog: &mut DialogViewModel<T>,
    owner: Option<i64>,
    clear: bool,
) -> Result<(), CliError> {
    if clear {
        dialog.select_owner(None);
        return Ok(());
    }
    let Some(id) = owner else {
        return Ok(());
    };

    dialog.load_owners(&store.resource::<T::Owner>()).await?;
    dialog.select_owner(Some(id));
    if dialog.selected_owner().is_none() {
        let name = <T::Owner as Entity>::NAME;
        return Err(CliError::NotFound {
            resource_type: name.into(),
            identifier: id.to_string(),
            list_command: list_command_for(name),
        });
    }
    Ok(())
}

/// Submit the dialog and hand back the server copy.
pub async fn save<T: Entity>(
    store: &Storefront,
    nav: &Navigator,
    mut dialog: DialogViewModel<T>,
    global: &GlobalOpts,
) -> Result<T, CliError> {
    if let Err(err) = dialog.submit(&store.resource::<T>(), store.bus()).await {
        return Err(match dialog.field_errors().first() {
            Some(field) => CliError::Validation {
                field: field.field.into(),
                reason: field.message.clone(),
            },
            None => err.into(),
        });
    }
    if let Some(err) = dialog.take_error() {
        return Err(err.into());
    }

    let outcome = dialog.into_outcome().ok_or_else(|| CliError::Routing {
        message: format!("{} dialog did not close", T::TITLE),
    })?;
    let exit = nav.exit_modal(&outcome)?;
    debug!(to = %exit.to, reload = exit.reload, "dialog closed");

    output::print_alerts(&store.alerts().drain(), &global.color, global.quiet);
    outcome.closed().ok_or_else(|| CliError::Routing {
        message: format!("{} dialog was dismissed", T::TITLE),
    })
}

/// Confirm and delete `T` with `id`.
pub async fn delete<T: Entity>(
    store: &Storefront,
    id: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (nav, entity) = open::<T>(store, RouteKind::Delete, Some(id)).await?;
    let mut vm = DeleteViewModel::new(entity);

    let prompt = format!("Delete {} {id} ({})?", T::TITLE, vm.entity().label());
    if !confirm(&prompt, global.yes, "delete")? {
        vm.clear();
        eprintln!("Cancelled");
        return Ok(());
    }

    vm.confirm_delete(&store.resource::<T>(), id).await;
    if let Some(err) = vm.take_error() {
        return Err(err.into());
    }
    if let Some(outcome) = vm.outcome() {
        let exit = nav.exit_modal(outcome)?;
        debug!(to = %exit.to, reload = exit.reload, "delete dialog closed");
    }

    output::print_alerts(&store.alerts().drain(), &global.color, global.quiet);
    Ok(())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Parse a `YYYY-MM-DD` date flag.
pub fn parse_date(raw: &str) -> Result<chrono::NaiveDate, CliError> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: "creation-date".into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}
