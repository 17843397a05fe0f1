//! Route inspection. Works offline: the state table depends only on the
//! application name.

use serde::Serialize;
use tabled::Tabled;
use wishstore_core::{Catalog, StateDef, StateParams, StateRegistry, routes::ViewDef};

use crate::cli::{GlobalOpts, RoutesArgs, RoutesCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Clone, Serialize, Tabled)]
struct RouteRow {
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "View")]
    view: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Authorities")]
    authorities: String,
}

#[derive(Serialize)]
struct RouteMatch {
    state: String,
    id: Option<i64>,
    pattern: String,
    title: String,
}

#[derive(Serialize)]
struct RouteHref {
    state: String,
    url: String,
}

fn row(registry: &StateRegistry, catalog: &Catalog, state: &StateDef) -> RouteRow {
    RouteRow {
        state: state.name.clone(),
        url: registry.url_pattern(&state.name).unwrap_or_default(),
        kind: state.kind().map(|k| k.to_string()).unwrap_or_default(),
        view: match state.view {
            ViewDef::Content { .. } => "content",
            ViewDef::Modal { .. } => "modal",
            ViewDef::None => "-",
        },
        title: title(registry, catalog, &state.name),
        authorities: state.authorities.join(","),
    }
}

fn title(registry: &StateRegistry, catalog: &Catalog, state: &str) -> String {
    registry
        .page_title(state)
        .map(|key| catalog.translate(key, None))
        .unwrap_or_default()
}

pub fn handle(args: RoutesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let app = config::app_name(global);
    let registry = StateRegistry::storefront(&app);
    let catalog = Catalog::english(&app);

    match args.command {
        RoutesCommand::List => {
            let rows: Vec<RouteRow> = registry
                .states()
                .map(|s| row(&registry, &catalog, s))
                .collect();
            let out = output::render_list(
                &global.output,
                &rows,
                RouteRow::clone,
                |r| r.state.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoutesCommand::Match { url } => {
            let found = registry.match_url(&url).ok_or_else(|| CliError::NotFound {
                resource_type: "route".into(),
                identifier: url.clone(),
                list_command: "routes list".into(),
            })?;
            let matched = RouteMatch {
                pattern: registry.url_pattern(&found.state)?,
                title: title(&registry, &catalog, &found.state),
                id: found.params.id,
                state: found.state,
            };
            let out = output::render_single(
                &global.output,
                &matched,
                |m| {
                    output::detail_block(&[
                        ("State", m.state.clone()),
                        ("ID", output::or_dash(m.id)),
                        ("Pattern", m.pattern.clone()),
                        ("Title", m.title.clone()),
                    ])
                },
                |m| m.state.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoutesCommand::Href { state, id } => {
            let url = registry.href(&state, StateParams { id })?;
            let href = RouteHref { state, url };
            let out = output::render_single(
                &global.output,
                &href,
                |h| h.url.clone(),
                |h| h.url.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
