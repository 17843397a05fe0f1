//! User command handlers. Users are read-only here; they only matter as
//! wishlist owners.

use tabled::Tabled;
use wishstore_core::{Storefront, User};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Login")]
    login: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        let name = [u.first_name.as_deref(), u.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            id: or_dash(u.id),
            login: u.login.clone(),
            name,
            email: u.email.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(store: &Storefront, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(list) => {
            let users = util::list::<User>(store, &list).await?;
            let out = output::render_list(
                &global.output,
                &users,
                |u| UserRow::from(u),
                |u| u.login.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
