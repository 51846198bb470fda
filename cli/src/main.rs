use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use wikiguard::config::{ClientConfig, ConfigError, parse_base_url};
use wikiguard::{
    ApiError, Credentials, HttpAuthApi, Navigation, NavigationGuard, Navigator, RouteTable, SessionContext,
    SessionError, SessionStore,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing credentials; pass --username/--password or set WIKI_USERNAME/WIKI_PASSWORD")]
    MissingCredentials,
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("home route `{0}` is not in the route table")]
    UnknownHomeRoute(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "wikiguard-cli", about = "Wiki session and route-guard CLI")]
struct Cli {
    /// API root; overrides `WIKI_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Existing session cookie (`name=value`); overrides `WIKI_SESSION_COOKIE`.
    #[arg(long)]
    session_cookie: Option<String>,

    /// Redirect target for permission denials; overrides `WIKI_HOME_ROUTE`.
    #[arg(long)]
    home_route: Option<String>,

    #[arg(long, short = 'u', env = "WIKI_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "WIKI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the server whether the current cookie is signed in.
    Check,
    /// Sign in with --username/--password.
    Login,
    /// Sign in (or reuse the cookie session), then sign out.
    Logout,
    /// Print the current user as reported by `/auth/me`.
    Whoami,
    /// Evaluate a capability for the current user.
    Can { capability: String },
    /// Run the navigation guard for each path.
    Navigate {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// List the route table with each route's requirements.
    Routes,
    /// Ask the server to probe its LDAP connection.
    LdapTest,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let api = Arc::new(HttpAuthApi::new(&config)?);
    let session = SessionContext::new();
    let store = SessionStore::new(api.clone(), session.clone());
    let navigator = build_navigator(&config, session)?;

    match &cli.command {
        Command::Check => {
            let authenticated = store.check_session().await;
            let snapshot = store.snapshot();
            print_json(&json!({
                "authenticated": authenticated,
                "status": snapshot.status.as_str(),
                "error": snapshot.last_error,
                "user": snapshot.identity,
            }))
        }
        Command::Login => {
            let credentials = credentials(&cli)?;
            let message = store.login(&credentials).await?;
            print_json(&json!({ "message": message, "user": store.identity() }))
        }
        Command::Logout => {
            establish(&store, &cli).await?;
            store.logout().await?;
            print_json(&json!({ "authenticated": store.is_authenticated() }))
        }
        Command::Whoami => {
            establish(&store, &cli).await?;
            let user = store.fetch_current_user().await.map_err(refresh_failure)?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Can { capability } => {
            establish(&store, &cli).await?;
            let granted = store.has_permission(capability);
            print_json(&json!({ "capability": capability, "granted": granted }))
        }
        Command::Navigate { paths } => {
            // Anonymous navigation is meaningful too, so a failed check is not an error.
            if try_establish(&store, &cli).await.is_err() {
                tracing::info!("continuing as anonymous");
            }
            let results: Vec<Value> = paths
                .iter()
                .map(|path| render_navigation(path, &navigator.navigate(path)))
                .collect();
            print_json(&Value::Array(results))
        }
        Command::Routes => {
            let routes: Vec<Value> = navigator
                .table()
                .iter()
                .map(|r| json!({ "name": r.name, "path": r.path, "meta": r.meta }))
                .collect();
            print_json(&Value::Array(routes))
        }
        Command::LdapTest => {
            let message = api.test_ldap_connection().await?;
            print_json(&json!({ "ok": true, "message": message }))
        }
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.api_base_url = parse_base_url(base_url)?;
    }
    if let Some(cookie) = &cli.session_cookie {
        config.session_cookie = Some(cookie.clone());
    }
    if let Some(home_route) = &cli.home_route {
        config.home_route.clone_from(home_route);
    }
    Ok(config)
}

fn build_navigator(config: &ClientConfig, session: SessionContext) -> Result<Navigator, CliError> {
    let table = RouteTable::wiki();
    if table.get(&config.home_route).is_none() {
        return Err(CliError::UnknownHomeRoute(config.home_route.clone()));
    }
    Ok(Navigator::new(table, NavigationGuard::new(session, config.home_route.clone())))
}

/// A 401 on refresh means the cookie session lapsed between establishing and asking.
fn refresh_failure(err: ApiError) -> CliError {
    if err.is_unauthorized() {
        CliError::NotAuthenticated
    } else {
        CliError::Api(err)
    }
}

fn credentials(cli: &Cli) -> Result<Credentials, CliError> {
    match (&cli.username, &cli.password) {
        (Some(username), Some(password)) => Ok(Credentials::new(username.as_str(), password.as_str())),
        _ => Err(CliError::MissingCredentials),
    }
}

/// Log in when credentials were given, otherwise rely on the cookie session.
async fn try_establish(store: &SessionStore, cli: &Cli) -> Result<(), CliError> {
    if let Ok(credentials) = credentials(cli) {
        store.login(&credentials).await?;
        return Ok(());
    }
    if store.check_session().await {
        Ok(())
    } else {
        Err(CliError::NotAuthenticated)
    }
}

async fn establish(store: &SessionStore, cli: &Cli) -> Result<(), CliError> {
    try_establish(store, cli).await.inspect_err(|e| {
        tracing::warn!(error = %e, "could not establish a session");
    })
}

fn render_navigation(path: &str, navigation: &Navigation) -> Value {
    match navigation {
        Navigation::Arrived { route, params } => {
            json!({ "path": path, "decision": "proceed", "route": route, "params": params })
        }
        Navigation::Blocked { route } => json!({ "path": path, "decision": "block", "route": route }),
        Navigation::Redirected { from, to } => {
            json!({ "path": path, "decision": "redirect", "route": from, "to": to })
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
