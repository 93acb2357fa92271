use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use playpod_catalog_server::config::{DEFAULT_SECRET_KEY, DEFAULT_TOKEN_EXPIRE_MINUTES};
use playpod_catalog_server::user::{SqliteUserStore, TokenSigner, UserCreate, UserManager};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

/// Manages the accounts of a PlayPod user database.
#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite user database, created if missing.
    #[clap(value_parser = parse_path)]
    pub path: PathBuf,

    /// Secret used to sign the tokens printed by `token`.
    #[clap(long, env = "SECRET_KEY", default_value = DEFAULT_SECRET_KEY, hide_env_values = true)]
    pub secret_key: String,

    /// Lifetime of the tokens printed by `token`, in minutes.
    #[clap(long, env = "ACCESS_TOKEN_EXPIRE_MINUTES", default_value_t = DEFAULT_TOKEN_EXPIRE_MINUTES)]
    pub token_expire_minutes: i64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Registers a user with the given username, email and password.
    Add {
        username: String,
        email: String,
        password: String,
    },

    /// Shows all users.
    List,

    /// Replaces the password of an existing user.
    SetPassword { username: String, password: String },

    /// Prints a signed access token for the given user.
    Token { username: String },
}

const LIST_PAGE_SIZE: usize = 100;

fn execute_command(command: Command, user_manager: &UserManager) -> Result<()> {
    match command {
        Command::Add {
            username,
            email,
            password,
        } => {
            let user = user_manager.register(UserCreate {
                username,
                email,
                password,
            })?;
            println!("Created user {} with id {}", user.username, user.id);
        }
        Command::List => {
            let mut skip = 0;
            loop {
                let users = user_manager.list_users(skip, LIST_PAGE_SIZE)?;
                for user in users.iter() {
                    println!(
                        "{:>5}  {:<20} {:<30} {}",
                        user.id,
                        user.username,
                        user.email,
                        if user.is_active { "active" } else { "inactive" }
                    );
                }
                if users.len() < LIST_PAGE_SIZE {
                    break;
                }
                skip += users.len();
            }
        }
        Command::SetPassword { username, password } => {
            user_manager.set_password(&username, &password)?;
            println!("Password of {} updated", username);
        }
        Command::Token { username } => {
            user_manager
                .get_user_by_username(&username)?
                .with_context(|| format!("User {} not found.", username))?;
            println!("{}", user_manager.issue_token(&username)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let user_store = SqliteUserStore::new(&cli_args.path)
        .with_context(|| format!("Failed to open user database at {:?}", cli_args.path))?;
    let token_signer = TokenSigner::new(&cli_args.secret_key, cli_args.token_expire_minutes);
    let user_manager = UserManager::new(Arc::new(user_store), token_signer);

    execute_command(cli_args.command, &user_manager)
}
