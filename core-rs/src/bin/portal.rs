//! portal - Edu Portal access CLI
//!
//! Sign in, inspect the session and check page access from the terminal.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use portal_core::config::CONFIG_FILE_NAME;
use portal_core::{PortalConfig, PortalContext, Role};

#[derive(Parser)]
#[command(name = "portal")]
#[command(version)]
#[command(about = "Edu Portal access CLI", long_about = None)]
struct Cli {
    /// Config file (defaults to $PORTAL_CONFIG, then ./.portal.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long, short)]
        email: String,
        #[arg(long, short)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check whether the current session may open a page
    Check {
        /// Page path (e.g., /teacher/grades)
        path: String,
    },
    /// Check whether the current user holds a permission
    Can {
        /// Permission (e.g., grades.edit)
        permission: String,
    },
    /// List directory users (passwords never shown)
    Users {
        /// Only this role
        #[arg(long)]
        role: Option<String>,
    },
    /// Show the route table
    Routes,
    /// Write a config file with all defaults
    InitConfig {
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<PathBuf>) -> anyhow::Result<PortalConfig> {
    let path = explicit.or_else(|| std::env::var_os("PORTAL_CONFIG").map(PathBuf::from));

    match path {
        Some(path) => PortalConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(PortalConfig::discover(&cwd)?)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::InitConfig { path, force } = &cli.command {
        if path.exists() && !*force {
            eprintln!("Error: {} already exists (use --force to overwrite)", path.display());
            std::process::exit(1);
        }
        PortalConfig::default().save(path)?;
        println!("✓ Wrote {}", path.display());
        return Ok(());
    }

    let config = load_config(cli.config)?;
    let mut ctx = PortalContext::init(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            let outcome = ctx.login(&email, &password).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            if !outcome.success {
                std::process::exit(1);
            }
            if let Some(landing) = ctx.landing_page() {
                eprintln!("→ {}", landing);
            }
        }

        Commands::Logout => {
            ctx.logout()?;
            println!("✓ Signed out");
        }

        Commands::Whoami => match ctx.current_user() {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => {
                eprintln!("Not signed in");
                std::process::exit(1);
            }
        },

        Commands::Check { path } => {
            let rule = ctx.routes().rule_for(&path);
            let check = ctx.check_route(&path);

            let who = check
                .user
                .as_ref()
                .map(|u| format!("{} ({})", u.email(), u.role()))
                .unwrap_or_else(|| "anonymous".to_string());

            if check.is_authorized {
                println!("✓ {} may open {} [roles: {}]", who, path, rule.roles);
            } else {
                println!("✗ {} may not open {} [roles: {}]", who, path, rule.roles);
                println!("  redirect → {}", rule.redirect_target());
                std::process::exit(2);
            }
        }

        Commands::Can { permission } => {
            let user = ctx.current_user().context("Not signed in")?;
            let granted = ctx.can(&permission)?;

            if granted {
                println!("✓ {} holds {}", user.email(), permission);
            } else {
                println!("✗ {} lacks {}", user.email(), permission);
                std::process::exit(2);
            }
        }

        Commands::Users { role } => {
            let role = role.as_deref().map(Role::parse).transpose()?;
            let directory = ctx.directory();

            println!("{:<4} {:<26} {:<22} {:<11} {}", "ID", "EMAIL", "NAME", "ROLE", "ACTIVE");
            let listed = directory
                .users()
                .iter()
                .filter(|u| role.map_or(true, |r| u.role() == r));
            for record in listed {
                let user = record.redact();
                println!(
                    "{:<4} {:<26} {:<22} {:<11} {}",
                    user.id(),
                    user.email(),
                    user.display_name(),
                    user.role(),
                    if user.is_active() { "yes" } else { "no" }
                );
            }
        }

        Commands::Routes => {
            let routes = ctx.routes();
            println!("{:<22} {:<36} {}", "PATH", "ROLES", "REDIRECT");
            for rule in &routes.rules {
                println!(
                    "{:<22} {:<36} {}",
                    rule.path,
                    rule.roles.to_string(),
                    rule.redirect_target()
                );
            }
            println!();
            for role in Role::ALL {
                println!("landing[{}] = {}", role, routes.landing_for(role));
            }
        }

        Commands::InitConfig { .. } => unreachable!("handled before context init"),
    }

    ctx.teardown();
    Ok(())
}
