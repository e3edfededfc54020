use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod credentials;
mod fixtures;
mod guard;
mod models;
mod report;
mod router;
mod session;
mod storage;
mod views;

use config::Config;
use fixtures::{load_roster, Fixtures};
use guard::Route;
use models::RiskStatus;
use router::{Navigator, Outcome};
use session::SessionManager;
use storage::FileSlotStore;

#[derive(Parser)]
#[command(name = "scholar")]
#[command(about = "Student performance dashboards for faculty and students", long_about = None)]
struct Cli {
    /// Directory holding the session store (defaults to $SCHOLAR_DATA_DIR, then ./.scholar)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// CSV roster replacing the built-in student records
    #[arg(long, global = true)]
    roster: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and open the dashboard for your role
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Open a route such as /faculty/dashboard or /faculty/student/stu-003
    Open {
        #[arg(default_value = "/")]
        route: String,
    },
    /// List students, optionally by status (faculty only)
    Students {
        #[arg(long, value_enum)]
        status: Option<RiskStatus>,
        /// Compare authored class statistics with the loaded records
        #[arg(long)]
        audit: bool,
    },
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.roster);
    init_tracing(config.log_json);

    let mut fixtures = Fixtures::builtin().context("failed to build fixture data")?;
    if let Some(path) = &config.roster {
        let roster = load_roster(path)?;
        fixtures = fixtures.with_roster(roster);
    }

    let sessions = SessionManager::new(FileSlotStore::new(&config.data_dir));
    let mut nav = Navigator::new(sessions, &fixtures);

    match cli.command {
        Commands::Login { email, password } => {
            let dashboard = nav.login(&email, &password)?;
            show(&mut nav, dashboard)?;
        }
        Commands::Logout => {
            let route = nav.logout();
            show(&mut nav, route)?;
        }
        Commands::Whoami => match nav.current_user() {
            Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
            None => println!("Not signed in."),
        },
        Commands::Open { route } => {
            let route: Route = route.parse()?;
            show(&mut nav, route)?;
        }
        Commands::Students { status, audit } => {
            match nav.roster(status) {
                Outcome::Render(view) => print!("{}", report::render(&view)),
                Outcome::Redirect(target) => {
                    println!("Faculty access required, redirecting to {target}.");
                    show(&mut nav, target)?;
                    return Ok(());
                }
            }

            if audit {
                let drift = views::aggregate_drift(&fixtures.statistics, &fixtures.students);
                for item in &drift {
                    tracing::warn!(
                        field = item.field,
                        authored = item.authored,
                        observed = item.observed,
                        "class statistic disagrees with records"
                    );
                }
                println!();
                print!("{}", report::render_drift(&drift));
            }
        }
    }

    Ok(())
}

fn show(nav: &mut Navigator<'_, FileSlotStore>, route: Route) -> anyhow::Result<()> {
    let (landed, view) = nav.open(route)?;
    println!("[{landed}]");
    print!("{}", report::render(&view));
    Ok(())
}
