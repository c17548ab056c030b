mod browse;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use jobdeck_client::{BoardClient, Session};
use jobdeck_core::filter::FilterSelection;
use jobdeck_core::listing::{ListingDraft, format_salary_range};
use jobdeck_core::query::{build_query, keyword_from_url};
use jobdeck_core::search::SearchSession;

#[derive(Parser)]
#[command(name = "jobdeck", version, about = "Job board client for the terminal")]
struct Cli {
    /// Base URL of the board API
    #[arg(
        long,
        env = "JOBDECK_API_URL",
        default_value = "http://localhost:4000/api",
        global = true
    )]
    api_url: String,

    /// Where the login session is stored (defaults to ~/.config/jobdeck/session.json)
    #[arg(long, env = "JOBDECK_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search public listings
    Search {
        /// Free-text keyword
        keyword: Option<String>,

        /// Country filter
        #[arg(long)]
        country: Option<String>,

        /// State/region filter (passed through to the board)
        #[arg(long)]
        state: Option<String>,

        /// City filter
        #[arg(long)]
        city: Option<String>,

        /// Title category; replaces the free-text keyword when set
        #[arg(long)]
        title: Option<String>,

        /// Posting-date window: any-time, last-24-hours, last-7-days, last-30-days
        #[arg(long)]
        date: Option<String>,

        /// Seed the keyword from a jobs page URL
        #[arg(long)]
        from_url: Option<String>,

        /// Print raw JSON instead of cards
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print CSV instead of cards
        #[arg(long, default_value_t = false)]
        csv: bool,
    },

    /// Interactive search: edit filters, results refresh per change
    Browse {
        /// Seed the keyword from a jobs page URL
        #[arg(long)]
        from_url: Option<String>,
    },

    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Password (reads from JOBDECK_PASSWORD env var if not provided)
        #[arg(short, long, env = "JOBDECK_PASSWORD")]
        password: String,
    },

    /// Create an account and store the session
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Password (reads from JOBDECK_PASSWORD env var if not provided)
        #[arg(long, env = "JOBDECK_PASSWORD")]
        password: String,

        /// Account role: EMPLOYER or SEEKER
        #[arg(long, default_value = "EMPLOYER")]
        role: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who the stored session belongs to
    Whoami,

    /// List your own postings, any moderation status
    Mine,

    /// Post a new listing (enters moderation as PENDING)
    Post {
        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        country: String,

        #[arg(long)]
        apply_link: String,

        #[arg(long)]
        employment_type: String,

        #[arg(long)]
        salary_from: String,

        #[arg(long)]
        salary_to: String,

        /// Currency symbol for the salary range
        #[arg(long, default_value = "$")]
        currency: String,

        #[arg(long)]
        company: String,

        /// Posting date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date_posted: Option<String>,
    },

    /// Edit one of your postings; unset flags keep the current values
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        apply_link: Option<String>,

        #[arg(long)]
        employment_type: Option<String>,

        /// Full replacement salary range string, e.g. "$10 - $20"
        #[arg(long)]
        salary_range: Option<String>,

        #[arg(long)]
        company: Option<String>,
    },

    /// Delete one of your postings
    Delete { id: String },

    /// Admin: listings awaiting moderation
    Pending,

    /// Admin: approve a pending listing
    Approve { id: String },

    /// Admin: reject a pending listing
    Reject { id: String },

    /// Admin: list user accounts
    Users,

    /// Admin: approve a user account
    ApproveUser { id: String },

    /// Admin: suspend a user account
    SuspendUser { id: String },

    /// Admin: delete a user account
    RemoveUser { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobdeck=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = BoardClient::new(&cli.api_url).map_err(|e| anyhow!(e))?;
    let session_path = resolve_session_path(cli.session_file)?;

    match cli.command {
        Commands::Search {
            keyword,
            country,
            state,
            city,
            title,
            date,
            from_url,
            json,
            csv,
        } => {
            let keyword = resolve_keyword(keyword, from_url.as_deref());
            let selection = build_selection(country, state, city, title, date)?;
            cmd_search(&client, &keyword, &selection, json, csv).await?;
        }
        Commands::Browse { from_url } => {
            cmd_browse(client, from_url.as_deref()).await?;
        }
        Commands::Login { email, password } => {
            let session = client
                .login(&email, &password)
                .await
                .map_err(|e| anyhow!(e))?;
            session.save(&session_path).map_err(|e| anyhow!(e))?;
            println!("Logged in as {} ({})", email, session.role);
        }
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let session = client
                .register(&name, &email, &password, &role)
                .await
                .map_err(|e| anyhow!(e))?;
            session.save(&session_path).map_err(|e| anyhow!(e))?;
            println!("Registered {} ({})", email, session.role);
        }
        Commands::Logout => {
            Session::clear(&session_path).map_err(|e| anyhow!(e))?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let session = load_session(&session_path)?;
            match &session.subject {
                Some(subject) => println!("{} ({})", subject, session.role),
                None => println!("{}", session.role),
            }
        }
        Commands::Mine => {
            let session = load_session(&session_path)?;
            let listings = client
                .my_listings(&session)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("{}", render::listing_rows(&listings));
        }
        Commands::Post {
            title,
            description,
            city,
            country,
            apply_link,
            employment_type,
            salary_from,
            salary_to,
            currency,
            company,
            date_posted,
        } => {
            let session = load_session(&session_path)?;
            let draft = ListingDraft {
                title,
                description,
                city,
                country,
                apply_link,
                employment_type,
                salary_range: format_salary_range(&currency, &salary_from, &salary_to),
                date_posted: date_posted.unwrap_or_else(today),
                company_name: company,
            };
            let listing = client
                .create_listing(&session, &draft)
                .await
                .map_err(|e| anyhow!(e))?;
            println!(
                "Submitted \"{}\" for moderation (status: {}, id: {})",
                listing.title, listing.status, listing.id
            );
        }
        Commands::Update {
            id,
            title,
            description,
            city,
            country,
            apply_link,
            employment_type,
            salary_range,
            company,
        } => {
            let session = load_session(&session_path)?;
            let current = client
                .my_listings(&session)
                .await
                .map_err(|e| anyhow!(e))?
                .into_iter()
                .find(|l| l.id == id)
                .with_context(|| format!("No posting of yours has id {id}"))?;

            let draft = ListingDraft {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                city: city.unwrap_or(current.city),
                country: country.unwrap_or(current.country),
                apply_link: apply_link.unwrap_or(current.apply_link),
                employment_type: employment_type.unwrap_or(current.employment_type),
                salary_range: salary_range.unwrap_or(current.salary_range),
                date_posted: current.date_posted,
                company_name: company.unwrap_or(current.company_name),
            };
            let listing = client
                .update_listing(&session, &id, &draft)
                .await
                .map_err(|e| anyhow!(e))?;
            println!(
                "Updated \"{}\" (status: {})",
                listing.title, listing.status
            );
        }
        Commands::Delete { id } => {
            let session = load_session(&session_path)?;
            client
                .delete_listing(&session, &id)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("Deleted listing {id}");
        }
        Commands::Pending => {
            let session = load_session(&session_path)?;
            let listings = client
                .pending_listings(&session)
                .await
                .map_err(|e| anyhow!(e))?;
            if listings.is_empty() {
                println!("No pending listings");
            } else {
                println!("{}", render::listing_rows(&listings));
            }
        }
        Commands::Approve { id } => {
            let session = load_session(&session_path)?;
            let status = client
                .approve_listing(&session, &id)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("Listing {id} is now {status}");
        }
        Commands::Reject { id } => {
            let session = load_session(&session_path)?;
            let status = client
                .reject_listing(&session, &id)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("Listing {id} is now {status}");
        }
        Commands::Users => {
            let session = load_session(&session_path)?;
            let users = client.list_users(&session).await.map_err(|e| anyhow!(e))?;
            println!("{}", render::user_rows(&users));
        }
        Commands::ApproveUser { id } => {
            let session = load_session(&session_path)?;
            let status = client
                .approve_user(&session, &id)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("User {id} is now {status}");
        }
        Commands::SuspendUser { id } => {
            let session = load_session(&session_path)?;
            let status = client
                .suspend_user(&session, &id)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("User {id} is now {status}");
        }
        Commands::RemoveUser { id } => {
            let session = load_session(&session_path)?;
            client
                .delete_user(&session, &id)
                .await
                .map_err(|e| anyhow!(e))?;
            println!("Deleted user {id}");
        }
    }

    Ok(())
}

/// One-shot search: build the query, fetch once, render.
async fn cmd_search(
    client: &BoardClient,
    keyword: &str,
    selection: &FilterSelection,
    json: bool,
    csv: bool,
) -> Result<()> {
    let params = build_query(keyword, selection, chrono::Utc::now());
    tracing::info!(query = %params.to_query_string(), "Searching");

    let listings = match client.search_listings(&params).await {
        Ok(listings) => listings,
        Err(e) => bail!(render::error_banner(&e.to_string(), e.is_retryable())),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
    } else if csv {
        print!(
            "{}",
            render::listings_csv(&listings).map_err(|e| anyhow!(e))?
        );
    } else if listings.is_empty() {
        println!("{}", render::empty_state());
    } else {
        println!("{}", render::listing_cards(&listings));
    }

    Ok(())
}

/// Interactive browse: stdin drives the filters, ctrl-c leaves.
async fn cmd_browse(client: BoardClient, from_url: Option<&str>) -> Result<()> {
    let session = SearchSession::new(client);
    if let Some(url) = from_url {
        if let Some(keyword) = keyword_from_url(url) {
            session.set_keyword(keyword);
        }
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    browse::run(session, shutdown).await
}

/// Apply the provided filter flags onto an all-sentinel selection.
fn build_selection(
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    title: Option<String>,
    date: Option<String>,
) -> Result<FilterSelection> {
    let mut selection = FilterSelection::default();
    for (field, value) in [
        ("country", country),
        ("state", state),
        ("city", city),
        ("title", title),
        ("date", date),
    ] {
        if let Some(value) = value {
            selection = selection.set_field(field, &value).map_err(|e| anyhow!(e))?;
        }
    }
    Ok(selection)
}

/// Explicit keyword wins; otherwise seed from a jobs page URL.
fn resolve_keyword(keyword: Option<String>, from_url: Option<&str>) -> String {
    match keyword {
        Some(keyword) => keyword,
        None => from_url
            .and_then(keyword_from_url)
            .unwrap_or_default(),
    }
}

fn resolve_session_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let home = std::env::var_os("HOME")
        .context("Cannot locate a session file: HOME is not set (use --session-file)")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("jobdeck")
        .join("session.json"))
}

fn load_session(path: &PathBuf) -> Result<Session> {
    Session::load(path).map_err(|e| anyhow!(e)).with_context(|| {
        format!(
            "Not logged in (no session at {}). Run `jobdeck login` first.",
            path.display()
        )
    })
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
