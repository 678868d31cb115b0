//! `farmtrack`: command-line client for the FarmTrack API.
//!
//! Signs in, manages farms, records, sales and reminders, and prints the
//! dashboard and financial summaries.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use farmtrack::api::messages;
use farmtrack::config::{Config, LogFormat};
use farmtrack::dashboard::Dashboard;
use farmtrack::financials::{DateRange, FinancialSummary};
use farmtrack::models::{
    CreateFarmRequest, LoginRequest, RecordRequest, RegisterRequest, ReminderRequest, ReminderType,
    SaleRequest, UpdateFarmRequest,
};
use farmtrack::{ApiClient, ClientError, ClientResult, SessionHandle, SessionStore};

/// FarmTrack CLI.
#[derive(Parser, Debug)]
#[command(name = "farmtrack", about = "FarmTrack poultry-farm client", version)]
struct Cli {
    /// Output format.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t = Output::Text)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FARMTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Register {
        #[arg(long)]
        firstname: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, env = "FARMTRACK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Farm management.
    Farms {
        #[command(subcommand)]
        action: FarmAction,
    },
    /// Production records.
    Records {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Sales.
    Sales {
        #[command(subcommand)]
        action: SaleAction,
    },
    /// Reminders.
    Reminders {
        #[command(subcommand)]
        action: ReminderAction,
    },
    /// Summary across all farms.
    Dashboard,
    /// Income and expenses of one farm.
    Financials {
        #[arg(long)]
        farm: String,
        /// First day included (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day included (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Subcommand, Debug)]
enum FarmAction {
    /// List farms.
    List {
        /// Include deactivated farms.
        #[arg(long)]
        all: bool,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        size: Option<f64>,
        #[arg(long = "type")]
        farm_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Update fields of a farm; omitted fields keep their value.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        size: Option<f64>,
        #[arg(long = "type")]
        farm_type: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Deactivate a farm (soft delete).
    Deactivate { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum RecordAction {
    List {
        #[arg(long)]
        farm: String,
    },
    Add {
        #[arg(long)]
        farm: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value_t = 0.0)]
        feed: f64,
        #[arg(long, default_value_t = 0)]
        eggs: u64,
        #[arg(long, default_value_t = 0)]
        died: u64,
        #[arg(long, default_value_t = 0)]
        sold: u64,
        #[arg(long, default_value_t = 0.0)]
        expenses: f64,
        #[arg(long)]
        cause: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        weather: Option<String>,
        #[arg(long = "photo")]
        photos: Vec<String>,
    },
    Delete {
        #[arg(long)]
        farm: String,
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum SaleAction {
    List {
        #[arg(long)]
        farm: String,
    },
    Add {
        #[arg(long)]
        farm: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        unit_price: f64,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        buyer: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        #[arg(long)]
        farm: String,
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ReminderAction {
    List {
        #[arg(long)]
        farm: String,
    },
    Add {
        #[arg(long)]
        farm: String,
        #[arg(long)]
        title: String,
        /// General, Feeding, Health, Cleaning or Procurement.
        #[arg(long = "type", default_value = "General")]
        reminder_type: ReminderType,
        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// HH:MM, defaults to 08:00.
        #[arg(long, value_parser = parse_time)]
        time: Option<NaiveTime>,
    },
    /// Mark a reminder as done.
    Complete {
        #[arg(long)]
        farm: String,
        id: String,
    },
    Delete {
        #[arg(long)]
        farm: String,
        id: String,
    },
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    ReminderRequest::parse_time(raw).ok_or_else(|| format!("invalid time {:?}, expected HH:MM", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging; stdout is reserved for command output
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::debug!("API URL: {}", config.api_url);
    tracing::debug!("Session path: {:?}", config.session_path);

    let session = SessionHandle::load(SessionStore::new(&config.session_path)).await?;
    let client = ApiClient::builder(config, session)
        .on_logout(Arc::new(|| {
            eprintln!("Your session has expired. Run `farmtrack login` to sign in again.");
        }))
        .build()?;

    let fallback = cli.command.fallback_message();
    if let Err(e) = run(cli, &client).await {
        tracing::debug!("Command failed: {}", e);
        eprintln!("Error: {}", e.user_message(fallback));
        if let ClientError::Validation(fields) = &e {
            for field in fields {
                eprintln!("  {}: {}", field.field, field.message);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

impl Commands {
    fn fallback_message(&self) -> &'static str {
        match self {
            Commands::Login { .. } | Commands::Register { .. } => "Something went wrong",
            Commands::Logout | Commands::Whoami => "Something went wrong",
            Commands::Farms { action } => match action {
                FarmAction::List { .. } => messages::FETCH_FARMS,
                FarmAction::Deactivate { .. } => messages::DEACTIVATE_FARM,
                FarmAction::Delete { .. } => messages::DELETE_FARM,
                _ => messages::SAVE_FARM,
            },
            Commands::Records { action } => match action {
                RecordAction::List { .. } => messages::FETCH_RECORDS,
                RecordAction::Add { .. } => messages::SAVE_RECORD,
                RecordAction::Delete { .. } => messages::DELETE_RECORD,
            },
            Commands::Sales { action } => match action {
                SaleAction::List { .. } => messages::FETCH_SALES,
                SaleAction::Add { .. } => messages::SAVE_SALE,
                SaleAction::Delete { .. } => messages::DELETE_SALE,
            },
            Commands::Reminders { action } => match action {
                ReminderAction::List { .. } => messages::FETCH_REMINDERS,
                ReminderAction::Add { .. } | ReminderAction::Complete { .. } => messages::SAVE_REMINDER,
                ReminderAction::Delete { .. } => messages::DELETE_REMINDER,
            },
            Commands::Dashboard => messages::FETCH_DASHBOARD,
            Commands::Financials { .. } => messages::FETCH_FINANCIALS,
        }
    }
}

async fn run(cli: Cli, client: &ApiClient) -> ClientResult<()> {
    let out = cli.output;
    match cli.command {
        Commands::Login { email, password } => {
            let user = client.login(&LoginRequest { email, password }).await?;
            println!("Welcome back, {}!", user.display_name());
        }
        Commands::Register {
            firstname,
            lastname,
            email,
            phone,
            password,
        } => {
            let resp = client
                .register(&RegisterRequest {
                    firstname,
                    lastname,
                    email,
                    phone,
                    password,
                })
                .await?;
            println!("{}", resp.message.as_deref().unwrap_or("Registration successful"));
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Signed out.");
        }
        Commands::Whoami => match client.session().user().await {
            Some(user) => emit(out, &user, || {
                format!("{} ({})", user.display_name(), user.email.as_deref().unwrap_or(user.id()))
            })?,
            None => println!("Not signed in."),
        },
        Commands::Farms { action } => farms(client, out, action).await?,
        Commands::Records { action } => records(client, out, action).await?,
        Commands::Sales { action } => sales(client, out, action).await?,
        Commands::Reminders { action } => reminders(client, out, action).await?,
        Commands::Dashboard => {
            let dashboard = Dashboard::load(client).await?;
            for notice in &dashboard.notices {
                eprintln!("warning: {}", notice.message);
            }
            emit(out, &dashboard, || render_dashboard(&dashboard))?;
        }
        Commands::Financials { farm, from, to } => {
            let summary = FinancialSummary::load(client, &farm, DateRange::new(from, to)).await?;
            emit(out, &summary, || render_financials(&summary))?;
        }
    }
    Ok(())
}

async fn farms(client: &ApiClient, out: Output, action: FarmAction) -> ClientResult<()> {
    match action {
        FarmAction::List { all } => {
            let farms = if all {
                client.list_farms().await?
            } else {
                client.list_active_farms().await?
            };
            emit(out, &farms, || {
                farms
                    .iter()
                    .map(|f| {
                        let status = if f.is_active { "" } else { " [inactive]" };
                        format!("{}  {} ({}){}", f.id(), f.farm_name, f.location, status)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        FarmAction::Create {
            name,
            location,
            size,
            farm_type,
            description,
        } => {
            client
                .create_farm(&CreateFarmRequest {
                    farm_name: name,
                    location,
                    size,
                    farm_type,
                    description,
                })
                .await?;
            println!("Farm created.");
        }
        FarmAction::Update {
            id,
            name,
            location,
            size,
            farm_type,
            description,
        } => {
            let current = client.get_farm(&id).await?;
            let mut request = UpdateFarmRequest::from(&current);
            if let Some(name) = name {
                request.farm_name = name;
            }
            if let Some(location) = location {
                request.location = location;
            }
            request.size = size.or(request.size);
            request.farm_type = farm_type.or(request.farm_type);
            request.description = description.or(request.description);
            client.update_farm(&id, &request).await?;
            println!("Farm updated successfully.");
        }
        FarmAction::Deactivate { id } => {
            client.deactivate_farm(&id).await?;
            println!("Farm deactivated successfully.");
        }
        FarmAction::Delete { id } => {
            client.delete_farm(&id).await?;
            println!("Farm deleted.");
        }
    }
    Ok(())
}

async fn records(client: &ApiClient, out: Output, action: RecordAction) -> ClientResult<()> {
    match action {
        RecordAction::List { farm } => {
            let records = client.list_records(&farm).await?;
            emit(out, &records, || {
                records
                    .iter()
                    .map(|r| {
                        format!(
                            "{}  {}  eggs {}  feed {:.1} kg  died {}  sold {}  expenses {:.2}",
                            r.id(),
                            r.date.map(|d| d.to_string()).unwrap_or_default(),
                            r.eggs_collected,
                            r.feed_used_kg,
                            r.birds_died,
                            r.birds_sold,
                            r.expenses
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        RecordAction::Add {
            farm,
            date,
            feed,
            eggs,
            died,
            sold,
            expenses,
            cause,
            notes,
            weather,
            photos,
        } => {
            let request = RecordRequest {
                feed_used_kg: feed,
                eggs_collected: eggs,
                birds_died: died,
                birds_sold: sold,
                expenses,
                mortality_cause: cause,
                photos,
                notes,
                weather_info: weather,
                ..RecordRequest::new(farm, date)
            };
            client.create_record(&request).await?;
            println!("Record created successfully.");
        }
        RecordAction::Delete { farm, id } => {
            client.delete_record(&farm, &id).await?;
            println!("Record deleted successfully.");
        }
    }
    Ok(())
}

async fn sales(client: &ApiClient, out: Output, action: SaleAction) -> ClientResult<()> {
    match action {
        SaleAction::List { farm } => {
            let sales = client.list_sales(&farm).await?;
            emit(out, &sales, || {
                sales
                    .iter()
                    .map(|s| {
                        format!(
                            "{}  {}  {} x {} @ {:.2} = {:.2}{}",
                            s.id(),
                            s.date.map(|d| d.to_string()).unwrap_or_default(),
                            s.quantity,
                            s.product,
                            s.unit_price,
                            s.revenue_or_derived(),
                            s.buyer_name
                                .as_deref()
                                .map(|b| format!("  ({})", b))
                                .unwrap_or_default()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        SaleAction::Add {
            farm,
            product,
            quantity,
            unit_price,
            date,
            buyer,
            notes,
        } => {
            let request = SaleRequest {
                product,
                quantity,
                unit_price,
                buyer_name: buyer,
                date: Some(date.unwrap_or_else(|| Utc::now().date_naive())),
                notes,
            };
            client.create_sale(&farm, &request).await?;
            println!("Sale created successfully.");
        }
        SaleAction::Delete { farm, id } => {
            client.delete_sale(&farm, &id).await?;
            println!("Sale deleted successfully.");
        }
    }
    Ok(())
}

async fn reminders(client: &ApiClient, out: Output, action: ReminderAction) -> ClientResult<()> {
    match action {
        ReminderAction::List { farm } => {
            let reminders = client.list_reminders(&farm).await?;
            let now = Utc::now();
            emit(out, &reminders, || {
                reminders
                    .iter()
                    .map(|r| {
                        let state = if r.is_completed {
                            "done"
                        } else if r.is_overdue(now) {
                            "overdue"
                        } else {
                            "open"
                        };
                        format!(
                            "{}  [{}] {} ({})  {}",
                            r.id(),
                            state,
                            r.title,
                            r.reminder_type.as_str(),
                            r.due_date
                                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_default()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        ReminderAction::Add {
            farm,
            title,
            reminder_type,
            date,
            time,
        } => {
            let request = ReminderRequest {
                title,
                reminder_type,
                date: Some(date.unwrap_or_else(|| Utc::now().date_naive())),
                time: time.or_else(|| NaiveTime::from_hms_opt(8, 0, 0)),
                is_completed: false,
            };
            client.create_reminder(&farm, &request).await?;
            println!("Reminder created successfully.");
        }
        ReminderAction::Complete { farm, id } => {
            let reminders = client.list_reminders(&farm).await?;
            let reminder = reminders
                .iter()
                .find(|r| r.id() == id)
                .ok_or_else(|| ClientError::NotFound(format!("Reminder {} not found", id)))?;
            client.complete_reminder(&farm, reminder).await?;
            println!("Reminder marked as done.");
        }
        ReminderAction::Delete { farm, id } => {
            client.delete_reminder(&farm, &id).await?;
            println!("Reminder deleted successfully.");
        }
    }
    Ok(())
}

/// Print `value` as JSON or as the given text rendering.
fn emit<T: Serialize>(out: Output, value: &T, text: impl FnOnce() -> String) -> ClientResult<()> {
    match out {
        Output::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Output::Text => {
            let rendered = text();
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        }
    }
    Ok(())
}

fn render_dashboard(dashboard: &Dashboard) -> String {
    let m = &dashboard.metrics;
    let mut lines = vec![
        format!("Active farms:    {} of {}", m.active_farms, m.total_farms),
        format!("Total revenue:   {:.2}", m.total_revenue),
        format!("Total expenses:  {:.2}", m.total_expenses),
        format!("Net profit:      {:.2} ({:.1}% margin)", m.net_profit, m.profit_margin),
        format!("Eggs collected:  {}", m.total_eggs),
        format!("Feed used:       {:.1} kg ({:.2} eggs/kg)", m.total_feed_kg, m.eggs_per_kg),
        format!("Birds sold:      {}", m.birds_sold),
        format!("Mortality rate:  {}%", m.mortality_rate),
    ];
    if !dashboard.monthly.is_empty() {
        lines.push(String::new());
        lines.push("Month       Revenue   Expenses     Profit".to_string());
        for bucket in &dashboard.monthly {
            lines.push(format!(
                "{:<8} {:>10.2} {:>10.2} {:>10.2}",
                bucket.label(),
                bucket.revenue,
                bucket.expenses,
                bucket.profit()
            ));
        }
    }
    lines.join("\n")
}

fn render_financials(summary: &FinancialSummary) -> String {
    let mut lines = vec![
        format!("Income:        {:.2}", summary.income),
        format!("Expenses:      {:.2}", summary.expenses),
        format!("Net profit:    {:.2}", summary.net_profit),
        format!("Profit margin: {:.1}%", summary.profit_margin),
    ];
    for bucket in &summary.monthly {
        lines.push(format!(
            "{:<8} {:>10.2} {:>10.2} {:>10.2}",
            bucket.label(),
            bucket.revenue,
            bucket.expenses,
            bucket.profit()
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("farmtrack").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_fallback_messages_per_action() {
        assert_eq!(
            parse(&["farms", "delete", "f1"]).command.fallback_message(),
            messages::DELETE_FARM
        );
        assert_eq!(
            parse(&["farms", "deactivate", "f1"]).command.fallback_message(),
            messages::DEACTIVATE_FARM
        );
        assert_eq!(
            parse(&["records", "delete", "--farm", "f1", "r1"]).command.fallback_message(),
            messages::DELETE_RECORD
        );
        assert_eq!(parse(&["dashboard"]).command.fallback_message(), messages::FETCH_DASHBOARD);
    }

    #[test]
    fn test_reminder_time_flag() {
        let cli = parse(&["reminders", "add", "--farm", "f1", "--title", "Feed", "--time", "06:30"]);
        match cli.command {
            Commands::Reminders {
                action: ReminderAction::Add { time, reminder_type, .. },
            } => {
                assert_eq!(time, NaiveTime::from_hms_opt(6, 30, 0));
                assert_eq!(reminder_type, ReminderType::General);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["farmtrack", "reminders", "add", "--farm", "f1", "--title", "x", "--time", "6pm"]).is_err());
    }
}
