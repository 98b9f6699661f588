use std::error::Error;

use chrono::{Datelike, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{CreditCmd, Engine, MoneyCents};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection, EntityTrait, Set};

mod seed;

pub(crate) mod users {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub username: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Parser, Debug)]
#[command(name = "coffre_admin")]
#[command(about = "Admin utilities for Coffre (bootstrap users/accounts, seed demo data)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./coffre.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Account(Account),
    /// Populate the database with a demo user, account and history.
    Seed,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Open(AccountOpenArgs),
    Show(AccountShowArgs),
    Stats(AccountStatsArgs),
    Credit(AccountCreditArgs),
}

#[derive(Args, Debug)]
struct AccountOpenArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    iban: String,
}

#[derive(Args, Debug)]
struct AccountShowArgs {
    #[arg(long)]
    owner: String,
}

#[derive(Args, Debug)]
struct AccountStatsArgs {
    #[arg(long)]
    owner: String,
}

#[derive(Args, Debug)]
struct AccountCreditArgs {
    #[arg(long)]
    owner: String,
    /// Amount in euros, e.g. `12.50`.
    #[arg(long)]
    amount: String,
    #[arg(long)]
    description: Option<String>,
}

fn transaction_view(tx: &engine::Transaction) -> api_types::transaction::TransactionView {
    api_types::transaction::TransactionView {
        id: tx.id,
        kind: tx.kind.as_str().to_string(),
        amount: api_types::eur::cents_to_euros(tx.amount),
        currency: tx.currency.code().to_string(),
        description: tx.description.clone(),
        category: tx.category.as_str().to_string(),
        counterpart_name: tx.counterpart_name.clone(),
        counterpart_iban: tx.counterpart_iban.clone(),
        status: tx.status.as_str().to_string(),
        created_at: tx.created_at,
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("coffre_admin=info,engine=info")
                }),
        )
        .init();

    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            if users::Entity::find_by_id(args.username.clone())
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.username);
                std::process::exit(1);
            }

            let user = users::ActiveModel {
                username: Set(args.username.clone()),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.username);
        }
        Command::Account(Account {
            command: AccountCommand::Open(args),
        }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            let account = engine.open_account(&args.owner, &args.iban, Utc::now()).await?;
            println!("opened account: {} ({})", account.iban, account.id);
        }
        Command::Account(Account {
            command: AccountCommand::Show(args),
        }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            let account = engine.account(&args.owner).await?;

            let now = Utc::now();
            let month_start = now
                .date_naive()
                .with_day(1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or("invalid month start")?
                .and_utc();
            let summary = engine.monthly_summary(&args.owner, month_start, now).await?;

            let view = api_types::account::AccountView {
                id: account.id,
                iban: account.iban.clone(),
                balance: api_types::eur::cents_to_euros(account.balance),
                currency: account.currency.code().to_string(),
                status: account.status.as_str().to_string(),
                created_at: account.created_at,
            };
            let summary_view = api_types::account::SummaryView {
                balance: api_types::eur::cents_to_euros(account.balance),
                currency: account.currency.code().to_string(),
                month_income: api_types::eur::cents_to_euros(summary.income),
                month_expenses: api_types::eur::cents_to_euros(summary.expenses),
            };

            println!("{}", serde_json::to_string_pretty(&view)?);
            println!("{}", serde_json::to_string_pretty(&summary_view)?);

            let goals = engine.goals(&args.owner).await?;
            for goal in goals {
                let view = api_types::savings::GoalView {
                    id: goal.id,
                    name: goal.name.clone(),
                    target_amount: api_types::eur::cents_to_euros(goal.target_amount),
                    current_amount: api_types::eur::cents_to_euros(goal.current_amount),
                    icon: goal.icon.clone(),
                    color: goal.color.clone(),
                    deadline: goal.deadline,
                    auto_save_amount: api_types::eur::cents_to_euros(goal.auto_save_amount),
                    auto_save_enabled: goal.auto_save_enabled,
                    progress: goal.progress(),
                    created_at: goal.created_at,
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            }

            let (transactions, total) = engine
                .transactions(&args.owner, &engine::TransactionFilter::default(), 1, 5)
                .await?;
            let page = api_types::transaction::TransactionsPage {
                data: transactions.iter().map(transaction_view).collect(),
                pagination: api_types::transaction::PaginationView::new(1, 5, total),
            };
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Command::Account(Account {
            command: AccountCommand::Stats(args),
        }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;

            let now = Utc::now();
            let month_start = now
                .date_naive()
                .with_day(1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or("invalid month start")?
                .and_utc();

            let by_category = engine.category_breakdown(&args.owner, month_start).await?;
            let monthly = engine.monthly_trend(&args.owner).await?;

            let view = api_types::stats::StatsView {
                by_category: by_category
                    .into_iter()
                    .map(|c| api_types::stats::CategoryTotalView {
                        category: c.category.as_str().to_string(),
                        total: api_types::eur::cents_to_euros(c.total),
                        count: c.count,
                    })
                    .collect(),
                monthly: monthly
                    .into_iter()
                    .map(|m| api_types::stats::MonthView {
                        month: m.month,
                        income: api_types::eur::cents_to_euros(m.income),
                        expenses: api_types::eur::cents_to_euros(m.expenses),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Account(Account {
            command: AccountCommand::Credit(args),
        }) => {
            let amount: MoneyCents = args.amount.parse()?;
            if !amount.is_positive() {
                eprintln!("amount must be > 0, got {amount}");
                std::process::exit(2);
            }

            let engine = Engine::builder().database(db.clone()).build().await?;
            let mut cmd = CreditCmd::new(&args.owner, amount.cents(), Utc::now());
            if let Some(description) = args.description {
                cmd = cmd.description(description);
            }
            let tx = engine.credit(cmd).await?;
            println!("credited {}: {} ({})", args.owner, amount, tx.id);
        }
        Command::Seed => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            seed::run(&engine, &db).await?;
        }
    }

    Ok(())
}
