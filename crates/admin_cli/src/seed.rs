//! Demo dataset: one user, one account, three months of history and two
//! savings goals. Amounts are entered in euros and stored in cents.

use std::error::Error;

use api_types::eur::euros_to_cents;
use chrono::{DateTime, Duration, Utc};
use engine::{Category, CreateGoalCmd, CreditCmd, DebitCmd, Engine, TransferCmd};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::users;

const DEMO_USER: &str = "eli";
const DEMO_IBAN: &str = "BE68 5390 0754 7034";

fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

struct SeedDebit {
    euros: f64,
    description: &'static str,
    category: Category,
    counterpart: &'static str,
    days: i64,
}

const DEBITS: &[SeedDebit] = &[
    SeedDebit {
        euros: 10.99,
        description: "Spotify Premium",
        category: Category::Subscription,
        counterpart: "Spotify AB",
        days: 83,
    },
    SeedDebit {
        euros: 62.30,
        description: "Courses Delhaize Ixelles",
        category: Category::Food,
        counterpart: "Delhaize Group",
        days: 78,
    },
    SeedDebit {
        euros: 12.00,
        description: "Abonnement STIB mensuel",
        category: Category::Transport,
        counterpart: "STIB-MIVB",
        days: 76,
    },
    SeedDebit {
        euros: 13.49,
        description: "Netflix Standard",
        category: Category::Subscription,
        counterpart: "Netflix International",
        days: 52,
    },
    SeedDebit {
        euros: 75.40,
        description: "Courses Carrefour Woluwe",
        category: Category::Food,
        counterpart: "Carrefour Hypermarché",
        days: 48,
    },
    SeedDebit {
        euros: 22.00,
        description: "Kinepolis Bruxelles — 2 places",
        category: Category::Entertainment,
        counterpart: "Kinepolis Group",
        days: 44,
    },
    SeedDebit {
        euros: 10.99,
        description: "Spotify Premium",
        category: Category::Subscription,
        counterpart: "Spotify AB",
        days: 23,
    },
    SeedDebit {
        euros: 42.50,
        description: "Courses Delhaize Saint-Gilles",
        category: Category::Food,
        counterpart: "Delhaize Group",
        days: 20,
    },
    SeedDebit {
        euros: 55.00,
        description: "FNAC — Écouteurs JBL",
        category: Category::Shopping,
        counterpart: "FNAC Belgium",
        days: 3,
    },
];

pub async fn run(
    engine: &Engine,
    db: &DatabaseConnection,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    if users::Entity::find_by_id(DEMO_USER.to_string())
        .one(db)
        .await?
        .is_some()
    {
        eprintln!("demo user already exists: {DEMO_USER}");
        std::process::exit(1);
    }

    let user = users::ActiveModel {
        username: Set(DEMO_USER.to_string()),
    };
    users::Entity::insert(user).exec(db).await?;
    println!("created user: {DEMO_USER}");

    let account = engine
        .open_account(DEMO_USER, DEMO_IBAN, days_ago(90))
        .await?;
    println!("opened account: {}", account.iban);

    // Monthly salary, oldest first so every later debit is funded.
    for days in [85, 55, 25] {
        engine
            .credit(
                CreditCmd::new(DEMO_USER, euros_to_cents(650.0), days_ago(days))
                    .category(Category::Salary)
                    .description("Salaire — Carrefour Market")
                    .counterpart_name("Carrefour Market SA")
                    .counterpart_iban("BE71 0000 1234 5678"),
            )
            .await?;
    }

    for debit in DEBITS {
        engine
            .debit(
                DebitCmd::new(DEMO_USER, euros_to_cents(debit.euros), days_ago(debit.days))
                    .category(debit.category)
                    .description(debit.description)
                    .counterpart_name(debit.counterpart),
            )
            .await?;
    }

    engine
        .transfer(
            TransferCmd::new(
                DEMO_USER,
                euros_to_cents(25.0),
                "BE68 1234 5678 9012",
                days_ago(74),
            )
            .description("Remboursement ciné — Yasmine"),
        )
        .await?;
    engine
        .transfer(
            TransferCmd::new(
                DEMO_USER,
                euros_to_cents(50.0),
                "BE68 4567 8901 2345",
                days_ago(42),
            )
            .description("Cadeau anniversaire — Amine"),
        )
        .await?;
    engine
        .transfer(
            TransferCmd::new(
                DEMO_USER,
                euros_to_cents(10.0),
                "BE68 1234 5678 9012",
                days_ago(12),
            )
            .description("Café — Yasmine"),
        )
        .await?;

    engine
        .credit(
            CreditCmd::new(DEMO_USER, euros_to_cents(2.75), days_ago(3))
                .cashback()
                .description("Cashback — FNAC")
                .counterpart_name("Coffre Cashback"),
        )
        .await?;

    let tokyo = engine
        .create_goal(
            CreateGoalCmd::new(
                DEMO_USER,
                "Voyage Tokyo",
                euros_to_cents(2500.0),
                days_ago(60),
            )
            .icon("plane")
            .color("#4F9DF2"),
        )
        .await?;
    engine
        .deposit_to_goal(DEMO_USER, tokyo.id, euros_to_cents(780.0), days_ago(30))
        .await?;

    let rainy_day = engine
        .create_goal(CreateGoalCmd::new(
            DEMO_USER,
            "Urgences",
            euros_to_cents(1000.0),
            days_ago(45),
        ))
        .await?;
    engine
        .deposit_to_goal(DEMO_USER, rainy_day.id, euros_to_cents(120.0), days_ago(15))
        .await?;

    let account = engine.account(DEMO_USER).await?;
    println!(
        "seeded {} transactions, balance {}",
        engine
            .transactions(DEMO_USER, &Default::default(), 1, 100)
            .await?
            .1,
        engine::MoneyCents::new(account.balance)
    );

    Ok(())
}
