pub use accounts::{Account, AccountStatus};
pub use commands::{
    CreateGoalCmd, CreditCmd, DebitCmd, RequestMoneyCmd, TransferCmd, UpdateGoalCmd,
};
pub use currency::Currency;
pub use error::EngineError;
pub use money::MoneyCents;
pub use notify::{LogSink, NotificationSink};
pub use ops::{
    CategoryTotal, Engine, EngineBuilder, MAX_PAGE_SIZE, MonthTotals, MonthlySummary,
    TransactionFilter,
};
pub use savings_goals::SavingsGoal;
pub use transactions::{Category, Transaction, TransactionKind, TransactionStatus};

mod accounts;
mod commands;
mod currency;
mod error;
mod money;
mod notify;
mod ops;
mod savings_goals;
mod transactions;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
