use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use ob_gateway_core::application::access::ConsentAccessValidator;
use ob_gateway_core::application::accounts::AccountReadService;
use ob_gateway_core::application::payments::PaymentService;
use ob_gateway_core::config::{
    DEFAULT_BALANCES_PAGE_SIZE, DEFAULT_PAGE_SIZE, DEFAULT_TRANSACTIONS_PAGE_SIZE, GatewayConfig,
};
use ob_gateway_core::domain::consent::Consent;
use ob_gateway_core::domain::frequency::Frequency;
use ob_gateway_core::domain::payment::{
    DomesticPaymentSubmission, DomesticScheduledPaymentSubmission, DomesticStandingOrderSubmission,
};
use ob_gateway_core::domain::resources::{
    AccountRecord, BalanceRecord, BeneficiaryRecord, ProductRecord, Redactable,
    ScheduledPaymentRecord, StandingOrderRecord, StatementRecord, TransactionRecord,
};
use ob_gateway_core::infrastructure::in_memory::{
    InMemoryConsentStore, InMemoryPaymentStore, InMemoryResourceStore,
};
#[cfg(feature = "storage-rocksdb")]
use ob_gateway_core::infrastructure::rocksdb::RocksDBStore;
use ob_gateway_core::interfaces::csv::outcome_writer::{OutcomeRow, OutcomeWriter};
use ob_gateway_core::interfaces::csv::payment_reader::PaymentReader;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the next occurrence dates of a standing order frequency
    NextDate {
        /// Encoded frequency, e.g. "IntrvlMnthDay:01:-01"
        descriptor: String,

        /// Reference date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,

        /// Number of occurrences to print
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Submit a CSV batch of domestic payments against stored consents
    Submit {
        /// JSON array of consents
        consents: PathBuf,

        /// Payments CSV file
        payments: PathBuf,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long, env = "OB_GATEWAY_DB_PATH")]
        db_path: Option<PathBuf>,
    },

    /// Read account information records through a consent
    Read(ReadArgs),
}

#[derive(Args)]
struct ReadArgs {
    /// JSON array of consents
    consents: PathBuf,

    /// JSON array of records of the requested kind
    records: PathBuf,

    #[arg(long, value_enum)]
    kind: RecordKind,

    #[arg(long)]
    consent_id: String,

    #[arg(long)]
    client_id: String,

    /// Restrict the read to one account
    #[arg(long)]
    account_id: Option<String>,

    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    page: usize,

    #[arg(long, env = "OB_GATEWAY_TRANSACTIONS_PAGE_SIZE", default_value_t = DEFAULT_TRANSACTIONS_PAGE_SIZE)]
    transactions_page_size: usize,

    #[arg(long, env = "OB_GATEWAY_BALANCES_PAGE_SIZE", default_value_t = DEFAULT_BALANCES_PAGE_SIZE)]
    balances_page_size: usize,

    #[arg(long, env = "OB_GATEWAY_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    Accounts,
    Balances,
    Beneficiaries,
    Products,
    ScheduledPayments,
    StandingOrders,
    Statements,
    Transactions,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::NextDate {
            descriptor,
            from,
            count,
        } => next_date(&descriptor, from, count),
        Command::Submit {
            consents,
            payments,
            db_path,
        } => submit(&consents, &payments, db_path).await,
        Command::Read(args) => match args.kind {
            RecordKind::Accounts => read::<AccountRecord>(&args).await,
            RecordKind::Balances => read::<BalanceRecord>(&args).await,
            RecordKind::Beneficiaries => read::<BeneficiaryRecord>(&args).await,
            RecordKind::Products => read::<ProductRecord>(&args).await,
            RecordKind::ScheduledPayments => read::<ScheduledPaymentRecord>(&args).await,
            RecordKind::StandingOrders => read::<StandingOrderRecord>(&args).await,
            RecordKind::Statements => read::<StatementRecord>(&args).await,
            RecordKind::Transactions => read::<TransactionRecord>(&args).await,
        },
    }
}

fn next_date(descriptor: &str, from: NaiveDate, count: usize) -> Result<()> {
    let frequency: Frequency = descriptor.parse()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for date in frequency.schedule(from, count)? {
        writeln!(out, "{}", date).into_diagnostic()?;
    }
    Ok(())
}

async fn submit(consents: &Path, payments: &Path, db_path: Option<PathBuf>) -> Result<()> {
    let consents: Vec<Consent> = load_json(consents)?;
    let service = payment_service(consents, db_path).await?;

    let file = File::open(payments).into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());
    let (mut accepted, mut rejected) = (0usize, 0usize);

    for request in PaymentReader::new(file).requests() {
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                eprintln!("Error reading payment: {}", e);
                continue;
            }
        };

        let row = match service
            .submit_domestic_payment(
                &request.consent_id,
                &request.api_client_id,
                &request.idempotency_key,
                request.payment,
            )
            .await
        {
            Ok(stored) => {
                accepted += 1;
                OutcomeRow::accepted(&stored)
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                rejected += 1;
                OutcomeRow::rejected(&request.consent_id, &request.idempotency_key, &e)
            }
        };
        writer.write_outcome(&row)?;
    }

    writer.flush()?;
    info!(accepted, rejected, "payment batch processed");
    Ok(())
}

async fn payment_service(consents: Vec<Consent>, db_path: Option<PathBuf>) -> Result<PaymentService> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(db_path)?;
        for consent in &consents {
            store.put_consent(consent)?;
        }
        let validator = Arc::new(ConsentAccessValidator::new(Box::new(store.clone())));
        return Ok(PaymentService::new(
            validator,
            Box::new(store.clone()),
            Box::new(store.clone()),
            Box::new(store),
        ));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        tracing::warn!("--db-path ignored: built without the storage-rocksdb feature");
    }

    let validator = Arc::new(ConsentAccessValidator::new(Box::new(
        consent_store(consents).await,
    )));
    Ok(PaymentService::new(
        validator,
        Box::new(InMemoryPaymentStore::<DomesticPaymentSubmission>::new()),
        Box::new(InMemoryPaymentStore::<DomesticScheduledPaymentSubmission>::new()),
        Box::new(InMemoryPaymentStore::<DomesticStandingOrderSubmission>::new()),
    ))
}

async fn read<R>(args: &ReadArgs) -> Result<()>
where
    R: Redactable + Serialize + DeserializeOwned,
{
    let config = GatewayConfig::try_new(
        args.transactions_page_size,
        args.balances_page_size,
        args.page_size,
    )?;
    let consents: Vec<Consent> = load_json(&args.consents)?;
    let records: Vec<R> = load_json(&args.records)?;

    let record_store = InMemoryResourceStore::new();
    for record in records {
        record_store.insert(record).await;
    }
    let validator = Arc::new(ConsentAccessValidator::new(Box::new(
        consent_store(consents).await,
    )));
    let service = AccountReadService::new(validator, Box::new(record_store), config);

    let page = match &args.account_id {
        Some(account_id) => {
            service
                .read_account(&args.consent_id, &args.client_id, account_id, args.page)
                .await?
        }
        None => {
            service
                .read_all(&args.consent_id, &args.client_id, args.page)
                .await?
        }
    };

    let body = serde_json::json!({
        "Data": page.content,
        "Meta": { "Page": page.page, "TotalPages": page.total_pages },
    });
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &body).into_diagnostic()?;
    writeln!(out).into_diagnostic()?;
    Ok(())
}

async fn consent_store(consents: Vec<Consent>) -> InMemoryConsentStore {
    let store = InMemoryConsentStore::new();
    for consent in consents {
        store.insert(consent).await;
    }
    store
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).into_diagnostic()?;
    serde_json::from_reader(io::BufReader::new(file)).into_diagnostic()
}
