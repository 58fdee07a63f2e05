//! Sample data for the demo, created on first start.

use anyhow::Result;
use tracing::{info, warn};

use crate::domain::bank_service::{BankError, BankService};

pub const SAMPLE_DATA_SEED: u64 = 1729;

const TRANSACTIONS_PER_ACCOUNT: usize = 5;
const FRAUD_PROBABILITY: f64 = 0.2;

const SAMPLE_CUSTOMERS: [(&str, &str); 5] = [
    ("Honey Bunny", "13763 Hawthorne Boulevard Hawthorne, CA 90250"),
    ("Jimmie", "4145 Kraft Avenue Studio City, CA 91604"),
    ("Butch Coolidge", "2934 Riverside Drive Los Angeles, CA 90039"),
    ("Marsellus Wallace", "1541 Summitridge Drive Beverly Hills, CA 90210"),
    ("Mia Wallace", "1541 Summitridge Drive Beverly Hills, CA 90210"),
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PopulateReport {
    pub customers: usize,
    pub accounts: usize,
    pub transactions: usize,
    /// Transactions dropped because they would have overdrawn their account
    pub skipped: usize,
}

/// Fill an empty database with customers, accounts and transactions.
///
/// Does nothing and returns `None` if any customer already exists. The
/// random source is seeded, so two empty databases end up with the same data.
pub async fn populate_sample_data(service: &BankService) -> Result<Option<PopulateReport>> {
    if service.count_customers().await? != 0 {
        info!("Sample data already present, skipping population");
        return Ok(None);
    }

    let service = service.reseeded(SAMPLE_DATA_SEED);
    let mut report = PopulateReport::default();

    info!("Populating sample data for demo...");

    let mut accounts = Vec::with_capacity(SAMPLE_CUSTOMERS.len());
    for (name, address) in SAMPLE_CUSTOMERS {
        let customer = service.create_customer(name, address).await?;
        report.customers += 1;

        let balance = service.random_range(100..10_000_000) as f64;
        accounts.push(service.open_account(customer.id, balance).await?);
        report.accounts += 1;
    }
    info!("{} Customer instances created.", report.customers);
    info!("{} Account instances created.", report.accounts);

    for account in &accounts {
        for _ in 0..TRANSACTIONS_PER_ACCOUNT {
            let exchange = (service.random_range(100..1_000_000) - 500_000) as f64;
            let is_fraudulent = service.random_bool(FRAUD_PROBABILITY);

            match service.record_transaction(account.id, exchange, is_fraudulent).await {
                Ok(_) => report.transactions += 1,
                Err(e) if e.downcast_ref::<BankError>().is_some() => {
                    warn!("Skipping sample transaction on {}: {}", account.account_no, e);
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
    info!("{} Transaction instances created.", report.transactions);
    info!("Completed.");

    Ok(Some(report))
}
