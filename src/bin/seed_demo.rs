//! Fill the database with a demo account and a spread of debts.
//!
//! Usage: `seed-demo [username] [password]` (defaults `demo_user` / `demo-password`).

use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};
use tracing::info;

use debt_tracker_server::{
    auth::{create_user, get_user_by_username},
    constants::DEFAULT_DATA_PATH,
    database,
    models::{DebtStatus, NewDebt},
    store::DebtStore,
};

// (lender, amount in cents, due offset in days, paid, description)
const DEMO_DEBTS: &[(&str, i64, i64, bool, Option<&str>)] = &[
    ("Bank BCA", 500_000_000, 30, false, Some("Business capital loan")),
    ("Bank Mandiri", 125_000_000, -12, false, Some("Motorbike instalment")),
    ("Ahmad Santoso", 75_000_000, 3, false, None),
    ("Koperasi Sejahtera", 200_000_000, 0, false, Some("School fees")),
    ("Credit Plus", 89_900_000, -45, true, Some("Laptop instalment")),
    ("Warung Bu Yuni", 15_000_000, -70, true, Some("Monthly groceries")),
    ("Mega Finance", 320_000_000, -100, false, Some("Home renovation")),
    ("Sari Wulandari", 50_000_000, 9, false, None),
    ("Toko Elektronik Jaya", 410_000_000, -20, true, Some("Refrigerator")),
    ("Adira Finance", 99_999_900, 120, false, Some("Phone instalment")),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let username = args.next().unwrap_or_else(|| "demo_user".to_string());
    let password = args.next().unwrap_or_else(|| "demo-password".to_string());

    let data_path =
        std::env::var("DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
    let db = database::init_db(&data_path).await?;

    let user = match get_user_by_username(&db, &username).await? {
        Some(user) => user,
        None => create_user(&db, &username, &password).await?,
    };

    let today = OffsetDateTime::now_utc().date();
    let store = DebtStore::for_owner(&db, &user.id);

    for (lender, cents, offset_days, paid, description) in DEMO_DEBTS {
        let due_date = today
            .checked_add(Duration::days(*offset_days))
            .ok_or_else(|| anyhow::anyhow!("due date out of range"))?;

        store
            .insert(NewDebt {
                lender_name: lender.to_string(),
                amount: Decimal::new(*cents, 2),
                due_date,
                status: if *paid {
                    DebtStatus::Paid
                } else {
                    DebtStatus::Unpaid
                },
                description: description.map(str::to_string),
            })
            .await?;
    }

    info!(
        username = %user.username,
        count = DEMO_DEBTS.len(),
        "seeded demo debts"
    );
    Ok(())
}
