// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DATABASE_FILE_NAME: &str = "debts.db";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:8080";

// Session configuration
pub const SESSION_NAME: &str = "debt_tracker_session";
pub const SESSION_EXPIRY_DAYS: i64 = 30;
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;
pub const SESSION_USER_KEY: &str = "user";

// Listing and dashboard
pub const DEBTS_PER_PAGE: u32 = 10;
pub const MAX_PAGE: u32 = 1_000_000;
pub const DASHBOARD_LIST_LIMIT: u32 = 5;
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;
pub const MONTHLY_BUCKET_COUNT: usize = 6;

// Validation limits
pub const MAX_LENDER_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_USERNAME_LENGTH: usize = 4;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const AMOUNT_SCALE: u32 = 2;
/// Smallest accepted amount in cents.
pub const MIN_AMOUNT_CENTS: i64 = 1;
/// Largest accepted amount in cents (999,999,999,999.99).
pub const MAX_AMOUNT_CENTS: i64 = 99_999_999_999_999;

// Debt status values as stored and sent over the wire
pub const DEBT_STATUS_UNPAID: &str = "unpaid";
pub const DEBT_STATUS_PAID: &str = "paid";

// Error messages
pub const ERR_DATABASE_OPERATION: &str = "Database operation failed";
pub const ERR_INVALID_SESSION: &str = "Invalid session";
pub const ERR_UNAUTHORIZED: &str = "Not logged in";
pub const ERR_FORBIDDEN: &str = "You do not have access to this debt";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid username or password";
