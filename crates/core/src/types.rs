/// Customer identifiers are opaque random UUIDs (v4).
pub type CustomerId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, unique customer id.
pub fn new_customer_id() -> CustomerId {
    uuid::Uuid::new_v4()
}
