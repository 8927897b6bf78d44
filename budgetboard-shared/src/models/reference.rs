/// Seeded reference data
///
/// Category types (`expense`, `income`) classify finance and budget
/// categories. Currencies (`usd`, `eur`, `gbp`) denominate budget records.
/// Both are inserted by the initial migration and read-only at runtime.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Currency {
    /// Lowercase ISO-style code, the primary key
    pub slug: String,
    pub name: String,
    pub symbol: String,
}
