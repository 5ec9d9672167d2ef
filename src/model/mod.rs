//! # Invoice Model
//!
//! The records the layout engine reads. They are plain data: the engine
//! borrows them immutably and never writes back.
//!
//! JSON field names are camelCase to match the records the invoicing service
//! stores, e.g. `invoiceNumber`, `dueDate`, `businessName`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An invoice with its resolved client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_number: String,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub invoice_date: NaiveDate,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    /// A reduction applied to the subtotal. Zero means no discount.
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub notes: Option<String>,
    /// The stored invoice references its client by `clientId`; callers pass
    /// the populated record under either name.
    #[serde(alias = "clientId")]
    pub client: Client,
}

impl Invoice {
    /// Notes text if present and non-empty. Whitespace-only notes still
    /// count as notes.
    pub fn notes_text(&self) -> Option<&str> {
        self.notes.as_deref().filter(|n| !n.is_empty())
    }
}

/// One billed product or service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub price: f64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            price,
        }
    }

    /// `quantity × price`.
    pub fn line_total(&self) -> f64 {
        self.quantity * self.price
    }
}

/// Payment state of an invoice.
///
/// The stored records only ever hold the three known values, but anything
/// else is kept verbatim so it can still be printed (with a neutral pill).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Other(s) => s,
        }
    }
}

impl From<&str> for InvoiceStatus {
    fn from(s: &str) -> Self {
        match s {
            "Paid" => InvoiceStatus::Paid,
            "Pending" => InvoiceStatus::Pending,
            "Overdue" => InvoiceStatus::Overdue,
            other => InvoiceStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InvoiceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InvoiceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(InvoiceStatus::from(s.as_str()))
    }
}

/// The billed party.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The issuing business. Every field is optional; an empty profile renders
/// an empty FROM column apart from its header.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// File path, `data:image/...` URI or raw base64 image data.
    #[serde(default)]
    pub logo: Option<String>,
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Dates arrive either as `YYYY-MM-DD` or as the full timestamp the
/// service exports (`2026-02-14T00:00:00.000Z`). Timestamps keep the
/// calendar date in their own offset.
mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.date_naive())
            .map_err(|_| {
                D::Error::custom(format!(
                    "invalid date `{}`, expected YYYY-MM-DD or an RFC 3339 timestamp",
                    raw
                ))
            })
    }
}

/// Treat `None` and blank strings alike.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
