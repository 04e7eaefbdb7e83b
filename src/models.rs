use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Normalized Report Models ============

/// Roll-up counters from the bureau's summary section.
///
/// Every field defaults to 0 when the corresponding section is absent or
/// malformed in the source document, so consumers can do arithmetic on these
/// values without guarding against missing data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Total number of credit accounts reported.
    pub total_accounts: i64,
    /// Number of accounts currently open.
    pub active_accounts: i64,
    /// Number of closed accounts.
    pub closed_accounts: i64,
    /// Outstanding balance across all accounts.
    pub current_balance: f64,
    /// Outstanding balance on secured accounts.
    pub secured_accounts_amount: f64,
    /// Outstanding balance on unsecured accounts.
    pub unsecured_accounts_amount: f64,
    /// Number of credit enquiries in the last seven days.
    #[serde(rename = "last7DaysEnquiries")]
    pub last_7_days_enquiries: i64,
}

/// One credit account line item from the bureau export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// Reporting institution (subscriber) name, trimmed.
    pub bank: String,
    /// Account number as reported.
    pub account_number: String,
    /// Amount past due; 0 when not reported.
    pub amount_overdue: f64,
    /// Current balance as reported; sign preserved.
    pub current_balance: f64,
    /// Holder address, resolved first-non-empty from the candidate fields.
    pub address: String,
}

/// The normalized credit report produced by extraction.
///
/// Textual fields may be empty strings, never absent; numeric fields are
/// always well-formed numbers (absence in the source coerces to 0). The
/// record is immutable once stored; a correction requires a new upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditReport {
    /// Applicant full name (given name + surname).
    pub name: String,
    /// Applicant mobile phone number.
    pub mobile_phone: String,
    /// Applicant PAN.
    pub pan: String,
    /// Bureau score; 0 when the score section is missing or unparsable.
    /// The source does not distinguish a reported zero from an absent score.
    pub credit_score: i64,
    /// Summary counters.
    pub report_summary: ReportSummary,
    /// Per-account details, in document order. May be empty.
    pub credit_accounts: Vec<AccountRecord>,
}

/// A persisted report with its storage-assigned identity.
///
/// `id` and `uploaded_at` are assigned by the storage layer at insert time,
/// not derived from the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    /// Unique identifier assigned at insert time.
    pub id: Uuid,
    /// The normalized report.
    pub report: CreditReport,
    /// Upload timestamp assigned at insert time.
    pub uploaded_at: DateTime<Utc>,
}
