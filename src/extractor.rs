//! Extraction of the normalized credit report from the parsed bureau tree.
//!
//! Every field is resolved along a fixed navigation path with a terminal
//! default: a missing or malformed value degrades to an empty string or 0,
//! it never propagates as an error. The whole transform is a pure function
//! of the input tree; identifiers and timestamps are assigned later by the
//! storage layer.

use serde_json::Value;

use crate::models::{AccountRecord, CreditReport, ReportSummary};
use crate::source::DocNode;

/// Navigation path to the applicant details block.
const APPLICANT_PATH: &[&str] = &[
    "Current_Application",
    "Current_Application_Details",
    "Current_Applicant_Details",
];

/// Extract a normalized report from a parsed bureau document.
///
/// Total function: structurally incomplete or malformed input produces a
/// report with defaulted fields, never a failure. The account-details node
/// may arrive as a single object or as a sequence; both normalize to the
/// same ordered account list.
pub fn extract(doc: &Value) -> CreditReport {
    let root = DocNode::root(doc).child("INProfileResponse");
    let applicant = root.path(APPLICANT_PATH);
    let cais = root.child("CAIS_Account");

    let account_nodes = cais.child("CAIS_Account_DETAILS").as_many();

    // The PAN shows up redundantly in the source schema; take the applicant
    // field first, then the first account holder's record.
    let pan = {
        let applicant_pan = applicant.child("IncomeTaxPan").text();
        if !applicant_pan.is_empty() {
            applicant_pan
        } else {
            account_nodes
                .first()
                .map(|node| node.path(&["CAIS_Holder_Details", "Income_TAX_PAN"]).text())
                .unwrap_or_default()
        }
    };

    CreditReport {
        name: compose_name(
            &applicant.child("First_Name").text(),
            &applicant.child("Last_Name").text(),
        ),
        mobile_phone: applicant.child("MobilePhoneNumber").text(),
        pan,
        credit_score: root.path(&["SCORE", "BureauScore"]).integer(),
        report_summary: extract_summary(root, cais),
        credit_accounts: account_nodes.into_iter().map(extract_account).collect(),
    }
}

/// Given name and surname joined by a single space, trimmed. Both empty
/// yields an empty string, not whitespace.
fn compose_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name).trim().to_string()
}

fn extract_summary(root: DocNode<'_>, cais: DocNode<'_>) -> ReportSummary {
    let credit_account = cais.path(&["CAIS_Summary", "Credit_Account"]);
    let outstanding = cais.path(&["CAIS_Summary", "Total_Outstanding_Balance"]);

    ReportSummary {
        total_accounts: credit_account.child("CreditAccountTotal").integer(),
        active_accounts: credit_account.child("CreditAccountActive").integer(),
        closed_accounts: credit_account.child("CreditAccountClosed").integer(),
        current_balance: outstanding.child("Outstanding_Balance_All").decimal(),
        secured_accounts_amount: outstanding.child("Outstanding_Balance_Secured").decimal(),
        unsecured_accounts_amount: outstanding.child("Outstanding_Balance_UnSecured").decimal(),
        last_7_days_enquiries: root.path(&["TotalCAPS_Summary", "TotalCAPSLast7Days"]).integer(),
    }
}

/// Map one account-detail node. Applies the same safe-navigation defaults
/// as the top-level fields; the address resolves first-non-empty from the
/// city field, then the first line of the address.
fn extract_account(node: DocNode<'_>) -> AccountRecord {
    AccountRecord {
        bank: node.child("Subscriber_Name").text(),
        account_number: node.child("Account_Number").text(),
        amount_overdue: node.child("Amount_Past_Due").decimal(),
        current_balance: node.child("Current_Balance").decimal(),
        address: node.child("CAIS_Holder_Address_Details").first_text(&[
            &["City_non_Normalized"],
            &["First_Line_Of_Address_non_Normalized"],
        ]),
    }
}
