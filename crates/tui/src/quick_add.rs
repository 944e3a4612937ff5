//! One-line input parsers behind the quick-entry prompt.

use api_types::{
    report::{ReportFormat, ReportRequest},
    transaction::TransactionQuery,
};
use chrono::{DateTime, NaiveDate, Utc};
use engine::{
    AccountDraft, Division, EngineError, Money, TransactionDraft, TransactionEdit, TransactionKind,
    TransferRequest,
};

use crate::client::{ReportKind, wire_division};

/// `+1200 #salary note @Account !office` (income) or `-45 #food lunch` /
/// `45 #food` (expense).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAdd {
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: Option<String>,
    pub note: Option<String>,
    pub account: Option<String>,
    pub division: Division,
}

impl QuickAdd {
    pub fn into_draft(self, occurred_at: DateTime<Utc>) -> Result<TransactionDraft, String> {
        let category = self.category.unwrap_or_default();
        let draft = TransactionDraft::new(self.kind, &category, self.amount, occurred_at)
            .map_err(|err| message(&err))?;
        Ok(draft
            .division(self.division)
            .description(self.note)
            .account(self.account))
    }
}

pub fn parse(input: &str) -> Result<QuickAdd, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Enter an amount.".to_string());
    }

    let (kind, rest) = if let Some(stripped) = trimmed.strip_prefix('+') {
        (TransactionKind::Income, stripped.trim_start())
    } else if let Some(stripped) = trimmed.strip_prefix('-') {
        (TransactionKind::Expense, stripped.trim_start())
    } else {
        (TransactionKind::Expense, trimmed)
    };

    let mut parts = rest.splitn(2, ' ');
    let amount = parse_amount(parts.next().unwrap_or(""))?;
    let tail = parse_tail(parts.next().unwrap_or("").trim())?;

    Ok(QuickAdd {
        kind,
        amount,
        category: tail.category,
        note: tail.note,
        account: tail.account,
        division: tail.division,
    })
}

/// `450 #food`: new amount and category of an existing record.
pub fn parse_edit(input: &str, current_category: &str) -> Result<TransactionEdit, String> {
    let mut parts = input.trim().splitn(2, ' ');
    let amount = parse_amount(parts.next().unwrap_or(""))?;
    let tail = parse_tail(parts.next().unwrap_or("").trim())?;
    let category = tail.category.unwrap_or_else(|| current_category.to_string());
    TransactionEdit::new(&category, amount).map_err(|err| message(&err))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillInput {
    pub name: String,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// `Electricity bill 1450 2026-03-05`: the last two tokens are amount and due
/// date, everything before is the name.
pub fn parse_bill(input: &str) -> Result<BillInput, String> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let [name @ .., amount, due] = tokens.as_slice() else {
        return Err("Use: name amount YYYY-MM-DD".to_string());
    };
    if name.is_empty() {
        return Err("Bill name is required.".to_string());
    }
    let amount = parse_amount(amount)?;
    let due_date = NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .map_err(|_| "Due date must be YYYY-MM-DD.".to_string())?;
    Ok(BillInput {
        name: name.join(" "),
        amount,
        due_date,
    })
}

/// `HDFC Savings 0012345678 25000`: name, account number, opening balance.
pub fn parse_account(input: &str) -> Result<AccountDraft, String> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let [name @ .., number, balance] = tokens.as_slice() else {
        return Err("Use: name number balance".to_string());
    };
    let balance: Money = balance
        .parse()
        .map_err(|_| "Invalid balance.".to_string())?;
    AccountDraft::new(&name.join(" "), number, balance).map_err(|err| message(&err))
}

/// `HDFC SBI 500`: account names may not contain spaces here.
pub fn parse_transfer(input: &str) -> Result<TransferRequest, String> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let [from, to, amount] = tokens.as_slice() else {
        return Err("Use: from to amount".to_string());
    };
    let amount = parse_amount(amount)?;
    TransferRequest::new(from, to, amount).map_err(|err| message(&err))
}

/// Budget or income override: an amount, or empty to clear.
pub fn parse_optional_amount(input: &str) -> Result<Option<Money>, String> {
    let raw = input.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let amount: Money = raw.parse().map_err(|_| "Invalid amount.".to_string())?;
    if amount.is_negative() {
        return Err("Amount cannot be negative.".to_string());
    }
    Ok(Some(amount))
}

/// `from=2026-02-01 to=2026-02-28 #food !office @HDFC`. Dates go together.
pub fn parse_filter(input: &str) -> Result<TransactionQuery, String> {
    let mut query = TransactionQuery::default();
    let mut rest: Vec<&str> = Vec::new();
    for token in input.split_whitespace() {
        if let Some(date) = token.strip_prefix("from=") {
            query.start = Some(date.to_string());
        } else if let Some(date) = token.strip_prefix("to=") {
            query.end = Some(date.to_string());
        } else {
            rest.push(token);
        }
    }

    match (&query.start, &query.end) {
        (Some(from), Some(to)) => {
            parse_range(from, to)?;
        }
        (None, None) => {}
        _ => return Err("Select both start and end dates.".to_string()),
    }

    let tail = parse_tail(&rest.join(" "))?;
    if let Some(note) = tail.note {
        return Err(format!("Unexpected filter: {note}"));
    }
    query.category = tail.category;
    query.account = tail.account;
    query.division = tail.explicit_division.then(|| wire_division(tail.division));
    Ok(query)
}

/// `monthly 2 2026 pdf`, `range 2026-01-01 2026-01-31 excel`,
/// `budget 2 2026`, `full [from to] [pdf|excel]`.
pub fn parse_report(input: &str) -> Result<(ReportKind, ReportRequest), String> {
    let mut tokens: Vec<&str> = input.split_whitespace().collect();
    let format = match tokens.last().copied() {
        Some("pdf") => {
            tokens.pop();
            ReportFormat::Pdf
        }
        Some("excel") => {
            tokens.pop();
            ReportFormat::Excel
        }
        _ => ReportFormat::Pdf,
    };
    let mut request = ReportRequest {
        format,
        ..ReportRequest::default()
    };

    let kind = match tokens.as_slice() {
        ["monthly", month, year] | ["budget", month, year] => {
            request.month = Some(parse_month(month)?);
            request.year = Some(year.parse().map_err(|_| "Invalid year.".to_string())?);
            if tokens[0] == "monthly" {
                ReportKind::Monthly
            } else {
                ReportKind::Budget
            }
        }
        ["range", from, to] => {
            let (from, to) = parse_range(from, to)?;
            request.from_date = Some(from);
            request.to_date = Some(to);
            ReportKind::DateRange
        }
        ["full"] => ReportKind::FullAccount,
        ["full", from, to] => {
            let (from, to) = parse_range(from, to)?;
            request.from_date = Some(from);
            request.to_date = Some(to);
            ReportKind::FullAccount
        }
        _ => {
            return Err(
                "Use: monthly M Y | range FROM TO | budget M Y | full [FROM TO], then pdf|excel"
                    .to_string(),
            );
        }
    };
    Ok((kind, request))
}

fn parse_month(raw: &str) -> Result<u32, String> {
    raw.parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| "Month must be 1-12.".to_string())
}

fn parse_range(from: &str, to: &str) -> Result<(String, String), String> {
    let parse = |raw: &str| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| "Dates must be YYYY-MM-DD.".to_string())
    };
    let (start, end) = (parse(from)?, parse(to)?);
    if start > end {
        return Err("Start date is after end date.".to_string());
    }
    Ok((from.to_string(), to.to_string()))
}

fn parse_amount(raw: &str) -> Result<Money, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Missing amount.".to_string());
    }
    let amount: Money = raw.parse().map_err(|_| "Invalid amount.".to_string())?;
    if !amount.is_positive() {
        return Err("Amount must be greater than zero.".to_string());
    }
    Ok(amount)
}

#[derive(Debug, Default)]
struct Tail {
    category: Option<String>,
    note: Option<String>,
    account: Option<String>,
    division: Division,
    explicit_division: bool,
}

fn parse_tail(raw: &str) -> Result<Tail, String> {
    let mut tail = Tail::default();
    let mut kept: Vec<&str> = Vec::new();

    for token in raw.split_whitespace() {
        if let Some(rest) = token.strip_prefix('#').filter(|r| !r.is_empty()) {
            if tail.category.is_some() {
                return Err("Too many categories: at most 1.".to_string());
            }
            tail.category = Some(capitalize(rest));
        } else if let Some(rest) = token.strip_prefix('@').filter(|r| !r.is_empty()) {
            tail.account = Some(rest.to_string());
        } else if let Some(rest) = token.strip_prefix('!').filter(|r| !r.is_empty()) {
            tail.division = match rest.to_lowercase().as_str() {
                "office" => Division::Office,
                "personal" => Division::Personal,
                _ => return Err(format!("Unknown division: {rest}")),
            };
            tail.explicit_division = true;
        } else {
            kept.push(token);
        }
    }

    let note = kept.join(" ");
    tail.note = (!note.is_empty()).then_some(note);
    Ok(tail)
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn message(err: &EngineError) -> String {
    match err {
        EngineError::MissingField(field) if field == "category" => {
            "Category is required (#category).".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn full_income_syntax() {
        let parsed = parse("+1200 #salary march bonus @HDFC !office").unwrap();
        assert_eq!(parsed.kind, TransactionKind::Income);
        assert_eq!(parsed.amount, Money::from_major(1200));
        assert_eq!(parsed.category.as_deref(), Some("Salary"));
        assert_eq!(parsed.note.as_deref(), Some("march bonus"));
        assert_eq!(parsed.account.as_deref(), Some("HDFC"));
        assert_eq!(parsed.division, Division::Office);
    }

    #[test]
    fn bare_amount_is_expense() {
        let parsed = parse("45,50 #food").unwrap();
        assert_eq!(parsed.kind, TransactionKind::Expense);
        assert_eq!(parsed.amount, Money::new(4550));
        assert_eq!(parse("-45 #food").unwrap().kind, TransactionKind::Expense);
    }

    #[test]
    fn draft_requires_category() {
        let at = Utc.with_ymd_and_hms(2026, 2, 5, 0, 0, 0).unwrap();
        let err = parse("45 lunch").unwrap().into_draft(at).unwrap_err();
        assert!(err.contains("Category"));
        assert!(parse("45 #food").unwrap().into_draft(at).is_ok());
    }

    #[test]
    fn rejects_bad_amounts() {
        assert!(parse("").is_err());
        assert!(parse("0 #food").is_err());
        assert!(parse("abc #food").is_err());
        assert!(parse("1 #a #b").is_err());
    }

    #[test]
    fn edit_keeps_category_when_omitted() {
        let edit = parse_edit("99", "Fuel").unwrap();
        assert_eq!(edit.category, "Fuel");
        assert_eq!(parse_edit("99 #travel", "Fuel").unwrap().category, "Travel");
    }

    #[test]
    fn bill_line() {
        let bill = parse_bill("Power bill 1450 2026-03-05").unwrap();
        assert_eq!(bill.name, "Power bill");
        assert_eq!(bill.amount, Money::from_major(1450));
        assert!(parse_bill("1450 2026-03-05").is_err());
        assert!(parse_bill("Power 1450 05/03/2026").is_err());
    }

    #[test]
    fn transfer_line() {
        assert!(parse_transfer("HDFC SBI 500").is_ok());
        assert_eq!(
            parse_transfer("HDFC HDFC 500").unwrap_err(),
            EngineError::SameAccount.to_string()
        );
    }

    #[test]
    fn report_line() {
        let (kind, request) = parse_report("monthly 2 2026 excel").unwrap();
        assert_eq!(kind, ReportKind::Monthly);
        assert_eq!(request.format, ReportFormat::Excel);
        assert_eq!(request.month, Some(2));

        let (kind, request) = parse_report("full").unwrap();
        assert_eq!(kind, ReportKind::FullAccount);
        assert_eq!(request.format, ReportFormat::Pdf);

        assert!(parse_report("range 2026-02-10 2026-02-01").is_err());
        assert!(parse_report("monthly 13 2026").is_err());
    }

    #[test]
    fn filter_needs_both_dates() {
        assert!(parse_filter("from=2026-02-01").is_err());
        let query = parse_filter("from=2026-02-01 to=2026-02-28 #food !office").unwrap();
        assert_eq!(query.start.as_deref(), Some("2026-02-01"));
        assert_eq!(query.category.as_deref(), Some("Food"));
        assert!(query.division.is_some());
        assert_eq!(parse_filter("").unwrap(), TransactionQuery::default());
    }

    #[test]
    fn optional_amount_clears_on_empty() {
        assert_eq!(parse_optional_amount("  ").unwrap(), None);
        assert_eq!(parse_optional_amount("1000").unwrap(), Some(Money::from_major(1000)));
        assert!(parse_optional_amount("-1").is_err());
    }
}
