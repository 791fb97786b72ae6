//! Expense input validation.
//!
//! Field checks are driven by a single rule table instead of per-handler
//! conditionals, so the constraints on a field live in exactly one place.

use chrono::NaiveDate;

use crate::{
    expenses::PaymentMethod, money::MoneyCents, util::normalize_tags, EngineError, ResultEngine,
};

/// Maximum accepted amount (100 000.00 in cents).
pub const MAX_AMOUNT: MoneyCents = MoneyCents::new(10_000_000);
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Raw expense fields as received from the client, all optional and untyped.
///
/// Multipart forms deliver every field as text, so the draft keeps strings
/// and leaves typing to [`validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub payment_method: Option<String>,
    pub expense_date: Option<String>,
    pub tags: Option<String>,
    pub receipt_path: Option<String>,
}

/// Fully typed expense fields that passed every rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedExpense {
    pub amount: MoneyCents,
    pub description: String,
    pub category_id: i64,
    pub payment_method: PaymentMethod,
    pub expense_date: NaiveDate,
    pub tags: String,
    pub receipt_path: Option<String>,
}

struct FieldRule {
    field: &'static str,
    required: bool,
    check: fn(&str) -> Result<(), String>,
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "amount",
        required: true,
        check: check_amount,
    },
    FieldRule {
        field: "description",
        required: true,
        check: check_description,
    },
    FieldRule {
        field: "category_id",
        required: true,
        check: check_category_id,
    },
    FieldRule {
        field: "payment_method",
        required: true,
        check: check_payment_method,
    },
    FieldRule {
        field: "expense_date",
        required: true,
        check: check_expense_date,
    },
    FieldRule {
        field: "tags",
        required: false,
        check: |_| Ok(()),
    },
];

fn check_amount(raw: &str) -> Result<(), String> {
    let amount: MoneyCents = raw
        .parse()
        .map_err(|_| "must be a number with at most 2 decimals".to_string())?;
    if !amount.is_positive() {
        return Err("must be positive".to_string());
    }
    if amount > MAX_AMOUNT {
        return Err(format!("must not exceed {MAX_AMOUNT}"));
    }
    Ok(())
}

fn check_description(raw: &str) -> Result<(), String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(format!("must be at most {MAX_DESCRIPTION_LEN} characters"));
    }
    Ok(())
}

fn check_category_id(raw: &str) -> Result<(), String> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(()),
        _ => Err("must be a positive integer".to_string()),
    }
}

fn check_payment_method(raw: &str) -> Result<(), String> {
    PaymentMethod::try_from(raw)
        .map(|_| ())
        .map_err(|_| format!("must be one of: {}", PaymentMethod::ALL.join(", ")))
}

fn check_expense_date(raw: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| "must be a date in YYYY-MM-DD format".to_string())
}

fn draft_field<'a>(draft: &'a ExpenseDraft, field: &str) -> Option<&'a str> {
    match field {
        "amount" => draft.amount.as_deref(),
        "description" => draft.description.as_deref(),
        "category_id" => draft.category_id.as_deref(),
        "payment_method" => draft.payment_method.as_deref(),
        "expense_date" => draft.expense_date.as_deref(),
        "tags" => draft.tags.as_deref(),
        _ => None,
    }
}

/// Runs every rule over the draft and returns the typed fields.
///
/// All failing fields are reported at once, joined as `field: message`
/// pairs, rather than stopping at the first failure.
pub fn validate(draft: &ExpenseDraft) -> ResultEngine<ValidatedExpense> {
    let mut problems: Vec<String> = Vec::new();

    for rule in RULES {
        match draft_field(draft, rule.field) {
            Some(value) => {
                if let Err(message) = (rule.check)(value) {
                    problems.push(format!("{}: {message}", rule.field));
                }
            }
            None if rule.required => {
                problems.push(format!("{}: is required", rule.field));
            }
            None => {}
        }
    }

    if !problems.is_empty() {
        return Err(EngineError::Validation(problems.join("; ")));
    }

    // Every rule passed, so these conversions cannot fail.
    let amount: MoneyCents = draft
        .amount
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| EngineError::Validation("amount: must be a number".to_string()))?;
    let expense_date =
        NaiveDate::parse_from_str(draft.expense_date.as_deref().unwrap_or_default().trim(), "%Y-%m-%d")
            .map_err(|_| EngineError::Validation("expense_date: invalid date".to_string()))?;
    let category_id: i64 = draft
        .category_id
        .as_deref()
        .unwrap_or_default()
        .trim()
        .parse()
        .map_err(|_| EngineError::Validation("category_id: invalid id".to_string()))?;
    let payment_method = PaymentMethod::try_from(draft.payment_method.as_deref().unwrap_or_default())?;

    Ok(ValidatedExpense {
        amount,
        description: draft.description.as_deref().unwrap_or_default().trim().to_string(),
        category_id,
        payment_method,
        expense_date,
        tags: normalize_tags(draft.tags.as_deref().unwrap_or_default()),
        receipt_path: draft.receipt_path.clone(),
    })
}
