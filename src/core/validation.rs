//! Input validation, run before any allocation occurs.
//!
//! Returns all errors found, not just the first.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ValidationError;
use super::types::{DiscountKind, ItemDraft, SaleDraft};

/// Validate a catalog item draft ahead of registration.
pub fn validate_item_draft(draft: &ItemDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if draft.id.trim().is_empty() {
        errors.push(ValidationError::new("id", "item id must not be empty"));
    }
    if draft.name.trim().is_empty() {
        errors.push(ValidationError::new("name", "item name must not be empty"));
    }
    if draft.category.trim().is_empty() {
        errors.push(ValidationError::new(
            "category",
            "item category must not be empty",
        ));
    }
    if draft.cost.is_sign_negative() {
        errors.push(ValidationError::new("cost", "cost must not be negative"));
    }

    errors
}

/// Validate a sale draft ahead of submission.
pub fn validate_sale_draft(draft: &SaleDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if draft.reference.trim().is_empty() {
        errors.push(ValidationError::new(
            "reference",
            "sale reference must not be empty",
        ));
    }
    if draft.lines.is_empty() {
        errors.push(ValidationError::new(
            "lines",
            "sale must have at least one line",
        ));
    }
    if draft.discount.is_sign_negative() {
        errors.push(ValidationError::new(
            "discount",
            "discount must not be negative",
        ));
    }
    if draft.invoice_number == Some(0) {
        errors.push(ValidationError::new(
            "invoice_number",
            "an allocated invoice number must be non-zero",
        ));
    }

    if draft.discount_kind == DiscountKind::Percent && draft.discount > dec!(100) {
        errors.push(ValidationError::new(
            "discount",
            format!("percentage discount {} exceeds 100", draft.discount),
        ));
    }

    let mut total = Decimal::ZERO;
    for (i, line) in draft.lines.iter().enumerate() {
        if line.name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("lines[{i}].name"),
                "line name must not be empty",
            ));
        }
        if line.quantity <= Decimal::ZERO {
            errors.push(ValidationError::new(
                format!("lines[{i}].quantity"),
                "quantity must be positive",
            ));
        }
        if line.unit_price.is_sign_negative() {
            errors.push(ValidationError::new(
                format!("lines[{i}].unit_price"),
                "unit price must not be negative",
            ));
        }
        total += line.quantity * line.unit_price;
    }

    if draft.discount_kind == DiscountKind::Amount
        && !draft.discount.is_sign_negative()
        && draft.discount > total
    {
        errors.push(ValidationError::new(
            "discount",
            format!("discount {} exceeds order total {total}", draft.discount),
        ));
    }

    errors
}
