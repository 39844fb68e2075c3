//! The Authority's fixed wire contract.
//!
//! Field names and the 3-digit result-code space are the Authority's, not
//! ours — they are contract and must not be renamed. `"000"` means accepted;
//! any other code is a business rejection carrying a human-readable message.
//! Amounts travel as 2-decimal strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::tax::round_half_up;
use crate::core::{Acknowledgement, CatalogItem, CompactTimestamp, FiscalConfig, FiscalError, Sale};

/// Result code for an accepted submission.
pub const RESULT_ACCEPTED: &str = "000";

/// Maximum length of registrant/modifier identity fields.
pub const IDENTITY_MAX: usize = 20;

/// Invoice submission payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub tin: String,
    pub bhf_id: String,
    pub invc_no: u64,
    /// 0 for a new sale, the referenced invoice number for a reversal.
    pub org_invc_no: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_tin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cust_nm: Option<String>,
    pub pmt_ty_cd: String,
    pub tot_item_cnt: usize,
    pub taxbl_amt_a: Decimal,
    pub taxbl_amt_b: Decimal,
    pub taxbl_amt_c: Decimal,
    pub taxbl_amt_d: Decimal,
    pub taxbl_amt_e: Decimal,
    pub tax_amt_a: Decimal,
    pub tax_amt_b: Decimal,
    pub tax_amt_c: Decimal,
    pub tax_amt_d: Decimal,
    pub tax_amt_e: Decimal,
    pub tot_taxbl_amt: Decimal,
    pub tot_tax_amt: Decimal,
    pub tot_amt: Decimal,
    pub regr_id: String,
    pub regr_nm: String,
    pub modr_id: String,
    pub modr_nm: String,
    pub item_list: Vec<InvoiceLine>,
}

/// One line of an invoice payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub item_seq: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_cd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_cls_cd: Option<String>,
    pub item_nm: String,
    pub qty: Decimal,
    pub prc: Decimal,
    /// Line amount before discount.
    pub sply_amt: Decimal,
    pub dc_rt: Decimal,
    pub dc_amt: Decimal,
    /// Bracket letter A–E.
    pub tax_ty_cd: String,
    pub taxbl_amt: Decimal,
    pub tax_amt: Decimal,
    pub tot_amt: Decimal,
}

/// Catalog item registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub tin: String,
    pub bhf_id: String,
    pub item_cd: String,
    pub item_cls_cd: String,
    pub item_ty_cd: String,
    pub item_nm: String,
    pub orgn_nat_cd: String,
    pub pkg_unit_cd: String,
    pub qty_unit_cd: String,
    pub tax_ty_cd: String,
    pub dft_prc: Decimal,
    pub use_yn: String,
    pub regr_id: String,
    pub regr_nm: String,
    pub modr_id: String,
    pub modr_nm: String,
}

/// The Authority's response envelope, shared by both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityResponse {
    pub result_cd: String,
    pub result_msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_dt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AckData>,
}

/// Acknowledgement block present on accepted invoice submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckData {
    pub rcpt_no: u64,
    pub tot_rcpt_no: u64,
    pub intrl_data: String,
    pub rcpt_sign: String,
    /// 14-digit `YYYYMMDDHHMMSS` confirmation token.
    pub cfm_dt: String,
}

impl AuthorityResponse {
    pub fn is_accepted(&self) -> bool {
        self.result_cd == RESULT_ACCEPTED
    }

    /// Extract the signed acknowledgement from an accepted response.
    ///
    /// A non-accepted response maps to [`FiscalError::Rejected`]; an accepted
    /// response without a well-formed data block is a protocol violation and
    /// maps to [`FiscalError::Transport`].
    pub fn acknowledgement(&self) -> Result<Acknowledgement, FiscalError> {
        if !self.is_accepted() {
            return Err(FiscalError::Rejected {
                code: self.result_cd.clone(),
                message: self.result_msg.clone(),
            });
        }
        let data = self.data.as_ref().ok_or_else(|| {
            FiscalError::Transport("accepted response is missing its data block".into())
        })?;
        CompactTimestamp::parse(&data.cfm_dt).map_err(|e| {
            FiscalError::Transport(format!("accepted response has a bad confirmation token: {e}"))
        })?;
        Ok(Acknowledgement {
            receipt_counter: data.rcpt_no,
            total_receipt_counter: data.tot_rcpt_no,
            internal_data: data.intrl_data.clone(),
            signature: data.rcpt_sign.clone(),
            confirmed_at: data.cfm_dt.clone(),
        })
    }
}

/// Build the invoice payload from a sale's **stored** amounts. Retries call
/// this on the persisted record, so nothing is recomputed between attempts.
pub fn build_invoice_request(sale: &Sale, config: &FiscalConfig) -> InvoiceRequest {
    let b = &sale.breakdown;
    let customer = sale.customer.as_ref();

    let item_list = sale
        .lines
        .iter()
        .zip(&b.lines)
        .enumerate()
        .map(|(i, (line, row))| InvoiceLine {
            item_seq: i + 1,
            item_cd: line.item_code.clone(),
            item_cls_cd: line.item_class_code.clone(),
            item_nm: line.name.clone(),
            qty: line.quantity,
            prc: wire_amount(line.unit_price),
            sply_amt: wire_amount(row.original_amount),
            dc_rt: wire_amount(row.discount_rate),
            dc_amt: wire_amount(row.discount_amount),
            tax_ty_cd: row.bracket.letter().to_string(),
            taxbl_amt: wire_amount(row.taxable_amount),
            tax_amt: wire_amount(row.tax_amount),
            tot_amt: wire_amount(row.line_total),
        })
        .collect();

    InvoiceRequest {
        tin: config.tax_id.clone(),
        bhf_id: config.branch_id.clone(),
        invc_no: sale.invoice_number,
        org_invc_no: sale.origin_invoice_number,
        cust_tin: customer.and_then(|c| c.tax_id.clone()),
        cust_nm: customer.and_then(|c| c.name.clone()),
        pmt_ty_cd: sale.payment.code().to_string(),
        tot_item_cnt: sale.lines.len(),
        taxbl_amt_a: wire_amount(b.taxable[0]),
        taxbl_amt_b: wire_amount(b.taxable[1]),
        taxbl_amt_c: wire_amount(b.taxable[2]),
        taxbl_amt_d: wire_amount(b.taxable[3]),
        taxbl_amt_e: wire_amount(b.taxable[4]),
        tax_amt_a: wire_amount(b.tax[0]),
        tax_amt_b: wire_amount(b.tax[1]),
        tax_amt_c: wire_amount(b.tax[2]),
        tax_amt_d: wire_amount(b.tax[3]),
        tax_amt_e: wire_amount(b.tax[4]),
        tot_taxbl_amt: wire_amount(b.total_taxable),
        tot_tax_amt: wire_amount(b.total_tax),
        tot_amt: wire_amount(b.grand_total),
        regr_id: cap_identity(&config.registrant_id),
        regr_nm: cap_identity(&config.registrant_name),
        modr_id: cap_identity(&config.registrant_id),
        modr_nm: cap_identity(&config.registrant_name),
        item_list,
    }
}

/// Build the registration payload for a catalog item. `qty_unit_cd` is the
/// already-normalized unit code embedded in the item code's namespace.
pub fn build_item_request(
    item: &CatalogItem,
    qty_unit_cd: &str,
    config: &FiscalConfig,
) -> ItemRequest {
    ItemRequest {
        tin: config.tax_id.clone(),
        bhf_id: config.branch_id.clone(),
        item_cd: item.item_code.clone(),
        item_cls_cd: item.item_class_code.clone(),
        item_ty_cd: config.item_prefix.item_type.clone(),
        item_nm: item.name.clone(),
        orgn_nat_cd: config.item_prefix.country.clone(),
        pkg_unit_cd: config.item_prefix.packaging.clone(),
        qty_unit_cd: qty_unit_cd.to_string(),
        tax_ty_cd: item.tax_bracket.letter().to_string(),
        dft_prc: wire_amount(item.cost),
        use_yn: "Y".into(),
        regr_id: cap_identity(&config.registrant_id),
        regr_nm: cap_identity(&config.registrant_name),
        modr_id: cap_identity(&config.registrant_id),
        modr_nm: cap_identity(&config.registrant_name),
    }
}

/// Round to two decimals and pin the scale so the wire value always reads
/// like "176.00".
fn wire_amount(value: Decimal) -> Decimal {
    let mut v = round_half_up(value, 2);
    v.rescale(2);
    v
}

/// Registrant/modifier identities are capped at 20 characters.
fn cap_identity(value: &str) -> String {
    value.chars().take(IDENTITY_MAX).collect()
}
