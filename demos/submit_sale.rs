use risiti::authority::{
    AckData, AuthorityClient, AuthorityResponse, FiscalEngine, InvoiceRequest, ItemRequest,
};
use risiti::core::*;
use rust_decimal_macros::dec;

/// Stand-in Authority that accepts everything, so the demo runs offline.
/// Swap in `HttpAuthorityClient` to talk to the real endpoint.
struct AcceptingAuthority;

impl AuthorityClient for AcceptingAuthority {
    async fn submit_invoice(&self, _: &InvoiceRequest) -> Result<AuthorityResponse, FiscalError> {
        Ok(AuthorityResponse {
            result_cd: "000".into(),
            result_msg: "Succeeded".into(),
            result_dt: None,
            data: Some(AckData {
                rcpt_no: 312,
                tot_rcpt_no: 502,
                intrl_data: "ABCD1234EFGH5678IJKL".into(),
                rcpt_sign: "SIGXYZ0001SIGXYZ0001".into(),
                cfm_dt: "20240615143059".into(),
            }),
        })
    }

    async fn register_item(&self, _: &ItemRequest) -> Result<AuthorityResponse, FiscalError> {
        Ok(AuthorityResponse {
            result_cd: "000".into(),
            result_msg: "Succeeded".into(),
            result_dt: None,
            data: None,
        })
    }
}

#[tokio::main]
async fn main() {
    let config = FiscalConfig::builder("P051234567X", "00", "SCU-0042")
        .business_name("Mama Oliech Restaurant")
        .address("Marcus Garvey Rd, Nairobi")
        .registrant("11", "Till One")
        .build();
    let engine = FiscalEngine::new(config, MemoryLedger::new(), AcceptingAuthority);

    let draft = SaleDraft {
        reference: "ORD-1001".into(),
        invoice_number: None,
        origin_invoice_number: 0,
        lines: vec![
            SaleLine {
                name: "Grilled Tilapia".into(),
                item_code: Some("KE2NTU0000001".into()),
                item_class_code: Some("5020230100".into()),
                quantity: dec!(2),
                unit_price: dec!(1200),
                bracket: Some(TaxBracket::Standard),
            },
            SaleLine {
                name: "Market Greens".into(),
                item_code: None,
                item_class_code: None,
                quantity: dec!(1),
                unit_price: dec!(50),
                bracket: Some(TaxBracket::Exempt),
            },
        ],
        discount: dec!(30),
        discount_kind: DiscountKind::Amount,
        payment: PaymentMethod::Cash,
        customer: None,
    };

    match engine.submit_sale(draft).await {
        Ok(outcome) => {
            println!("{}", outcome.receipt.text);
            println!("QR payload: {}", outcome.receipt.qr_payload);
        }
        Err(e) => eprintln!("submission failed: {e}"),
    }
}
