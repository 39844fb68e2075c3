use risiti::core::*;
use rust_decimal_macros::dec;

fn main() {
    let config = FiscalConfig::builder("P051234567X", "00", "SCU-0042")
        .business_name("Mama Oliech Restaurant")
        .build();
    let ledger = MemoryLedger::new();

    // Classify a few catalog drafts and allocate their item codes the way
    // the registration flow would.
    let drafts = [
        ("ing-001", "Tilapia Fillet", "meat", "kg", dec!(450)),
        ("ing-002", "Sukuma Wiki", "produce", "bunch", dec!(30)),
        ("men-001", "Beef Samosa", "food", "pcs", dec!(25)),
        ("men-002", "Stoney Tangawizi", "beverage", "bottle", dec!(60)),
    ];

    for (id, name, category, unit, cost) in drafts {
        let class_code = classify(category, &config.classes);
        let bracket = tax_bracket_for(&class_code, &config.classes);
        let unit_code = normalize_unit(unit, &config.units);
        let item_code = next_item_code(&ledger, &config.item_prefix, &unit_code).unwrap();

        let item = CatalogItem {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            unit: unit.into(),
            cost,
            item_code,
            item_class_code: class_code,
            tax_bracket: bracket,
            status: ItemStatus::Registered,
        };
        ledger.upsert_item(&item).unwrap();

        println!(
            "{:<20} {:<14} class {} bracket {}",
            item.name,
            item.item_code,
            item.item_class_code,
            item.tax_bracket.letter()
        );
    }
}
