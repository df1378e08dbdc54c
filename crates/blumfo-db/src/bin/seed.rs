//! # Seed Data Generator
//!
//! Creates `./blumfo.db` with a company profile, a couple of clients and
//! catalog products, one issued invoice, one draft, and a monthly
//! subscription. Useful for poking at the schema or demoing the UI.
//!
//! ## Usage
//! ```bash
//! cargo run -p blumfo-db --bin seed
//! ```

use chrono::{Days, NaiveDate, Utc};
use tracing::info;

use blumfo_core::numbering;
use blumfo_core::totals::{calculate_totals, Discount, DocumentLine};
use blumfo_core::{
    Client, Company, Invoice, InvoiceItem, InvoiceStatus, InvoiceTemplate, NumberingConfig,
    PaymentTerms, Product, RecurringInterval, ReminderSchedule, ReminderTrigger, Subscription,
    TriggerKind, DEFAULT_TENANT_ID,
};
use blumfo_db::repository::generate_id;
use blumfo_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let db = Database::new(DbConfig::new("./blumfo.db")).await?;
    info!("Database ready at ./blumfo.db");

    let now = Utc::now();
    let today = now.date_naive();

    // Company profile
    db.companies()
        .upsert(&Company {
            id: DEFAULT_TENANT_ID.to_string(),
            name: "Atelier Dupont".to_string(),
            address: Some("12 rue de la Paix, 75002 Paris".to_string()),
            email: Some("contact@atelier-dupont.fr".to_string()),
            phone: Some("+33 1 23 45 67 89".to_string()),
            registration_number: Some("123 456 789 00012".to_string()),
            vat_number: Some("FR12345678901".to_string()),
            created_at: now,
            updated_at: now,
        })
        .await?;

    // Clients
    let acme = Client {
        id: generate_id(),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        name: "Acme Corp".to_string(),
        email: Some("billing@acme.fr".to_string()),
        phone: None,
        address: Some("1 avenue des Champs, 75008 Paris".to_string()),
        vat_number: Some("FR98765432109".to_string()),
        notes: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.clients().insert(&acme).await?;

    let dupont = Client {
        id: generate_id(),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        name: "Dupont SARL".to_string(),
        email: Some("contact@dupont.fr".to_string()),
        phone: None,
        address: Some("3 place du Marché, 69002 Lyon".to_string()),
        vat_number: None,
        notes: Some("Paiement souvent en retard".to_string()),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.clients().insert(&dupont).await?;

    // Catalog
    let consulting = Product {
        id: generate_id(),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        reference: "CONSULT-DAY".to_string(),
        name: "Journée de conseil".to_string(),
        description: Some("Conseil et accompagnement technique".to_string()),
        unit_price_cents: 60000,
        tax_rate_bps: 2000,
        unit: Some("day".to_string()),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&consulting).await?;

    let hosting = Product {
        id: generate_id(),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        reference: "HOSTING".to_string(),
        name: "Hébergement mensuel".to_string(),
        description: None,
        unit_price_cents: 2900,
        tax_rate_bps: 2000,
        unit: Some("month".to_string()),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&hosting).await?;

    // Numbering, payment terms and a default reminder schedule
    let mut config = NumberingConfig {
        prefix: "FACT-".to_string(),
        ..NumberingConfig::default()
    };
    let terms = PaymentTerms::default();
    db.settings()
        .set_payment_terms(DEFAULT_TENANT_ID, &terms)
        .await?;
    db.settings()
        .set_reminder_schedules(
            DEFAULT_TENANT_ID,
            &[ReminderSchedule {
                id: generate_id(),
                name: "Relances standard".to_string(),
                enabled: true,
                is_default: true,
                triggers: vec![
                    ReminderTrigger {
                        id: generate_id(),
                        kind: TriggerKind::DaysAfterDue,
                        offset_days: 3,
                    },
                    ReminderTrigger {
                        id: generate_id(),
                        kind: TriggerKind::DaysAfterPreviousReminder,
                        offset_days: 7,
                    },
                ],
            }],
        )
        .await?;

    // One issued invoice for Acme (2 days of consulting)
    let issued = seed_invoice(&db, &acme, &consulting, 2).await?;
    let (number, advanced) = numbering::issue(&config, today);
    let due = today
        .checked_add_days(Days::new(terms.due_days as u64))
        .unwrap_or(NaiveDate::MAX);
    db.invoices().issue(&issued, &number, today, due).await?;
    config = advanced;
    db.settings()
        .set_invoice_numbering(DEFAULT_TENANT_ID, &config)
        .await?;
    info!(number = %number, "Issued demo invoice");

    // One draft for Dupont, left unissued
    seed_invoice(&db, &dupont, &consulting, 1).await?;

    // Monthly hosting subscription for Acme
    db.subscriptions()
        .insert(&Subscription {
            id: generate_id(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            client_id: acme.id.clone(),
            title: "Hébergement mensuel".to_string(),
            description: None,
            unit_price_cents: hosting.unit_price_cents,
            quantity: 1,
            tax_rate_bps: hosting.tax_rate_bps,
            start_date: today,
            interval: RecurringInterval::Month,
            interval_count: 1,
            custom_days: None,
            next_invoice_date: today,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await?;

    info!(
        clients = db.clients().count().await?,
        products = db.products().count().await?,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Creates a draft invoice billing `quantity` units of a product.
async fn seed_invoice(
    db: &Database,
    client: &Client,
    product: &Product,
    quantity: i64,
) -> Result<String, Box<dyn std::error::Error>> {
    let now = Utc::now();
    let invoice_id = generate_id();

    let items = vec![InvoiceItem {
        id: generate_id(),
        invoice_id: invoice_id.clone(),
        product_id: Some(product.id.clone()),
        description: product.name.clone(),
        unit_price_cents: product.unit_price_cents,
        quantity,
        tax_rate_bps: product.tax_rate_bps,
        line_total_cents: product.unit_price_cents * quantity,
        created_at: now,
    }];

    let lines: Vec<DocumentLine> = items.iter().map(DocumentLine::from).collect();
    let totals = calculate_totals(&lines, Discount::None);

    let invoice = Invoice {
        id: invoice_id.clone(),
        tenant_id: DEFAULT_TENANT_ID.to_string(),
        number: None,
        status: InvoiceStatus::Draft,
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        client_address: client.address.clone(),
        issue_date: None,
        due_date: None,
        subtotal_cents: totals.subtotal_cents,
        discount_cents: totals.discount_cents,
        tax_cents: totals.tax_cents,
        total_cents: totals.total_cents,
        amount_paid_cents: 0,
        notes: None,
        payment_link: None,
        template: InvoiceTemplate::Classic,
        subscription_id: None,
        quote_id: None,
        created_at: now,
        updated_at: now,
        paid_at: None,
    };

    db.invoices().create_draft(&invoice, &items).await?;
    Ok(invoice_id)
}
