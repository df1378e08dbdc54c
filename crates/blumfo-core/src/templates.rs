//! # Invoice Templates
//!
//! Fills invoice data into one of the built-in HTML templates for
//! preview and printing. The PDF conversion itself happens outside this
//! crate (headless-browser render of the returned HTML).
//!
//! Three templates ship today: `classic` (bordered table), `modern`
//! (accent bar, no borders), `minimal` (plain text). They share the same
//! data flow and differ only in the surrounding styles, so the line rows
//! and totals block are built once and injected into each shell.
//!
//! All user-entered strings pass through [`escape_html`]; template output
//! is safe to hand to a renderer regardless of what a client is named.

use crate::money::Money;
use crate::types::{Company, Invoice, InvoiceItem, InvoiceTemplate};

// =============================================================================
// Public API
// =============================================================================

/// Renders a full standalone HTML document for the invoice.
pub fn render_invoice(
    invoice: &Invoice,
    items: &[InvoiceItem],
    company: &Company,
    template: InvoiceTemplate,
) -> String {
    match template {
        InvoiceTemplate::Classic => render_shell(invoice, items, company, CLASSIC_CSS),
        InvoiceTemplate::Modern => render_shell(invoice, items, company, MODERN_CSS),
        InvoiceTemplate::Minimal => render_shell(invoice, items, company, MINIMAL_CSS),
    }
}

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Shared building blocks
// =============================================================================

fn render_shell(
    invoice: &Invoice,
    items: &[InvoiceItem],
    company: &Company,
    css: &str,
) -> String {
    let number = invoice.number.as_deref().unwrap_or("Brouillon");
    let issue = invoice
        .issue_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();
    let due = invoice
        .due_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();

    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>");
    html.push_str(css);
    html.push_str("</style></head><body><div class=\"invoice\">");

    // Header: issuing company on the left, document meta on the right
    html.push_str("<header><div class=\"company\">");
    html.push_str(&format!("<h2>{}</h2>", escape_html(&company.name)));
    for field in [&company.address, &company.email, &company.phone] {
        if let Some(value) = field {
            html.push_str(&format!("<p>{}</p>", escape_html(value)));
        }
    }
    if let Some(reg) = &company.registration_number {
        html.push_str(&format!("<p>SIRET {}</p>", escape_html(reg)));
    }
    if let Some(vat) = &company.vat_number {
        html.push_str(&format!("<p>TVA {}</p>", escape_html(vat)));
    }
    html.push_str("</div><div class=\"meta\">");
    html.push_str(&format!("<h1>Facture {}</h1>", escape_html(number)));
    if !issue.is_empty() {
        html.push_str(&format!("<p>Date : {issue}</p>"));
    }
    if !due.is_empty() {
        html.push_str(&format!("<p>Échéance : {due}</p>"));
    }
    html.push_str("</div></header>");

    // Billed-to block (snapshot fields, not the live client record)
    html.push_str("<section class=\"client\"><h3>Facturé à</h3>");
    html.push_str(&format!("<p>{}</p>", escape_html(&invoice.client_name)));
    if let Some(address) = &invoice.client_address {
        html.push_str(&format!("<p>{}</p>", escape_html(address)));
    }
    html.push_str("</section>");

    html.push_str(&render_rows(items));
    html.push_str(&render_totals(invoice));

    if let Some(notes) = &invoice.notes {
        html.push_str(&format!(
            "<footer class=\"notes\"><p>{}</p></footer>",
            escape_html(notes)
        ));
    }

    html.push_str("</div></body></html>");
    html
}

fn render_rows(items: &[InvoiceItem]) -> String {
    let mut html = String::from(
        "<table class=\"lines\"><thead><tr>\
         <th>Description</th><th>Qté</th><th>PU HT</th><th>TVA</th><th>Total HT</th>\
         </tr></thead><tbody>",
    );
    for item in items {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{} €</td><td>{:.1}%</td><td>{} €</td></tr>",
            escape_html(&item.description),
            item.quantity,
            item.unit_price(),
            item.tax_rate_bps as f64 / 100.0,
            item.line_total(),
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn render_totals(invoice: &Invoice) -> String {
    let mut html = String::from("<table class=\"totals\">");
    html.push_str(&format!(
        "<tr><td>Total HT</td><td>{} €</td></tr>",
        Money::from_cents(invoice.subtotal_cents)
    ));
    if invoice.discount_cents > 0 {
        html.push_str(&format!(
            "<tr><td>Remise</td><td>-{} €</td></tr>",
            Money::from_cents(invoice.discount_cents)
        ));
    }
    html.push_str(&format!(
        "<tr><td>TVA</td><td>{} €</td></tr>",
        Money::from_cents(invoice.tax_cents)
    ));
    html.push_str(&format!(
        "<tr class=\"grand\"><td>Total TTC</td><td>{} €</td></tr>",
        invoice.total()
    ));
    html.push_str("</table>");
    html
}

// =============================================================================
// Template styles
// =============================================================================

const CLASSIC_CSS: &str = "\
body{font-family:Georgia,serif;color:#222;margin:40px}\
header{display:flex;justify-content:space-between;margin-bottom:32px}\
.lines{width:100%;border-collapse:collapse;margin:24px 0}\
.lines th,.lines td{border:1px solid #444;padding:6px 10px;text-align:left}\
.totals{margin-left:auto}.totals td{padding:4px 10px}\
.grand{font-weight:bold;border-top:2px solid #444}";

const MODERN_CSS: &str = "\
body{font-family:Helvetica,Arial,sans-serif;color:#1a1a2e;margin:40px}\
header{display:flex;justify-content:space-between;border-left:6px solid #4361ee;\
padding-left:16px;margin-bottom:32px}\
h1{color:#4361ee}\
.lines{width:100%;border-collapse:collapse;margin:24px 0}\
.lines th{background:#4361ee;color:#fff;padding:8px 10px;text-align:left}\
.lines td{padding:8px 10px;border-bottom:1px solid #e0e0e0}\
.totals{margin-left:auto}.totals td{padding:4px 10px}\
.grand{font-weight:bold;color:#4361ee}";

const MINIMAL_CSS: &str = "\
body{font-family:Helvetica,Arial,sans-serif;color:#000;margin:48px;font-size:13px}\
header{display:flex;justify-content:space-between;margin-bottom:40px}\
h1,h2,h3{font-weight:normal}\
.lines{width:100%;border-collapse:collapse;margin:24px 0}\
.lines th,.lines td{padding:6px 0;text-align:left;border-bottom:1px solid #000}\
.totals{margin-left:auto}.totals td{padding:4px 0 4px 24px}\
.grand{font-weight:bold}";

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceStatus;
    use chrono::{NaiveDate, Utc};

    fn company() -> Company {
        Company {
            id: crate::DEFAULT_TENANT_ID.into(),
            name: "Atelier Dupont".into(),
            address: Some("12 rue de la Paix, 75002 Paris".into()),
            email: Some("contact@atelier-dupont.fr".into()),
            phone: None,
            registration_number: Some("123 456 789 00012".into()),
            vat_number: Some("FR12345678901".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn invoice() -> Invoice {
        Invoice {
            id: "i1".into(),
            tenant_id: crate::DEFAULT_TENANT_ID.into(),
            number: Some("INV-007".into()),
            status: InvoiceStatus::Sent,
            client_id: "c1".into(),
            client_name: "Société <Test> & Fils".into(),
            client_address: Some("8 avenue Foch, Lyon".into()),
            issue_date: NaiveDate::from_ymd_opt(2024, 5, 2),
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            subtotal_cents: 20000,
            discount_cents: 0,
            tax_cents: 4000,
            total_cents: 24000,
            amount_paid_cents: 0,
            notes: Some("Paiement à 30 jours.".into()),
            payment_link: None,
            template: InvoiceTemplate::Classic,
            subscription_id: None,
            quote_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            paid_at: None,
        }
    }

    fn items() -> Vec<InvoiceItem> {
        vec![InvoiceItem {
            id: "li1".into(),
            invoice_id: "i1".into(),
            product_id: None,
            description: "Développement".into(),
            unit_price_cents: 10000,
            quantity: 2,
            tax_rate_bps: 2000,
            line_total_cents: 20000,
            created_at: Utc::now(),
        }]
    }

    #[test]
    fn test_render_fills_placeholders() {
        let html = render_invoice(&invoice(), &items(), &company(), InvoiceTemplate::Classic);
        assert!(html.contains("Facture INV-007"));
        assert!(html.contains("Atelier Dupont"));
        assert!(html.contains("02/05/2024"));
        assert!(html.contains("01/06/2024"));
        assert!(html.contains("Développement"));
        assert!(html.contains("240.00 €"));
    }

    #[test]
    fn test_user_strings_are_escaped() {
        let html = render_invoice(&invoice(), &items(), &company(), InvoiceTemplate::Modern);
        assert!(html.contains("Société &lt;Test&gt; &amp; Fils"));
        assert!(!html.contains("<Test>"));
    }

    #[test]
    fn test_templates_differ() {
        let inv = invoice();
        let its = items();
        let co = company();
        let classic = render_invoice(&inv, &its, &co, InvoiceTemplate::Classic);
        let modern = render_invoice(&inv, &its, &co, InvoiceTemplate::Modern);
        let minimal = render_invoice(&inv, &its, &co, InvoiceTemplate::Minimal);
        assert_ne!(classic, modern);
        assert_ne!(modern, minimal);
        // Same data shows up in all three
        for html in [&classic, &modern, &minimal] {
            assert!(html.contains("INV-007"));
        }
    }

    #[test]
    fn test_draft_renders_without_number() {
        let mut inv = invoice();
        inv.number = None;
        inv.issue_date = None;
        inv.due_date = None;
        let html = render_invoice(&inv, &items(), &company(), InvoiceTemplate::Minimal);
        assert!(html.contains("Brouillon"));
        assert!(!html.contains("Date :"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
