//! Hands the current invoice to the host's print flow.
//!
//! The invoice is rendered to a standalone RTL HTML page that calls
//! `window.print()` on load, written to the output directory and opened with
//! the platform's default handler. Whatever the host does afterwards
//! (print, save as PDF, cancel) is not observed.

use slug::slugify;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tera::{Context, Tera};
use tracing::{error, info};

use crate::contact::business_context;
use crate::error::{Error, Result};
use crate::form::InvoiceForm;
use crate::model::{format_date, format_ils, InvoiceContext, PrintedItem};
use crate::settings::AppSettings;

// Embed template at compile time to ensure availability
const INVOICE_TEMPLATE: &str = include_str!("../templates/invoice.html.tera");
// The .html suffix turns on tera's autoescaping.
const TEMPLATE_NAME: &str = "invoice.html";

pub struct Printer {
    tera: Tera,
    output_dir: PathBuf,
    open_after_render: bool,
}

impl Printer {
    pub fn new(output_dir: PathBuf, open_after_render: bool) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, INVOICE_TEMPLATE)?;
        Ok(Self {
            tera,
            output_dir,
            open_after_render,
        })
    }

    pub fn from_settings(settings: &AppSettings) -> Result<Self> {
        Self::new(settings.output_dir(), settings.open_after_render)
    }

    /// Print entry point for the form. Never fails from the caller's side.
    pub fn print(&self, form: &InvoiceForm) {
        match self.write(form) {
            Ok(path) => {
                info!(path = %path.display(), "invoice rendered for printing");
                if self.open_after_render {
                    if let Err(e) = open_in_host(&path) {
                        error!("failed to hand invoice to host: {}", e);
                    }
                }
            }
            Err(e) => error!("failed to render invoice: {}", e),
        }
    }

    pub fn render(&self, form: &InvoiceForm) -> Result<String> {
        let context = Context::from_serialize(invoice_context(form))?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }

    pub fn write(&self, form: &InvoiceForm) -> Result<PathBuf> {
        let rendered = self.render(form)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name(&form.meta().invoice_number));
        fs::write(&path, rendered)?;
        Ok(path)
    }
}

pub fn invoice_context(form: &InvoiceForm) -> InvoiceContext {
    let items = form
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| PrintedItem {
            index: i + 1,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: format_ils(item.unit_price),
            amount: format_ils(item.amount()),
        })
        .collect();

    InvoiceContext {
        business: business_context(),
        invoice_number: form.meta().invoice_number.clone(),
        date: form.meta().invoice_date.map(format_date),
        customer: form.customer().clone(),
        items,
        total: format_ils(form.total()),
        payments: form.payment().selected_labels(),
    }
}

pub fn file_name(invoice_number: &str) -> String {
    let slug = slugify(invoice_number);
    if slug.is_empty() {
        "invoice-draft.html".to_string()
    } else {
        format!("invoice-{}.html", slug)
    }
}

fn open_in_host(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let spawned = Command::new("open").arg(path).spawn();

    #[cfg(target_os = "windows")]
    let spawned = Command::new("cmd").arg("/C").arg("start").arg("").arg(path).spawn();

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let spawned = Command::new("xdg-open").arg(path).spawn();

    spawned.map(|_| ()).map_err(|e| Error::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerField, ItemField, PaymentMethod};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_form() -> InvoiceForm {
        let mut form = InvoiceForm::new(NaiveDate::from_ymd_opt(2024, 12, 5));
        form.set_invoice_number("1002");
        form.set_customer_field(CustomerField::Name, "דנה כהן");
        form.set_customer_field(CustomerField::Phone, "052-1234567");
        let first = form.items()[0].id;
        form.update_item(first, ItemField::Description, "עוגת שוקולד");
        form.update_item(first, ItemField::UnitPrice, "120");
        let second = form.add_item();
        form.update_item(second, ItemField::Description, "מאפינס");
        form.update_item(second, ItemField::Quantity, "12");
        form.update_item(second, ItemField::UnitPrice, "8.5");
        form.toggle_payment(PaymentMethod::InstantPay);
        form
    }

    #[test]
    fn context_numbers_rows_and_formats_money() {
        let ctx = invoice_context(&sample_form());
        assert_eq!(ctx.items.len(), 2);
        assert_eq!(ctx.items[0].index, 1);
        assert_eq!(ctx.items[1].index, 2);
        assert_eq!(ctx.items[1].amount, "₪102.00");
        assert_eq!(ctx.total, "₪222.00");
        assert_eq!(ctx.date.as_deref(), Some("05/12/2024"));
        assert_eq!(ctx.payments, vec!["ביט"]);
    }

    #[test]
    fn rendered_page_carries_the_invoice() {
        let tmp = TempDir::new().unwrap();
        let printer = Printer::new(tmp.path().to_path_buf(), false).unwrap();
        let html = printer.render(&sample_form()).unwrap();

        assert!(html.contains(r#"dir="rtl""#));
        assert!(html.contains("window.print()"));
        assert!(html.contains("1002"));
        assert!(html.contains("דנה כהן"));
        assert!(html.contains("עוגת שוקולד"));
        assert!(html.contains("מאפינס"));
        assert!(html.contains("₪222.00"));
        assert!(html.contains("05/12/2024"));
        assert!(html.contains("<li>ביט</li>"));
        assert!(!html.contains("<li>מזומן</li>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let tmp = TempDir::new().unwrap();
        let printer = Printer::new(tmp.path().to_path_buf(), false).unwrap();
        let mut form = InvoiceForm::new(None);
        form.set_customer_field(CustomerField::Name, "<script>alert(1)</script>");
        let html = printer.render(&form).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn no_payment_section_when_nothing_selected() {
        let tmp = TempDir::new().unwrap();
        let printer = Printer::new(tmp.path().to_path_buf(), false).unwrap();
        let html = printer.render(&InvoiceForm::new(None)).unwrap();
        assert!(!html.contains("אמצעי תשלום"));
    }

    #[test]
    fn write_creates_directory_and_names_file_after_number() {
        let tmp = TempDir::new().unwrap();
        // Not created yet, the printer has to make it.
        let dir = tmp.path().join("print");
        let printer = Printer::new(dir.clone(), false).unwrap();

        let path = printer.write(&sample_form()).unwrap();
        assert_eq!(path, dir.join("invoice-1002.html"));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("₪222.00"));

        // Printing without opening just leaves the file behind.
        printer.print(&InvoiceForm::new(None));
        assert!(dir.join("invoice-draft.html").exists());
    }

    #[test]
    fn file_names_are_slugged() {
        assert_eq!(file_name(""), "invoice-draft.html");
        assert_eq!(file_name("  "), "invoice-draft.html");
        assert_eq!(file_name("2024/17"), "invoice-2024-17.html");
    }
}
