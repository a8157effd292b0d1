//! The page: contact card on top, invoice form below.

use chrono::{Local, NaiveDate};
use eframe::egui;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::contact::contact_card;
use crate::form::InvoiceForm;
use crate::model::{
    format_date, format_ils, CustomerField, ItemField, ItemId, PaymentMethod, DATE_FORMAT,
};
use crate::print::Printer;
use crate::rtl::{visual, visual_lines};

const HEBREW_FONT: &str = "hebrew";

// Probed in order when no font is configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansHebrew-Regular.ttf",
    "/usr/share/fonts/truetype/culmus/DavidCLM-Medium.otf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Text buffers for the numeric cells while the user is typing.
#[derive(Debug, Default)]
struct RowDraft {
    quantity: String,
    unit_price: String,
}

pub struct InvoiceApp {
    form: InvoiceForm,
    printer: Printer,
    date_text: String,
    drafts: HashMap<ItemId, RowDraft>,
}

impl InvoiceApp {
    pub fn new(cc: &eframe::CreationContext<'_>, printer: Printer, font_path: Option<PathBuf>) -> Self {
        install_fonts(&cc.egui_ctx, font_path.as_deref());
        let form = InvoiceForm::default();
        let date_text = form.meta().invoice_date.map(format_date).unwrap_or_default();
        Self {
            form,
            printer,
            date_text,
            drafts: HashMap::new(),
        }
    }

    fn invoice_details(&mut self, ui: &mut egui::Ui) {
        ui.columns(2, |cols| {
            right_label(&mut cols[1], "מספר חשבונית");
            let mut number = self.form.meta().invoice_number.clone();
            let edit = egui::TextEdit::singleline(&mut number)
                .hint_text(visual("הכנס מספר חשבונית"))
                .horizontal_align(egui::Align::Max);
            if cols[1].add(edit).changed() {
                self.form.set_invoice_number(number);
            }

            right_label(&mut cols[0], "תאריך");
            cols[0].with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let edit = egui::TextEdit::singleline(&mut self.date_text)
                    .hint_text(visual("בחר תאריך"))
                    .desired_width(110.0);
                let response = ui.add(edit);
                if response.changed() {
                    if let Some(date) = parse_date_input(&self.date_text) {
                        self.form.set_invoice_date(date);
                    }
                }
                if response.lost_focus() {
                    self.date_text = self.form.meta().invoice_date.map(format_date).unwrap_or_default();
                }
                if ui.button(visual("היום")).clicked() {
                    let today = Local::now().date_naive();
                    self.form.set_invoice_date(Some(today));
                    self.date_text = format_date(today);
                }
                if ui.small_button("✖").clicked() {
                    self.form.set_invoice_date(None);
                    self.date_text.clear();
                }
            });
        });
    }

    fn customer_details(&mut self, ui: &mut egui::Ui) {
        section_heading(ui, "פרטי לקוח");
        let fields = [
            (CustomerField::Name, "שם לקוח", "הכנס שם לקוח"),
            (CustomerField::Phone, "טלפון", "מספר טלפון"),
            (CustomerField::Address, "כתובת", "כתובת מלאה"),
        ];
        // Rightmost column first.
        ui.columns(3, |cols| {
            for (col, (field, label, hint)) in cols.iter_mut().rev().zip(fields) {
                right_label(col, label);
                let customer = self.form.customer();
                let mut value = match field {
                    CustomerField::Name => customer.name.clone(),
                    CustomerField::Address => customer.address.clone(),
                    CustomerField::Phone => customer.phone.clone(),
                };
                let edit = if is_multiline(field) {
                    egui::TextEdit::multiline(&mut value).desired_rows(2)
                } else {
                    egui::TextEdit::singleline(&mut value)
                };
                let edit = edit.hint_text(visual(hint)).horizontal_align(egui::Align::Max);
                if col.add(edit).changed() {
                    self.form.set_customer_field(field, value);
                }
            }
        });
    }

    fn items_table(&mut self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(egui::RichText::new(visual("פריטים")).strong().size(17.0));
            ui.add_space(12.0);
            if ui.button(visual("+ הוסף פריט")).clicked() {
                self.form.add_item();
            }
        });

        let rows = self.form.items().to_vec();
        let can_remove = self.form.can_remove_item();
        self.drafts.retain(|id, _| rows.iter().any(|item| item.id == *id));

        egui::Grid::new("invoice_items")
            .striped(true)
            .num_columns(6)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                // Columns are laid out mirrored so the index ends up on the right.
                for header in ["פעולות", "סכום", "מחיר יחידה", "כמות", "תיאור", "#"] {
                    ui.label(egui::RichText::new(visual(header)).strong());
                }
                ui.end_row();

                for (index, item) in rows.iter().enumerate() {
                    let draft = self.drafts.entry(item.id).or_insert_with(|| RowDraft {
                        quantity: item.quantity.to_string(),
                        unit_price: item.unit_price.to_string(),
                    });

                    let remove = ui.add_enabled(can_remove, egui::Button::new("🗑"));
                    if remove.clicked() {
                        self.form.remove_item(item.id);
                    }

                    ui.label(egui::RichText::new(format_ils(item.amount())).strong());

                    let price = ui.add(
                        egui::TextEdit::singleline(&mut draft.unit_price)
                            .desired_width(80.0)
                            .horizontal_align(egui::Align::Center),
                    );
                    if price.changed() {
                        self.form.update_item(item.id, ItemField::UnitPrice, &draft.unit_price);
                    }

                    let quantity = ui.add(
                        egui::TextEdit::singleline(&mut draft.quantity)
                            .desired_width(60.0)
                            .horizontal_align(egui::Align::Center),
                    );
                    if quantity.changed() {
                        self.form.update_item(item.id, ItemField::Quantity, &draft.quantity);
                    }

                    // Show the coerced value once the user leaves the cell.
                    if let Some(stored) = self.form.items().iter().find(|i| i.id == item.id) {
                        if price.lost_focus() {
                            draft.unit_price = stored.unit_price.to_string();
                        }
                        if quantity.lost_focus() {
                            draft.quantity = stored.quantity.to_string();
                        }
                    }

                    let mut description = item.description.clone();
                    let edit = egui::TextEdit::multiline(&mut description)
                        .hint_text(visual("תיאור הפריט"))
                        .desired_rows(2)
                        .desired_width(260.0)
                        .horizontal_align(egui::Align::Max);
                    if ui.add(edit).changed() {
                        self.form.update_item(item.id, ItemField::Description, &description);
                    }

                    ui.label(format!("{}", index + 1));
                    ui.end_row();
                }
            });

        ui.add_space(8.0);
        ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
            let total = format!("סה\"כ: {}", format_ils(self.form.total()));
            ui.label(egui::RichText::new(visual(&total)).strong().size(20.0));
        });
    }

    fn payment_methods(&mut self, ui: &mut egui::Ui) {
        section_heading(ui, "אמצעי תשלום");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            for method in PaymentMethod::ALL {
                let mut checked = self.form.payment().is_selected(method);
                if ui.checkbox(&mut checked, visual(method.label())).changed() {
                    self.form.toggle_payment(method);
                }
                ui.add_space(16.0);
            }
        });
    }

    fn actions(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                if ui.button(visual("🖨 הדפס חשבונית")).clicked() {
                    self.printer.print(&self.form);
                }
                // Same pathway as print; the host dialog offers "save as PDF".
                if ui.button(visual("⬇ שמור כ-PDF")).clicked() {
                    info!("PDF download requested, routing to print");
                    self.printer.print(&self.form);
                }
            });
        });
    }
}

impl eframe::App for InvoiceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                contact_card(ui);
                ui.add_space(12.0);

                ui.vertical_centered(|ui| {
                    ui.heading(visual("מחולל חשבוניות"));
                });
                ui.add_space(8.0);

                self.invoice_details(ui);
                ui.add_space(10.0);
                self.customer_details(ui);
                ui.add_space(10.0);
                self.items_table(ui);
                ui.add_space(10.0);
                self.payment_methods(ui);
                ui.separator();
                self.actions(ui);
            });
        });
    }
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
        ui.label(egui::RichText::new(visual(text)).strong().size(17.0));
    });
}

fn right_label(ui: &mut egui::Ui, text: &str) {
    ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
        ui.label(visual_lines(text));
    });
}

/// `Some(None)` clears the date, `None` means keep typing.
fn parse_date_input(text: &str) -> Option<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Some(None);
    }
    // `%Y` takes any number of digits, so wait for the full year.
    let year = text.rsplit('/').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok().map(Some)
}

/// Only the address takes more than one line.
fn is_multiline(field: CustomerField) -> bool {
    matches!(field, CustomerField::Address)
}

fn install_fonts(ctx: &egui::Context, configured: Option<&Path>) {
    let candidates = configured
        .map(|p| vec![p.to_path_buf()])
        .unwrap_or_else(|| FONT_CANDIDATES.iter().map(PathBuf::from).collect());

    let Some((path, bytes)) = candidates
        .into_iter()
        .find_map(|p| fs::read(&p).ok().map(|bytes| (p, bytes)))
    else {
        warn!("no Hebrew-capable font found, labels may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        HEBREW_FONT.to_owned(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        // Fallback after the defaults so Latin text keeps egui's look.
        fonts
            .families
            .entry(family)
            .or_default()
            .push(HEBREW_FONT.to_owned());
    }
    ctx.set_fonts(fonts);
    info!(path = %path.display(), "loaded Hebrew font");
}
