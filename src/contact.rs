//! Static business contact card shown above the form.

use eframe::egui;

use crate::model::BusinessContext;
use crate::rtl::visual;

pub const BUSINESS_NAME: &str = "חי ששונקר";
pub const BRAND: &str = "Pastry Magic";
pub const INSTAGRAM_HANDLE: &str = "@haisasonker";
pub const INSTAGRAM_URL: &str = "https://www.instagram.com/haisasonker";
pub const PHONE_DISPLAY: &str = "050-6897798";
pub const PHONE_URL: &str = "tel:0506897798";
pub const WHATSAPP_URL: &str = "https://wa.me/972506897798";

pub fn business_context() -> BusinessContext {
    BusinessContext {
        name: BUSINESS_NAME,
        instagram_handle: INSTAGRAM_HANDLE,
        phone_display: PHONE_DISPLAY,
    }
}

pub fn contact_card(ui: &mut egui::Ui) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                ui.heading(visual(BUSINESS_NAME));
                ui.label(egui::RichText::new(BRAND).italics());
                ui.add_space(6.0);

                // Links are opened by the host, nothing comes back.
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.hyperlink_to("📞", PHONE_URL).on_hover_text("Call");
                        ui.hyperlink_to(PHONE_DISPLAY, WHATSAPP_URL);
                    });
                });
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.hyperlink_to(format!("📷 {INSTAGRAM_HANDLE}"), INSTAGRAM_URL)
                            .on_hover_text("Instagram");
                    });
                });
            });
        });
}
