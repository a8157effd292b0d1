//! Invoice form state.
//!
//! Every operation here is infallible: free text is stored as typed and
//! numeric input is coerced to a safe floor. The total is never cached.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::model::{
    coerce_price, coerce_quantity, Customer, CustomerField, InvoiceMeta, ItemField, ItemId,
    LineItem, PaymentMethod, PaymentSelection,
};

#[derive(Debug, Clone)]
pub struct InvoiceForm {
    meta: InvoiceMeta,
    customer: Customer,
    items: Vec<LineItem>,
    payment: PaymentSelection,
    next_id: u64,
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new(Some(Local::now().date_naive()))
    }
}

impl InvoiceForm {
    /// Fresh form with a single default row.
    pub fn new(invoice_date: Option<NaiveDate>) -> Self {
        let mut form = Self {
            meta: InvoiceMeta {
                invoice_number: String::new(),
                invoice_date,
            },
            customer: Customer::default(),
            items: Vec::new(),
            payment: PaymentSelection::default(),
            next_id: 1,
        };
        form.add_item();
        form
    }

    pub fn meta(&self) -> &InvoiceMeta {
        &self.meta
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn payment(&self) -> &PaymentSelection {
        &self.payment
    }

    pub fn set_invoice_number(&mut self, text: impl Into<String>) {
        self.meta.invoice_number = text.into();
    }

    pub fn set_invoice_date(&mut self, date: Option<NaiveDate>) {
        debug!(?date, "invoice date changed");
        self.meta.invoice_date = date;
    }

    pub fn set_customer_field(&mut self, field: CustomerField, text: impl Into<String>) {
        let slot = match field {
            CustomerField::Name => &mut self.customer.name,
            CustomerField::Address => &mut self.customer.address,
            CustomerField::Phone => &mut self.customer.phone,
        };
        *slot = text.into();
    }

    pub fn add_item(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(LineItem::new(id));
        debug!(%id, rows = self.items.len(), "item added");
        id
    }

    /// Whether the remove control should be offered at all.
    pub fn can_remove_item(&self) -> bool {
        self.items.len() > 1
    }

    /// Removes the row with `id`. The last remaining row is kept.
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        if !self.can_remove_item() {
            debug!(%id, "refusing to remove the last item");
            return false;
        }
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() < before;
        if removed {
            debug!(%id, rows = self.items.len(), "item removed");
        }
        removed
    }

    pub fn update_item(&mut self, id: ItemId, field: ItemField, raw: &str) {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return;
        };
        match field {
            ItemField::Description => item.description = raw.to_string(),
            ItemField::Quantity => item.quantity = coerce_quantity(raw),
            ItemField::UnitPrice => item.unit_price = coerce_price(raw),
        }
    }

    pub fn toggle_payment(&mut self, method: PaymentMethod) {
        let flag = self.payment.flag_mut(method);
        *flag = !*flag;
        debug!(?method, selected = *flag, "payment toggled");
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fixed_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn expected_total(form: &InvoiceForm) -> f64 {
        form.items()
            .iter()
            .map(|i| f64::from(i.quantity) * i.unit_price)
            .sum()
    }

    #[test]
    fn starts_with_one_default_item() {
        let form = InvoiceForm::new(Some(fixed_date()));
        assert_eq!(form.items().len(), 1);
        let item = &form.items()[0];
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, 0.0);
        assert!(item.description.is_empty());
        assert_eq!(form.total(), 0.0);
        assert_eq!(form.meta().invoice_date, Some(fixed_date()));
        assert_eq!(*form.payment(), PaymentSelection::default());
    }

    #[test]
    fn default_form_is_dated_today() {
        let form = InvoiceForm::default();
        assert_eq!(form.meta().invoice_date, Some(Local::now().date_naive()));
    }

    #[test]
    fn add_and_remove_keep_count_and_unique_ids() {
        let mut form = InvoiceForm::new(None);
        let mut removed = HashSet::new();
        let mut adds = 0;
        let mut successful_removes = 0;

        for round in 0..20 {
            form.add_item();
            adds += 1;
            if round % 3 == 0 {
                let victim = form.items()[round % form.items().len()].id;
                if form.remove_item(victim) {
                    successful_removes += 1;
                    removed.insert(victim);
                }
            }
        }
        // Unknown id is a no-op.
        assert!(!form.remove_item(ItemId(9999)));

        assert_eq!(form.items().len(), 1 + adds - successful_removes);
        let ids: HashSet<_> = form.items().iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), form.items().len());
        assert!(ids.is_disjoint(&removed));

        let fresh = form.add_item();
        assert!(!removed.contains(&fresh));
    }

    #[test]
    fn last_item_cannot_be_removed() {
        let mut form = InvoiceForm::new(None);
        let only = form.items()[0].id;
        assert!(!form.can_remove_item());
        assert!(!form.remove_item(only));
        assert_eq!(form.items().len(), 1);

        let second = form.add_item();
        assert!(form.can_remove_item());
        assert!(form.remove_item(only));
        assert!(!form.remove_item(second));
        assert_eq!(form.items().len(), 1);
    }

    #[test]
    fn bakery_order_scenario() {
        let mut form = InvoiceForm::new(Some(fixed_date()));
        let first = form.items()[0].id;
        assert_eq!(form.total(), 0.0);

        let cake = form.add_item();
        form.update_item(cake, ItemField::Description, "עוגת גבינה");
        form.update_item(cake, ItemField::Quantity, "3");
        form.update_item(cake, ItemField::UnitPrice, "12.5");
        assert_eq!(form.total(), 37.5);

        assert!(form.remove_item(first));
        assert_eq!(form.total(), 37.5);

        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        form.set_invoice_number("1002");
        form.set_invoice_date(Some(date));
        assert_eq!(form.meta().invoice_number, "1002");
        assert_eq!(form.meta().invoice_date, Some(date));
        assert_eq!(form.items()[0].description, "עוגת גבינה");
    }

    #[test]
    fn numeric_fields_are_coerced_never_rejected() {
        let mut form = InvoiceForm::new(None);
        let id = form.items()[0].id;

        form.update_item(id, ItemField::Quantity, "abc");
        assert_eq!(form.items()[0].quantity, 1);
        form.update_item(id, ItemField::Quantity, "0");
        assert_eq!(form.items()[0].quantity, 1);
        form.update_item(id, ItemField::Quantity, "-2");
        assert_eq!(form.items()[0].quantity, 1);

        form.update_item(id, ItemField::UnitPrice, "-1");
        assert_eq!(form.items()[0].unit_price, 0.0);
        form.update_item(id, ItemField::UnitPrice, "zzz");
        assert_eq!(form.items()[0].unit_price, 0.0);
    }

    #[test]
    fn update_with_unknown_id_changes_nothing() {
        let mut form = InvoiceForm::new(None);
        let before = form.items().to_vec();
        form.update_item(ItemId(42), ItemField::Quantity, "7");
        form.update_item(ItemId(42), ItemField::Description, "x");
        assert_eq!(form.items(), before.as_slice());
    }

    #[test]
    fn total_tracks_every_mutation() {
        let mut form = InvoiceForm::new(None);
        let a = form.items()[0].id;
        let b = form.add_item();
        let c = form.add_item();

        let steps: [(ItemId, ItemField, &str); 6] = [
            (a, ItemField::UnitPrice, "4.2"),
            (b, ItemField::Quantity, "5"),
            (b, ItemField::UnitPrice, "3"),
            (c, ItemField::UnitPrice, "100"),
            (a, ItemField::Quantity, "2"),
            (c, ItemField::Quantity, "nope"),
        ];
        for (id, field, raw) in steps {
            form.update_item(id, field, raw);
            assert_eq!(form.total(), expected_total(&form));
        }
        form.remove_item(b);
        assert_eq!(form.total(), expected_total(&form));
        assert!((form.total() - 108.4).abs() < 1e-9);
    }

    #[test]
    fn payment_flags_toggle_independently() {
        let mut form = InvoiceForm::new(None);
        form.toggle_payment(PaymentMethod::Check);
        assert!(form.payment().check);
        assert!(!form.payment().cash);
        assert!(!form.payment().instant_pay);
        assert!(!form.payment().bank_transfer);

        form.toggle_payment(PaymentMethod::InstantPay);
        form.toggle_payment(PaymentMethod::Check);
        assert!(!form.payment().check);
        assert!(form.payment().instant_pay);
    }

    #[test]
    fn customer_fields_are_stored_verbatim() {
        let mut form = InvoiceForm::new(None);
        form.set_customer_field(CustomerField::Name, "  דנה  ");
        form.set_customer_field(CustomerField::Phone, "not a phone");
        form.set_customer_field(CustomerField::Address, "רחוב הרצל 1\nתל אביב");
        assert_eq!(form.customer().name, "  דנה  ");
        assert_eq!(form.customer().phone, "not a phone");
        assert_eq!(form.customer().address, "רחוב הרצל 1\nתל אביב");
    }
}
