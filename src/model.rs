use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Row identity. Handed out by the form, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: ItemId,
    pub description: String,
    pub quantity: u32, // floor 1
    pub unit_price: f64, // floor 0
}

impl LineItem {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            description: String::new(),
            quantity: 1,
            unit_price: 0.0,
        }
    }

    pub fn amount(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    Quantity,
    UnitPrice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Name,
    Address,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Check,
    InstantPay, // Bit
    BankTransfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Check,
        PaymentMethod::InstantPay,
        PaymentMethod::BankTransfer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "מזומן",
            PaymentMethod::Check => "צ'ק",
            PaymentMethod::InstantPay => "ביט",
            PaymentMethod::BankTransfer => "העברה בנקאית",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentSelection {
    pub cash: bool,
    pub check: bool,
    pub instant_pay: bool,
    pub bank_transfer: bool,
}

impl PaymentSelection {
    pub fn flag_mut(&mut self, method: PaymentMethod) -> &mut bool {
        match method {
            PaymentMethod::Cash => &mut self.cash,
            PaymentMethod::Check => &mut self.check,
            PaymentMethod::InstantPay => &mut self.instant_pay,
            PaymentMethod::BankTransfer => &mut self.bank_transfer,
        }
    }

    pub fn is_selected(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Check => self.check,
            PaymentMethod::InstantPay => self.instant_pay,
            PaymentMethod::BankTransfer => self.bank_transfer,
        }
    }

    pub fn selected_labels(&self) -> Vec<&'static str> {
        PaymentMethod::ALL
            .into_iter()
            .filter(|m| self.is_selected(*m))
            .map(PaymentMethod::label)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceMeta {
    pub invoice_number: String,
    pub invoice_date: Option<NaiveDate>,
}

/// Flattened, display-ready view of an invoice for the print template.
#[derive(Debug, Serialize)]
pub struct InvoiceContext {
    pub business: BusinessContext,
    pub invoice_number: String,
    pub date: Option<String>,
    pub customer: Customer,
    pub items: Vec<PrintedItem>,
    pub total: String,
    pub payments: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct BusinessContext {
    pub name: &'static str,
    pub instagram_handle: &'static str,
    pub phone_display: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PrintedItem {
    pub index: usize,
    pub description: String,
    pub quantity: u32,
    pub unit_price: String,
    pub amount: String,
}

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Upper bound for a unit price, keeps every total finite and printable.
pub const MAX_UNIT_PRICE: f64 = 1_000_000_000.0;

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats an amount as shekels, e.g. `₪1,234.50`.
pub fn format_ils(amount: f64) -> String {
    if !amount.is_finite() {
        return "₪—".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}₪{grouped}.{frac:02}")
}

/// Quantity coercion: leading integer of the input, floor 1.
pub fn coerce_quantity(raw: &str) -> u32 {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    if negative || end == 0 {
        return 1;
    }
    // Oversized input saturates instead of wrapping.
    digits[..end].parse::<u32>().unwrap_or(u32::MAX).max(1)
}

/// Unit price coercion: leading decimal of the input (exponent allowed),
/// floor 0, capped at [`MAX_UNIT_PRICE`].
pub fn coerce_price(raw: &str) -> f64 {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return 0.0;
    }

    // Optional exponent; a dangling "e" is not part of the number.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if v > 0.0 => v.min(MAX_UNIT_PRICE),
        _ => 0.0,
    }
}
