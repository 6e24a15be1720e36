//! Mortgage installment and affordability calculator.
//!
//! Both modes use the fixed-rate annuity formula. With principal `P`, term
//! `N` months and monthly rate `r = annual / 100 / 12`:
//!
//! ```text
//! payment  = P · r(1+r)^N / ((1+r)^N − 1)        (r > 0)
//! max loan = payment · ((1+r)^N − 1) / (r(1+r)^N)
//! ```
//!
//! With `r = 0` both collapse to straight division / multiplication by `N`.

use std::collections::HashMap;

use crate::config::CalculatorConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("loan term must be positive, got {0} years")]
    InvalidTerm(f64),
    #[error("income frequency divisor must be positive, got {0}")]
    InvalidFrequency(f64),
    #[error("field {0} is not a finite number")]
    NonFinite(&'static str),
}

/// Loan term in whole months. Always at least one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    months: f64,
}

impl Term {
    /// Years may be fractional; zero or negative terms are rejected.
    pub fn from_years(years: f64) -> Result<Self, CalcError> {
        if !years.is_finite() {
            return Err(CalcError::NonFinite("years"));
        }
        if years <= 0.0 {
            return Err(CalcError::InvalidTerm(years));
        }
        Ok(Self {
            months: years * 12.0,
        })
    }

    pub fn months(self) -> f64 {
        self.months
    }
}

/// Annual percentage rate to monthly fraction: 8.0 -> 0.00666...
pub fn monthly_rate(annual_percent: f64) -> f64 {
    annual_percent / 100.0 / 12.0
}

/// Monthly installment for `principal` over `months` at monthly rate `r`.
/// Zero months yields 0 rather than dividing by zero.
pub fn monthly_payment(principal: f64, months: f64, r: f64) -> f64 {
    if r == 0.0 {
        return if months > 0.0 { principal / months } else { 0.0 };
    }
    let growth = (1.0 + r).powf(months);
    principal * (r * growth) / (growth - 1.0)
}

/// Largest principal that `payment` per month can service. Inverse of
/// [`monthly_payment`].
pub fn max_loan(payment: f64, months: f64, r: f64) -> f64 {
    if r == 0.0 {
        return payment * months;
    }
    let growth = (1.0 + r).powf(months);
    payment * (growth - 1.0) / (r * growth)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstallmentInput {
    pub price: f64,
    pub down_payment_percent: f64,
    pub years: f64,
    pub annual_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstallmentResult {
    pub price: f64,
    pub down_payment: f64,
    pub loan: f64,
    pub monthly_payment: f64,
}

pub fn installment(input: &InstallmentInput) -> Result<InstallmentResult, CalcError> {
    check_finite(input.price, "price")?;
    check_finite(input.down_payment_percent, "down_payment_percent")?;
    check_finite(input.annual_rate, "annual_rate")?;
    let term = Term::from_years(input.years)?;

    let down_payment = input.price * (input.down_payment_percent / 100.0);
    let loan = input.price - down_payment;
    let payment = monthly_payment(loan, term.months(), monthly_rate(input.annual_rate));
    check_finite(payment, "result")?;
    Ok(InstallmentResult {
        price: input.price,
        down_payment,
        loan,
        monthly_payment: payment,
    })
}

/// Pay cycle of the entered income. The divisor converts it to a monthly
/// figure: `monthly = income / divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IncomeFrequency {
    Monthly,
    Annual,
    Weekly,
    /// Raw divisor from the form's hidden field.
    Custom(f64),
}

impl IncomeFrequency {
    pub fn divisor(self) -> f64 {
        match self {
            IncomeFrequency::Monthly => 1.0,
            IncomeFrequency::Annual => 12.0,
            IncomeFrequency::Weekly => 12.0 / 52.0,
            IncomeFrequency::Custom(d) => d,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IncomeFrequency::Monthly => "Monthly",
            IncomeFrequency::Annual => "Annual",
            IncomeFrequency::Weekly => "Weekly",
            IncomeFrequency::Custom(_) => "Custom",
        }
    }

    /// Recover a named frequency from a divisor where one matches.
    pub fn from_divisor(d: f64) -> Self {
        FrequencySelect::OPTIONS
            .into_iter()
            .find(|f| (f.divisor() - d).abs() < 1e-9)
            .unwrap_or(IncomeFrequency::Custom(d))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordabilityInput {
    pub income: f64,
    pub frequency: IncomeFrequency,
    pub cash_down_payment: f64,
    pub years: f64,
    pub annual_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordabilityResult {
    pub monthly_income: f64,
    pub max_monthly_payment: f64,
    pub max_loan: f64,
    pub max_price: f64,
}

pub fn affordability(
    input: &AffordabilityInput,
    ratio: f64,
) -> Result<AffordabilityResult, CalcError> {
    check_finite(input.income, "income")?;
    check_finite(input.cash_down_payment, "cash_down_payment")?;
    check_finite(input.annual_rate, "annual_rate")?;
    let divisor = input.frequency.divisor();
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(CalcError::InvalidFrequency(divisor));
    }
    let term = Term::from_years(input.years)?;

    let monthly_income = input.income / divisor;
    let max_monthly_payment = monthly_income * ratio;
    let loan = max_loan(
        max_monthly_payment,
        term.months(),
        monthly_rate(input.annual_rate),
    );
    check_finite(loan + input.cash_down_payment, "result")?;
    Ok(AffordabilityResult {
        monthly_income,
        max_monthly_payment,
        max_loan: loan,
        max_price: loan + input.cash_down_payment,
    })
}

fn check_finite(v: f64, field: &'static str) -> Result<(), CalcError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(CalcError::NonFinite(field))
    }
}

/// Round to the nearest whole unit and group thousands: `22,584 EGP`.
pub fn format_amount(value: f64, currency: &str) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if negative { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped} {currency}")
    }
}

/// Lenient numeric field read: leading float prefix like a browser's
/// `parseFloat`, `None` when nothing numeric is present.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    while end < bytes.len() {
        let b = bytes[end];
        match b {
            b'0'..=b'9' => seen_digit = true,
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if seen_exp && matches!(bytes[end - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exp => {
                // Only an exponent if digits follow.
                let rest = &bytes[end + 1..];
                let rest = rest.strip_prefix(b"-").or(rest.strip_prefix(b"+")).unwrap_or(rest);
                if !rest.first().is_some_and(u8::is_ascii_digit) {
                    break;
                }
                seen_exp = true;
            }
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalcMode {
    #[default]
    Installment,
    Affordability,
}

/// Visibility of the tab, form and result panels for the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeView {
    pub installment_tab_active: bool,
    pub affordability_tab_active: bool,
    pub installment_form_visible: bool,
    pub affordability_form_visible: bool,
    pub installment_result_visible: bool,
    pub affordability_result_visible: bool,
}

/// Form fields as entered, keyed by element id.
pub type FormFields = HashMap<String, String>;

/// Output texts keyed by element id.
pub type FormOutput = Vec<(&'static str, String)>;

/// The calculator page: tabs, the two forms, and the frequency dropdown.
#[derive(Debug)]
pub struct CalculatorForm {
    pub mode: CalcMode,
    pub frequency: FrequencySelect,
    config: CalculatorConfig,
}

impl CalculatorForm {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            mode: CalcMode::Installment,
            frequency: FrequencySelect::new(),
            config,
        }
    }

    pub fn switch_mode(&mut self, mode: CalcMode) -> ModeView {
        self.mode = mode;
        self.view()
    }

    pub fn view(&self) -> ModeView {
        let inst = self.mode == CalcMode::Installment;
        ModeView {
            installment_tab_active: inst,
            affordability_tab_active: !inst,
            installment_form_visible: inst,
            affordability_form_visible: !inst,
            installment_result_visible: inst,
            affordability_result_visible: !inst,
        }
    }

    /// Run the active mode against the form fields.
    ///
    /// Blank or unparseable amounts count as 0; blank term and divisor
    /// fields count as 1. Explicit invalid values are errors.
    pub fn calculate(&self, fields: &FormFields) -> Result<FormOutput, CalcError> {
        let fmt = |v: f64| format_amount(v, &self.config.currency);
        match self.mode {
            CalcMode::Installment => {
                let input = InstallmentInput {
                    price: field_or(fields, "calc-price", 0.0),
                    down_payment_percent: field_or(fields, "calc-dp-percent", 0.0),
                    years: field_or(fields, "calc-years", 1.0),
                    annual_rate: field_or(fields, "calc-interest", 0.0),
                };
                let res = installment(&input)?;
                log::debug!(
                    "installment: loan {} over {} years -> {}",
                    res.loan,
                    input.years,
                    res.monthly_payment
                );
                Ok(vec![
                    ("monthly-result", fmt(res.monthly_payment)),
                    ("res-total", fmt(res.price)),
                    ("res-dp", fmt(res.down_payment)),
                    ("res-loan", fmt(res.loan)),
                ])
            }
            CalcMode::Affordability => {
                let divisor = match fields.get("aff-income-freq").and_then(|v| parse_number(v)) {
                    Some(d) => d,
                    None => self.frequency.selected.divisor(),
                };
                let input = AffordabilityInput {
                    income: field_or(fields, "aff-income", 0.0),
                    frequency: IncomeFrequency::from_divisor(divisor),
                    cash_down_payment: field_or(fields, "aff-dp", 0.0),
                    years: field_or(fields, "aff-years", 1.0),
                    annual_rate: field_or(fields, "aff-interest", 0.0),
                };
                let res = affordability(&input, self.config.affordability_ratio)?;
                log::debug!(
                    "affordability: monthly income {} -> max price {}",
                    res.monthly_income,
                    res.max_price
                );
                Ok(vec![
                    ("aff-max-price", fmt(res.max_price)),
                    ("aff-monthly", fmt(res.max_monthly_payment)),
                    ("aff-loan", fmt(res.max_loan)),
                ])
            }
        }
    }
}

fn field_or(fields: &FormFields, id: &str, default: f64) -> f64 {
    fields
        .get(id)
        .and_then(|v| parse_number(v))
        .unwrap_or(default)
}

/// The custom income-frequency dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySelect {
    pub open: bool,
    pub selected: IncomeFrequency,
}

impl Default for FrequencySelect {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencySelect {
    pub const OPTIONS: [IncomeFrequency; 3] = [
        IncomeFrequency::Monthly,
        IncomeFrequency::Annual,
        IncomeFrequency::Weekly,
    ];

    pub fn new() -> Self {
        Self {
            open: false,
            selected: IncomeFrequency::Monthly,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn select(&mut self, frequency: IncomeFrequency) {
        self.selected = frequency;
        self.open = false;
    }

    /// Click anywhere outside the dropdown wrapper.
    pub fn click_outside(&mut self) {
        self.open = false;
    }

    pub fn label(&self) -> &'static str {
        self.selected.label()
    }
}
