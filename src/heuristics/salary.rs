use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)(?:\s*(?:-|–|to)\s*[$₹]?\s*(\d[\d,]*(?:\.\d+)?))?").unwrap()
});
static INR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)₹|inr").unwrap());
static USD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$").unwrap());
static THOUSAND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\d\s*k\b").unwrap());
static LAKH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:^|[^a-z])(?:lakhs?|lacs?|lpa)\b").unwrap());
static CRORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:^|[^a-z])(?:crores?|cr)\b").unwrap());
static MONTH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)month").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Inr,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayPeriod {
    Month,
    Year,
}

impl PayPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayPeriod::Month => "MONTH",
            PayPeriod::Year => "YEAR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Salary {
    pub currency: Currency,
    pub min_value: u64,
    pub max_value: u64,
    pub unit: PayPeriod,
}

impl Salary {
    /// schema.org `MonetaryAmount`.
    pub fn to_schema(&self) -> Value {
        json!({
            "@type": "MonetaryAmount",
            "currency": self.currency.as_str(),
            "value": {
                "@type": "QuantitativeValue",
                "minValue": self.min_value,
                "maxValue": self.max_value,
                "unitText": self.unit.as_str(),
            }
        })
    }
}

/// Parse "₹3-5 LPA", "$50k/month", "INR 40,000 to 60,000 per month", ...
/// A currency signal is mandatory: bare numbers yield `None`.
pub fn parse_salary(value: &str) -> Option<Salary> {
    let text = value.trim();
    if text.is_empty() {
        return None;
    }

    let caps = AMOUNT_RE.captures(text)?;
    let currency = if INR_RE.is_match(text) {
        Currency::Inr
    } else if USD_RE.is_match(text) {
        Currency::Usd
    } else {
        return None;
    };

    let first = parse_number(&caps[1])?;
    let second = caps.get(2).and_then(|m| parse_number(m.as_str())).unwrap_or(first);

    // later rules win: "1.2 cr" beats "lpa", an explicit "50k" beats both
    let mut multiplier = 1.0;
    if LAKH_RE.is_match(text) {
        multiplier = 100_000.0;
    }
    if CRORE_RE.is_match(text) {
        multiplier = 10_000_000.0;
    }
    if THOUSAND_RE.is_match(text) {
        multiplier = 1_000.0;
    }

    let unit = if MONTH_RE.is_match(text) {
        PayPeriod::Month
    } else {
        PayPeriod::Year
    };

    Some(Salary {
        currency,
        min_value: (first.min(second) * multiplier).round() as u64,
        max_value: (first.max(second) * multiplier).round() as u64,
        unit,
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok().filter(|n| n.is_finite())
}
