//! Валидация и нормализация входной заявки из чат-бота.
//! Проверки идут в фиксированном порядке и останавливаются на первой ошибке.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[1-9][0-9]{0,15}$").unwrap();
}

/// Payload that passed every field check. Values are still raw as received;
/// [`sanitize`] produces the canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub session_id: String,
}

/// Canonical lead record, the only shape ever handed to persistence.
/// An absent phone serializes as a missing field, not as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizedLead {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    pub session_id: String,
}

fn string_field<'a>(record: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Единственный путь от сырого JSON к `ValidLead`. Никогда не паникует:
/// неверный тип поля считается ошибкой валидации, а не сбоем.
pub fn validate(raw: &Value) -> Result<ValidLead, &'static str> {
    let record = raw
        .as_object()
        .ok_or("Request payload must be a JSON object")?;

    let name = string_field(record, "name").ok_or("Name is required")?;
    if name.trim().len() < 2 {
        return Err("Name must be at least 2 characters");
    }
    if name.len() > 100 {
        return Err("Name must be at most 100 characters");
    }

    let email = string_field(record, "email").ok_or("Email is required")?;
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Email address is not valid");
    }

    // JSON null приравнивается к отсутствию телефона
    let phone = match record.get("phone") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let raw_phone = value.as_str().ok_or("Phone number is not valid")?;
            if !PHONE_RE.is_match(&strip_phone_separators(raw_phone)) {
                return Err("Phone number is not valid");
            }
            Some(raw_phone.to_string())
        }
    };

    let message = string_field(record, "message").ok_or("Message is required")?;
    if message.trim().len() < 10 {
        return Err("Message must be at least 10 characters");
    }
    if message.len() > 1000 {
        return Err("Message must be at most 1000 characters");
    }

    let session_id = string_field(record, "sessionId").ok_or("Session id is required")?;
    if session_id.trim().is_empty() {
        return Err("Session id is required");
    }

    Ok(ValidLead {
        name: name.to_string(),
        email: email.to_string(),
        phone,
        message: message.to_string(),
        session_id: session_id.to_string(),
    })
}

/// Убирает разделители, обычные для телефонных номеров
fn strip_phone_separators(phone: &str) -> String {
    phone
        .trim()
        .chars()
        .filter(|c| !matches!(*c, ' ' | '-' | '(' | ')'))
        .collect()
}

pub fn sanitize(lead: ValidLead) -> SanitizedLead {
    SanitizedLead {
        name: lead.name.trim().to_string(),
        email: lead.email.trim().to_lowercase(),
        phone: lead.phone.map(|p| p.trim().to_string()),
        message: lead.message.trim().to_string(),
        session_id: lead.session_id.trim().to_string(),
    }
}
