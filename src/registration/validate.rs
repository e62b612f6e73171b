use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

// Same shape as the backend's `@Email` check: a dot-atom local part and
// dot-separated hostname labels. Non-ASCII characters are allowed on both sides
// (internationalized addresses and domains). A top-level domain is not required.
const LOCAL_ATOM: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{80}-\x{10FFFF}-]+";
const DOMAIN_LABEL: &str = concat!(
    r"[A-Za-z0-9\x{80}-\x{10FFFF}]",
    r"(?:[A-Za-z0-9\x{80}-\x{10FFFF}-]{0,61}[A-Za-z0-9\x{80}-\x{10FFFF}])?",
);

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern =
        format!(r"^{LOCAL_ATOM}(?:\.{LOCAL_ATOM})*@{DOMAIN_LABEL}(?:\.{DOMAIN_LABEL})*$");
    Regex::new(&pattern).expect("email pattern compiles")
});

pub const FIELD_NAMES: [&str; 4] = ["name", "surname", "email", "phone"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "All fields (name, surname, email, phone) are required. Missing: {}. Please provide all information before calling this tool.",
        .missing.join(", ")
    )]
    MissingFields { missing: Vec<&'static str> },

    #[error(
        "Email must be valid: '{email}' is not a well-formed address. Ask the user for a correct email, then call prepareGuestRegistration again."
    )]
    InvalidEmail { email: String },
}

impl ValidationError {
    /// Stable label for logs. Unlike `Display`, it never carries guest data.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingFields { .. } => "missing_fields",
            ValidationError::InvalidEmail { .. } => "invalid_email",
        }
    }
}

/// Raw guest fields exactly as the agent supplied them.
///
/// A field is `None` when the key is absent, null, or not a string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuestForm {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl GuestForm {
    pub fn from_args(args: &Value) -> Self {
        let field = |key: &str| args.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            name: field("name"),
            surname: field("surname"),
            email: field("email"),
            phone: field("phone"),
        }
    }

    fn fields(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("name", self.name.as_deref()),
            ("surname", self.surname.as_deref()),
            ("email", self.email.as_deref()),
            ("phone", self.phone.as_deref()),
        ]
    }

    /// Names of fields that are missing or blank, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
            .map(|(key, _)| key)
            .collect()
    }

    /// Structural check: all four fields present and non-blank. Values are kept verbatim.
    pub fn into_draft(self) -> Result<GuestDraft, ValidationError> {
        let missing = self.missing_fields();
        match (self.name, self.surname, self.email, self.phone) {
            (Some(name), Some(surname), Some(email), Some(phone)) if missing.is_empty() => {
                Ok(GuestDraft {
                    name,
                    surname,
                    email,
                    phone,
                })
            }
            _ => Err(ValidationError::MissingFields { missing }),
        }
    }
}

/// Four non-blank fields. The email has not been checked yet.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GuestDraft {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
