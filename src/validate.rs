//! Field-level validation of user drafts.
//!
//! Every rule runs independently; a draft is valid iff [`validate`] returns an
//! empty map.
//!
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use crate::model::User;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern"));
static WEBSITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+\..+").expect("website pattern"));

/// Form fields that can carry an error. `Address` covers street and city together.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    Company,
    Website,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Company => "company",
            Field::Website => "website",
        };
        f.write_str(s)
    }
}

pub type FieldErrors = BTreeMap<Field, &'static str>;

pub fn validate(draft: &User) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.name.chars().count() < 3 {
        errors.insert(
            Field::Name,
            "Name is required and must be at least 3 characters.",
        );
    }
    if !EMAIL.is_match(&draft.email) {
        errors.insert(Field::Email, "Valid email is required.");
    }
    if !PHONE.is_match(&draft.phone) {
        errors.insert(Field::Phone, "Valid phone number is required.");
    }
    if draft.address.street.is_empty() || draft.address.city.is_empty() {
        errors.insert(Field::Address, "Street and city are required.");
    }
    if let Some(company) = present(&draft.company) {
        if company.chars().count() < 3 {
            errors.insert(
                Field::Company,
                "Company name must be at least 3 characters if provided.",
            );
        }
    }
    if let Some(website) = present(&draft.website) {
        if !WEBSITE.is_match(website) {
            errors.insert(Field::Website, "Valid URL is required if provided.");
        }
    }

    errors
}

// An empty optional input counts as not provided.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
