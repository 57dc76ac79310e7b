//! Form validation rules.
//!
//! Every incoming payload passes through one of these functions before it
//! reaches a repository. Each function returns the first rule that fails as a
//! [`DomainError::Validation`] carrying the message shown to the customer.

use crate::domain::category::CategoryForm;
use crate::domain::error::DomainError;
use crate::domain::menu::{MenuForm, ValidMenu};
use crate::domain::order::CheckoutRequest;
use crate::domain::price::parse_price;
use crate::domain::user::{AuthProfileUpdate, ContactUpdate, LoginRequest, RegisterRequest};
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

pub const NAME_MAX_LEN: usize = 20;
pub const CONTACT_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 64;
pub const MENU_MAX_IMAGES: usize = 3;

fn bounded_text(
    value: &str,
    max: usize,
    required_msg: &str,
    field: &str,
) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(required_msg));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must contain at most {max} character(s)"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_category(form: &CategoryForm) -> Result<String, DomainError> {
    bounded_text(
        &form.category_name,
        NAME_MAX_LEN,
        "Category is required",
        "Category",
    )
}

pub fn validate_menu(form: &MenuForm) -> Result<ValidMenu, DomainError> {
    let name = bounded_text(
        &form.menu_name,
        NAME_MAX_LEN,
        "Menu name is required",
        "Menu name",
    )?;
    let description = bounded_text(
        &form.menu_description,
        NAME_MAX_LEN,
        "Menu description is required",
        "Menu description",
    )?;

    if form.menu_image.len() > MENU_MAX_IMAGES {
        return Err(DomainError::validation(
            "Maximum 3 piece of image can be set",
        ));
    }
    let mut image_urls = Vec::with_capacity(form.menu_image.len());
    for image in &form.menu_image {
        let url = validate_url(&image.url)?;
        if !image_urls.contains(&url) {
            image_urls.push(url);
        }
    }

    let mut category_ids: Vec<String> = Vec::new();
    for id in form.menu_category.iter().map(|c| c.trim()) {
        if !id.is_empty() && !category_ids.iter().any(|existing| existing == id) {
            category_ids.push(id.to_string());
        }
    }
    if category_ids.is_empty() {
        return Err(DomainError::validation(
            "You have to select at least one item.",
        ));
    }

    let price = parse_price(&form.menu_price)?;
    if !price_in_range(price) {
        return Err(DomainError::validation(
            "Menu price should be between 0.1 ... 999.9",
        ));
    }

    Ok(ValidMenu {
        name,
        description,
        image_urls,
        size: form.menu_size,
        category_ids,
        price,
    })
}

fn price_in_range(price: Decimal) -> bool {
    let (Ok(min), Ok(max)) = (Decimal::from_str("0.1"), Decimal::from_str("999.9")) else {
        return false;
    };
    price > min && price < max
}

pub fn validate_url(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(trimmed.to_string())
        }
        _ => Err(DomainError::validation("Invalid URL")),
    }
}

pub fn validate_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(DomainError::validation("Email is required"));
    }
    if email.len() > EMAIL_MAX_LEN {
        return Err(DomainError::validation("Invalid email"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::validation("Invalid email"));
    };
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(DomainError::validation("Invalid email"));
    }
    Ok(email.to_string())
}

fn validate_password(password: &str, confirm: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(DomainError::validation(format!(
            "Password must contain at least {PASSWORD_MIN_LEN} character(s)"
        )));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(DomainError::validation(format!(
            "Password must contain at most {PASSWORD_MAX_LEN} character(s)"
        )));
    }
    if password != confirm {
        return Err(DomainError::validation("Passwords do not match"));
    }
    Ok(())
}

fn validate_phone(raw: &str) -> Result<String, DomainError> {
    let phone = bounded_text(raw, CONTACT_MAX_LEN, "Phone is required", "Phone")?;
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-');
    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::validation("Invalid phone number"));
    }
    Ok(phone)
}

pub fn validate_contact(form: &ContactUpdate) -> Result<ContactUpdate, DomainError> {
    Ok(ContactUpdate {
        street: bounded_text(&form.street, CONTACT_MAX_LEN, "Street is required", "Street")?,
        city: bounded_text(&form.city, CONTACT_MAX_LEN, "City is required", "City")?,
        phone: validate_phone(&form.phone)?,
    })
}

pub fn validate_register(form: &RegisterRequest) -> Result<RegisterRequest, DomainError> {
    let username = bounded_text(
        &form.username,
        NAME_MAX_LEN,
        "Username is required",
        "Username",
    )?;
    let email = validate_email(&form.email)?;
    let contact = validate_contact(&ContactUpdate {
        street: form.street.clone(),
        city: form.city.clone(),
        phone: form.phone.clone(),
    })?;
    validate_password(&form.password, &form.confirm_password)?;

    Ok(RegisterRequest {
        username,
        email,
        street: contact.street,
        city: contact.city,
        phone: contact.phone,
        password: form.password.clone(),
        confirm_password: form.confirm_password.clone(),
    })
}

pub fn validate_login(form: &LoginRequest) -> Result<(), DomainError> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(DomainError::validation("Email and password are required"));
    }
    Ok(())
}

/// Returns the normalised form. `password` is `None` when the caller left it
/// blank, meaning the stored credential must not change.
pub fn validate_auth_profile(form: &AuthProfileUpdate) -> Result<AuthProfileUpdate, DomainError> {
    let username = bounded_text(
        &form.username,
        NAME_MAX_LEN,
        "Username is required",
        "Username",
    )?;
    let email = validate_email(&form.email)?;

    let password = form
        .password
        .as_deref()
        .filter(|p| !p.trim().is_empty());
    if let Some(password) = password {
        validate_password(password, form.confirm_password.as_deref().unwrap_or_default())?;
    }

    Ok(AuthProfileUpdate {
        username,
        email,
        password: password.map(str::to_string),
        confirm_password: None,
    })
}

pub fn validate_checkout(form: &CheckoutRequest) -> Result<CheckoutRequest, DomainError> {
    if form.cart.is_empty() {
        return Err(DomainError::validation("Cart is empty"));
    }
    if form.cart.iter().any(|line| line.quantity == 0) {
        return Err(DomainError::validation("Quantity must be at least 1"));
    }
    let customer_name = bounded_text(
        &form.customer_name,
        NAME_MAX_LEN,
        "Username is required",
        "Username",
    )?;
    let email = validate_email(&form.email)?;
    let contact = validate_contact(&ContactUpdate {
        street: form.street.clone(),
        city: form.city.clone(),
        phone: form.phone.clone(),
    })?;

    Ok(CheckoutRequest {
        cart: form.cart.clone(),
        customer_name,
        email,
        street: contact.street,
        city: contact.city,
        phone: contact.phone,
    })
}
