use crate::domain::category::Category;
use crate::domain::price::{PriceFormat, format_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuSize {
    Small,
    #[default]
    Normal,
}

impl fmt::Display for MenuSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuSize::Small => f.write_str("SMALL"),
            MenuSize::Normal => f.write_str("NORMAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub url: String,
    pub menu_id: String,
}

/// Stored menu row. Categories are referenced by id; [`Menu`] is the
/// joined view handed out to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub size: MenuSize,
    pub price: Decimal,
    pub category_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    pub name: String,
    pub description: String,
    pub size: MenuSize,
    pub price: Decimal,
    #[serde(default)]
    pub formatted_price: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Menu {
    pub fn from_parts(record: MenuRecord, images: Vec<Image>, categories: Vec<Category>) -> Self {
        Self {
            formatted_price: format_price(record.price, PriceFormat::default()),
            id: record.id,
            name: record.name,
            description: record.description,
            size: record.size,
            price: record.price,
            images,
            categories,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuImageInput {
    pub url: String,
}

/// Payload of the admin menu form. The price arrives as the raw text of the
/// form input and is parsed during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuForm {
    pub menu_name: String,
    pub menu_description: String,
    #[serde(default)]
    pub menu_image: Vec<MenuImageInput>,
    #[serde(default)]
    pub menu_size: MenuSize,
    #[serde(default)]
    pub menu_category: Vec<String>,
    pub menu_price: String,
}

/// A menu form after validation: trimmed text, parsed price, deduplicated
/// category ids.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMenu {
    pub name: String,
    pub description: String,
    pub image_urls: Vec<String>,
    pub size: MenuSize,
    pub category_ids: Vec<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageDiff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl ImageDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Urls present only in `existing` are removed, urls present only in
/// `incoming` are added. Order follows the input lists; duplicates collapse.
pub fn diff_image_urls(existing: &[String], incoming: &[String]) -> ImageDiff {
    let existing_set: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let incoming_set: HashSet<&str> = incoming.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let to_remove = existing
        .iter()
        .filter(|url| !incoming_set.contains(url.as_str()) && seen.insert(url.as_str()))
        .cloned()
        .collect();

    let mut seen = HashSet::new();
    let to_add = incoming
        .iter()
        .filter(|url| !existing_set.contains(url.as_str()) && seen.insert(url.as_str()))
        .cloned()
        .collect();

    ImageDiff { to_add, to_remove }
}
