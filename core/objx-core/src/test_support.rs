//! Record types shared by unit tests.

use crate::Record;

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Item {
    #[objx(identity)]
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: u32,
    pub note: Option<String>,
}

impl Item {
    pub fn new(id: i64, name: &str, price: f64, stock: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            stock,
            note: None,
        }
    }
}

#[derive(Debug, Clone, Record)]
#[objx(name = "tagged_items")]
pub struct Tagged {
    #[objx(identity)]
    pub id: u64,
    pub label: String,
    #[objx(skip)]
    pub tags: Vec<String>,
}
