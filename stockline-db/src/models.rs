use serde::Serialize;

/// A user row as exposed over the API. The password hash never leaves the
/// gateway through this type.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// Full user row used for credential verification only.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    pub deleted_at: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// bcrypt hash, never a plain password
    pub password: String,
}

/// Partial update for a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// A product category with its tax rate.
#[derive(Debug, Clone, Serialize)]
pub struct ProductType {
    pub id: i64,
    pub name: String,
    pub tax: f64,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewProductType {
    pub name: String,
    pub tax: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub product_type_id: i64,
    pub value: f64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
}

/// A product joined with its type, as returned by the product listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithType {
    pub id: i64,
    pub name: String,
    pub product_type_id: i64,
    pub description: String,
    pub value: f64,
    pub created_at: i64,
    pub product_type_name: String,
    pub tax: f64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub product_type_id: i64,
    pub value: f64,
}

/// Partial update for a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub product_type_id: Option<i64>,
    pub value: Option<f64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.product_type_id.is_none()
            && self.value.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    Purchase,
    Sale,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Purchase => "Purchase",
            TransactionKind::Sale => "Sale",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Purchase" => Some(TransactionKind::Purchase),
            "Sale" => Some(TransactionKind::Sale),
            _ => None,
        }
    }
}

/// A transaction joined with the product it refers to.
///
/// Purchases carry `supplier_name`, `value_without_tax` and `total_tax`;
/// sales carry `customer_name`. The unused columns stay `None` and are
/// omitted from the serialized row.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub transaction_type: TransactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_without_tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tax: Option<f64>,
    pub product_id: i64,
    pub amount: i64,
    pub total_value: f64,
    pub created_at: i64,
    pub product_name: String,
}

#[derive(Debug, Clone)]
pub struct NewPurchase {
    pub supplier_name: String,
    pub value_without_tax: f64,
    pub total_tax: f64,
    pub product_id: i64,
    pub amount: i64,
    pub total_value: f64,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub customer_name: String,
    pub product_id: i64,
    pub amount: i64,
    pub total_value: f64,
}
