pub(crate) mod login;
pub(crate) mod product_types;
pub(crate) mod products;
pub(crate) mod transactions;
pub(crate) mod users;
