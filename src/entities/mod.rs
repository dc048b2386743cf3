//! The three resource types: products, customers and orders

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerChange, CustomerPatch, NewCustomer};
pub use order::{NewOrder, Order, OrderChange, OrderPatch, STATUS_DELIVERED, STATUS_PENDING};
pub use product::{NewProduct, Product, ProductChange, ProductPatch};
