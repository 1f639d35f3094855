//! Carrier entity models, one module per response category.

pub mod business_check;
