//! Business keys: site/route ids and demand-note reference numbers.

use crate::newtype_string::define_key_string;

define_key_string! {
    /// Site/route identifier, the business key of the budget and PO tables.
    pub struct SiteId("Site ID");
}

define_key_string! {
    /// Demand-note reference number, the business key of the DN master table.
    pub struct DnNumber("DN number");
}

#[cfg(test)]
#[path = "keys_test.rs"]
mod tests;
