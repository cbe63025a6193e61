use crate::domain::order::Order;
use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a batch of orders from a JSON source (an array of order objects).
///
/// Ids and statuses are optional in the file; missing ones default to a
/// fresh id and `Created`.
pub struct OrderReader<R: Read> {
    source: R,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn orders(self) -> Result<Vec<Order>> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<Order>> {
    OrderReader::new(File::open(path)?).orders()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderStatus;

    #[test]
    fn test_reads_order_batch() {
        let data = r#"[
            {
                "customer": "alice",
                "method": "creditcard",
                "items": [
                    {"sku": "A", "quantity": 2,
                     "unit_price": {"minor": 500, "currency": "usd"}},
                    {"sku": "ebook", "quantity": 1, "kind": "digital",
                     "unit_price": {"minor": 900, "currency": "usd"}}
                ]
            }
        ]"#;
        let orders = OrderReader::new(data.as_bytes()).orders().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].customer, "alice");
        assert_eq!(orders[0].status(), OrderStatus::Created);
        assert_eq!(orders[0].items.len(), 2);
    }

    #[test]
    fn test_malformed_batch_is_an_error() {
        let data = r#"[{"customer": "alice"}]"#;
        assert!(OrderReader::new(data.as_bytes()).orders().is_err());
    }
}
