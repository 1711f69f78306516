//! Shopping-list aggregation over the ingredient lines of carted recipes.

use std::collections::BTreeMap;

use serde::Serialize;

/// One ingredient line reachable from a user's shopping cart.
///
/// Lines may already be partially summed by the store; folding is idempotent
/// over pre-grouped input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Group lines by `(name, measurement_unit)`, sum amounts and order by name.
///
/// The output depends only on the multiset of lines, never on their order.
pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Vec<ShoppingListItem> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_default() += line.amount;
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Render as the downloadable text document, one `"{name} - {total} {unit}"` line per item.
pub fn render(items: &[ShoppingListItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} - {} {}\n",
                item.name, item.total_amount, item.measurement_unit
            )
        })
        .collect()
}
